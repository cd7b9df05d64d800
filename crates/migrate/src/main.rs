// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # rollcall-migrate
//!
//! Copies the four rollcall records between the local and remote backends,
//! or lists what a backend currently holds.
//!
//! - `rollcall-migrate transfer local remote --account teamdata` uploads the
//!   records in `./data` to the `rollcall-data` container
//! - `rollcall-migrate transfer remote local --local-dir ./backup` downloads them
//! - `rollcall-migrate enumerate remote --account teamdata` lists stored records
//!
//! Records missing from the source are skipped. The process exits non-zero if
//! any record failed to copy.

#![deny(
    clippy::pedantic,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args as ClapArgs, Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{Result, eyre::WrapErr, eyre::bail};
use rollcall_persistence::{
    DEFAULT_DATA_DIR, MigrationReport, PersistenceError, RecordKey, RemoteConfig, StorageBackend,
    StorageConfig, StorageKind, enumerate, transfer,
};
use tracing::level_filters::LevelFilter;
use tracing::{error, info};
use tracing_log::AsTrace;

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .without_time()
        .init();

    match args.run() {
        Ok(code) => Ok(code),
        Err(err) => {
            error!("{err:#}");
            Ok(ExitCode::FAILURE)
        }
    }
}

#[derive(Debug, Parser)]
#[command(author, version, about = "Copy rollcall records between storage backends")]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    storage: StorageArgs,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    fn run(self) -> Result<ExitCode> {
        self.command.run(&self.storage)
    }

    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Copy every record from one backend to the other
    #[command(visible_alias = "t")]
    Transfer {
        /// Backend to read from (`local` or `remote`)
        #[arg(value_parser = parse_kind)]
        from: StorageKind,

        /// Backend to write to (`local` or `remote`)
        #[arg(value_parser = parse_kind)]
        to: StorageKind,
    },

    /// List the records a backend holds
    #[command(visible_alias = "ls")]
    Enumerate {
        /// Backend to list (`local` or `remote`)
        #[arg(value_parser = parse_kind)]
        kind: StorageKind,
    },
}

impl Command {
    fn run(self, storage: &StorageArgs) -> Result<ExitCode> {
        match self {
            Self::Transfer { from, to } => run_transfer(storage, from, to),
            Self::Enumerate { kind } => run_enumerate(storage, kind),
        }
    }
}

/// Connection flags shared by every subcommand.
#[derive(Clone, Debug, ClapArgs)]
struct StorageArgs {
    /// Directory for the local backend
    #[arg(long, global = true, env = "DATA_DIR", default_value = DEFAULT_DATA_DIR)]
    local_dir: PathBuf,

    /// Storage account name for the remote backend
    #[arg(long, global = true, env = "STORAGE_ACCOUNT_NAME")]
    account: Option<String>,

    /// Container name for the remote backend
    #[arg(long, global = true, env = "STORAGE_CONTAINER_NAME")]
    container: Option<String>,

    /// Service URL override for the remote backend
    #[arg(long, global = true, env = "STORAGE_ENDPOINT")]
    endpoint: Option<String>,

    /// Shared access signature for the remote backend
    #[arg(long, global = true, env = "STORAGE_SAS_TOKEN", hide_env_values = true)]
    sas_token: Option<String>,
}

impl StorageArgs {
    /// Resolves the flags into a config for the given backend kind.
    fn config_for(&self, kind: StorageKind) -> Result<StorageConfig, PersistenceError> {
        match kind {
            StorageKind::Local => Ok(StorageConfig::local(&self.local_dir)),
            StorageKind::Remote => {
                let remote: RemoteConfig = RemoteConfig::new(
                    self.account.as_deref(),
                    self.container.as_deref(),
                    self.endpoint.as_deref(),
                    self.sas_token.as_deref(),
                )?;
                Ok(StorageConfig::remote(remote))
            }
        }
    }
}

fn parse_kind(value: &str) -> Result<StorageKind, PersistenceError> {
    value.parse()
}

/// Checks the pair of backends and resolves both configs.
fn transfer_configs(
    storage: &StorageArgs,
    from: StorageKind,
    to: StorageKind,
) -> Result<(StorageConfig, StorageConfig)> {
    if from == to {
        bail!("Source and destination must differ (both are {from})");
    }
    let source: StorageConfig = storage
        .config_for(from)
        .wrap_err("Invalid source storage settings")?;
    let destination: StorageConfig = storage
        .config_for(to)
        .wrap_err("Invalid destination storage settings")?;
    Ok((source, destination))
}

fn run_transfer(storage: &StorageArgs, from: StorageKind, to: StorageKind) -> Result<ExitCode> {
    let (source, destination) = transfer_configs(storage, from, to)?;
    info!(
        from = %source.describe().location,
        to = %destination.describe().location,
        "Starting migration"
    );

    let source_backend: Arc<dyn StorageBackend> =
        source.build().wrap_err("Failed to open source storage")?;
    let destination_backend: Arc<dyn StorageBackend> = destination
        .build()
        .wrap_err("Failed to open destination storage")?;

    Ok(copy_records(
        source_backend.as_ref(),
        destination_backend.as_ref(),
        &format!("{from} -> {to}"),
    ))
}

/// Runs the transfer, prints the report, and maps it to the exit status.
fn copy_records(
    source: &dyn StorageBackend,
    destination: &dyn StorageBackend,
    label: &str,
) -> ExitCode {
    let report: MigrationReport = transfer(source, destination);

    println!("Migration summary ({label})");
    println!("{report}");

    if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn run_enumerate(storage: &StorageArgs, kind: StorageKind) -> Result<ExitCode> {
    let config: StorageConfig = storage
        .config_for(kind)
        .wrap_err("Invalid storage settings")?;
    let backend: Arc<dyn StorageBackend> = config.build().wrap_err("Failed to open storage")?;

    let keys: Vec<RecordKey> = enumerate(backend.as_ref());
    println!("Records in {kind} storage ({}):", config.describe().location);
    if keys.is_empty() {
        println!("  No records found");
    }
    for key in keys {
        println!("  {}", key.file_name());
    }
    Ok(ExitCode::SUCCESS)
}
