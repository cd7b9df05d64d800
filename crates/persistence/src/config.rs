// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend selection.
//!
//! A [`StorageConfig`] is resolved once at process start and turned into a
//! shared [`StorageBackend`]. Nothing above this layer branches on the kind.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::backend::StorageBackend;
use crate::backend::local::LocalBackend;
use crate::backend::remote::{HttpBlobTransport, RemoteBackend};
use crate::error::PersistenceError;

/// Container used when none is configured.
pub const DEFAULT_CONTAINER: &str = "rollcall-data";

/// Data directory used when none is configured.
pub const DEFAULT_DATA_DIR: &str = "./data";

/// Which backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// Files in a local directory.
    Local,
    /// Objects in a blob container.
    Remote,
}

impl std::fmt::Display for StorageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local => f.write_str("local"),
            Self::Remote => f.write_str("remote"),
        }
    }
}

impl std::str::FromStr for StorageKind {
    type Err = PersistenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "remote" | "azure" => Ok(Self::Remote),
            other => Err(PersistenceError::Configuration(format!(
                "Unknown storage type: {other}. Expected 'local' or 'remote'"
            ))),
        }
    }
}

/// Connection settings for the remote backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    /// Storage account name.
    pub account: String,
    /// Container holding the records.
    pub container: String,
    /// Service URL override, e.g. for a local emulator.
    pub endpoint: Option<String>,
    /// Shared access signature appended to every request.
    pub sas_token: Option<String>,
}

impl RemoteConfig {
    /// Creates a remote configuration, applying the default container.
    ///
    /// # Errors
    ///
    /// Returns an error if the account name is missing or malformed.
    pub fn new(
        account: Option<&str>,
        container: Option<&str>,
        endpoint: Option<&str>,
        sas_token: Option<&str>,
    ) -> Result<Self, PersistenceError> {
        let account: &str = account.map(str::trim).unwrap_or_default();
        validate_account(account)?;

        let container: &str = container
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CONTAINER);

        Ok(Self {
            account: account.to_string(),
            container: container.to_string(),
            endpoint: non_blank(endpoint),
            sas_token: non_blank(sas_token),
        })
    }

    /// The service URL requests are sent to.
    #[must_use]
    pub fn endpoint_url(&self) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| format!("https://{}.blob.core.windows.net", self.account))
    }
}

/// Resolved storage settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Which backend to build.
    pub kind: StorageKind,
    /// Directory for the local backend.
    pub local_root: PathBuf,
    /// Settings for the remote backend; required when `kind` is remote.
    pub remote: Option<RemoteConfig>,
}

/// What the process is storing into, for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageInfo {
    /// The backend kind.
    pub storage_type: StorageKind,
    /// Directory or container URL.
    pub location: String,
    /// Container name, for the remote backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
}

impl StorageConfig {
    /// Local storage rooted at `root`.
    #[must_use]
    pub fn local(root: impl Into<PathBuf>) -> Self {
        Self {
            kind: StorageKind::Local,
            local_root: root.into(),
            remote: None,
        }
    }

    /// Remote storage with the given settings.
    #[must_use]
    pub fn remote(remote: RemoteConfig) -> Self {
        Self {
            kind: StorageKind::Remote,
            local_root: PathBuf::from(DEFAULT_DATA_DIR),
            remote: Some(remote),
        }
    }

    /// Builds the configured backend.
    ///
    /// # Errors
    ///
    /// Returns an error if remote settings are missing, the local directory
    /// cannot be created, or the HTTP client cannot be built.
    pub fn build(&self) -> Result<Arc<dyn StorageBackend>, PersistenceError> {
        match self.kind {
            StorageKind::Local => {
                let backend: LocalBackend = LocalBackend::new(&self.local_root)?;
                Ok(Arc::new(backend))
            }
            StorageKind::Remote => {
                let remote: &RemoteConfig = self.remote.as_ref().ok_or_else(|| {
                    PersistenceError::Configuration(String::from(
                        "Remote storage selected but no account is configured",
                    ))
                })?;
                let endpoint: String = remote.endpoint_url();
                let transport: HttpBlobTransport = HttpBlobTransport::new(
                    &endpoint,
                    &remote.container,
                    remote.sas_token.as_deref(),
                )?;
                info!(endpoint = %endpoint, container = %remote.container, "Remote storage configured");
                Ok(Arc::new(RemoteBackend::new(Box::new(transport))))
            }
        }
    }

    /// Describes where records are stored.
    #[must_use]
    pub fn describe(&self) -> StorageInfo {
        match (&self.kind, &self.remote) {
            (StorageKind::Remote, Some(remote)) => StorageInfo {
                storage_type: StorageKind::Remote,
                location: format!("{}/{}", remote.endpoint_url(), remote.container),
                container: Some(remote.container.clone()),
            },
            _ => StorageInfo {
                storage_type: self.kind,
                location: self.local_root.display().to_string(),
                container: None,
            },
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

/// Account names are 3 to 24 lowercase letters or digits.
fn validate_account(account: &str) -> Result<(), PersistenceError> {
    if account.is_empty() {
        return Err(PersistenceError::Configuration(String::from(
            "Storage account name is required for remote storage",
        )));
    }
    let well_formed: bool = (3..=24).contains(&account.len())
        && account
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit());
    if !well_formed {
        return Err(PersistenceError::Configuration(format!(
            "Invalid storage account name: {account}"
        )));
    }
    Ok(())
}
