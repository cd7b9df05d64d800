// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Copying records between backends.
//!
//! A transfer walks every record in a fixed order. Records absent from the
//! source are skipped without touching the destination. Records present in
//! the source overwrite the destination. A record that exists but cannot be
//! read is a failure and leaves the destination untouched. A failure on one
//! record does not stop the others.

use serde_json::Value;
use tracing::{error, info, warn};

use crate::backend::StorageBackend;
use crate::key::RecordKey;

/// A record that could not be copied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationFailure {
    /// The record.
    pub key: RecordKey,
    /// Why the copy failed.
    pub error: String,
}

/// The outcome of a transfer, per record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// Records written to the destination.
    pub succeeded: Vec<RecordKey>,
    /// Records that could not be written.
    pub failed: Vec<MigrationFailure>,
    /// Records absent from the source.
    pub skipped: Vec<RecordKey>,
}

impl MigrationReport {
    /// True iff no record failed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

impl std::fmt::Display for MigrationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Succeeded: {}", join(&self.succeeded))?;
        writeln!(f, "Skipped: {}", join(&self.skipped))?;
        write!(f, "Failed: {}", self.failed.len())?;
        for failure in &self.failed {
            write!(f, "\n  {}: {}", failure.key, failure.error)?;
        }
        Ok(())
    }
}

fn join(keys: &[RecordKey]) -> String {
    if keys.is_empty() {
        return String::from("none");
    }
    keys.iter()
        .map(|key| key.as_str())
        .collect::<Vec<&str>>()
        .join(", ")
}

/// Copies every record from `source` to `destination`.
///
/// Records are processed in the order holidays, members, ooo, history.
#[must_use]
pub fn transfer(source: &dyn StorageBackend, destination: &dyn StorageBackend) -> MigrationReport {
    let mut report: MigrationReport = MigrationReport::default();

    for key in RecordKey::ALL {
        if !source.exists(key) {
            info!(key = %key, "Record absent from source, skipping");
            report.skipped.push(key);
            continue;
        }

        // Null is never a stored record, so it marks a failed read.
        let document: Value = source.load(key, Value::Null);
        if document.is_null() {
            error!(key = %key, "Record present in source but could not be read");
            report.failed.push(MigrationFailure {
                key,
                error: String::from("record present but could not be read"),
            });
            continue;
        }

        match destination.save(key, &document) {
            Ok(()) => {
                info!(key = %key, "Record migrated");
                report.succeeded.push(key);
            }
            Err(e) => {
                error!(key = %key, error = %e, "Record migration failed");
                report.failed.push(MigrationFailure {
                    key,
                    error: e.to_string(),
                });
            }
        }
    }

    if report.skipped.len() == RecordKey::ALL.len() {
        warn!("No records found in source; check that it is reachable and configured correctly");
    }

    info!(
        succeeded = report.succeeded.len(),
        failed = report.failed.len(),
        skipped = report.skipped.len(),
        "Migration finished"
    );
    report
}

/// Lists the records stored in a backend, sorted by name.
#[must_use]
pub fn enumerate(backend: &dyn StorageBackend) -> Vec<RecordKey> {
    backend.list()
}
