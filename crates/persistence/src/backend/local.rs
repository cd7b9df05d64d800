// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Directory-backed storage.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, error, info};

use super::StorageBackend;
use crate::error::PersistenceError;
use crate::key::{RecordKey, sort_keys};

/// Stores each record as `{key}.json` under a root directory.
#[derive(Debug, Clone)]
pub struct LocalBackend {
    root: PathBuf,
}

impl LocalBackend {
    /// Opens a local backend rooted at `root`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let root: PathBuf = root.into();
        fs::create_dir_all(&root).map_err(|e| {
            PersistenceError::Io(format!(
                "Failed to create data directory {}: {e}",
                root.display()
            ))
        })?;
        info!(root = %root.display(), "Local storage ready");
        Ok(Self { root })
    }

    /// The directory documents are stored in.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: RecordKey) -> PathBuf {
        self.root.join(key.file_name())
    }
}

impl StorageBackend for LocalBackend {
    fn load(&self, key: RecordKey, default: Value) -> Value {
        let path: PathBuf = self.path_for(key);
        let bytes: Vec<u8> = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(key = %key, path = %path.display(), "Record not found, using default");
                return default;
            }
            Err(e) => {
                error!(key = %key, path = %path.display(), error = %e, "Failed to read record");
                return default;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(document) => document,
            Err(e) => {
                error!(key = %key, path = %path.display(), error = %e, "Record is not valid JSON, using default");
                default
            }
        }
    }

    fn save(&self, key: RecordKey, document: &Value) -> Result<(), PersistenceError> {
        let path: PathBuf = self.path_for(key);
        let body: Vec<u8> = serde_json::to_vec_pretty(document)?;

        // Write beside the target and rename so a failed write never truncates it.
        let staging: PathBuf = self.root.join(format!(".{}.tmp", key.file_name()));
        let result: Result<(), std::io::Error> =
            fs::write(&staging, &body).and_then(|()| fs::rename(&staging, &path));

        if let Err(e) = result {
            error!(key = %key, path = %path.display(), error = %e, "Failed to save record");
            let _ = fs::remove_file(&staging);
            return Err(PersistenceError::Io(format!(
                "Failed to write {}: {e}",
                path.display()
            )));
        }

        debug!(key = %key, bytes = body.len(), "Saved record");
        Ok(())
    }

    fn exists(&self, key: RecordKey) -> bool {
        self.path_for(key).is_file()
    }

    fn list(&self) -> Vec<RecordKey> {
        let entries: fs::ReadDir = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) => {
                error!(root = %self.root.display(), error = %e, "Failed to list records");
                return Vec::new();
            }
        };

        let mut keys: Vec<RecordKey> = entries
            .filter_map(Result::ok)
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| entry.file_name().to_str().and_then(RecordKey::from_file_name))
            .collect();
        sort_keys(&mut keys);
        keys
    }
}
