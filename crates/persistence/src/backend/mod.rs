// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Storage backends.
//!
//! This module isolates everything that depends on where documents live.
//! Callers above this layer see only the [`StorageBackend`] contract.
//!
//! ## Backend Support
//!
//! - `local`: one JSON file per record in a directory
//! - `remote`: one JSON object per record in a blob container
//!
//! ## Failure Semantics
//!
//! Reads never fail: an absent, unreadable, or unparseable document yields
//! the caller's default and the cause is logged. Writes report failure to
//! the caller and leave the previously stored document intact.

pub mod local;
pub mod remote;

use serde_json::Value;

use crate::error::PersistenceError;
use crate::key::RecordKey;

/// Key-value storage for whole JSON documents.
///
/// Implementations must be safe to share across threads. No operation
/// depends on which implementation is in use.
pub trait StorageBackend: Send + Sync {
    /// Returns the stored document for `key`, or `default` if it is absent
    /// or cannot be read.
    fn load(&self, key: RecordKey, default: Value) -> Value;

    /// Replaces the stored document for `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the document could not be written. The previous
    /// document is left in place.
    fn save(&self, key: RecordKey, document: &Value) -> Result<(), PersistenceError>;

    /// Returns true if a document is stored for `key`.
    fn exists(&self, key: RecordKey) -> bool;

    /// Returns every stored key, sorted by name.
    fn list(&self) -> Vec<RecordKey>;
}
