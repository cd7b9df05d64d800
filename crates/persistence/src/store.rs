// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Typed access to the four records.
//!
//! Each record is read and written as a whole document. Read-modify-write
//! cycles go through the `update_*` helpers, which hold a per-record lock
//! for the duration of the cycle so concurrent writers in this process
//! cannot drop each other's changes.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rollcall_audit::HistoryEntry;
use rollcall_domain::{HolidayCalendar, MemberDirectory, OooLedger};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::error;

use crate::backend::StorageBackend;
use crate::error::PersistenceError;
use crate::key::RecordKey;

/// The record store.
pub struct RecordStore {
    backend: Arc<dyn StorageBackend>,
    locks: [Mutex<()>; 4],
}

impl RecordStore {
    /// Creates a store over a backend.
    #[must_use]
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self {
            backend,
            locks: [
                Mutex::new(()),
                Mutex::new(()),
                Mutex::new(()),
                Mutex::new(()),
            ],
        }
    }

    /// Loads the member directory.
    #[must_use]
    pub fn members(&self) -> MemberDirectory {
        self.load(RecordKey::Members)
    }

    /// Loads the holiday catalog.
    #[must_use]
    pub fn holidays(&self) -> HolidayCalendar {
        self.load(RecordKey::Holidays)
    }

    /// Loads the out-of-office ledger.
    #[must_use]
    pub fn ooo(&self) -> OooLedger {
        self.load(RecordKey::Ooo)
    }

    /// Loads the history log in stored order.
    #[must_use]
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.load(RecordKey::History)
    }

    /// Loads, modifies, and saves the member directory under its lock.
    ///
    /// If `f` returns an error nothing is saved.
    ///
    /// # Errors
    ///
    /// Returns the error from `f`, or the save error converted into `E`.
    pub fn update_members<R, E, F>(&self, f: F) -> Result<R, E>
    where
        F: FnOnce(&mut MemberDirectory) -> Result<R, E>,
        E: From<PersistenceError>,
    {
        self.update(RecordKey::Members, f)
    }

    /// Loads, modifies, and saves the holiday catalog under its lock.
    ///
    /// # Errors
    ///
    /// Returns the error from `f`, or the save error converted into `E`.
    pub fn update_holidays<R, E, F>(&self, f: F) -> Result<R, E>
    where
        F: FnOnce(&mut HolidayCalendar) -> Result<R, E>,
        E: From<PersistenceError>,
    {
        self.update(RecordKey::Holidays, f)
    }

    /// Loads, modifies, and saves the out-of-office ledger under its lock.
    ///
    /// # Errors
    ///
    /// Returns the error from `f`, or the save error converted into `E`.
    pub fn update_ooo<R, E, F>(&self, f: F) -> Result<R, E>
    where
        F: FnOnce(&mut OooLedger) -> Result<R, E>,
        E: From<PersistenceError>,
    {
        self.update(RecordKey::Ooo, f)
    }

    /// Appends one entry to the history log.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write.
    pub fn append_history(&self, entry: HistoryEntry) -> Result<(), PersistenceError> {
        self.update(RecordKey::History, |log: &mut Vec<HistoryEntry>| {
            log.push(entry);
            Ok::<(), PersistenceError>(())
        })
    }

    fn lock(&self, key: RecordKey) -> MutexGuard<'_, ()> {
        self.locks[key.lock_index()]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn load<T>(&self, key: RecordKey) -> T
    where
        T: DeserializeOwned + Default,
    {
        let document: Value = self.backend.load(key, key.default_document());
        serde_json::from_value(document).unwrap_or_else(|e| {
            error!(key = %key, error = %e, "Record has an unexpected shape, using default");
            T::default()
        })
    }

    fn save<T>(&self, key: RecordKey, record: &T) -> Result<(), PersistenceError>
    where
        T: Serialize,
    {
        let document: Value = serde_json::to_value(record)?;
        self.backend.save(key, &document)
    }

    fn update<T, R, E, F>(&self, key: RecordKey, f: F) -> Result<R, E>
    where
        T: DeserializeOwned + Serialize + Default,
        F: FnOnce(&mut T) -> Result<R, E>,
        E: From<PersistenceError>,
    {
        let _guard: MutexGuard<'_, ()> = self.lock(key);
        let mut record: T = self.load(key);
        let result: R = f(&mut record)?;
        self.save(key, &record)?;
        Ok(result)
    }
}

impl std::fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore").finish_non_exhaustive()
    }
}
