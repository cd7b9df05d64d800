// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::backend::StorageBackend;
use crate::backend::remote::BlobTransport;
use crate::error::PersistenceError;
use crate::key::RecordKey;

/// In-memory backend that counts writes and can reject chosen records.
#[derive(Default)]
pub struct MemoryBackend {
    documents: Mutex<BTreeMap<&'static str, Value>>,
    saves: AtomicUsize,
    rejected: Vec<RecordKey>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting(keys: &[RecordKey]) -> Self {
        Self {
            rejected: keys.to_vec(),
            ..Self::default()
        }
    }

    pub fn with(self, key: RecordKey, document: Value) -> Self {
        self.documents.lock().unwrap().insert(key.as_str(), document);
        self
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn get(&self, key: RecordKey) -> Option<Value> {
        self.documents.lock().unwrap().get(key.as_str()).cloned()
    }
}

impl StorageBackend for MemoryBackend {
    fn load(&self, key: RecordKey, default: Value) -> Value {
        self.get(key).unwrap_or(default)
    }

    fn save(&self, key: RecordKey, document: &Value) -> Result<(), PersistenceError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        if self.rejected.contains(&key) {
            return Err(PersistenceError::Status {
                status: 403,
                message: String::from("write denied"),
            });
        }
        self.documents
            .lock()
            .unwrap()
            .insert(key.as_str(), document.clone());
        Ok(())
    }

    fn exists(&self, key: RecordKey) -> bool {
        self.get(key).is_some()
    }

    fn list(&self) -> Vec<RecordKey> {
        let mut keys: Vec<RecordKey> = RecordKey::ALL
            .into_iter()
            .filter(|key| self.exists(*key))
            .collect();
        keys.sort_by_key(|key| key.as_str());
        keys
    }
}

#[derive(Default)]
pub struct BlobState {
    pub container_exists: bool,
    pub create_calls: usize,
    pub objects: BTreeMap<String, Vec<u8>>,
    pub fail_requests: bool,
    pub fail_reads: bool,
}

/// In-memory container standing in for the blob service.
#[derive(Clone, Default)]
pub struct MemoryBlobTransport {
    pub state: Arc<Mutex<BlobState>>,
}

impl MemoryBlobTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_raw(&self, name: &str, body: &[u8]) {
        let mut state = self.state.lock().unwrap();
        state.container_exists = true;
        state.objects.insert(name.to_string(), body.to_vec());
    }

    pub fn set_failing(&self, failing: bool) {
        self.state.lock().unwrap().fail_requests = failing;
    }

    /// Fails `get` while leaving `head` and `list` working.
    pub fn set_failing_reads(&self, failing: bool) {
        self.state.lock().unwrap().fail_reads = failing;
    }

    fn check(&self) -> Result<(), PersistenceError> {
        if self.state.lock().unwrap().fail_requests {
            return Err(PersistenceError::Transport(String::from(
                "connection refused",
            )));
        }
        Ok(())
    }
}

impl BlobTransport for MemoryBlobTransport {
    fn container_exists(&self) -> Result<bool, PersistenceError> {
        self.check()?;
        Ok(self.state.lock().unwrap().container_exists)
    }

    fn create_container(&self) -> Result<(), PersistenceError> {
        self.check()?;
        let mut state = self.state.lock().unwrap();
        state.create_calls += 1;
        state.container_exists = true;
        Ok(())
    }

    fn get(&self, name: &str) -> Result<Option<Vec<u8>>, PersistenceError> {
        self.check()?;
        if self.state.lock().unwrap().fail_reads {
            return Err(PersistenceError::Status {
                status: 500,
                message: String::from("server busy"),
            });
        }
        Ok(self.state.lock().unwrap().objects.get(name).cloned())
    }

    fn put(&self, name: &str, body: Vec<u8>) -> Result<(), PersistenceError> {
        self.check()?;
        self.state
            .lock()
            .unwrap()
            .objects
            .insert(name.to_string(), body);
        Ok(())
    }

    fn head(&self, name: &str) -> Result<bool, PersistenceError> {
        self.check()?;
        Ok(self.state.lock().unwrap().objects.contains_key(name))
    }

    fn list(&self) -> Result<Vec<String>, PersistenceError> {
        self.check()?;
        Ok(self.state.lock().unwrap().objects.keys().cloned().collect())
    }
}
