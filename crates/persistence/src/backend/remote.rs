// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Blob-container storage.
//!
//! Records are stored as `{key}.json` objects in a single container. The
//! container is created on first use. The HTTP layer sits behind
//! [`BlobTransport`] so the backend logic can be exercised without a network.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use super::StorageBackend;
use crate::error::PersistenceError;
use crate::key::{RecordKey, sort_keys};

/// Service version sent with every request.
const API_VERSION: &str = "2021-08-06";

/// Per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Object-level operations against one container.
///
/// `get` and `head` report an absent object as `Ok(None)` / `Ok(false)`;
/// any other failure is an error.
pub trait BlobTransport: Send + Sync {
    /// Returns true if the container exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    fn container_exists(&self) -> Result<bool, PersistenceError>;

    /// Creates the container. Succeeds if it already exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    fn create_container(&self) -> Result<(), PersistenceError>;

    /// Fetches an object's bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails for any reason other than absence.
    fn get(&self, name: &str) -> Result<Option<Vec<u8>>, PersistenceError>;

    /// Uploads an object, replacing any existing one.
    ///
    /// # Errors
    ///
    /// Returns an error if the upload fails.
    fn put(&self, name: &str, body: Vec<u8>) -> Result<(), PersistenceError>;

    /// Returns true if the object exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    fn head(&self, name: &str) -> Result<bool, PersistenceError>;

    /// Lists object names in the container.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    fn list(&self) -> Result<Vec<String>, PersistenceError>;
}

/// Stores each record as an object in a blob container.
pub struct RemoteBackend {
    transport: Box<dyn BlobTransport>,
    container_ready: AtomicBool,
}

impl RemoteBackend {
    /// Creates a backend over the given transport.
    ///
    /// No request is made until the first operation.
    #[must_use]
    pub fn new(transport: Box<dyn BlobTransport>) -> Self {
        Self {
            transport,
            container_ready: AtomicBool::new(false),
        }
    }

    /// Creates the container if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the container cannot be checked or created.
    pub fn ensure_container(&self) -> Result<(), PersistenceError> {
        if self.container_ready.load(Ordering::Acquire) {
            return Ok(());
        }

        if !self.transport.container_exists()? {
            info!("Creating storage container");
            self.transport.create_container()?;
        }
        self.container_ready.store(true, Ordering::Release);
        Ok(())
    }
}

impl std::fmt::Debug for RemoteBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteBackend")
            .field("container_ready", &self.container_ready.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl StorageBackend for RemoteBackend {
    fn load(&self, key: RecordKey, default: Value) -> Value {
        if let Err(e) = self.ensure_container() {
            error!(key = %key, error = %e, "Storage container unavailable, using default");
            return default;
        }

        let bytes: Vec<u8> = match self.transport.get(&key.file_name()) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                info!(key = %key, "Record not found, using default");
                return default;
            }
            Err(e) => {
                error!(key = %key, error = %e, "Failed to fetch record, using default");
                return default;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(document) => document,
            Err(e) => {
                error!(key = %key, error = %e, "Record is not valid JSON, using default");
                default
            }
        }
    }

    fn save(&self, key: RecordKey, document: &Value) -> Result<(), PersistenceError> {
        self.ensure_container()?;
        let body: Vec<u8> = serde_json::to_vec_pretty(document)?;
        let size: usize = body.len();

        self.transport
            .put(&key.file_name(), body)
            .inspect_err(|e| error!(key = %key, error = %e, "Failed to upload record"))?;

        debug!(key = %key, bytes = size, "Saved record");
        Ok(())
    }

    fn exists(&self, key: RecordKey) -> bool {
        if let Err(e) = self.ensure_container() {
            warn!(key = %key, error = %e, "Storage container unavailable");
            return false;
        }
        self.transport.head(&key.file_name()).unwrap_or_else(|e| {
            warn!(key = %key, error = %e, "Failed to check record");
            false
        })
    }

    fn list(&self) -> Vec<RecordKey> {
        if let Err(e) = self.ensure_container() {
            error!(error = %e, "Storage container unavailable");
            return Vec::new();
        }

        let names: Vec<String> = match self.transport.list() {
            Ok(names) => names,
            Err(e) => {
                error!(error = %e, "Failed to list records");
                return Vec::new();
            }
        };

        let mut keys: Vec<RecordKey> = names
            .iter()
            .filter_map(|name| RecordKey::from_file_name(name))
            .collect();
        sort_keys(&mut keys);
        keys.dedup();
        keys
    }
}

/// [`BlobTransport`] over the blob service REST API.
#[derive(Debug, Clone)]
pub struct HttpBlobTransport {
    client: Client,
    container_url: String,
    sas_token: Option<String>,
}

impl HttpBlobTransport {
    /// Creates a transport for `container` at `endpoint`.
    ///
    /// # Arguments
    ///
    /// * `endpoint` - Service base URL, e.g. `https://account.blob.core.windows.net`
    /// * `container` - Container name
    /// * `sas_token` - Optional shared access signature query string
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        endpoint: &str,
        container: &str,
        sas_token: Option<&str>,
    ) -> Result<Self, PersistenceError> {
        let client: Client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| PersistenceError::Configuration(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            container_url: format!("{}/{container}", endpoint.trim_end_matches('/')),
            sas_token: sas_token
                .map(|t| t.trim_start_matches('?').to_string())
                .filter(|t| !t.is_empty()),
        })
    }

    fn url(&self, blob: Option<&str>, query: &str) -> String {
        let mut url: String = match blob {
            Some(name) => format!("{}/{name}", self.container_url),
            None => self.container_url.clone(),
        };
        let params: Vec<&str> = [Some(query), self.sas_token.as_deref()]
            .into_iter()
            .flatten()
            .filter(|p| !p.is_empty())
            .collect();
        if !params.is_empty() {
            url.push('?');
            url.push_str(&params.join("&"));
        }
        url
    }

    fn send(request: RequestBuilder) -> Result<Response, PersistenceError> {
        Ok(request.header("x-ms-version", API_VERSION).send()?)
    }

    fn status_error(response: Response) -> PersistenceError {
        let status: u16 = response.status().as_u16();
        let message: String = response.text().unwrap_or_default();
        PersistenceError::Status { status, message }
    }
}

impl BlobTransport for HttpBlobTransport {
    fn container_exists(&self) -> Result<bool, PersistenceError> {
        let response: Response =
            Self::send(self.client.get(self.url(None, "restype=container")))?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            s if s.is_success() => Ok(true),
            _ => Err(Self::status_error(response)),
        }
    }

    fn create_container(&self) -> Result<(), PersistenceError> {
        let response: Response =
            Self::send(self.client.put(self.url(None, "restype=container")))?;
        match response.status() {
            StatusCode::CONFLICT => Ok(()),
            s if s.is_success() => Ok(()),
            _ => Err(Self::status_error(response)),
        }
    }

    fn get(&self, name: &str) -> Result<Option<Vec<u8>>, PersistenceError> {
        let response: Response = Self::send(self.client.get(self.url(Some(name), "")))?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            s if s.is_success() => Ok(Some(response.bytes()?.to_vec())),
            _ => Err(Self::status_error(response)),
        }
    }

    fn put(&self, name: &str, body: Vec<u8>) -> Result<(), PersistenceError> {
        let request: RequestBuilder = self
            .client
            .put(self.url(Some(name), ""))
            .header("x-ms-blob-type", "BlockBlob")
            .header("Content-Type", "application/json; charset=utf-8")
            .body(body);
        let response: Response = Self::send(request)?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::status_error(response))
        }
    }

    fn head(&self, name: &str) -> Result<bool, PersistenceError> {
        let response: Response = Self::send(self.client.head(self.url(Some(name), "")))?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            s if s.is_success() => Ok(true),
            _ => Err(Self::status_error(response)),
        }
    }

    fn list(&self) -> Result<Vec<String>, PersistenceError> {
        let mut names: Vec<String> = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let mut request: RequestBuilder =
                self.client.get(self.url(None, "restype=container&comp=list"));
            if let Some(marker) = marker.as_deref() {
                request = request.query(&[("marker", marker)]);
            }
            let response: Response = Self::send(request)?;
            if !response.status().is_success() {
                return Err(Self::status_error(response));
            }
            let body: String = response.text()?;
            names.extend(blob_names(&body));

            match next_marker(&body) {
                Some(next) => {
                    debug!(marker = %next, "Fetching next listing page");
                    marker = Some(next);
                }
                None => break,
            }
        }
        Ok(names)
    }
}

/// Extracts `<Name>` values from a container listing.
pub(crate) fn blob_names(listing: &str) -> Vec<String> {
    tag_values(listing, "Name")
}

/// The continuation marker of a listing page, if more pages follow.
pub(crate) fn next_marker(listing: &str) -> Option<String> {
    tag_values(listing, "NextMarker")
        .into_iter()
        .find(|marker| !marker.is_empty())
}

fn tag_values(listing: &str, tag: &str) -> Vec<String> {
    let open: String = format!("<{tag}>");
    let close: String = format!("</{tag}>");

    let mut values: Vec<String> = Vec::new();
    let mut rest: &str = listing;
    while let Some(start) = rest.find(&open) {
        let after: &str = &rest[start + open.len()..];
        let Some(end) = after.find(&close) else {
            break;
        };
        values.push(after[..end].to_string());
        rest = &after[end + close.len()..];
    }
    values
}
