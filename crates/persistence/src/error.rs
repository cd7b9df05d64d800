// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// Local filesystem I/O failed.
    Io(String),
    /// A document could not be serialized or parsed.
    SerializationError(String),
    /// A remote request could not be completed (network, TLS, DNS).
    Transport(String),
    /// A remote request completed with an unexpected status.
    Status {
        /// The HTTP status code.
        status: u16,
        /// The response body or reason phrase.
        message: String,
    },
    /// The requested resource was not found.
    NotFound(String),
    /// Storage was configured incorrectly.
    Configuration(String),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "I/O error: {msg}"),
            Self::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
            Self::Transport(msg) => write!(f, "Transport error: {msg}"),
            Self::Status { status, message } => {
                write!(f, "Request failed with status {status}: {message}")
            }
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::Configuration(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<std::io::Error> for PersistenceError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

impl From<reqwest::Error> for PersistenceError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
