// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence for Rollcall.
//!
//! Four JSON documents make up all persisted state: `members`, `holidays`,
//! `ooo`, and `history`. They live in a [`StorageBackend`], either a local
//! directory or a remote blob container, chosen once via [`StorageConfig`].
//!
//! [`RecordStore`] gives typed access to the documents and serializes
//! read-modify-write cycles per record. [`migration`] copies documents
//! between backends.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

pub mod backend;
mod config;
mod error;
mod key;
pub mod migration;
mod store;

#[cfg(test)]
mod tests;

pub use backend::StorageBackend;
pub use backend::local::LocalBackend;
pub use backend::remote::{BlobTransport, HttpBlobTransport, RemoteBackend};
pub use config::{
    DEFAULT_CONTAINER, DEFAULT_DATA_DIR, RemoteConfig, StorageConfig, StorageInfo, StorageKind,
};
pub use error::PersistenceError;
pub use key::RecordKey;
pub use migration::{MigrationFailure, MigrationReport, enumerate, transfer};
pub use store::RecordStore;
