//! Document store module
//!
//! Keyed-document storage behind the [`DocumentStore`] trait. Collections are
//! flat maps of `id -> JSON document`, mirroring the Firebase Realtime Database
//! tree (`/donations/{id}`, `/users/{uid}`).
//!
//! Two backends are provided:
//! - [`FirebaseStore`]: Realtime Database REST API
//! - [`MemoryStore`]: in-process map, for local runs and tests

mod firebase_client;
mod memory;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

pub use firebase_client::FirebaseStore;
pub use memory::MemoryStore;

/// Errors raised by a document store backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Store rejected request (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Unexpected store response: {0}")]
    Decode(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Keyed-document store
///
/// Every call is a single request against the backend; nothing is cached and
/// no call spans more than one backend operation.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read every document of a collection, ordered by key
    async fn list(&self, collection: &str) -> StoreResult<Vec<(String, Value)>>;

    /// Read one document, `None` when absent
    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Value>>;

    /// Write a new document under a store-generated key and return the key
    async fn push(&self, collection: &str, document: Value) -> StoreResult<String>;

    /// Write a document under a caller-chosen key, replacing any existing one
    async fn set(&self, collection: &str, id: &str, document: Value) -> StoreResult<()>;

    /// Merge fields into a document. `null` values delete the field.
    async fn update(&self, collection: &str, id: &str, fields: Map<String, Value>)
        -> StoreResult<()>;

    /// Delete a document. Deleting an absent key succeeds.
    async fn remove(&self, collection: &str, id: &str) -> StoreResult<()>;
}
