/*!
Store abstractions consumed by the Sabor synchronization layer.

Three external services back the site, each modeled as a trait so the
synchronization logic in `sabor_client` stays independent of any concrete
backend:

- [`DocumentStore`]: named collections of flat documents with point
  read/write and push-based subscriptions. A subscription callback fires
  immediately with the current state and again on every change, in store
  order, until its [`Subscription`] guard is dropped.
- [`BlobStore`]: binary uploads that report progress and resolve to a
  retrievable URL.
- [`LocalStorage`]: device-scoped persistent key/value storage, used to
  remember the active theme across reloads.

The in-memory reference backends live in [`memory`], [`blob`] and [`local`].
*/

pub mod blob;
pub mod local;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

pub use blob::{BlobStore, MemoryBlobStore, UploadEvent, UploadTask};
pub use local::{FileStorage, LocalStorage, MemoryStorage};
pub use memory::MemoryStore;

/// A stored document: a flat mapping of field names to primitive values.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Callback invoked with the current document state (`None` = absent).
pub type SnapshotCallback = Arc<dyn Fn(Option<Document>) + Send + Sync>;

/// Callback invoked with the full `(id, document)` list of a collection.
pub type ListCallback = Arc<dyn Fn(Vec<(String, Document)>) + Send + Sync>;

/// Callback invoked when a subscription fails.
pub type ErrorCallback = Arc<dyn Fn(StoreError) + Send + Sync>;

/// Errors surfaced by the store traits.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("document {collection}/{id} not found")]
    NotFound { collection: String, id: String },

    #[error("store backend error: {0}")]
    Backend(String),

    #[error("upload failed: {0}")]
    UploadFailed(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

/// How a [`DocumentStore::set`] applies its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// The written value becomes the whole document; omitted fields vanish.
    Replace,
    /// Written fields overlay the existing document; other fields survive.
    Merge,
}

/// RAII handle for an active subscription. Dropping it detaches the callback
/// so a dismounted consumer can no longer be written to.
pub struct Subscription {
    detach: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(detach: impl FnOnce() + Send + 'static) -> Self {
        Self {
            detach: Some(Box::new(detach)),
        }
    }

    /// Explicitly cancel; equivalent to dropping the guard.
    pub fn cancel(mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.detach.is_some())
            .finish()
    }
}

/// A named collection of documents with push-based change delivery.
///
/// Semantics shared by every backend:
/// - a missing document reads as `Ok(None)`, never as an error;
/// - `subscribe` invokes `on_snapshot` synchronously with the current state
///   before returning, then on every subsequent change in store order;
/// - ordering is only guaranteed *within* one subscription, not across
///   subscriptions, nor between a write and the notification it triggers at
///   other subscribers.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    async fn set(
        &self,
        collection: &str,
        id: &str,
        value: Document,
        mode: WriteMode,
    ) -> Result<(), StoreError>;

    /// Store `value` under a generated id and return that id.
    async fn add(&self, collection: &str, value: Document) -> Result<String, StoreError>;

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;

    fn subscribe(
        &self,
        collection: &str,
        id: &str,
        on_snapshot: SnapshotCallback,
        on_error: ErrorCallback,
    ) -> Subscription;

    fn subscribe_collection(&self, collection: &str, on_change: ListCallback) -> Subscription;
}

/// Serialize a value set into its stored document form.
pub fn to_document<T: Serialize>(value: &T) -> Result<Document, StoreError> {
    match serde_json::to_value(value)? {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(StoreError::Backend(format!(
            "value serialized to {other:?}, expected an object"
        ))),
    }
}

/// Deserialize a stored document back into a value set.
pub fn from_document<T: DeserializeOwned>(document: Document) -> Result<T, StoreError> {
    Ok(serde_json::from_value(serde_json::Value::Object(document))?)
}
