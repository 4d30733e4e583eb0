//! In-memory reference backend for [`DocumentStore`].
//!
//! Writes commit to a dashmap and fan out synchronously to every attached
//! watcher, so per-subscription delivery order matches write order. Watcher
//! callbacks run outside the store's locks; a callback may re-enter the
//! store (subscribe, write) without deadlocking.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dashmap::DashMap;
use log::trace;

use crate::{
    Document, DocumentStore, ErrorCallback, ListCallback, SnapshotCallback, StoreError,
    Subscription, WriteMode,
};

struct DocWatcher {
    watcher_id: u64,
    collection: String,
    doc_id: String,
    on_snapshot: SnapshotCallback,
}

struct ListWatcher {
    watcher_id: u64,
    collection: String,
    on_change: ListCallback,
}

#[derive(Default)]
struct Inner {
    collections: DashMap<String, BTreeMap<String, Document>>,
    doc_watchers: Mutex<Vec<DocWatcher>>,
    list_watchers: Mutex<Vec<ListWatcher>>,
    watcher_count: AtomicU64,
    document_count: AtomicU64,
}

impl Inner {
    fn snapshot(&self, collection: &str, id: &str) -> Option<Document> {
        self.collections
            .get(collection)
            .and_then(|docs| docs.get(id).cloned())
    }

    fn list(&self, collection: &str) -> Vec<(String, Document)> {
        self.collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, doc)| (id.clone(), doc.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Deliver the current state of `collection/id` to its watchers and the
    /// full item list to the collection's watchers.
    fn notify(&self, collection: &str, id: &str) {
        let snapshot = self.snapshot(collection, id);
        let doc_callbacks: Vec<SnapshotCallback> = {
            let watchers = self.doc_watchers.lock().expect("doc watcher list poisoned");
            watchers
                .iter()
                .filter(|w| w.collection == collection && w.doc_id == id)
                .map(|w| Arc::clone(&w.on_snapshot))
                .collect()
        };
        for callback in doc_callbacks {
            callback(snapshot.clone());
        }

        let list_callbacks: Vec<ListCallback> = {
            let watchers = self
                .list_watchers
                .lock()
                .expect("list watcher list poisoned");
            watchers
                .iter()
                .filter(|w| w.collection == collection)
                .map(|w| Arc::clone(&w.on_change))
                .collect()
        };
        if !list_callbacks.is_empty() {
            let items = self.list(collection);
            for callback in list_callbacks {
                callback(items.clone());
            }
        }
    }
}

/// Dashmap-backed store with synchronous fan-out. Cloning is cheap and all
/// clones share the same documents and watchers.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently stored in `collection`.
    pub fn len(&self, collection: &str) -> usize {
        self.inner
            .collections
            .get(collection)
            .map(|docs| docs.len())
            .unwrap_or(0)
    }

    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        Ok(self.inner.snapshot(collection, id))
    }

    async fn set(
        &self,
        collection: &str,
        id: &str,
        value: Document,
        mode: WriteMode,
    ) -> Result<(), StoreError> {
        {
            let mut docs = self
                .inner
                .collections
                .entry(collection.to_string())
                .or_default();
            match mode {
                WriteMode::Replace => {
                    docs.insert(id.to_string(), value);
                }
                WriteMode::Merge => {
                    let existing = docs.entry(id.to_string()).or_default();
                    for (field, field_value) in value {
                        existing.insert(field, field_value);
                    }
                }
            }
        }
        trace!("[memory] wrote {collection}/{id} ({mode:?})");
        self.inner.notify(collection, id);
        Ok(())
    }

    async fn add(&self, collection: &str, value: Document) -> Result<String, StoreError> {
        let n = self.inner.document_count.fetch_add(1, Ordering::Relaxed) + 1;
        let id = format!("doc{n:06}");
        self.set(collection, &id, value, WriteMode::Replace).await?;
        Ok(id)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let removed = self
            .inner
            .collections
            .get_mut(collection)
            .and_then(|mut docs| docs.remove(id));
        if removed.is_none() {
            return Err(StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        trace!("[memory] deleted {collection}/{id}");
        self.inner.notify(collection, id);
        Ok(())
    }

    fn subscribe(
        &self,
        collection: &str,
        id: &str,
        on_snapshot: SnapshotCallback,
        _on_error: ErrorCallback,
    ) -> Subscription {
        let watcher_id = self.inner.watcher_count.fetch_add(1, Ordering::Relaxed);
        {
            let mut watchers = self
                .inner
                .doc_watchers
                .lock()
                .expect("doc watcher list poisoned");
            watchers.push(DocWatcher {
                watcher_id,
                collection: collection.to_string(),
                doc_id: id.to_string(),
                on_snapshot: Arc::clone(&on_snapshot),
            });
        }

        // Initial delivery: current state, before any change can race in.
        on_snapshot(self.inner.snapshot(collection, id));

        let inner = Arc::clone(&self.inner);
        Subscription::new(move || {
            let mut watchers = inner.doc_watchers.lock().expect("doc watcher list poisoned");
            watchers.retain(|w| w.watcher_id != watcher_id);
        })
    }

    fn subscribe_collection(&self, collection: &str, on_change: ListCallback) -> Subscription {
        let watcher_id = self.inner.watcher_count.fetch_add(1, Ordering::Relaxed);
        {
            let mut watchers = self
                .inner
                .list_watchers
                .lock()
                .expect("list watcher list poisoned");
            watchers.push(ListWatcher {
                watcher_id,
                collection: collection.to_string(),
                on_change: Arc::clone(&on_change),
            });
        }

        on_change(self.inner.list(collection));

        let inner = Arc::clone(&self.inner);
        Subscription::new(move || {
            let mut watchers = inner
                .list_watchers
                .lock()
                .expect("list watcher list poisoned");
            watchers.retain(|w| w.watcher_id != watcher_id);
        })
    }
}
