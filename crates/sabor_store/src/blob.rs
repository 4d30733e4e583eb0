//! Blob upload with progress reporting.
//!
//! An upload is a multi-event operation: zero or more `Progress` events
//! (percent of bytes transferred), then exactly one `Complete` carrying the
//! retrievable URL or one `Failed`. Events travel over an `async-channel`
//! receiver so callers can either drain them manually or fold them with
//! [`UploadTask::await_url`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use log::{debug, warn};

use crate::StoreError;

/// One event in the lifetime of an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadEvent {
    /// Bytes transferred so far, as a 0..=100 percentage.
    Progress(u8),
    /// Upload finished; the blob is retrievable at this URL.
    Complete(String),
    /// Upload failed; the blob was not stored.
    Failed(String),
}

/// Handle to an in-flight upload.
pub struct UploadTask {
    events: async_channel::Receiver<UploadEvent>,
}

impl UploadTask {
    pub fn new(events: async_channel::Receiver<UploadEvent>) -> Self {
        Self { events }
    }

    /// The raw event stream, for callers that render progress themselves.
    pub fn events(&self) -> async_channel::Receiver<UploadEvent> {
        self.events.clone()
    }

    /// Drain the event stream to completion, discarding progress.
    pub async fn await_url(self) -> Result<String, StoreError> {
        self.await_url_with_progress(|_percent| {}).await
    }

    /// Drain the event stream to completion, reporting each progress value.
    pub async fn await_url_with_progress(
        self,
        on_progress: impl Fn(u8),
    ) -> Result<String, StoreError> {
        while let Ok(event) = self.events.recv().await {
            match event {
                UploadEvent::Progress(percent) => on_progress(percent),
                UploadEvent::Complete(url) => return Ok(url),
                UploadEvent::Failed(reason) => return Err(StoreError::UploadFailed(reason)),
            }
        }
        // Sender dropped without a terminal event.
        Err(StoreError::UploadFailed("upload channel closed".into()))
    }
}

/// Binary asset storage returning retrievable URLs.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Begin uploading `bytes` under `path`. Never blocks; completion and
    /// failure are reported through the returned task's events.
    fn upload(&self, path: &str, bytes: Vec<u8>) -> UploadTask;

    /// Retrieve a blob previously uploaded, by the URL `upload` resolved to.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, StoreError>;
}

/// Chunk size used by [`MemoryBlobStore`] when synthesizing progress events.
const PROGRESS_CHUNK: usize = 64 * 1024;

/// In-memory [`BlobStore`] serving `memory://` URLs.
#[derive(Clone, Default)]
pub struct MemoryBlobStore {
    blobs: Arc<DashMap<String, Vec<u8>>>,
    fail_uploads: Arc<AtomicBool>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent upload fail. Exists so operator-facing failure
    /// paths can be exercised without a real backend.
    pub fn fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::Relaxed);
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    fn upload(&self, path: &str, bytes: Vec<u8>) -> UploadTask {
        let (sender, receiver) = async_channel::unbounded();

        if self.fail_uploads.load(Ordering::Relaxed) {
            warn!("[blob] simulated failure uploading {path}");
            let _ = sender.try_send(UploadEvent::Failed("simulated upload failure".into()));
            return UploadTask::new(receiver);
        }

        // The whole transfer happens eagerly; events are queued in order and
        // drained by the caller at its own pace.
        let total = bytes.len().max(1);
        let mut transferred = 0usize;
        while transferred < bytes.len() {
            transferred = (transferred + PROGRESS_CHUNK).min(bytes.len());
            let percent = ((transferred as f64 / total as f64) * 100.0) as u8;
            let _ = sender.try_send(UploadEvent::Progress(percent));
        }
        if bytes.is_empty() {
            let _ = sender.try_send(UploadEvent::Progress(100));
        }

        let url = format!("memory://{path}");
        self.blobs.insert(url.clone(), bytes);
        debug!("[blob] stored {url}");
        let _ = sender.try_send(UploadEvent::Complete(url));
        UploadTask::new(receiver)
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, StoreError> {
        self.blobs
            .get(url)
            .map(|blob| blob.clone())
            .ok_or_else(|| StoreError::NotFound {
                collection: "blobs".into(),
                id: url.to_string(),
            })
    }
}
