//! Extension registry
//!
//! Holds registered extensions and dispatches lifecycle events to them. The
//! capability set is read once at registration time and cached into one list
//! per hook, so emit calls iterate only over extensions that actually
//! implement the relevant hook, in registration order.

use std::sync::Arc;
use std::time::Duration;

use crate::extension::{Extension, Hook};
use weave_common::errors::Error;
use weave_common::id::Id;
use weave_common::models::{Chunk, Collection, Document};

/// A hook entry pairs the dispatchable extension with the name captured at
/// registration time.
type Entry = (String, Arc<dyn Extension>);

/// Registry of extensions with per-hook dispatch caches.
#[derive(Default)]
pub struct Registry {
    extensions: Vec<Arc<dyn Extension>>,

    collection_created: Vec<Entry>,
    collection_deleted: Vec<Entry>,
    ingest_started: Vec<Entry>,
    ingest_chunked: Vec<Entry>,
    ingest_embedded: Vec<Entry>,
    ingest_completed: Vec<Entry>,
    ingest_failed: Vec<Entry>,
    retrieval_started: Vec<Entry>,
    retrieval_completed: Vec<Entry>,
    retrieval_failed: Vec<Entry>,
    document_deleted: Vec<Entry>,
    reindex_started: Vec<Entry>,
    reindex_completed: Vec<Entry>,
    shutdown: Vec<Entry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an extension, caching it into the dispatch list of every hook it
    /// reports. Extensions are notified in registration order.
    pub fn register(&mut self, extension: Arc<dyn Extension>) {
        let name = extension.name().to_string();

        for hook in extension.hooks() {
            let entry = (name.clone(), Arc::clone(&extension));
            match hook {
                Hook::CollectionCreated => self.collection_created.push(entry),
                Hook::CollectionDeleted => self.collection_deleted.push(entry),
                Hook::IngestStarted => self.ingest_started.push(entry),
                Hook::IngestChunked => self.ingest_chunked.push(entry),
                Hook::IngestEmbedded => self.ingest_embedded.push(entry),
                Hook::IngestCompleted => self.ingest_completed.push(entry),
                Hook::IngestFailed => self.ingest_failed.push(entry),
                Hook::RetrievalStarted => self.retrieval_started.push(entry),
                Hook::RetrievalCompleted => self.retrieval_completed.push(entry),
                Hook::RetrievalFailed => self.retrieval_failed.push(entry),
                Hook::DocumentDeleted => self.document_deleted.push(entry),
                Hook::ReindexStarted => self.reindex_started.push(entry),
                Hook::ReindexCompleted => self.reindex_completed.push(entry),
                Hook::Shutdown => self.shutdown.push(entry),
            }
        }

        self.extensions.push(extension);
    }

    /// All registered extensions, in registration order.
    pub fn extensions(&self) -> &[Arc<dyn Extension>] {
        &self.extensions
    }

    pub(crate) async fn emit_collection_created(&self, collection: &Collection) {
        for (name, ext) in &self.collection_created {
            if let Err(err) = ext.on_collection_created(collection).await {
                log_hook_error("on_collection_created", name, &err);
            }
        }
    }

    pub(crate) async fn emit_collection_deleted(&self, collection_id: &Id) {
        for (name, ext) in &self.collection_deleted {
            if let Err(err) = ext.on_collection_deleted(collection_id).await {
                log_hook_error("on_collection_deleted", name, &err);
            }
        }
    }

    pub(crate) async fn emit_ingest_started(&self, collection_id: &Id, docs: &[Document]) {
        for (name, ext) in &self.ingest_started {
            if let Err(err) = ext.on_ingest_started(collection_id, docs).await {
                log_hook_error("on_ingest_started", name, &err);
            }
        }
    }

    pub(crate) async fn emit_ingest_chunked(&self, chunks: &[Chunk]) {
        for (name, ext) in &self.ingest_chunked {
            if let Err(err) = ext.on_ingest_chunked(chunks).await {
                log_hook_error("on_ingest_chunked", name, &err);
            }
        }
    }

    pub(crate) async fn emit_ingest_embedded(&self, chunks: &[Chunk]) {
        for (name, ext) in &self.ingest_embedded {
            if let Err(err) = ext.on_ingest_embedded(chunks).await {
                log_hook_error("on_ingest_embedded", name, &err);
            }
        }
    }

    pub(crate) async fn emit_ingest_completed(
        &self,
        collection_id: &Id,
        doc_count: usize,
        chunk_count: usize,
        elapsed: Duration,
    ) {
        for (name, ext) in &self.ingest_completed {
            if let Err(err) = ext
                .on_ingest_completed(collection_id, doc_count, chunk_count, elapsed)
                .await
            {
                log_hook_error("on_ingest_completed", name, &err);
            }
        }
    }

    pub(crate) async fn emit_ingest_failed(&self, collection_id: &Id, error: &Error) {
        for (name, ext) in &self.ingest_failed {
            if let Err(err) = ext.on_ingest_failed(collection_id, error).await {
                log_hook_error("on_ingest_failed", name, &err);
            }
        }
    }

    pub(crate) async fn emit_retrieval_started(&self, collection_id: &Id, query: &str) {
        for (name, ext) in &self.retrieval_started {
            if let Err(err) = ext.on_retrieval_started(collection_id, query).await {
                log_hook_error("on_retrieval_started", name, &err);
            }
        }
    }

    pub(crate) async fn emit_retrieval_completed(
        &self,
        collection_id: &Id,
        result_count: usize,
        elapsed: Duration,
    ) {
        for (name, ext) in &self.retrieval_completed {
            if let Err(err) = ext
                .on_retrieval_completed(collection_id, result_count, elapsed)
                .await
            {
                log_hook_error("on_retrieval_completed", name, &err);
            }
        }
    }

    pub(crate) async fn emit_retrieval_failed(&self, collection_id: &Id, error: &Error) {
        for (name, ext) in &self.retrieval_failed {
            if let Err(err) = ext.on_retrieval_failed(collection_id, error).await {
                log_hook_error("on_retrieval_failed", name, &err);
            }
        }
    }

    pub(crate) async fn emit_document_deleted(&self, document_id: &Id) {
        for (name, ext) in &self.document_deleted {
            if let Err(err) = ext.on_document_deleted(document_id).await {
                log_hook_error("on_document_deleted", name, &err);
            }
        }
    }

    pub(crate) async fn emit_reindex_started(&self, collection_id: &Id) {
        for (name, ext) in &self.reindex_started {
            if let Err(err) = ext.on_reindex_started(collection_id).await {
                log_hook_error("on_reindex_started", name, &err);
            }
        }
    }

    pub(crate) async fn emit_reindex_completed(&self, collection_id: &Id, elapsed: Duration) {
        for (name, ext) in &self.reindex_completed {
            if let Err(err) = ext.on_reindex_completed(collection_id, elapsed).await {
                log_hook_error("on_reindex_completed", name, &err);
            }
        }
    }

    pub(crate) async fn emit_shutdown(&self) {
        for (name, ext) in &self.shutdown {
            if let Err(err) = ext.on_shutdown().await {
                log_hook_error("on_shutdown", name, &err);
            }
        }
    }
}

/// Hook errors must not block the pipeline; record and move on.
fn log_hook_error(hook: &str, extension: &str, err: &Error) {
    tracing::warn!(hook, extension, error = %err, "extension hook error");
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use weave_common::errors::Result;

    struct Recording {
        name: String,
        hooks: Vec<Hook>,
        seen: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    #[async_trait]
    impl Extension for Recording {
        fn name(&self) -> &str {
            &self.name
        }

        fn hooks(&self) -> &[Hook] {
            &self.hooks
        }

        async fn on_collection_created(&self, _collection: &Collection) -> Result<()> {
            self.seen.lock().push(format!("{}:created", self.name));
            if self.fail {
                return Err(Error::Internal {
                    message: "hook exploded".into(),
                });
            }
            Ok(())
        }

        async fn on_shutdown(&self) -> Result<()> {
            self.seen.lock().push(format!("{}:shutdown", self.name));
            Ok(())
        }
    }

    fn recording(
        name: &str,
        hooks: Vec<Hook>,
        seen: &Arc<Mutex<Vec<String>>>,
        fail: bool,
    ) -> Arc<dyn Extension> {
        Arc::new(Recording {
            name: name.to_string(),
            hooks,
            seen: Arc::clone(seen),
            fail,
        })
    }

    #[tokio::test]
    async fn test_emit_walks_only_subscribers_in_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut registry = Registry::new();
        registry.register(recording("first", vec![Hook::CollectionCreated], &seen, false));
        registry.register(recording("second", vec![Hook::Shutdown], &seen, false));
        registry.register(recording("third", vec![Hook::CollectionCreated], &seen, false));

        registry.emit_collection_created(&Collection::default()).await;

        assert_eq!(*seen.lock(), vec!["first:created", "third:created"]);
    }

    #[tokio::test]
    async fn test_hook_errors_are_swallowed() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut registry = Registry::new();
        registry.register(recording("boom", vec![Hook::CollectionCreated], &seen, true));
        registry.register(recording("after", vec![Hook::CollectionCreated], &seen, false));

        // The failing hook must not prevent later hooks from running.
        registry.emit_collection_created(&Collection::default()).await;

        assert_eq!(*seen.lock(), vec!["boom:created", "after:created"]);
    }

    #[tokio::test]
    async fn test_shutdown_emit() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut registry = Registry::new();
        registry.register(recording("svc", vec![Hook::Shutdown], &seen, false));

        registry.emit_shutdown().await;
        assert_eq!(*seen.lock(), vec!["svc:shutdown"]);
    }
}
