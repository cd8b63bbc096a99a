//! Lifecycle extension hooks
//!
//! Extensions observe pipeline lifecycle events (collection churn, the
//! ingest stages, retrieval brackets, reindexes, shutdown) and react to
//! them: auditing, metrics, tracing, cache invalidation. An extension opts
//! in to a subset of hooks by reporting them from [`Extension::hooks`]; the
//! registry dispatches only the reported ones.
//!
//! Hook errors are logged and swallowed. They never propagate to the caller,
//! never abort the pipeline, and never influence the emitting operation's
//! success.

use std::time::Duration;

use async_trait::async_trait;

use weave_common::errors::{Error, Result};
use weave_common::id::Id;
use weave_common::models::{Chunk, Collection, Document};

/// The fourteen lifecycle events an extension can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hook {
    CollectionCreated,
    CollectionDeleted,
    IngestStarted,
    IngestChunked,
    IngestEmbedded,
    IngestCompleted,
    IngestFailed,
    RetrievalStarted,
    RetrievalCompleted,
    RetrievalFailed,
    DocumentDeleted,
    ReindexStarted,
    ReindexCompleted,
    Shutdown,
}

/// A named, capability-opt-in observer of pipeline lifecycle events.
///
/// Implement the hook methods you care about and report them from
/// [`hooks`](Extension::hooks); unreported hooks are never invoked, so the
/// default no-op bodies cost nothing at emit time.
#[async_trait]
pub trait Extension: Send + Sync {
    /// Unique human-readable name, used in hook-error log records.
    fn name(&self) -> &str;

    /// The hooks this extension implements.
    fn hooks(&self) -> &[Hook];

    /// A collection was created.
    async fn on_collection_created(&self, _collection: &Collection) -> Result<()> {
        Ok(())
    }

    /// A collection (and everything in it) was deleted.
    async fn on_collection_deleted(&self, _collection_id: &Id) -> Result<()> {
        Ok(())
    }

    /// Document ingestion began.
    async fn on_ingest_started(&self, _collection_id: &Id, _docs: &[Document]) -> Result<()> {
        Ok(())
    }

    /// Documents were chunked.
    async fn on_ingest_chunked(&self, _chunks: &[Chunk]) -> Result<()> {
        Ok(())
    }

    /// Chunks were embedded.
    async fn on_ingest_embedded(&self, _chunks: &[Chunk]) -> Result<()> {
        Ok(())
    }

    /// Ingestion finished successfully.
    async fn on_ingest_completed(
        &self,
        _collection_id: &Id,
        _doc_count: usize,
        _chunk_count: usize,
        _elapsed: Duration,
    ) -> Result<()> {
        Ok(())
    }

    /// Ingestion failed.
    async fn on_ingest_failed(&self, _collection_id: &Id, _error: &Error) -> Result<()> {
        Ok(())
    }

    /// A retrieval query began.
    async fn on_retrieval_started(&self, _collection_id: &Id, _query: &str) -> Result<()> {
        Ok(())
    }

    /// Retrieval finished successfully.
    async fn on_retrieval_completed(
        &self,
        _collection_id: &Id,
        _result_count: usize,
        _elapsed: Duration,
    ) -> Result<()> {
        Ok(())
    }

    /// Retrieval failed.
    async fn on_retrieval_failed(&self, _collection_id: &Id, _error: &Error) -> Result<()> {
        Ok(())
    }

    /// A document (and its chunks) was deleted.
    async fn on_document_deleted(&self, _document_id: &Id) -> Result<()> {
        Ok(())
    }

    /// A collection reindex began.
    async fn on_reindex_started(&self, _collection_id: &Id) -> Result<()> {
        Ok(())
    }

    /// A collection reindex finished.
    async fn on_reindex_completed(&self, _collection_id: &Id, _elapsed: Duration) -> Result<()> {
        Ok(())
    }

    /// Graceful shutdown is in progress.
    async fn on_shutdown(&self) -> Result<()> {
        Ok(())
    }
}
