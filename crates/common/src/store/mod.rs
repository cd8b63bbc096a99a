//! Metadata store contract
//!
//! The composite [`MetadataStore`] aggregates collection, document, and chunk
//! persistence with lifecycle management (migrations, health checks,
//! shutdown). The metadata store is the authoritative record; the vector
//! store is a derived index rebuilt from it on reindex.
//!
//! Implementations must surface the typed not-found / already-exists /
//! duplicate sentinels from [`crate::errors::Error`] so the engine can map
//! violations without string matching.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;

use crate::errors::Result;
use crate::id::Id;
use crate::models::{Chunk, Collection, Document, DocumentState};

/// Pagination and filtering for collection list queries.
#[derive(Debug, Clone, Default)]
pub struct CollectionFilter {
    /// Maximum number of collections to return. Zero means no limit.
    pub limit: usize,
    /// Number of collections to skip.
    pub offset: usize,
}

/// Pagination and filtering for document list queries.
#[derive(Debug, Clone, Default)]
pub struct DocumentFilter {
    /// Filter by collection. Nil means all collections.
    pub collection_id: Id,
    /// Filter by state. None means all states.
    pub state: Option<DocumentState>,
    /// Maximum number of documents to return. Zero means no limit.
    pub limit: usize,
    /// Number of documents to skip.
    pub offset: usize,
}

/// Filtering for chunk count queries.
#[derive(Debug, Clone, Default)]
pub struct ChunkFilter {
    /// Filter by collection. Nil means all collections.
    pub collection_id: Id,
    /// Filter by document. Nil means all documents.
    pub document_id: Id,
}

/// Persistence contract for collections.
#[async_trait]
pub trait CollectionStore: Send + Sync {
    /// Persist a new collection. Fails with `CollectionAlreadyExists` on a
    /// `(tenant_id, name)` collision.
    async fn create_collection(&self, col: Collection) -> Result<Collection>;

    /// Retrieve a collection by id.
    async fn get_collection(&self, id: &Id) -> Result<Collection>;

    /// Retrieve a collection by tenant and name.
    async fn get_collection_by_name(&self, tenant_id: &str, name: &str) -> Result<Collection>;

    /// Replace an existing collection, keyed by id.
    async fn update_collection(&self, col: Collection) -> Result<Collection>;

    /// Remove a collection by id, cascading to its documents and chunks.
    async fn delete_collection(&self, id: &Id) -> Result<()>;

    /// List collections ordered by `created_at` ascending.
    async fn list_collections(&self, filter: &CollectionFilter) -> Result<Vec<Collection>>;
}

/// Persistence contract for documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Persist a new document. Fails with `DuplicateDocument` on a
    /// `(collection_id, content_hash)` collision.
    async fn create_document(&self, doc: Document) -> Result<Document>;

    /// Retrieve a document by id.
    async fn get_document(&self, id: &Id) -> Result<Document>;

    /// Replace an existing document, keyed by id.
    async fn update_document(&self, doc: Document) -> Result<Document>;

    /// Remove a document by id, cascading to its chunks.
    async fn delete_document(&self, id: &Id) -> Result<()>;

    /// List documents ordered by `created_at` ascending.
    async fn list_documents(&self, filter: &DocumentFilter) -> Result<Vec<Document>>;

    /// Count documents matching the filter.
    async fn count_documents(&self, filter: &DocumentFilter) -> Result<i64>;

    /// Remove all documents (and their chunks) in a collection.
    async fn delete_documents_by_collection(&self, collection_id: &Id) -> Result<()>;
}

/// Persistence contract for chunks.
#[async_trait]
pub trait ChunkStore: Send + Sync {
    /// Persist a batch of chunks atomically. An empty batch is a no-op.
    async fn create_chunk_batch(&self, chunks: Vec<Chunk>) -> Result<Vec<Chunk>>;

    /// Retrieve a chunk by id.
    async fn get_chunk(&self, id: &Id) -> Result<Chunk>;

    /// List all chunks for a document, ordered by `index` ascending.
    async fn list_chunks_by_document(&self, document_id: &Id) -> Result<Vec<Chunk>>;

    /// Remove all chunks for a document.
    async fn delete_chunks_by_document(&self, document_id: &Id) -> Result<()>;

    /// Remove all chunks for a collection.
    async fn delete_chunks_by_collection(&self, collection_id: &Id) -> Result<()>;

    /// Count chunks matching the filter.
    async fn count_chunks(&self, filter: &ChunkFilter) -> Result<i64>;
}

/// Composite metadata store: the three sub-contracts plus lifecycle.
#[async_trait]
pub trait MetadataStore: CollectionStore + DocumentStore + ChunkStore {
    /// Bring the persistent schema to current.
    async fn migrate(&self) -> Result<()>;

    /// Verify the store connection is alive.
    async fn ping(&self) -> Result<()>;

    /// Release all store resources.
    async fn close(&self) -> Result<()>;
}
