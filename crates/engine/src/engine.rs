//! The engine coordinator
//!
//! Central orchestration for the Weave pipeline. The engine owns references
//! to the configuration, metadata store, vector store, embedder, chunker,
//! optional loader and retriever, and the extension registry. It is safe for
//! concurrent use across disjoint documents; stages within a single ingest
//! run strictly in order.
//!
//! Consistency model: there is no distributed transaction between the two
//! stores. Metadata is written first and deleted first; the vector store is
//! always last. The vector side therefore never references chunks that do
//! not exist, but may be missing entries after a partial failure. Reindex
//! is the recovery procedure for those orphans.

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::instrument;

use crate::extension::Extension;
use crate::registry::Registry;
use weave_common::config::EngineConfig;
use weave_common::embeddings::Embedder;
use weave_common::errors::{Error, Result};
use weave_common::id::{Id, Prefix};
use weave_common::models::{Chunk, Collection, Document, DocumentState, Metadata};
use weave_common::scope::Scope;
use weave_common::store::{
    ChunkFilter, ChunkStore, CollectionFilter, CollectionStore, DocumentFilter, DocumentStore,
    MetadataStore,
};
use weave_common::vectorstore::{Entry, SearchOptions, VectorStore};
use weave_ingestion::chunker::{ChunkOptions, Chunker};
use weave_ingestion::loader::Loader;
use weave_search::retrieval::{RetrieveOptions, Retriever};

/// A document ingestion request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestInput {
    /// Target collection
    pub collection_id: Id,
    /// Optional document title
    #[serde(default)]
    pub title: String,
    /// Document source identifier (URL, path, …)
    #[serde(default)]
    pub source: String,
    /// MIME type or format hint
    #[serde(default)]
    pub source_type: String,
    /// Raw document content
    pub content: String,
    /// Optional document metadata
    #[serde(default)]
    pub metadata: Metadata,
}

/// The outcome of a successful document ingestion. A failed ingestion
/// surfaces as [`Error::IngestFailed`], which carries the document id of the
/// failed row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestResult {
    pub document_id: Id,
    pub chunk_count: usize,
    pub state: DocumentState,
}

/// A chunk with its relevance score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f64,
}

/// Parameters for a retrieval query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetrieveParams {
    /// Restrict to one collection. Nil means cross-collection search.
    #[serde(default)]
    pub collection_id: Id,
    /// Explicit tenant override; defaults to the scope's tenant.
    #[serde(default)]
    pub tenant_id: String,
    /// Maximum results. Zero means the configured default.
    #[serde(default)]
    pub top_k: usize,
    /// Minimum relevance score threshold.
    #[serde(default)]
    pub min_score: f64,
    /// Retrieval strategy name, passed through to the injected retriever.
    #[serde(default)]
    pub strategy: String,
}

/// Parameters for a hybrid search across collections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HybridSearchParams {
    /// Collections to search. Empty means one search across all.
    #[serde(default)]
    pub collections: Vec<Id>,
    /// Maximum results. Zero means the configured default.
    #[serde(default)]
    pub top_k: usize,
    /// Retrieval strategy name.
    #[serde(default)]
    pub strategy: String,
    /// Minimum relevance score threshold.
    #[serde(default)]
    pub min_score: f64,
}

/// Aggregate statistics for a collection, derived from live counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionStats {
    pub collection_id: Id,
    pub collection_name: String,
    pub document_count: i64,
    pub chunk_count: i64,
    pub embedding_model: String,
    pub chunk_strategy: String,
}

/// Central coordinator for the Weave RAG pipeline.
pub struct Engine {
    config: EngineConfig,
    store: Option<Arc<dyn MetadataStore>>,
    vector_store: Option<Arc<dyn VectorStore>>,
    embedder: Option<Arc<dyn Embedder>>,
    chunker: Option<Arc<dyn Chunker>>,
    loader: Option<Arc<dyn Loader>>,
    retriever: Option<Arc<dyn Retriever>>,
    extensions: Registry,
}

/// Builder wiring collaborators into an [`Engine`].
///
/// Required collaborators are checked at call time, not build time, so a
/// partially-configured engine can still serve the operations its
/// collaborators cover.
#[derive(Default)]
pub struct EngineBuilder {
    config: EngineConfig,
    store: Option<Arc<dyn MetadataStore>>,
    vector_store: Option<Arc<dyn VectorStore>>,
    embedder: Option<Arc<dyn Embedder>>,
    chunker: Option<Arc<dyn Chunker>>,
    loader: Option<Arc<dyn Loader>>,
    retriever: Option<Arc<dyn Retriever>>,
    extensions: Vec<Arc<dyn Extension>>,
}

impl EngineBuilder {
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn store(mut self, store: Arc<dyn MetadataStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn vector_store(mut self, vector_store: Arc<dyn VectorStore>) -> Self {
        self.vector_store = Some(vector_store);
        self
    }

    pub fn embedder(mut self, embedder: Arc<dyn Embedder>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    pub fn loader(mut self, loader: Arc<dyn Loader>) -> Self {
        self.loader = Some(loader);
        self
    }

    pub fn retriever(mut self, retriever: Arc<dyn Retriever>) -> Self {
        self.retriever = Some(retriever);
        self
    }

    pub fn extension(mut self, extension: Arc<dyn Extension>) -> Self {
        self.extensions.push(extension);
        self
    }

    pub fn build(self) -> Engine {
        let mut registry = Registry::new();
        for extension in self.extensions {
            registry.register(extension);
        }

        Engine {
            config: self.config,
            store: self.store,
            vector_store: self.vector_store,
            embedder: self.embedder,
            chunker: self.chunker,
            loader: self.loader,
            retriever: self.retriever,
            extensions: registry,
        }
    }
}

impl Engine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn extensions(&self) -> &Registry {
        &self.extensions
    }

    fn require_store(&self) -> Result<&Arc<dyn MetadataStore>> {
        self.store.as_ref().ok_or(Error::NoStore)
    }

    fn require_vector_store(&self) -> Result<&Arc<dyn VectorStore>> {
        self.vector_store.as_ref().ok_or(Error::NoVectorStore)
    }

    fn require_embedder(&self) -> Result<&Arc<dyn Embedder>> {
        self.embedder.as_ref().ok_or(Error::NoEmbedder)
    }

    fn require_chunker(&self) -> Result<&Arc<dyn Chunker>> {
        self.chunker.as_ref().ok_or(Error::NoChunker)
    }

    /// Initialise the engine. Currently a no-op, reserved for future
    /// background workers.
    pub async fn start(&self) -> Result<()> {
        Ok(())
    }

    /// Gracefully shut down: notify extensions, then close the metadata
    /// store if one is configured.
    pub async fn stop(&self) -> Result<()> {
        self.extensions.emit_shutdown().await;
        if let Some(store) = &self.store {
            store.close().await?;
        }
        Ok(())
    }

    // ──────────────────────────────────────────────
    // Collection operations
    // ──────────────────────────────────────────────

    /// Create a collection, filling blank identity and configuration fields
    /// from the scope and engine defaults.
    pub async fn create_collection(&self, scope: &Scope, mut col: Collection) -> Result<Collection> {
        let store = self.require_store()?;

        if col.id.is_nil() {
            col.id = Id::new(Prefix::Collection);
        }
        if col.tenant_id.is_empty() {
            col.tenant_id = scope.tenant_id.clone();
        }
        if col.app_id.is_empty() {
            col.app_id = scope.app_id.clone();
        }
        if col.embedding_model.is_empty() {
            col.embedding_model = self.config.default_embedding_model.clone();
        }
        if col.chunk_strategy.is_empty() {
            col.chunk_strategy = self.config.default_chunk_strategy.clone();
        }
        if col.chunk_size == 0 {
            col.chunk_size = self.config.default_chunk_size;
        }
        if col.chunk_overlap == 0 {
            col.chunk_overlap = self.config.default_chunk_overlap;
        }

        let created = store.create_collection(col).await?;

        self.extensions.emit_collection_created(&created).await;
        Ok(created)
    }

    /// Retrieve a collection by id.
    pub async fn get_collection(&self, id: &Id) -> Result<Collection> {
        self.require_store()?.get_collection(id).await
    }

    /// Retrieve a collection by name under the scope's tenant.
    pub async fn get_collection_by_name(&self, scope: &Scope, name: &str) -> Result<Collection> {
        self.require_store()?
            .get_collection_by_name(&scope.tenant_id, name)
            .await
    }

    /// List collections matching the filter.
    pub async fn list_collections(&self, filter: &CollectionFilter) -> Result<Vec<Collection>> {
        self.require_store()?.list_collections(filter).await
    }

    /// Delete a collection and everything in it. Metadata is reclaimed
    /// first; vector cleanup is best-effort because the authoritative state
    /// is already gone.
    #[instrument(skip(self), fields(collection_id = %id))]
    pub async fn delete_collection(&self, id: &Id) -> Result<()> {
        let store = self.require_store()?;

        store
            .delete_chunks_by_collection(id)
            .await
            .map_err(|e| Error::stage("delete chunks for collection", e))?;
        store
            .delete_documents_by_collection(id)
            .await
            .map_err(|e| Error::stage("delete documents for collection", e))?;

        if let Some(vector_store) = &self.vector_store {
            let filter: Metadata =
                [("collection_id".to_string(), id.to_string())].into();
            if let Err(err) = vector_store.delete_by_metadata(&filter).await {
                tracing::warn!(
                    collection_id = %id,
                    error = %err,
                    "failed to delete vector entries for collection"
                );
            }
        }

        store.delete_collection(id).await?;

        self.extensions.emit_collection_deleted(id).await;
        Ok(())
    }

    /// Aggregate statistics for a collection; counts are live, not the
    /// denormalized counters.
    pub async fn collection_stats(&self, id: &Id) -> Result<CollectionStats> {
        let store = self.require_store()?;

        let col = store.get_collection(id).await?;

        let document_count = store
            .count_documents(&DocumentFilter {
                collection_id: id.clone(),
                ..Default::default()
            })
            .await
            .map_err(|e| Error::stage("count documents", e))?;

        let chunk_count = store
            .count_chunks(&ChunkFilter {
                collection_id: id.clone(),
                ..Default::default()
            })
            .await
            .map_err(|e| Error::stage("count chunks", e))?;

        Ok(CollectionStats {
            collection_id: id.clone(),
            collection_name: col.name,
            document_count,
            chunk_count,
            embedding_model: col.embedding_model,
            chunk_strategy: col.chunk_strategy,
        })
    }

    // ──────────────────────────────────────────────
    // Ingestion
    // ──────────────────────────────────────────────

    /// Ingest a single document: load, chunk, embed, persist, index.
    ///
    /// The document row is created in `pending`, moves to `processing`, and
    /// lands in `ready` or `failed`. State updates after the row exists are
    /// best-effort; a failing stage surfaces [`Error::IngestFailed`] with
    /// the document id and the wrapped cause.
    #[instrument(skip(self, scope, input), fields(collection_id = %input.collection_id))]
    pub async fn ingest(&self, scope: &Scope, input: IngestInput) -> Result<IngestResult> {
        let store = self.require_store()?;
        let embedder = self.require_embedder()?;
        let vector_store = self.require_vector_store()?;
        let chunker = self.require_chunker()?;

        if input.content.is_empty() {
            return Err(Error::EmptyContent);
        }

        let started = Instant::now();
        let tenant_id = scope.tenant_id.clone();

        let col = store.get_collection(&input.collection_id).await?;

        let content_hash = format!("{:x}", Sha256::digest(input.content.as_bytes()));

        let doc = Document {
            id: Id::new(Prefix::Document),
            collection_id: input.collection_id.clone(),
            tenant_id: tenant_id.clone(),
            title: input.title.clone(),
            source: input.source.clone(),
            source_type: input.source_type.clone(),
            content_hash,
            content_length: input.content.len(),
            metadata: input.metadata.clone(),
            state: DocumentState::Pending,
            ..Default::default()
        };

        let mut doc = store
            .create_document(doc)
            .await
            .map_err(|e| Error::stage("create document", e))?;

        self.extensions
            .emit_ingest_started(&input.collection_id, std::slice::from_ref(&doc))
            .await;

        // Mark processing; a failure here is logged, not fatal, because the
        // document will still land in a terminal state.
        doc.state = DocumentState::Processing;
        doc = match store.update_document(doc.clone()).await {
            Ok(updated) => updated,
            Err(err) => {
                tracing::warn!(document_id = %doc.id, error = %err, "failed to mark document processing");
                doc
            }
        };

        // Optionally extract text through the loader.
        let mut content = input.content;
        if let Some(loader) = &self.loader {
            if !input.source_type.is_empty() && loader.supports(&input.source_type) {
                match loader.load(content.as_bytes()).await {
                    Ok(result) => content = result.content,
                    Err(err) => {
                        return Err(self
                            .fail_ingest(store, doc, &input.collection_id, Error::stage("load", err))
                            .await);
                    }
                }
            }
        }

        // Chunk the content.
        let chunk_opts = ChunkOptions {
            chunk_size: col.chunk_size,
            chunk_overlap: col.chunk_overlap,
            strategy: col.chunk_strategy.clone(),
        };
        let pieces = match chunker.chunk(&content, &chunk_opts) {
            Ok(pieces) => pieces,
            Err(err) => {
                return Err(self
                    .fail_ingest(store, doc, &input.collection_id, Error::stage("chunk", err))
                    .await);
            }
        };

        let chunks: Vec<Chunk> = pieces
            .into_iter()
            .map(|piece| Chunk {
                id: Id::new(Prefix::Chunk),
                document_id: doc.id.clone(),
                collection_id: input.collection_id.clone(),
                tenant_id: tenant_id.clone(),
                content: piece.content,
                index: piece.index,
                start_offset: piece.start_offset,
                end_offset: piece.end_offset,
                token_count: piece.token_count,
                metadata: piece.metadata,
                ..Default::default()
            })
            .collect();

        self.extensions.emit_ingest_chunked(&chunks).await;

        // Embed the chunk contents, in order.
        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embedded = match embedder.embed(&texts).await {
            Ok(embedded) => embedded,
            Err(err) => {
                return Err(self
                    .fail_ingest(store, doc, &input.collection_id, Error::stage("embed", err))
                    .await);
            }
        };

        self.extensions.emit_ingest_embedded(&chunks).await;

        // Build vector entries sharing the chunk ids.
        let entries: Vec<Entry> = chunks
            .iter()
            .zip(&embedded)
            .map(|(chunk, result)| {
                let mut metadata: Metadata = [
                    ("collection_id".to_string(), input.collection_id.to_string()),
                    ("document_id".to_string(), doc.id.to_string()),
                    ("tenant_id".to_string(), tenant_id.clone()),
                    ("chunk_index".to_string(), chunk.index.to_string()),
                ]
                .into();
                metadata.extend(chunk.metadata.clone());

                Entry {
                    id: chunk.id.to_string(),
                    vector: result.vector.clone(),
                    content: chunk.content.clone(),
                    metadata,
                }
            })
            .collect();

        // Metadata store first, vector store last.
        let chunk_count = chunks.len();
        if let Err(err) = store.create_chunk_batch(chunks).await {
            return Err(self
                .fail_ingest(store, doc, &input.collection_id, Error::stage("store chunks", err))
                .await);
        }

        if let Err(err) = vector_store.upsert(entries).await {
            return Err(self
                .fail_ingest(store, doc, &input.collection_id, Error::stage("upsert vectors", err))
                .await);
        }

        // Mark ready; best-effort.
        doc.state = DocumentState::Ready;
        doc.chunk_count = chunk_count;
        if let Err(err) = store.update_document(doc.clone()).await {
            tracing::warn!(document_id = %doc.id, error = %err, "failed to mark document ready");
        }

        self.extensions
            .emit_ingest_completed(&input.collection_id, 1, chunk_count, started.elapsed())
            .await;

        Ok(IngestResult {
            document_id: doc.id,
            chunk_count,
            state: DocumentState::Ready,
        })
    }

    /// Ingest multiple documents sequentially. Stops at the first failure;
    /// the results accumulated so far are returned alongside the error, so
    /// partial success is observable.
    pub async fn ingest_batch(
        &self,
        scope: &Scope,
        inputs: Vec<IngestInput>,
    ) -> (Vec<IngestResult>, Option<Error>) {
        let mut results = Vec::with_capacity(inputs.len());
        for input in inputs {
            match self.ingest(scope, input).await {
                Ok(result) => results.push(result),
                Err(err) => return (results, Some(err)),
            }
        }
        (results, None)
    }

    /// Mark the document failed, emit the failure event, and wrap the cause.
    async fn fail_ingest(
        &self,
        store: &Arc<dyn MetadataStore>,
        mut doc: Document,
        collection_id: &Id,
        err: Error,
    ) -> Error {
        doc.state = DocumentState::Failed;
        doc.error = err.to_string();
        if let Err(update_err) = store.update_document(doc.clone()).await {
            tracing::warn!(
                document_id = %doc.id,
                error = %update_err,
                "failed to record failed document state"
            );
        }

        self.extensions.emit_ingest_failed(collection_id, &err).await;

        Error::IngestFailed {
            document_id: doc.id,
            source: Box::new(err),
        }
    }

    // ──────────────────────────────────────────────
    // Retrieval
    // ──────────────────────────────────────────────

    /// Run a semantic retrieval query. Delegates to the injected retriever
    /// when configured, otherwise embeds the query and searches the vector
    /// store directly.
    #[instrument(skip(self, scope, params), fields(collection_id = %params.collection_id))]
    pub async fn retrieve(
        &self,
        scope: &Scope,
        query: &str,
        params: RetrieveParams,
    ) -> Result<Vec<ScoredChunk>> {
        if self.retriever.is_none() && (self.embedder.is_none() || self.vector_store.is_none()) {
            return Err(Error::NoRetriever);
        }

        let top_k = if params.top_k > 0 {
            params.top_k
        } else {
            self.config.default_top_k
        };
        let tenant_id = if params.tenant_id.is_empty() {
            scope.tenant_id.clone()
        } else {
            params.tenant_id.clone()
        };

        let collection_id = params.collection_id.clone();
        let started = Instant::now();

        self.extensions
            .emit_retrieval_started(&collection_id, query)
            .await;

        let mut filter = Metadata::new();
        if !collection_id.is_nil() {
            filter.insert("collection_id".to_string(), collection_id.to_string());
        }
        if !tenant_id.is_empty() {
            filter.insert("tenant_id".to_string(), tenant_id.clone());
        }

        // Delegate to the plugged-in retriever when available.
        if let Some(retriever) = &self.retriever {
            let opts = RetrieveOptions {
                collection_id: if collection_id.is_nil() {
                    String::new()
                } else {
                    collection_id.to_string()
                },
                tenant_key: tenant_id,
                top_k,
                min_score: params.min_score,
                filter,
            };

            let results = match retriever.retrieve(query, &opts).await {
                Ok(results) => results,
                Err(err) => {
                    self.extensions
                        .emit_retrieval_failed(&collection_id, &err)
                        .await;
                    return Err(Error::stage("retrieve", err));
                }
            };

            let scored: Vec<ScoredChunk> = results
                .into_iter()
                .map(|r| ScoredChunk {
                    chunk: r.chunk,
                    score: r.score,
                })
                .collect();

            self.extensions
                .emit_retrieval_completed(&collection_id, scored.len(), started.elapsed())
                .await;
            return Ok(scored);
        }

        // Fast path: embed the query and search the vector store directly.
        let embedder = self.require_embedder()?;
        let vector_store = self.require_vector_store()?;

        let query_texts = [query.to_string()];
        let embedded = match embedder.embed(&query_texts).await {
            Ok(embedded) => embedded,
            Err(err) => {
                self.extensions
                    .emit_retrieval_failed(&collection_id, &err)
                    .await;
                return Err(Error::stage("embed query", err));
            }
        };
        let Some(query_vector) = embedded.into_iter().next() else {
            return Ok(Vec::new());
        };

        let search_opts = SearchOptions {
            top_k,
            filter,
            tenant_key: tenant_id,
            min_score: params.min_score,
        };

        let search_results = match vector_store.search(&query_vector.vector, &search_opts).await {
            Ok(results) => results,
            Err(err) => {
                self.extensions
                    .emit_retrieval_failed(&collection_id, &err)
                    .await;
                return Err(Error::stage("search", err));
            }
        };

        // Project hits into chunk-shaped values; only content and metadata
        // travel on this path.
        let scored: Vec<ScoredChunk> = search_results
            .into_iter()
            .map(|r| ScoredChunk {
                chunk: Chunk {
                    content: r.entry.content,
                    metadata: r.entry.metadata,
                    ..Default::default()
                },
                score: r.score,
            })
            .collect();

        self.extensions
            .emit_retrieval_completed(&collection_id, scored.len(), started.elapsed())
            .await;
        Ok(scored)
    }

    /// Retrieval across one or more collections. With an explicit collection
    /// list, each collection is searched separately and the results are
    /// merged, re-sorted by descending score, and truncated to `top_k`.
    pub async fn hybrid_search(
        &self,
        scope: &Scope,
        query: &str,
        params: HybridSearchParams,
    ) -> Result<Vec<ScoredChunk>> {
        let top_k = if params.top_k > 0 {
            params.top_k
        } else {
            self.config.default_top_k
        };

        if params.collections.is_empty() {
            return self
                .retrieve(
                    scope,
                    query,
                    RetrieveParams {
                        top_k,
                        min_score: params.min_score,
                        strategy: params.strategy,
                        ..Default::default()
                    },
                )
                .await;
        }

        let mut all = Vec::new();
        for collection_id in &params.collections {
            let results = self
                .retrieve(
                    scope,
                    query,
                    RetrieveParams {
                        collection_id: collection_id.clone(),
                        top_k,
                        min_score: params.min_score,
                        strategy: params.strategy.clone(),
                        ..Default::default()
                    },
                )
                .await?;
            all.extend(results);
        }

        all.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        all.truncate(top_k);
        Ok(all)
    }

    // ──────────────────────────────────────────────
    // Document operations
    // ──────────────────────────────────────────────

    /// Retrieve a document by id.
    pub async fn get_document(&self, id: &Id) -> Result<Document> {
        self.require_store()?.get_document(id).await
    }

    /// List documents matching the filter.
    pub async fn list_documents(&self, filter: &DocumentFilter) -> Result<Vec<Document>> {
        self.require_store()?.list_documents(filter).await
    }

    /// Delete a document and its chunks from both stores. Vector cleanup is
    /// best-effort; the metadata deletion is authoritative.
    #[instrument(skip(self), fields(document_id = %id))]
    pub async fn delete_document(&self, id: &Id) -> Result<()> {
        let store = self.require_store()?;

        if let Some(vector_store) = &self.vector_store {
            let filter: Metadata = [("document_id".to_string(), id.to_string())].into();
            if let Err(err) = vector_store.delete_by_metadata(&filter).await {
                tracing::warn!(
                    document_id = %id,
                    error = %err,
                    "failed to delete vector entries for document"
                );
            }
        }

        store
            .delete_chunks_by_document(id)
            .await
            .map_err(|e| Error::stage("delete chunks", e))?;

        store.delete_document(id).await?;

        self.extensions.emit_document_deleted(id).await;
        Ok(())
    }

    // ──────────────────────────────────────────────
    // Reindex
    // ──────────────────────────────────────────────

    /// Rebuild a collection's vector entries from its persisted chunks.
    ///
    /// Any error aborts the reindex and leaves the vector store partially
    /// rebuilt; re-running the reindex is the recovery procedure.
    #[instrument(skip(self), fields(collection_id = %id))]
    pub async fn reindex_collection(&self, id: &Id) -> Result<()> {
        let store = self.require_store()?;
        let embedder = self.require_embedder()?;
        let vector_store = self.require_vector_store()?;

        let started = Instant::now();
        self.extensions.emit_reindex_started(id).await;

        let docs = store
            .list_documents(&DocumentFilter {
                collection_id: id.clone(),
                state: Some(DocumentState::Ready),
                ..Default::default()
            })
            .await
            .map_err(|e| Error::stage("list documents for reindex", e))?;

        let filter: Metadata = [("collection_id".to_string(), id.to_string())].into();
        vector_store
            .delete_by_metadata(&filter)
            .await
            .map_err(|e| Error::stage("delete vectors for reindex", e))?;

        for doc in docs {
            let chunks = store
                .list_chunks_by_document(&doc.id)
                .await
                .map_err(|e| Error::stage("list chunks for reindex", e))?;

            if chunks.is_empty() {
                continue;
            }

            let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
            let embedded = embedder
                .embed(&texts)
                .await
                .map_err(|e| Error::stage("embed for reindex", e))?;

            let entries: Vec<Entry> = chunks
                .iter()
                .zip(&embedded)
                .map(|(chunk, result)| {
                    let mut metadata: Metadata = [
                        ("collection_id".to_string(), id.to_string()),
                        ("document_id".to_string(), doc.id.to_string()),
                        ("tenant_id".to_string(), chunk.tenant_id.clone()),
                        ("chunk_index".to_string(), chunk.index.to_string()),
                    ]
                    .into();
                    metadata.extend(chunk.metadata.clone());

                    Entry {
                        id: chunk.id.to_string(),
                        vector: result.vector.clone(),
                        content: chunk.content.clone(),
                        metadata,
                    }
                })
                .collect();

            vector_store
                .upsert(entries)
                .await
                .map_err(|e| Error::stage("upsert for reindex", e))?;
        }

        self.extensions
            .emit_reindex_completed(id, started.elapsed())
            .await;
        Ok(())
    }
}
