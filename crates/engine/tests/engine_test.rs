//! End-to-end engine tests over the in-memory stores.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use weave_common::embeddings::{EmbedResult, Embedder};
use weave_common::errors::{Error, ErrorCode, Result};
use weave_common::id::{Id, Prefix};
use weave_common::models::{Chunk, Collection, Document, DocumentState};
use weave_common::scope::Scope;
use weave_common::store::{ChunkFilter, ChunkStore, CollectionFilter, DocumentFilter, DocumentStore, MemoryStore};
use weave_common::vectorstore::{MemoryVectorStore, SearchOptions, VectorStore};
use weave_engine::{Engine, Extension, Hook, HybridSearchParams, IngestInput, RetrieveParams};
use weave_ingestion::chunker::StrategyChunker;

/// Deterministic bag-of-words embedder: each word lands in one of four
/// buckets by its first letter. Enough signal for ranking assertions
/// without a real model.
struct BucketEmbedder;

fn bucket_vector(text: &str) -> Vec<f32> {
    let mut v = vec![0.0f32; 4];
    for word in text.split_whitespace() {
        let bucket = match word.chars().next().map(|c| c.to_ascii_lowercase()) {
            Some('a'..='f') => 0,
            Some('g'..='m') => 1,
            Some('n'..='s') => 2,
            _ => 3,
        };
        v[bucket] += 1.0;
    }
    if v.iter().all(|&x| x == 0.0) {
        v[3] = 1.0;
    }
    v
}

#[async_trait]
impl Embedder for BucketEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<EmbedResult>> {
        Ok(texts
            .iter()
            .map(|t| EmbedResult {
                vector: bucket_vector(t),
                token_count: t.len() / 4,
            })
            .collect())
    }

    fn dimensions(&self) -> usize {
        4
    }
}

/// Embedder that always fails, for the fail-ingest path.
struct FaultyEmbedder;

#[async_trait]
impl Embedder for FaultyEmbedder {
    async fn embed(&self, _texts: &[String]) -> Result<Vec<EmbedResult>> {
        Err(Error::Embedding {
            message: "provider unavailable".into(),
        })
    }

    fn dimensions(&self) -> usize {
        4
    }
}

/// Extension recording every hook invocation as a label.
struct RecordingExtension {
    events: Arc<Mutex<Vec<String>>>,
}

const ALL_HOOKS: [Hook; 14] = [
    Hook::CollectionCreated,
    Hook::CollectionDeleted,
    Hook::IngestStarted,
    Hook::IngestChunked,
    Hook::IngestEmbedded,
    Hook::IngestCompleted,
    Hook::IngestFailed,
    Hook::RetrievalStarted,
    Hook::RetrievalCompleted,
    Hook::RetrievalFailed,
    Hook::DocumentDeleted,
    Hook::ReindexStarted,
    Hook::ReindexCompleted,
    Hook::Shutdown,
];

#[async_trait]
impl Extension for RecordingExtension {
    fn name(&self) -> &str {
        "recorder"
    }

    fn hooks(&self) -> &[Hook] {
        &ALL_HOOKS
    }

    async fn on_collection_created(&self, _collection: &Collection) -> Result<()> {
        self.events.lock().push("collection_created".into());
        Ok(())
    }

    async fn on_collection_deleted(&self, _collection_id: &Id) -> Result<()> {
        self.events.lock().push("collection_deleted".into());
        Ok(())
    }

    async fn on_ingest_started(&self, _collection_id: &Id, _docs: &[Document]) -> Result<()> {
        self.events.lock().push("ingest_started".into());
        Ok(())
    }

    async fn on_ingest_chunked(&self, _chunks: &[Chunk]) -> Result<()> {
        self.events.lock().push("ingest_chunked".into());
        Ok(())
    }

    async fn on_ingest_embedded(&self, _chunks: &[Chunk]) -> Result<()> {
        self.events.lock().push("ingest_embedded".into());
        Ok(())
    }

    async fn on_ingest_completed(
        &self,
        _collection_id: &Id,
        _doc_count: usize,
        _chunk_count: usize,
        _elapsed: Duration,
    ) -> Result<()> {
        self.events.lock().push("ingest_completed".into());
        Ok(())
    }

    async fn on_ingest_failed(&self, _collection_id: &Id, _error: &Error) -> Result<()> {
        self.events.lock().push("ingest_failed".into());
        Ok(())
    }

    async fn on_retrieval_started(&self, _collection_id: &Id, _query: &str) -> Result<()> {
        self.events.lock().push("retrieval_started".into());
        Ok(())
    }

    async fn on_retrieval_completed(
        &self,
        _collection_id: &Id,
        _result_count: usize,
        _elapsed: Duration,
    ) -> Result<()> {
        self.events.lock().push("retrieval_completed".into());
        Ok(())
    }

    async fn on_retrieval_failed(&self, _collection_id: &Id, _error: &Error) -> Result<()> {
        self.events.lock().push("retrieval_failed".into());
        Ok(())
    }

    async fn on_document_deleted(&self, _document_id: &Id) -> Result<()> {
        self.events.lock().push("document_deleted".into());
        Ok(())
    }

    async fn on_reindex_started(&self, _collection_id: &Id) -> Result<()> {
        self.events.lock().push("reindex_started".into());
        Ok(())
    }

    async fn on_reindex_completed(&self, _collection_id: &Id, _elapsed: Duration) -> Result<()> {
        self.events.lock().push("reindex_completed".into());
        Ok(())
    }

    async fn on_shutdown(&self) -> Result<()> {
        self.events.lock().push("shutdown".into());
        Ok(())
    }
}

struct Harness {
    engine: Engine,
    store: Arc<MemoryStore>,
    vectors: Arc<MemoryVectorStore>,
    events: Arc<Mutex<Vec<String>>>,
}

impl Harness {
    fn count_events(&self, label: &str) -> usize {
        self.events.lock().iter().filter(|e| *e == label).count()
    }
}

fn harness_with_embedder(embedder: Arc<dyn Embedder>) -> Harness {
    let store = Arc::new(MemoryStore::new());
    let vectors = Arc::new(MemoryVectorStore::new());
    let events = Arc::new(Mutex::new(Vec::new()));

    let engine = Engine::builder()
        .store(store.clone())
        .vector_store(vectors.clone())
        .embedder(embedder)
        .chunker(Arc::new(StrategyChunker::new()))
        .extension(Arc::new(RecordingExtension {
            events: events.clone(),
        }))
        .build();

    Harness {
        engine,
        store,
        vectors,
        events,
    }
}

fn harness() -> Harness {
    harness_with_embedder(Arc::new(BucketEmbedder))
}

/// A fixed-strategy collection whose 5-token budget slices at 20 characters.
fn fixed_collection(name: &str) -> Collection {
    Collection {
        name: name.to_string(),
        embedding_model: "bucket".to_string(),
        embedding_dims: 4,
        chunk_strategy: "fixed".to_string(),
        chunk_size: 5,
        chunk_overlap: 0,
        ..Default::default()
    }
}

const CONTENT: &str = "alpha beta gamma delta epsilon zeta";

#[tokio::test]
async fn test_create_ingest_retrieve_round_trip() {
    let h = harness();
    let scope = Scope::tenant("T1");

    let col = h
        .engine
        .create_collection(&scope, fixed_collection("docs"))
        .await
        .unwrap();
    assert!(!col.id.is_nil());
    assert_eq!(col.tenant_id, "T1");

    let result = h
        .engine
        .ingest(
            &scope,
            IngestInput {
                collection_id: col.id.clone(),
                content: CONTENT.to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(result.state, DocumentState::Ready);
    assert_eq!(result.chunk_count, 2);

    // The document row landed in ready with the chunk count recorded.
    let doc = h.engine.get_document(&result.document_id).await.unwrap();
    assert_eq!(doc.state, DocumentState::Ready);
    assert_eq!(doc.chunk_count, 2);
    assert_eq!(doc.content_length, CONTENT.len());
    assert_eq!(doc.content_hash.len(), 64);

    // Chunks are the exact fixed slices, contiguous from index 0.
    let chunks = h.store.list_chunks_by_document(&doc.id).await.unwrap();
    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].content, "alpha beta gamma del");
    assert_eq!(chunks[1].content, "ta epsilon zeta");
    assert_eq!(chunks[0].index, 0);
    assert_eq!(chunks[1].index, 1);
    assert_eq!(chunks[0].tenant_id, "T1");

    // Exactly two vector entries, tagged with collection/document/tenant.
    assert_eq!(h.vectors.len(), 2);
    let tagged = h
        .vectors
        .search(
            &bucket_vector("alpha"),
            &SearchOptions {
                top_k: 10,
                filter: [
                    ("collection_id".to_string(), col.id.to_string()),
                    ("document_id".to_string(), doc.id.to_string()),
                ]
                .into(),
                tenant_key: "T1".to_string(),
                min_score: 0.0,
            },
        )
        .await
        .unwrap();
    assert_eq!(tagged.len(), 2);

    // Retrieval returns both chunks with the alpha-bearing one first.
    let results = h
        .engine
        .retrieve(
            &scope,
            "alpha",
            RetrieveParams {
                collection_id: col.id.clone(),
                top_k: 5,
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].chunk.content, "alpha beta gamma del");
    assert!(results[0].score > results[1].score);

    // Event ordering for the successful ingest.
    let events = h.events.lock().clone();
    let ingest_events: Vec<&str> = events
        .iter()
        .map(String::as_str)
        .filter(|e| e.starts_with("ingest_"))
        .collect();
    assert_eq!(
        ingest_events,
        vec!["ingest_started", "ingest_chunked", "ingest_embedded", "ingest_completed"]
    );
}

#[tokio::test]
async fn test_duplicate_content_is_rejected() {
    let h = harness();
    let scope = Scope::tenant("T1");
    let col = h
        .engine
        .create_collection(&scope, fixed_collection("docs"))
        .await
        .unwrap();

    let input = IngestInput {
        collection_id: col.id.clone(),
        content: CONTENT.to_string(),
        ..Default::default()
    };

    h.engine.ingest(&scope, input.clone()).await.unwrap();
    let err = h.engine.ingest(&scope, input).await.unwrap_err();

    assert_eq!(err.code(), ErrorCode::DuplicateDocument);
    assert_eq!(err.http_status(), 409);

    let count = h
        .store
        .count_documents(&DocumentFilter {
            collection_id: col.id.clone(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_delete_collection_cascades_everywhere() {
    let h = harness();
    let scope = Scope::tenant("T1");
    let col = h
        .engine
        .create_collection(&scope, fixed_collection("docs"))
        .await
        .unwrap();

    h.engine
        .ingest(
            &scope,
            IngestInput {
                collection_id: col.id.clone(),
                content: CONTENT.to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(h.vectors.len(), 2);

    h.engine.delete_collection(&col.id).await.unwrap();

    assert!(matches!(
        h.engine.get_collection(&col.id).await.unwrap_err(),
        Error::CollectionNotFound
    ));
    let docs = h
        .store
        .count_documents(&DocumentFilter {
            collection_id: col.id.clone(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(docs, 0);
    let chunks = h
        .store
        .count_chunks(&ChunkFilter {
            collection_id: col.id.clone(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(chunks, 0);

    let remaining = h
        .vectors
        .search(
            &bucket_vector("alpha"),
            &SearchOptions {
                top_k: 10,
                filter: [("collection_id".to_string(), col.id.to_string())].into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(remaining.is_empty());

    assert_eq!(h.count_events("collection_deleted"), 1);
}

#[tokio::test]
async fn test_faulty_embedder_runs_fail_ingest_path() {
    let h = harness_with_embedder(Arc::new(FaultyEmbedder));
    let scope = Scope::tenant("T1");
    let col = h
        .engine
        .create_collection(&scope, fixed_collection("docs"))
        .await
        .unwrap();

    let err = h
        .engine
        .ingest(
            &scope,
            IngestInput {
                collection_id: col.id.clone(),
                content: CONTENT.to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

    // The error carries the failed document id and the wrapped cause.
    let Error::IngestFailed { document_id, source } = &err else {
        panic!("expected IngestFailed, got {err}");
    };
    assert!(source.to_string().contains("embed"));

    let doc = h.engine.get_document(document_id).await.unwrap();
    assert_eq!(doc.state, DocumentState::Failed);
    assert!(!doc.error.is_empty());

    // Nothing was persisted past the failing stage.
    let chunks = h
        .store
        .count_chunks(&ChunkFilter {
            collection_id: col.id.clone(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(chunks, 0);
    assert_eq!(h.vectors.len(), 0);

    assert_eq!(h.count_events("ingest_failed"), 1);
    assert_eq!(h.count_events("ingest_completed"), 0);
}

#[tokio::test]
async fn test_tenant_isolation_on_retrieve() {
    let h = harness();
    let scope_a = Scope::tenant("A");
    let scope_b = Scope::tenant("B");

    let col_a = h
        .engine
        .create_collection(&scope_a, fixed_collection("a-docs"))
        .await
        .unwrap();
    let col_b = h
        .engine
        .create_collection(&scope_b, fixed_collection("b-docs"))
        .await
        .unwrap();

    h.engine
        .ingest(
            &scope_a,
            IngestInput {
                collection_id: col_a.id.clone(),
                content: "apple banana cherry".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    h.engine
        .ingest(
            &scope_b,
            IngestInput {
                collection_id: col_b.id.clone(),
                content: "apricot blueberry citrus".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    // Cross-collection retrieve under tenant A must only see A's chunks.
    let results = h
        .engine
        .retrieve(&scope_a, "apple", RetrieveParams::default())
        .await
        .unwrap();

    assert!(!results.is_empty());
    for result in &results {
        assert_eq!(result.chunk.metadata.get("tenant_id").unwrap(), "A");
    }
}

#[tokio::test]
async fn test_empty_content_creates_nothing() {
    let h = harness();
    let scope = Scope::tenant("T1");
    let col = h
        .engine
        .create_collection(&scope, fixed_collection("docs"))
        .await
        .unwrap();

    let err = h
        .engine
        .ingest(
            &scope,
            IngestInput {
                collection_id: col.id.clone(),
                content: String::new(),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, Error::EmptyContent));
    let count = h
        .store
        .count_documents(&DocumentFilter::default())
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_short_input_yields_one_full_span_chunk() {
    let h = harness();
    let scope = Scope::tenant("T1");
    let col = h
        .engine
        .create_collection(&scope, fixed_collection("docs"))
        .await
        .unwrap();

    let result = h
        .engine
        .ingest(
            &scope,
            IngestInput {
                collection_id: col.id.clone(),
                content: "tiny".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(result.chunk_count, 1);
    let chunks = h
        .store
        .list_chunks_by_document(&result.document_id)
        .await
        .unwrap();
    assert_eq!(chunks[0].index, 0);
    assert_eq!(chunks[0].start_offset, 0);
    assert_eq!(chunks[0].end_offset, 4);
}

#[tokio::test]
async fn test_reindex_restores_orphaned_vectors() {
    let h = harness();
    let scope = Scope::tenant("T1");
    let col = h
        .engine
        .create_collection(&scope, fixed_collection("docs"))
        .await
        .unwrap();

    h.engine
        .ingest(
            &scope,
            IngestInput {
                collection_id: col.id.clone(),
                content: CONTENT.to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let before = h
        .engine
        .retrieve(
            &scope,
            "alpha",
            RetrieveParams {
                collection_id: col.id.clone(),
                top_k: 5,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(before.len(), 2);

    // Simulate the orphan window: chunk rows exist, vectors are gone.
    let filter = [("collection_id".to_string(), col.id.to_string())].into();
    h.vectors.delete_by_metadata(&filter).await.unwrap();
    assert_eq!(h.vectors.len(), 0);

    h.engine.reindex_collection(&col.id).await.unwrap();
    assert_eq!(h.vectors.len(), 2);

    // Retrieval output is unchanged (the test embedder is deterministic).
    let after = h
        .engine
        .retrieve(
            &scope,
            "alpha",
            RetrieveParams {
                collection_id: col.id.clone(),
                top_k: 5,
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let snapshot = |results: &[weave_engine::ScoredChunk]| {
        results
            .iter()
            .map(|r| (r.chunk.content.clone(), r.score))
            .collect::<Vec<_>>()
    };
    assert_eq!(snapshot(&before), snapshot(&after));

    assert_eq!(h.count_events("reindex_started"), 1);
    assert_eq!(h.count_events("reindex_completed"), 1);
}

#[tokio::test]
async fn test_delete_document_cleans_both_stores() {
    let h = harness();
    let scope = Scope::tenant("T1");
    let col = h
        .engine
        .create_collection(&scope, fixed_collection("docs"))
        .await
        .unwrap();

    let result = h
        .engine
        .ingest(
            &scope,
            IngestInput {
                collection_id: col.id.clone(),
                content: CONTENT.to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    h.engine.delete_document(&result.document_id).await.unwrap();

    assert!(matches!(
        h.engine.get_document(&result.document_id).await.unwrap_err(),
        Error::DocumentNotFound
    ));
    assert_eq!(h.vectors.len(), 0);
    assert_eq!(h.count_events("document_deleted"), 1);
}

#[tokio::test]
async fn test_collection_stats_reports_live_counts() {
    let h = harness();
    let scope = Scope::tenant("T1");
    let col = h
        .engine
        .create_collection(&scope, fixed_collection("docs"))
        .await
        .unwrap();

    h.engine
        .ingest(
            &scope,
            IngestInput {
                collection_id: col.id.clone(),
                content: CONTENT.to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let stats = h.engine.collection_stats(&col.id).await.unwrap();
    assert_eq!(stats.collection_name, "docs");
    assert_eq!(stats.document_count, 1);
    assert_eq!(stats.chunk_count, 2);
    assert_eq!(stats.chunk_strategy, "fixed");
}

#[tokio::test]
async fn test_hybrid_search_merges_collections() {
    let h = harness();
    let scope = Scope::tenant("T1");

    let col_a = h
        .engine
        .create_collection(&scope, fixed_collection("first"))
        .await
        .unwrap();
    let col_b = h
        .engine
        .create_collection(&scope, fixed_collection("second"))
        .await
        .unwrap();

    h.engine
        .ingest(
            &scope,
            IngestInput {
                collection_id: col_a.id.clone(),
                content: "alpha words here".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    h.engine
        .ingest(
            &scope,
            IngestInput {
                collection_id: col_b.id.clone(),
                content: "zulu yankee xray".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let results = h
        .engine
        .hybrid_search(
            &scope,
            "alpha",
            HybridSearchParams {
                collections: vec![col_a.id.clone(), col_b.id.clone()],
                top_k: 3,
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(!results.is_empty());
    assert!(results.len() <= 3);
    // Descending score across the merged set.
    for pair in results.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
    assert_eq!(results[0].chunk.content, "alpha words here");
}

#[tokio::test]
async fn test_config_defaults_fill_new_collections() {
    let h = harness();
    let scope = Scope::tenant("T1");

    let col = h
        .engine
        .create_collection(&scope, Collection::named("defaults"))
        .await
        .unwrap();

    assert_eq!(col.embedding_model, "text-embedding-3-small");
    assert_eq!(col.chunk_strategy, "recursive");
    assert_eq!(col.chunk_size, 512);
    assert_eq!(col.chunk_overlap, 50);
}

#[tokio::test]
async fn test_duplicate_collection_name_rejected_per_tenant() {
    let h = harness();
    let scope = Scope::tenant("T1");

    h.engine
        .create_collection(&scope, fixed_collection("docs"))
        .await
        .unwrap();
    let err = h
        .engine
        .create_collection(&scope, fixed_collection("docs"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::CollectionAlreadyExists));

    // Same name is fine for another tenant.
    h.engine
        .create_collection(&Scope::tenant("T2"), fixed_collection("docs"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_get_collection_by_name_scoped_to_tenant() {
    let h = harness();
    let scope = Scope::tenant("T1");
    let created = h
        .engine
        .create_collection(&scope, fixed_collection("docs"))
        .await
        .unwrap();

    let fetched = h
        .engine
        .get_collection_by_name(&scope, "docs")
        .await
        .unwrap();
    assert_eq!(fetched.id, created.id);

    let err = h
        .engine
        .get_collection_by_name(&Scope::tenant("T2"), "docs")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::CollectionNotFound));
}

#[tokio::test]
async fn test_list_collections_offset_past_end() {
    let h = harness();
    let scope = Scope::tenant("T1");
    h.engine
        .create_collection(&scope, fixed_collection("only"))
        .await
        .unwrap();

    let listed = h
        .engine
        .list_collections(&CollectionFilter {
            offset: 5,
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(listed.is_empty());
}

#[tokio::test]
async fn test_ingest_batch_reports_partial_success() {
    let h = harness();
    let scope = Scope::tenant("T1");
    let col = h
        .engine
        .create_collection(&scope, fixed_collection("docs"))
        .await
        .unwrap();

    let inputs = vec![
        IngestInput {
            collection_id: col.id.clone(),
            content: "first document body".to_string(),
            ..Default::default()
        },
        IngestInput {
            collection_id: col.id.clone(),
            // Duplicate of the first; the batch stops here.
            content: "first document body".to_string(),
            ..Default::default()
        },
        IngestInput {
            collection_id: col.id.clone(),
            content: "never reached".to_string(),
            ..Default::default()
        },
    ];

    let (results, err) = h.engine.ingest_batch(&scope, inputs).await;
    assert_eq!(results.len(), 1);
    assert_eq!(err.unwrap().code(), ErrorCode::DuplicateDocument);
}

#[tokio::test]
async fn test_unconfigured_engine_reports_missing_collaborators() {
    let engine = Engine::builder().build();
    let scope = Scope::tenant("T1");

    let err = engine
        .ingest(
            &scope,
            IngestInput {
                collection_id: Id::new(Prefix::Collection),
                content: "text".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NoStore));

    let err = engine
        .retrieve(&scope, "query", RetrieveParams::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NoRetriever));
}

#[tokio::test]
async fn test_stop_emits_shutdown() {
    let h = harness();
    h.engine.stop().await.unwrap();
    assert_eq!(h.count_events("shutdown"), 1);
}

#[tokio::test]
async fn test_retrieval_events_bracket_both_paths() {
    let h = harness();
    let scope = Scope::tenant("T1");
    let col = h
        .engine
        .create_collection(&scope, fixed_collection("docs"))
        .await
        .unwrap();
    h.engine
        .ingest(
            &scope,
            IngestInput {
                collection_id: col.id.clone(),
                content: CONTENT.to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    h.engine
        .retrieve(&scope, "alpha", RetrieveParams::default())
        .await
        .unwrap();

    assert_eq!(h.count_events("retrieval_started"), 1);
    assert_eq!(h.count_events("retrieval_completed"), 1);
    assert_eq!(h.count_events("retrieval_failed"), 0);
}
