//! Vector store contract
//!
//! Pluggable interface for vector storage and top-K similarity search.
//! Separate from the metadata store: this side holds embeddings and is a
//! derived index, never the authoritative record.
//!
//! Similarity semantics are cosine: 1 = identical, −1 = opposite.
//! Implementations that natively store cosine distance must convert to
//! similarity (`1 − distance`) before applying `min_score` and before
//! returning results.

mod memory;

pub use memory::MemoryVectorStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::models::Metadata;

/// A single vector entry. The id equals the originating chunk's id; content
/// is duplicated so the fast retrieve path needs no metadata-store round-trip.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    pub vector: Vec<f32>,
    pub content: String,
    /// Carries at minimum `collection_id`, `document_id`, `tenant_id`,
    /// and `chunk_index`.
    pub metadata: Metadata,
}

/// An [`Entry`] paired with its similarity score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(flatten)]
    pub entry: Entry,
    pub score: f64,
}

/// Options for a similarity search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Maximum number of results. Zero means the default of 10.
    pub top_k: usize,
    /// Exact-match restriction over entry metadata.
    pub filter: Metadata,
    /// Convenience filter on the `tenant_id` metadata key.
    pub tenant_key: String,
    /// Minimum similarity score threshold.
    pub min_score: f64,
}

/// Pluggable vector storage and retrieval.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Insert or replace entries by id. Must be idempotent on id.
    async fn upsert(&self, entries: Vec<Entry>) -> Result<()>;

    /// Return the entries most similar to the given vector, sorted by
    /// descending score, at most `top_k` long, all passing `min_score`.
    async fn search(&self, vector: &[f32], opts: &SearchOptions) -> Result<Vec<SearchResult>>;

    /// Remove entries by id.
    async fn delete(&self, ids: &[String]) -> Result<()>;

    /// Remove entries matching the given metadata filter.
    async fn delete_by_metadata(&self, filter: &Metadata) -> Result<()>;
}

/// Cosine similarity between two vectors. Mismatched or empty inputs score 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for i in 0..a.len() {
        dot += f64::from(a[i]) * f64::from(b[i]);
        norm_a += f64::from(a[i]) * f64::from(a[i]);
        norm_b += f64::from(b[i]) * f64::from(b[i]);
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}
