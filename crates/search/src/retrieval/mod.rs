//! Retrieval strategies
//!
//! A [`Retriever`] turns a query string into scored chunks. The engine
//! delegates to whichever strategy is injected; strategies compose (the
//! reranker wraps a base retriever, the hybrid fuses several).

mod hybrid;
mod mmr;
mod reranker;
mod similarity;

pub use hybrid::HybridRetriever;
pub use mmr::MmrRetriever;
pub use reranker::{Reranker, RerankedRetriever};
pub use similarity::SimilarityRetriever;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use weave_common::errors::Result;
use weave_common::models::{Chunk, Metadata};
use weave_common::vectorstore::{SearchOptions, SearchResult};

/// A retrieved chunk with its relevance score (higher is more relevant).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Retrieved {
    pub chunk: Chunk,
    pub score: f64,
}

/// Options for a retrieval operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetrieveOptions {
    /// Restrict retrieval to a specific collection. Empty means all.
    pub collection_id: String,
    /// Tenant isolation key.
    pub tenant_key: String,
    /// Maximum number of results.
    pub top_k: usize,
    /// Minimum relevance score threshold.
    pub min_score: f64,
    /// Exact-match restriction over chunk metadata.
    pub filter: Metadata,
}

impl RetrieveOptions {
    /// Build vector-store search options from these retrieval options,
    /// folding the collection restriction into the metadata filter.
    pub(crate) fn to_search_options(&self, top_k: usize) -> SearchOptions {
        let mut filter = self.filter.clone();
        if !self.collection_id.is_empty() {
            filter.insert("collection_id".to_string(), self.collection_id.clone());
        }

        SearchOptions {
            top_k,
            filter,
            tenant_key: self.tenant_key.clone(),
            min_score: self.min_score,
        }
    }
}

/// Retrieves relevant chunks for a query.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Return the most relevant chunks for the query, sorted by descending
    /// score, at most `top_k` long.
    async fn retrieve(&self, query: &str, opts: &RetrieveOptions) -> Result<Vec<Retrieved>>;
}

/// Project a vector-store hit into a retrieval result. Only content and
/// metadata travel on this path; the persisted chunk row is not re-read.
pub(crate) fn from_search_result(result: SearchResult) -> Retrieved {
    Retrieved {
        chunk: Chunk {
            content: result.entry.content,
            metadata: result.entry.metadata,
            ..Default::default()
        },
        score: result.score,
    }
}

/// Expanded candidate pool size for re-ranking strategies.
pub(crate) fn candidate_pool(top_k: usize) -> usize {
    (top_k * 3).max(20)
}
