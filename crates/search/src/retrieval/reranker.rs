//! Reranked retrieval

use std::sync::Arc;

use async_trait::async_trait;

use super::{candidate_pool, Retrieved, RetrieveOptions, Retriever};
use weave_common::errors::Result;

/// Scores query-document pairs for re-ordering (e.g. a cross-encoder).
#[async_trait]
pub trait Reranker: Send + Sync {
    /// Return one score per document, in document order.
    async fn rerank(&self, query: &str, documents: &[String]) -> Result<Vec<f64>>;
}

/// Wraps a base retriever and re-orders its results with an injected
/// [`Reranker`].
pub struct RerankedRetriever {
    base: Arc<dyn Retriever>,
    reranker: Arc<dyn Reranker>,
}

impl RerankedRetriever {
    pub fn new(base: Arc<dyn Retriever>, reranker: Arc<dyn Reranker>) -> Self {
        Self { base, reranker }
    }
}

#[async_trait]
impl Retriever for RerankedRetriever {
    async fn retrieve(&self, query: &str, opts: &RetrieveOptions) -> Result<Vec<Retrieved>> {
        // Fetch an expanded pool so the reranker has room to reorder.
        let mut expanded = opts.clone();
        expanded.top_k = candidate_pool(opts.top_k);

        let mut candidates = self.base.retrieve(query, &expanded).await?;
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let documents: Vec<String> = candidates
            .iter()
            .map(|c| c.chunk.content.clone())
            .collect();

        let scores = self.reranker.rerank(query, &documents).await?;

        for (candidate, score) in candidates.iter_mut().zip(scores) {
            candidate.score = score;
        }

        candidates.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        if opts.top_k > 0 && candidates.len() > opts.top_k {
            candidates.truncate(opts.top_k);
        }

        Ok(candidates)
    }
}
