//! Maximal Marginal Relevance retrieval
//!
//! MMR re-ranks candidates to balance relevance against diversity:
//!
//! `MMR = λ·similarity(query, doc) − (1−λ)·max(similarity(doc, selected))`
//!
//! λ = 1.0 is pure relevance; λ → 0 is pure diversity.

use std::sync::Arc;

use async_trait::async_trait;

use super::{candidate_pool, from_search_result, Retrieved, RetrieveOptions, Retriever};
use weave_common::embeddings::Embedder;
use weave_common::errors::{Error, Result};
use weave_common::vectorstore::{cosine_similarity, VectorStore};

/// Diversity-aware retriever using MMR re-ranking over an expanded
/// candidate pool.
pub struct MmrRetriever {
    vector_store: Arc<dyn VectorStore>,
    embedder: Arc<dyn Embedder>,
    lambda: f64,
}

impl MmrRetriever {
    /// Lambda controls the trade-off: 1.0 = pure relevance, values outside
    /// (0, 1] fall back to the 0.7 default.
    pub fn new(vector_store: Arc<dyn VectorStore>, embedder: Arc<dyn Embedder>, lambda: f64) -> Self {
        let lambda = if lambda <= 0.0 || lambda > 1.0 { 0.7 } else { lambda };
        Self {
            vector_store,
            embedder,
            lambda,
        }
    }
}

#[async_trait]
impl Retriever for MmrRetriever {
    async fn retrieve(&self, query: &str, opts: &RetrieveOptions) -> Result<Vec<Retrieved>> {
        let query_texts = [query.to_string()];
        let embedded = self
            .embedder
            .embed(&query_texts)
            .await
            .map_err(|e| Error::stage("mmr retrieve", e))?;

        let Some(query_result) = embedded.into_iter().next() else {
            return Ok(Vec::new());
        };

        // Fetch more candidates than requested for re-ranking. The candidate
        // search relaxes min_score to zero; relevance filtering happens via
        // the MMR ranking itself.
        let mut search_opts = opts.to_search_options(candidate_pool(opts.top_k));
        search_opts.min_score = 0.0;

        let candidates = self
            .vector_store
            .search(&query_result.vector, &search_opts)
            .await
            .map_err(|e| Error::stage("mmr retrieve", e))?;

        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        // Greedy MMR selection. Ties go to the earliest candidate.
        let mut selected: Vec<usize> = Vec::with_capacity(opts.top_k);
        let mut used = vec![false; candidates.len()];

        while selected.len() < opts.top_k && selected.len() < candidates.len() {
            let mut best_idx = None;
            let mut best_score = f64::NEG_INFINITY;

            for (i, candidate) in candidates.iter().enumerate() {
                if used[i] {
                    continue;
                }

                let relevance = candidate.score;
                let max_sim = selected
                    .iter()
                    .map(|&s| {
                        cosine_similarity(&candidate.entry.vector, &candidates[s].entry.vector)
                    })
                    .fold(0.0f64, f64::max);

                let mmr = self.lambda * relevance - (1.0 - self.lambda) * max_sim;
                if mmr > best_score {
                    best_score = mmr;
                    best_idx = Some(i);
                }
            }

            let Some(idx) = best_idx else { break };
            used[idx] = true;
            selected.push(idx);
        }

        Ok(selected
            .into_iter()
            .map(|i| from_search_result(candidates[i].clone()))
            .collect())
    }
}
