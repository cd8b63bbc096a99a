//! Hybrid retrieval via Reciprocal Rank Fusion
//!
//! RRF combines rankings without score normalization: each sub-retriever
//! contributes `1 / (k + rank)` for every result, contributions are summed
//! per deduplication key, and the fused list is sorted by total.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use super::{Retrieved, RetrieveOptions, Retriever};
use weave_common::errors::Result;

/// RRF constant; 60 is the conventional value.
const RRF_K: f64 = 60.0;

/// Fuses several sub-retrievers with reciprocal rank fusion. Results are
/// deduplicated by chunk content.
pub struct HybridRetriever {
    retrievers: Vec<Arc<dyn Retriever>>,
    k: f64,
}

impl HybridRetriever {
    pub fn new(retrievers: Vec<Arc<dyn Retriever>>) -> Self {
        Self {
            retrievers,
            k: RRF_K,
        }
    }
}

#[async_trait]
impl Retriever for HybridRetriever {
    async fn retrieve(&self, query: &str, opts: &RetrieveOptions) -> Result<Vec<Retrieved>> {
        let mut scores: HashMap<String, f64> = HashMap::new();
        let mut first_seen: HashMap<String, Retrieved> = HashMap::new();

        for retriever in &self.retrievers {
            let results = retriever.retrieve(query, opts).await?;

            for (rank, result) in results.into_iter().enumerate() {
                let key = result.chunk.content.clone();
                let contribution = 1.0 / (self.k + (rank + 1) as f64);
                *scores.entry(key.clone()).or_insert(0.0) += contribution;
                first_seen.entry(key).or_insert(result);
            }
        }

        let mut fused: Vec<Retrieved> = scores
            .into_iter()
            .filter_map(|(key, score)| {
                first_seen.remove(&key).map(|mut r| {
                    r.score = score;
                    r
                })
            })
            .collect();

        fused.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        if opts.top_k > 0 && fused.len() > opts.top_k {
            fused.truncate(opts.top_k);
        }

        Ok(fused)
    }
}
