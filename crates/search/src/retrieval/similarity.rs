//! Plain cosine-similarity retrieval

use std::sync::Arc;

use async_trait::async_trait;

use super::{from_search_result, Retrieved, RetrieveOptions, Retriever};
use weave_common::embeddings::Embedder;
use weave_common::errors::{Error, Result};
use weave_common::vectorstore::VectorStore;

/// Embeds the query and runs a top-K vector-store search.
pub struct SimilarityRetriever {
    vector_store: Arc<dyn VectorStore>,
    embedder: Arc<dyn Embedder>,
}

impl SimilarityRetriever {
    pub fn new(vector_store: Arc<dyn VectorStore>, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            vector_store,
            embedder,
        }
    }
}

#[async_trait]
impl Retriever for SimilarityRetriever {
    async fn retrieve(&self, query: &str, opts: &RetrieveOptions) -> Result<Vec<Retrieved>> {
        let query_texts = [query.to_string()];
        let embedded = self
            .embedder
            .embed(&query_texts)
            .await
            .map_err(|e| Error::stage("similarity retrieve", e))?;

        let Some(query_vector) = embedded.into_iter().next() else {
            return Ok(Vec::new());
        };

        let search_opts = opts.to_search_options(opts.top_k);
        let results = self
            .vector_store
            .search(&query_vector.vector, &search_opts)
            .await
            .map_err(|e| Error::stage("similarity retrieve", e))?;

        tracing::debug!(result_count = results.len(), top_k = opts.top_k, "similarity search");
        Ok(results.into_iter().map(from_search_result).collect())
    }
}
