//! In-memory vector store using brute-force cosine similarity
//!
//! Suitable for testing and development.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::{cosine_similarity, Entry, SearchOptions, SearchResult, VectorStore};
use crate::errors::Result;
use crate::models::Metadata;

/// Brute-force in-memory vector store.
#[derive(Default)]
pub struct MemoryVectorStore {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries currently stored.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn upsert(&self, entries: Vec<Entry>) -> Result<()> {
        let mut map = self.entries.write();
        for entry in entries {
            map.insert(entry.id.clone(), entry);
        }
        Ok(())
    }

    async fn search(&self, vector: &[f32], opts: &SearchOptions) -> Result<Vec<SearchResult>> {
        let map = self.entries.read();

        let top_k = if opts.top_k > 0 { opts.top_k } else { 10 };

        let mut results: Vec<SearchResult> = Vec::new();
        for entry in map.values() {
            if !matches_filter(&entry.metadata, &opts.filter) {
                continue;
            }
            if !opts.tenant_key.is_empty()
                && entry.metadata.get("tenant_id").map(String::as_str)
                    != Some(opts.tenant_key.as_str())
            {
                continue;
            }

            let score = cosine_similarity(vector, &entry.vector);
            if score < opts.min_score {
                continue;
            }

            results.push(SearchResult {
                entry: entry.clone(),
                score,
            });
        }

        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(top_k);
        Ok(results)
    }

    async fn delete(&self, ids: &[String]) -> Result<()> {
        let mut map = self.entries.write();
        for id in ids {
            map.remove(id);
        }
        Ok(())
    }

    async fn delete_by_metadata(&self, filter: &Metadata) -> Result<()> {
        self.entries
            .write()
            .retain(|_, entry| !matches_filter(&entry.metadata, filter));
        Ok(())
    }
}

/// True if every filter key-value pair is present in the metadata.
fn matches_filter(metadata: &Metadata, filter: &Metadata) -> bool {
    filter
        .iter()
        .all(|(k, v)| metadata.get(k).map(String::as_str) == Some(v.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, vector: Vec<f32>, pairs: &[(&str, &str)]) -> Entry {
        Entry {
            id: id.to_string(),
            vector,
            content: format!("content of {id}"),
            metadata: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_search_sorted_descending_and_truncated() {
        let store = MemoryVectorStore::new();
        store
            .upsert(vec![
                entry("a", vec![1.0, 0.0], &[]),
                entry("b", vec![0.9, 0.1], &[]),
                entry("c", vec![0.0, 1.0], &[]),
            ])
            .await
            .unwrap();

        let results = store
            .search(&[1.0, 0.0], &SearchOptions { top_k: 2, ..Default::default() })
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].entry.id, "a");
        assert_eq!(results[1].entry.id, "b");
        assert!(results[0].score >= results[1].score);
    }

    #[tokio::test]
    async fn test_upsert_is_idempotent() {
        let store = MemoryVectorStore::new();
        let e = entry("a", vec![1.0, 0.0], &[]);
        store.upsert(vec![e.clone()]).await.unwrap();
        store.upsert(vec![e]).await.unwrap();
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_metadata_and_tenant_filters() {
        let store = MemoryVectorStore::new();
        store
            .upsert(vec![
                entry("a", vec![1.0, 0.0], &[("collection_id", "c1"), ("tenant_id", "t1")]),
                entry("b", vec![1.0, 0.0], &[("collection_id", "c2"), ("tenant_id", "t1")]),
                entry("c", vec![1.0, 0.0], &[("collection_id", "c1"), ("tenant_id", "t2")]),
            ])
            .await
            .unwrap();

        let mut opts = SearchOptions::default();
        opts.filter.insert("collection_id".into(), "c1".into());
        opts.tenant_key = "t1".into();

        let results = store.search(&[1.0, 0.0], &opts).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].entry.id, "a");
    }

    #[tokio::test]
    async fn test_min_score_threshold() {
        let store = MemoryVectorStore::new();
        store
            .upsert(vec![
                entry("near", vec![1.0, 0.0], &[]),
                entry("far", vec![0.0, 1.0], &[]),
            ])
            .await
            .unwrap();

        let results = store
            .search(
                &[1.0, 0.0],
                &SearchOptions { min_score: 0.5, ..Default::default() },
            )
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].entry.id, "near");
    }

    #[tokio::test]
    async fn test_min_score_applies_at_zero_and_below() {
        let store = MemoryVectorStore::new();
        store
            .upsert(vec![
                entry("aligned", vec![1.0, 0.0], &[]),
                entry("orthogonal", vec![0.0, 1.0], &[]),
                entry("opposite", vec![-1.0, 0.0], &[]),
            ])
            .await
            .unwrap();

        // The default threshold of 0 still excludes negative scores.
        let results = store
            .search(&[1.0, 0.0], &SearchOptions::default())
            .await
            .unwrap();
        let ids: Vec<&str> = results.iter().map(|r| r.entry.id.as_str()).collect();
        assert_eq!(ids, vec!["aligned", "orthogonal"]);
        for result in &results {
            assert!(result.score >= 0.0);
        }

        // A negative threshold admits the opposite-direction entry.
        let results = store
            .search(
                &[1.0, 0.0],
                &SearchOptions { min_score: -1.0, ..Default::default() },
            )
            .await
            .unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[2].entry.id, "opposite");
    }

    #[tokio::test]
    async fn test_delete_by_metadata() {
        let store = MemoryVectorStore::new();
        store
            .upsert(vec![
                entry("a", vec![1.0], &[("document_id", "d1")]),
                entry("b", vec![1.0], &[("document_id", "d2")]),
            ])
            .await
            .unwrap();

        let filter: Metadata = [("document_id".to_string(), "d1".to_string())].into();
        store.delete_by_metadata(&filter).await.unwrap();

        assert_eq!(store.len(), 1);
        let results = store.search(&[1.0], &SearchOptions::default()).await.unwrap();
        assert_eq!(results[0].entry.id, "b");
    }

    #[tokio::test]
    async fn test_delete_by_ids() {
        let store = MemoryVectorStore::new();
        store
            .upsert(vec![entry("a", vec![1.0], &[]), entry("b", vec![1.0], &[])])
            .await
            .unwrap();
        store.delete(&["a".to_string()]).await.unwrap();
        assert_eq!(store.len(), 1);
    }
}
