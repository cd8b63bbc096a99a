//! In-memory metadata store
//!
//! Backs the composite store contract with three maps behind a single
//! read-write lock. Writes hold the lock across the entire mutation,
//! cascades included. Suitable for testing and development.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

use super::{
    ChunkFilter, ChunkStore, CollectionFilter, CollectionStore, DocumentFilter, DocumentStore,
    MetadataStore,
};
use crate::errors::{Error, Result};
use crate::id::Id;
use crate::models::{Chunk, Collection, Document};

#[derive(Default)]
struct State {
    collections: HashMap<Id, Collection>,
    documents: HashMap<Id, Document>,
    chunks: HashMap<Id, Chunk>,
}

/// In-memory implementation of the composite metadata store.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CollectionStore for MemoryStore {
    async fn create_collection(&self, mut col: Collection) -> Result<Collection> {
        let mut state = self.state.write();

        if state.collections.contains_key(&col.id) {
            return Err(Error::CollectionAlreadyExists);
        }
        if state
            .collections
            .values()
            .any(|c| c.tenant_id == col.tenant_id && c.name == col.name)
        {
            return Err(Error::CollectionAlreadyExists);
        }

        let now = Utc::now();
        col.created_at = now;
        col.updated_at = now;
        state.collections.insert(col.id.clone(), col.clone());
        Ok(col)
    }

    async fn get_collection(&self, id: &Id) -> Result<Collection> {
        self.state
            .read()
            .collections
            .get(id)
            .cloned()
            .ok_or(Error::CollectionNotFound)
    }

    async fn get_collection_by_name(&self, tenant_id: &str, name: &str) -> Result<Collection> {
        self.state
            .read()
            .collections
            .values()
            .find(|c| c.tenant_id == tenant_id && c.name == name)
            .cloned()
            .ok_or(Error::CollectionNotFound)
    }

    async fn update_collection(&self, mut col: Collection) -> Result<Collection> {
        let mut state = self.state.write();

        if !state.collections.contains_key(&col.id) {
            return Err(Error::CollectionNotFound);
        }

        col.updated_at = Utc::now();
        state.collections.insert(col.id.clone(), col.clone());
        Ok(col)
    }

    async fn delete_collection(&self, id: &Id) -> Result<()> {
        let mut state = self.state.write();

        if state.collections.remove(id).is_none() {
            return Err(Error::CollectionNotFound);
        }

        state.documents.retain(|_, d| d.collection_id != *id);
        state.chunks.retain(|_, c| c.collection_id != *id);
        Ok(())
    }

    async fn list_collections(&self, filter: &CollectionFilter) -> Result<Vec<Collection>> {
        let state = self.state.read();

        let mut result: Vec<Collection> = state.collections.values().cloned().collect();
        result.sort_by_key(|c| c.created_at);

        Ok(paginate(result, filter.offset, filter.limit))
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn create_document(&self, mut doc: Document) -> Result<Document> {
        let mut state = self.state.write();

        if state.documents.contains_key(&doc.id) {
            return Err(Error::DocumentAlreadyExists);
        }
        if state
            .documents
            .values()
            .any(|d| d.collection_id == doc.collection_id && d.content_hash == doc.content_hash)
        {
            return Err(Error::DuplicateDocument);
        }

        let now = Utc::now();
        doc.created_at = now;
        doc.updated_at = now;
        state.documents.insert(doc.id.clone(), doc.clone());
        Ok(doc)
    }

    async fn get_document(&self, id: &Id) -> Result<Document> {
        self.state
            .read()
            .documents
            .get(id)
            .cloned()
            .ok_or(Error::DocumentNotFound)
    }

    async fn update_document(&self, mut doc: Document) -> Result<Document> {
        let mut state = self.state.write();

        if !state.documents.contains_key(&doc.id) {
            return Err(Error::DocumentNotFound);
        }

        doc.updated_at = Utc::now();
        state.documents.insert(doc.id.clone(), doc.clone());
        Ok(doc)
    }

    async fn delete_document(&self, id: &Id) -> Result<()> {
        let mut state = self.state.write();

        if state.documents.remove(id).is_none() {
            return Err(Error::DocumentNotFound);
        }

        state.chunks.retain(|_, c| c.document_id != *id);
        Ok(())
    }

    async fn list_documents(&self, filter: &DocumentFilter) -> Result<Vec<Document>> {
        let state = self.state.read();

        let mut result: Vec<Document> = state
            .documents
            .values()
            .filter(|d| matches_document(d, filter))
            .cloned()
            .collect();
        result.sort_by_key(|d| d.created_at);

        Ok(paginate(result, filter.offset, filter.limit))
    }

    async fn count_documents(&self, filter: &DocumentFilter) -> Result<i64> {
        let state = self.state.read();

        Ok(state
            .documents
            .values()
            .filter(|d| matches_document(d, filter))
            .count() as i64)
    }

    async fn delete_documents_by_collection(&self, collection_id: &Id) -> Result<()> {
        let mut state = self.state.write();

        let doomed: Vec<Id> = state
            .documents
            .values()
            .filter(|d| d.collection_id == *collection_id)
            .map(|d| d.id.clone())
            .collect();

        for doc_id in doomed {
            state.documents.remove(&doc_id);
            state.chunks.retain(|_, c| c.document_id != doc_id);
        }
        Ok(())
    }
}

#[async_trait]
impl ChunkStore for MemoryStore {
    async fn create_chunk_batch(&self, mut chunks: Vec<Chunk>) -> Result<Vec<Chunk>> {
        let mut state = self.state.write();

        let now = Utc::now();
        for chunk in &mut chunks {
            chunk.created_at = now;
            state.chunks.insert(chunk.id.clone(), chunk.clone());
        }
        Ok(chunks)
    }

    async fn get_chunk(&self, id: &Id) -> Result<Chunk> {
        self.state
            .read()
            .chunks
            .get(id)
            .cloned()
            .ok_or(Error::ChunkNotFound)
    }

    async fn list_chunks_by_document(&self, document_id: &Id) -> Result<Vec<Chunk>> {
        let state = self.state.read();

        let mut result: Vec<Chunk> = state
            .chunks
            .values()
            .filter(|c| c.document_id == *document_id)
            .cloned()
            .collect();
        result.sort_by_key(|c| c.index);
        Ok(result)
    }

    async fn delete_chunks_by_document(&self, document_id: &Id) -> Result<()> {
        self.state
            .write()
            .chunks
            .retain(|_, c| c.document_id != *document_id);
        Ok(())
    }

    async fn delete_chunks_by_collection(&self, collection_id: &Id) -> Result<()> {
        self.state
            .write()
            .chunks
            .retain(|_, c| c.collection_id != *collection_id);
        Ok(())
    }

    async fn count_chunks(&self, filter: &ChunkFilter) -> Result<i64> {
        let state = self.state.read();

        Ok(state
            .chunks
            .values()
            .filter(|c| {
                (filter.collection_id.is_nil() || c.collection_id == filter.collection_id)
                    && (filter.document_id.is_nil() || c.document_id == filter.document_id)
            })
            .count() as i64)
    }
}

#[async_trait]
impl MetadataStore for MemoryStore {
    async fn migrate(&self) -> Result<()> {
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

fn matches_document(doc: &Document, filter: &DocumentFilter) -> bool {
    if !filter.collection_id.is_nil() && doc.collection_id != filter.collection_id {
        return false;
    }
    if let Some(state) = filter.state {
        if doc.state != state {
            return false;
        }
    }
    true
}

/// Apply offset/limit to an already-sorted result set. An offset past the end
/// yields an empty list, not an error.
fn paginate<T>(mut items: Vec<T>, offset: usize, limit: usize) -> Vec<T> {
    if offset >= items.len() {
        return Vec::new();
    }
    if offset > 0 {
        items.drain(..offset);
    }
    if limit > 0 && items.len() > limit {
        items.truncate(limit);
    }
    items
}
