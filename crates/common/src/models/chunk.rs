//! Chunk entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Metadata;
use crate::id::Id;

/// A contiguous slice of a document's text, embedded and stored as one
/// vector-store entry. Chunks are immutable after creation; `(document_id,
/// index)` is unique and indices form a contiguous 0-based prefix.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Chunk id (`chk`-prefixed); the vector entry shares this id
    #[serde(default)]
    pub id: Id,

    /// Owning document
    #[serde(default)]
    pub document_id: Id,

    /// Owning collection
    #[serde(default)]
    pub collection_id: Id,

    /// Owning tenant
    #[serde(default)]
    pub tenant_id: String,

    /// Chunk text
    pub content: String,

    /// Zero-based position in the document
    #[serde(default)]
    pub index: usize,

    /// Byte offset of the chunk start in the source text
    #[serde(default)]
    pub start_offset: usize,

    /// Byte offset of the chunk end in the source text
    #[serde(default)]
    pub end_offset: usize,

    /// Estimated token count
    #[serde(default)]
    pub token_count: usize,

    /// Extensible metadata
    #[serde(default)]
    pub metadata: Metadata,

    /// Optional parent chunk for hierarchical chunking
    #[serde(default, skip_serializing_if = "Id::is_nil")]
    pub parent_id: Id,

    #[serde(default)]
    pub created_at: DateTime<Utc>,
}
