//! Document entity and lifecycle states

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Metadata;
use crate::id::Id;

/// Lifecycle state of a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentState {
    /// Created but not yet processed
    #[default]
    Pending,
    /// Currently being chunked/embedded
    Processing,
    /// Fully processed and searchable
    Ready,
    /// Processing failed; `error` carries the cause
    Failed,
}

impl DocumentState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentState::Pending => "pending",
            DocumentState::Processing => "processing",
            DocumentState::Ready => "ready",
            DocumentState::Failed => "failed",
        }
    }

    /// Whether the state is terminal (ready or failed).
    pub fn is_terminal(&self) -> bool {
        matches!(self, DocumentState::Ready | DocumentState::Failed)
    }
}

impl std::fmt::Display for DocumentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An ingested document within a collection, identified and deduplicated by
/// its content hash. `(collection_id, content_hash)` is unique.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Document id (`doc`-prefixed)
    #[serde(default)]
    pub id: Id,

    /// Owning collection
    #[serde(default)]
    pub collection_id: Id,

    /// Owning tenant
    #[serde(default)]
    pub tenant_id: String,

    /// Optional title
    #[serde(default)]
    pub title: String,

    /// Free-form origin (URL, path, …)
    #[serde(default)]
    pub source: String,

    /// MIME type or format hint
    #[serde(default)]
    pub source_type: String,

    /// Hex SHA-256 of the raw content
    #[serde(default)]
    pub content_hash: String,

    /// Length of the raw content in bytes
    #[serde(default)]
    pub content_length: usize,

    /// Number of chunks produced by ingestion
    #[serde(default)]
    pub chunk_count: usize,

    /// Extensible metadata
    #[serde(default)]
    pub metadata: Metadata,

    /// Lifecycle state
    #[serde(default)]
    pub state: DocumentState,

    /// Failure cause; non-empty whenever `state` is `Failed`
    #[serde(default)]
    pub error: String,

    #[serde(default)]
    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub updated_at: DateTime<Utc>,
}
