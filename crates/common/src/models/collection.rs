//! Collection entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Metadata;
use crate::id::Id;

/// A named group of documents sharing embedding and chunking configuration,
/// scoped to a `(tenant, app)` pair.
///
/// `(tenant_id, name)` is unique across collections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    /// Collection id (`col`-prefixed)
    #[serde(default)]
    pub id: Id,

    /// Human-readable name, unique per tenant
    pub name: String,

    /// Optional free-form description
    #[serde(default)]
    pub description: String,

    /// Owning tenant
    #[serde(default)]
    pub tenant_id: String,

    /// Owning application within the tenant
    #[serde(default)]
    pub app_id: String,

    /// Embedding model used for all documents in this collection
    #[serde(default)]
    pub embedding_model: String,

    /// Dimensionality of the embedding vectors
    #[serde(default)]
    pub embedding_dims: usize,

    /// Chunking strategy name (e.g. "recursive", "fixed")
    #[serde(default)]
    pub chunk_strategy: String,

    /// Target chunk size in tokens
    #[serde(default)]
    pub chunk_size: usize,

    /// Overlap between chunks in tokens
    #[serde(default)]
    pub chunk_overlap: usize,

    /// Extensible metadata
    #[serde(default)]
    pub metadata: Metadata,

    /// Denormalized document counter
    #[serde(default)]
    pub document_count: i64,

    /// Denormalized chunk counter
    #[serde(default)]
    pub chunk_count: i64,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Collection {
    /// Create a collection with the given name; remaining fields take their
    /// defaults and are filled in by the engine on create.
    pub fn named(name: impl Into<String>) -> Self {
        Collection {
            name: name.into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            ..Default::default()
        }
    }
}
