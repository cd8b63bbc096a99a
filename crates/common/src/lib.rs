//! Weave common library
//!
//! Shared contracts for the Weave RAG pipeline engine:
//! - Type-prefixed, K-sortable identifiers
//! - Collection / Document / Chunk entities
//! - Error taxonomy with HTTP status mapping
//! - Engine configuration
//! - Metadata store and vector store interfaces (plus in-memory variants)
//! - Embedder interface and providers

pub mod config;
pub mod embeddings;
pub mod errors;
pub mod id;
pub mod models;
pub mod scope;
pub mod store;
pub mod vectorstore;

// Re-export commonly used types
pub use config::EngineConfig;
pub use embeddings::{EmbedResult, Embedder};
pub use errors::{Error, Result};
pub use id::{Id, Prefix};
pub use models::{Chunk, Collection, Document, DocumentState};
pub use scope::Scope;
pub use store::MetadataStore;
pub use vectorstore::VectorStore;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default embedding model stamped on new collections
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Default chunking strategy stamped on new collections
pub const DEFAULT_CHUNK_STRATEGY: &str = "recursive";
