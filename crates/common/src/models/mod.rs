//! Entity models for the Weave pipeline
//!
//! The data lifecycle is:
//!
//! ```text
//! Collection ← Document (pending → processing → ready | failed) ← Chunk
//!                                                                   ↓
//!                                                        vector store entry
//! ```

mod chunk;
mod collection;
mod document;

pub use chunk::Chunk;
pub use collection::Collection;
pub use document::{Document, DocumentState};

/// Metadata attached to entities and vector entries.
pub type Metadata = std::collections::HashMap<String, String>;
