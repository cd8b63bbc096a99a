//! Weave engine
//!
//! The pipeline coordinator: owns the stores, embedder, chunker, optional
//! loader and retriever, enforces the dual-store invariants, and fans
//! lifecycle events out to registered extensions.
//!
//! ```text
//! ingest:   load → chunk → embed → persist chunks → upsert vectors
//! retrieve: embed query → vector search → (optional rerank)
//! reindex:  list ready docs → drop collection vectors → re-embed → upsert
//! ```

mod engine;
mod extension;
mod pipeline;
mod registry;

pub use engine::{
    CollectionStats, Engine, EngineBuilder, HybridSearchParams, IngestInput, IngestResult,
    RetrieveParams, ScoredChunk,
};
pub use extension::{Extension, Hook};
pub use pipeline::{Pipeline, Step, StepContext};
pub use registry::Registry;
