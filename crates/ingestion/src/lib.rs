//! Weave ingestion library
//!
//! Text chunking strategies and format-typed loaders used by the ingest
//! pipeline. Chunkers split extracted text into embedding-sized pieces;
//! loaders extract text from raw document formats selected by MIME type.

pub mod chunker;
pub mod loader;

pub use chunker::{ChunkOptions, ChunkPiece, Chunker, StrategyChunker};
pub use loader::{FormatLoader, LoadResult, Loader};
