//! Text chunking
//!
//! Splits text into ordered pieces for embedding. Sizes are denominated in
//! tokens and converted with a ~4 characters-per-token heuristic; inject a
//! real tokenizer upstream if exact counts matter.
//!
//! All strategies trim leading/trailing whitespace on the whole input before
//! splitting, so offsets are relative to the trimmed text. Empty input yields
//! an empty sequence.

mod code;
mod fixed;
mod recursive;
mod semantic;
mod sliding;

pub use code::CodeChunker;
pub use fixed::FixedChunker;
pub use recursive::RecursiveChunker;
pub use semantic::SemanticChunker;
pub use sliding::SlidingChunker;

use weave_common::errors::Result;
use weave_common::models::Metadata;

/// Character budget per token for size estimation.
pub(crate) const CHARS_PER_TOKEN: usize = 4;

/// Default chunk size in tokens when options leave it unset.
pub(crate) const DEFAULT_CHUNK_SIZE: usize = 512;

/// Options controlling chunking behaviour.
#[derive(Debug, Clone, Default)]
pub struct ChunkOptions {
    /// Target chunk size in tokens. Zero means the default of 512.
    pub chunk_size: usize,
    /// Overlap between chunks in tokens.
    pub chunk_overlap: usize,
    /// Strategy name (e.g. "recursive", "fixed"). Used by [`StrategyChunker`].
    pub strategy: String,
}

impl ChunkOptions {
    pub(crate) fn char_size(&self) -> usize {
        let size = if self.chunk_size > 0 {
            self.chunk_size
        } else {
            DEFAULT_CHUNK_SIZE
        };
        size * CHARS_PER_TOKEN
    }

    pub(crate) fn char_overlap(&self) -> usize {
        self.chunk_overlap * CHARS_PER_TOKEN
    }
}

/// A single chunk produced by a chunker.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChunkPiece {
    /// Text content of the chunk
    pub content: String,
    /// Zero-based position in the document
    pub index: usize,
    /// Byte offset of the chunk start in the (trimmed) input
    pub start_offset: usize,
    /// Byte offset of the chunk end in the (trimmed) input
    pub end_offset: usize,
    /// Estimated token count
    pub token_count: usize,
    /// Strategy-specific metadata
    pub metadata: Metadata,
}

impl ChunkPiece {
    pub(crate) fn new(content: &str, index: usize, start: usize, end: usize) -> Self {
        ChunkPiece {
            content: content.to_string(),
            index,
            start_offset: start,
            end_offset: end,
            token_count: content.len() / CHARS_PER_TOKEN,
            metadata: Metadata::new(),
        }
    }
}

/// Splits text into chunks for embedding.
pub trait Chunker: Send + Sync {
    /// Split the given text according to the options. Output indices form a
    /// contiguous 0-based sequence; offsets satisfy
    /// `0 ≤ start ≤ end ≤ len(text)`.
    fn chunk(&self, text: &str, opts: &ChunkOptions) -> Result<Vec<ChunkPiece>>;
}

/// Dispatches to a concrete strategy by the `strategy` option.
///
/// Unknown or empty strategy names fall back to the recursive splitter, so
/// collection-configured names can be passed straight through.
pub struct StrategyChunker {
    recursive: RecursiveChunker,
    sliding: SlidingChunker,
    fixed: FixedChunker,
    semantic: SemanticChunker,
    code: CodeChunker,
}

impl StrategyChunker {
    pub fn new() -> Self {
        Self {
            recursive: RecursiveChunker::new(),
            sliding: SlidingChunker::new(),
            fixed: FixedChunker::new(),
            semantic: SemanticChunker::new(),
            code: CodeChunker::new(),
        }
    }
}

impl Default for StrategyChunker {
    fn default() -> Self {
        Self::new()
    }
}

impl Chunker for StrategyChunker {
    fn chunk(&self, text: &str, opts: &ChunkOptions) -> Result<Vec<ChunkPiece>> {
        let pieces = match opts.strategy.as_str() {
            "sliding" => self.sliding.chunk(text, opts),
            "fixed" => self.fixed.chunk(text, opts),
            "semantic" => self.semantic.chunk(text, opts),
            "code" => self.code.chunk(text, opts),
            _ => self.recursive.chunk(text, opts),
        }?;

        tracing::debug!(
            input_len = text.len(),
            chunk_count = pieces.len(),
            strategy = %opts.strategy,
            "text chunked"
        );
        Ok(pieces)
    }
}

/// Largest byte index `<= i` that falls on a char boundary.
pub(crate) fn floor_char_boundary(text: &str, mut i: usize) -> usize {
    if i >= text.len() {
        return text.len();
    }
    while !text.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Smallest byte index `>= i` that falls on a char boundary.
pub(crate) fn ceil_char_boundary(text: &str, mut i: usize) -> usize {
    if i >= text.len() {
        return text.len();
    }
    while !text.is_char_boundary(i) {
        i += 1;
    }
    i
}
