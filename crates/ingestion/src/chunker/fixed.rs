//! Fixed-size chunking at exact boundaries

use super::{floor_char_boundary, ChunkOptions, ChunkPiece, Chunker};
use weave_common::errors::Result;

/// Slices text into fixed-size chunks at exact character budget boundaries,
/// with optional overlap.
#[derive(Debug, Default)]
pub struct FixedChunker;

impl FixedChunker {
    pub fn new() -> Self {
        Self
    }
}

impl Chunker for FixedChunker {
    fn chunk(&self, text: &str, opts: &ChunkOptions) -> Result<Vec<ChunkPiece>> {
        let char_size = opts.char_size();
        let char_overlap = opts.char_overlap();

        let text = text.trim();
        if text.is_empty() {
            return Ok(Vec::new());
        }

        let mut pieces = Vec::new();
        let mut start = 0;
        let mut index = 0;

        while start < text.len() {
            let end = floor_char_boundary(text, start + char_size);
            pieces.push(ChunkPiece::new(&text[start..end], index, start, end));
            index += 1;

            if end >= text.len() {
                break;
            }

            // Step back by the overlap, but always make forward progress
            // even when overlap >= chunk size.
            let next = floor_char_boundary(text, end.saturating_sub(char_overlap));
            if next <= start {
                break;
            }
            start = next;
        }

        Ok(pieces)
    }
}
