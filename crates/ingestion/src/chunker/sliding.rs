//! Sliding-window chunking

use super::{ceil_char_boundary, floor_char_boundary, ChunkOptions, ChunkPiece, Chunker};
use weave_common::errors::Result;

/// Advances a fixed window through the text with step `size − overlap`,
/// clamped to at least one character.
#[derive(Debug, Default)]
pub struct SlidingChunker;

impl SlidingChunker {
    pub fn new() -> Self {
        Self
    }
}

impl Chunker for SlidingChunker {
    fn chunk(&self, text: &str, opts: &ChunkOptions) -> Result<Vec<ChunkPiece>> {
        let char_size = opts.char_size();
        let char_overlap = opts.char_overlap();

        let text = text.trim();
        if text.is_empty() {
            return Ok(Vec::new());
        }

        let step = (char_size.saturating_sub(char_overlap)).max(1);

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
            start = ceil_char_boundary(text, start + step);
        }

        Ok(pieces)
    }
}
