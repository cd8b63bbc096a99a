//! Recursive hierarchical-separator chunking

use super::{ceil_char_boundary, floor_char_boundary, ChunkOptions, ChunkPiece, Chunker};
use weave_common::errors::Result;

/// Splits text using hierarchical separators, trying the largest separator
/// first and falling back to smaller ones, then to fixed-size slicing as a
/// last resort. Overlap is approximate: the tail of the previous chunk is
/// prepended to the next builder rather than re-anchored to an exact
/// boundary.
#[derive(Debug)]
pub struct RecursiveChunker {
    /// Separators in priority order (largest to smallest).
    separators: Vec<&'static str>,
}

impl RecursiveChunker {
    pub fn new() -> Self {
        Self {
            separators: vec!["\n\n", "\n", ". ", " "],
        }
    }
}

impl Default for RecursiveChunker {
    fn default() -> Self {
        Self::new()
    }
}

impl Chunker for RecursiveChunker {
    fn chunk(&self, text: &str, opts: &ChunkOptions) -> Result<Vec<ChunkPiece>> {
        let char_size = opts.char_size();
        let char_overlap = opts.char_overlap();

        let text = text.trim();
        if text.is_empty() {
            return Ok(Vec::new());
        }

        let chunks = split_recursive(text, &self.separators, char_size, char_overlap);

        // Best-effort offsets: locate each chunk in the source, scanning
        // forward from the previous chunk's start.
        let mut pieces = Vec::with_capacity(chunks.len());
        let mut offset = 0;
        for (i, chunk) in chunks.iter().enumerate() {
            let start = text[offset..]
                .find(chunk.as_str())
                .map(|p| p + offset)
                .unwrap_or(0);
            let end = start + chunk.len();
            pieces.push(ChunkPiece::new(chunk, i, start, end));
            offset = start;
        }

        Ok(pieces)
    }
}

fn split_recursive(
    text: &str,
    separators: &[&'static str],
    chunk_size: usize,
    overlap: usize,
) -> Vec<String> {
    if text.len() <= chunk_size {
        return vec![text.to_string()];
    }

    let Some((&sep, rest)) = separators.split_first() else {
        return split_at_size(text, chunk_size, overlap);
    };

    let mut chunks: Vec<String> = Vec::new();
    let mut current = String::new();

    let flush = |current: &mut String, chunks: &mut Vec<String>| {
        let chunk = current.trim().to_string();
        if !chunk.is_empty() {
            if chunk.len() > chunk_size {
                chunks.extend(split_recursive(&chunk, rest, chunk_size, overlap));
            } else {
                chunks.push(chunk.clone());
            }
        }
        current.clear();
        chunk
    };

    for part in text.split(sep) {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        if !current.is_empty() && current.len() + part.len() + sep.len() > chunk_size {
            let flushed = flush(&mut current, &mut chunks);
            // Carry an overlap tail from the flushed chunk into the next one.
            if overlap > 0 && flushed.len() > overlap {
                let tail = ceil_char_boundary(&flushed, flushed.len() - overlap);
                current.push_str(&flushed[tail..]);
                current.push_str(sep);
            }
        }

        if !current.is_empty() {
            current.push_str(sep);
        }
        current.push_str(part);
    }

    if !current.is_empty() {
        flush(&mut current, &mut chunks);
    }

    chunks
}

/// Last resort: slice at the size budget with optional overlap.
fn split_at_size(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < text.len() {
        let end = floor_char_boundary(text, start + chunk_size);
        chunks.push(text[start..end].to_string());
        if end >= text.len() {
            break;
        }
        let next = floor_char_boundary(text, end.saturating_sub(overlap));
        start = if next <= start {
            ceil_char_boundary(text, start + 1)
        } else {
            next
        };
    }

    chunks
}
