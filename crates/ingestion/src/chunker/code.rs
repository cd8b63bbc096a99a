//! Declaration-boundary chunking for source code

use super::{ChunkOptions, ChunkPiece, Chunker};
use weave_common::errors::Result;

/// Separators tried in order; the first one present in the text wins.
const SEPARATORS: [&str; 9] = [
    "\nfunc ", "\ndef ", "\nclass ",
    "\nfunction ", "\nconst ", "\nvar ", "\ntype ",
    "\n\n", "\n",
];

/// Splits code at function/class/top-level declaration boundaries, falling
/// back to blank-line and line splits.
#[derive(Debug, Default)]
pub struct CodeChunker;

impl CodeChunker {
    pub fn new() -> Self {
        Self
    }
}

impl Chunker for CodeChunker {
    fn chunk(&self, text: &str, opts: &ChunkOptions) -> Result<Vec<ChunkPiece>> {
        let char_size = opts.char_size();

        let text = text.trim();
        if text.is_empty() {
            return Ok(Vec::new());
        }

        let blocks = split_by_any(text);

        let mut pieces = Vec::new();
        let mut current = String::new();
        let mut current_start = 0;
        let mut index = 0;

        for block in blocks {
            let block = block.trim_end_matches([' ', '\t']);
            if block.is_empty() {
                continue;
            }

            if !current.is_empty() && current.len() + block.len() > char_size {
                let end = current_start + current.len();
                pieces.push(ChunkPiece::new(&current, index, current_start, end));
                index += 1;
                current_start = end;
                current.clear();
            }

            current.push_str(block);
        }

        if !current.is_empty() {
            let end = current_start + current.len();
            pieces.push(ChunkPiece::new(&current, index, current_start, end));
        }

        Ok(pieces)
    }
}

/// Split by the first separator from [`SEPARATORS`] that actually divides the
/// text, preserving the separator as a prefix of each following block.
fn split_by_any(text: &str) -> Vec<String> {
    for sep in SEPARATORS {
        if !text.contains(sep) {
            continue;
        }

        let mut result = Vec::new();
        for (i, part) in text.split(sep).enumerate() {
            let block = if i > 0 {
                format!("{sep}{part}")
            } else {
                part.to_string()
            };
            if !block.trim().is_empty() {
                result.push(block);
            }
        }
        if result.len() > 1 {
            return result;
        }
    }
    vec![text.to_string()]
}
