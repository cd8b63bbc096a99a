//! Sentence-boundary chunking

use std::sync::LazyLock;

use regex::Regex;

use super::{ChunkOptions, ChunkPiece, Chunker};
use weave_common::errors::Result;

static SENTENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+\s+").expect("sentence regex"));

/// Splits on sentence terminators and greedily packs sentences until the
/// size budget is reached. Offsets are a non-decreasing approximation based
/// on accumulated chunk lengths.
#[derive(Debug, Default)]
pub struct SemanticChunker;

impl SemanticChunker {
    pub fn new() -> Self {
        Self
    }
}

impl Chunker for SemanticChunker {
    fn chunk(&self, text: &str, opts: &ChunkOptions) -> Result<Vec<ChunkPiece>> {
        let char_size = opts.char_size();

        let text = text.trim();
        if text.is_empty() {
            return Ok(Vec::new());
        }

        // Split into sentences, keeping terminators with their sentence.
        let mut sentences: Vec<&str> = Vec::new();
        let mut start = 0;
        for m in SENTENCE_RE.find_iter(text) {
            let sentence = text[start..m.end()].trim();
            if !sentence.is_empty() {
                sentences.push(sentence);
            }
            start = m.end();
        }
        if start < text.len() {
            let remaining = text[start..].trim();
            if !remaining.is_empty() {
                sentences.push(remaining);
            }
        }

        // Greedily pack sentences into chunks.
        let mut pieces = Vec::new();
        let mut current = String::new();
        let mut current_start = 0;
        let mut index = 0;

        for sentence in sentences {
            if !current.is_empty() && current.len() + sentence.len() + 1 > char_size {
                let content = current.trim().to_string();
                let end = current_start + content.len();
                pieces.push(ChunkPiece::new(&content, index, current_start, end));
                index += 1;
                current_start = end;
                current.clear();
            }

            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(sentence);
        }

        if !current.is_empty() {
            let content = current.trim().to_string();
            let end = current_start + content.len();
            pieces.push(ChunkPiece::new(&content, index, current_start, end));
        }

        Ok(pieces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(size: usize) -> ChunkOptions {
        ChunkOptions {
            chunk_size: size,
            ..Default::default()
        }
    }

    #[test]
    fn test_packs_sentences_within_budget() {
        let text = "One sentence here. Another sentence follows. A third one ends. And a fourth.";
        // 10 tokens = 40 chars.
        let pieces = SemanticChunker::new().chunk(text, &opts(10)).unwrap();

        assert!(pieces.len() > 1);
        for piece in &pieces {
            // Each chunk holds whole sentences.
            assert!(!piece.content.is_empty());
        }
        assert!(pieces[0].content.starts_with("One sentence here."));
    }

    #[test]
    fn test_single_sentence_single_chunk() {
        let pieces = SemanticChunker::new()
            .chunk("Just one short sentence.", &opts(512))
            .unwrap();
        assert_eq!(pieces.len(), 1);
        assert_eq!(pieces[0].content, "Just one short sentence.");
    }

    #[test]
    fn test_offsets_non_decreasing() {
        let text = "Alpha beta. Gamma delta! Epsilon zeta? Eta theta. Iota kappa.";
        let pieces = SemanticChunker::new().chunk(text, &opts(5)).unwrap();

        let mut last_start = 0;
        for piece in &pieces {
            assert!(piece.start_offset >= last_start);
            assert!(piece.start_offset <= piece.end_offset);
            assert!(piece.end_offset <= text.len());
            last_start = piece.start_offset;
        }
    }

    #[test]
    fn test_terminators_kept_with_sentence() {
        let pieces = SemanticChunker::new()
            .chunk("What is this? It is a test.", &opts(4))
            .unwrap();
        assert_eq!(pieces[0].content, "What is this?");
        assert_eq!(pieces[1].content, "It is a test.");
    }

    #[test]
    fn test_empty_input() {
        assert!(SemanticChunker::new().chunk("  ", &opts(8)).unwrap().is_empty());
    }
}
