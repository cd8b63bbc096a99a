//! Context assembly
//!
//! Renders retrieved chunks into a single context string for an LLM prompt,
//! under a token budget, with citation tracking. The LLM call itself is not
//! Weave's concern; this is the last step before handing off.

use serde::{Deserialize, Serialize};

use crate::retrieval::Retrieved;
use weave_common::models::Metadata;

/// Estimates token counts for text.
pub trait TokenCounter: Send + Sync {
    fn count_tokens(&self, text: &str) -> usize;
}

/// Default estimator: ~4 characters per token.
#[derive(Debug, Default)]
pub struct SimpleTokenCounter;

impl TokenCounter for SimpleTokenCounter {
    fn count_tokens(&self, text: &str) -> usize {
        text.len() / 4
    }
}

/// Tracks token consumption against a budget.
pub struct BudgetManager<'a> {
    counter: &'a dyn TokenCounter,
    max_tokens: usize,
    used: usize,
}

impl<'a> BudgetManager<'a> {
    pub fn new(counter: &'a dyn TokenCounter, max_tokens: usize) -> Self {
        Self {
            counter,
            max_tokens,
            used: 0,
        }
    }

    /// Token count for the given text, per the configured counter.
    pub fn estimate_tokens(&self, text: &str) -> usize {
        self.counter.count_tokens(text)
    }

    /// Whether the given number of tokens fits in the remaining budget.
    pub fn can_fit(&self, tokens: usize) -> bool {
        self.used + tokens <= self.max_tokens
    }

    /// Add tokens to the used count.
    pub fn consume(&mut self, tokens: usize) {
        self.used += tokens;
    }

    /// Total tokens consumed so far.
    pub fn used(&self) -> usize {
        self.used
    }

    /// Tokens still available.
    pub fn remaining(&self) -> usize {
        self.max_tokens.saturating_sub(self.used)
    }
}

/// How retrieved chunks are formatted into context.
#[derive(Debug, Clone)]
pub struct Template {
    /// Prepended to the assembled context.
    pub header: String,
    /// Appended to the assembled context.
    pub footer: String,
    /// Placed between chunks.
    pub separator: String,
    /// Whether to prefix each chunk with its 1-based citation number.
    pub numbered: bool,
}

impl Default for Template {
    fn default() -> Self {
        Self {
            header: "Relevant context:\n\n".to_string(),
            footer: String::new(),
            separator: "\n\n---\n\n".to_string(),
            numbered: true,
        }
    }
}

impl Template {
    /// Format the chunks using this template.
    pub fn render(&self, chunks: &[String]) -> String {
        let mut out = String::new();
        out.push_str(&self.header);

        for (i, chunk) in chunks.iter().enumerate() {
            if i > 0 {
                out.push_str(&self.separator);
            }
            if self.numbered {
                out.push_str(&format!("[{}] ", i + 1));
            }
            out.push_str(chunk);
        }

        out.push_str(&self.footer);
        out
    }
}

/// Provenance of a chunk included in the assembled context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Citation {
    /// Position in the original retrieval results.
    pub chunk_index: usize,
    /// Chunk text.
    pub content: String,
    /// Retrieval relevance score.
    pub score: f64,
    /// Metadata from the source chunk.
    #[serde(default)]
    pub metadata: Metadata,
}

/// Assembled context and bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssembleResult {
    /// Context string for the LLM prompt.
    pub context: String,
    /// Chunks included, in inclusion order.
    pub citations: Vec<Citation>,
    /// Estimated total token count of included chunks.
    pub total_tokens: usize,
    /// Chunks dropped because they exceeded the remaining budget.
    pub truncated_count: usize,
}

/// Builds context strings from retrieved chunks within a token budget.
pub struct Assembler {
    template: Template,
    counter: Box<dyn TokenCounter>,
    max_tokens: usize,
}

impl Assembler {
    pub fn new() -> Self {
        Self {
            template: Template::default(),
            counter: Box::new(SimpleTokenCounter),
            max_tokens: 4096,
        }
    }

    pub fn with_template(mut self, template: Template) -> Self {
        self.template = template;
        self
    }

    pub fn with_token_counter(mut self, counter: Box<dyn TokenCounter>) -> Self {
        self.counter = counter;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Assemble a context string from retrieval results. Chunks are taken in
    /// result order; any chunk that would blow the budget is skipped and
    /// counted as truncated.
    pub fn assemble(&self, results: &[Retrieved]) -> AssembleResult {
        let mut budget = BudgetManager::new(self.counter.as_ref(), self.max_tokens);
        let mut included: Vec<String> = Vec::new();
        let mut citations: Vec<Citation> = Vec::new();
        let mut truncated = 0;

        for (i, result) in results.iter().enumerate() {
            let tokens = budget.estimate_tokens(&result.chunk.content);
            if !budget.can_fit(tokens) {
                truncated += 1;
                continue;
            }

            budget.consume(tokens);
            included.push(result.chunk.content.clone());
            citations.push(Citation {
                chunk_index: i,
                content: result.chunk.content.clone(),
                score: result.score,
                metadata: result.chunk.metadata.clone(),
            });
        }

        AssembleResult {
            context: self.template.render(&included),
            citations,
            total_tokens: budget.used(),
            truncated_count: truncated,
        }
    }
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new()
    }
}

/// Join chunk contents with a plain separator, no budgeting.
pub fn assemble_simple(results: &[Retrieved]) -> String {
    results
        .iter()
        .map(|r| r.chunk.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n---\n\n")
}
