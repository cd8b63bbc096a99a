//! Weave search library
//!
//! Retrieval strategies over the vector-store contract:
//! - Similarity (plain cosine top-K)
//! - MMR (diversity-aware re-ranking)
//! - Reranked (cross-encoder style rescoring)
//! - Hybrid (reciprocal rank fusion over several retrievers)
//!
//! Plus the context assembler that renders retrieved chunks into a
//! token-budgeted prompt context.

pub mod assembler;
pub mod retrieval;

pub use assembler::{AssembleResult, Assembler, BudgetManager, Citation, Template, TokenCounter};
pub use retrieval::{
    HybridRetriever, MmrRetriever, Reranker, RerankedRetriever, Retrieved, RetrieveOptions,
    Retriever, SimilarityRetriever,
};
