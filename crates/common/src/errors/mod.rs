//! Error types for the Weave engine
//!
//! Provides the full error taxonomy shared by all crates:
//! - Distinct variants for missing collaborators, not-found, conflicts, and state errors
//! - Stage-tagged wrapping for infrastructure failures
//! - HTTP status mapping so an HTTP façade can translate without inspecting variants
//! - Error codes for machine-readable client handling

use crate::id::Id;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using the Weave [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Error codes for machine-readable error identification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Missing collaborators (1xxx)
    NoStore,
    NoEmbedder,
    NoVectorStore,
    NoChunker,
    NoRetriever,

    // Not found (4xxx)
    CollectionNotFound,
    DocumentNotFound,
    ChunkNotFound,
    IngestJobNotFound,

    // Conflicts (5xxx)
    CollectionAlreadyExists,
    DocumentAlreadyExists,
    DuplicateDocument,

    // State (6xxx)
    InvalidState,
    EmptyContent,
    InvalidId,

    // Infrastructure (7xxx)
    StoreError,
    StoreClosed,
    MigrationFailed,
    VectorStoreError,
    EmbeddingError,
    ChunkingError,
    LoadError,
    IngestFailed,
    InternalError,
}

impl ErrorCode {
    /// Get the numeric code for this error
    pub fn as_code(&self) -> u16 {
        match self {
            ErrorCode::NoStore => 1001,
            ErrorCode::NoEmbedder => 1002,
            ErrorCode::NoVectorStore => 1003,
            ErrorCode::NoChunker => 1004,
            ErrorCode::NoRetriever => 1005,

            ErrorCode::CollectionNotFound => 4001,
            ErrorCode::DocumentNotFound => 4002,
            ErrorCode::ChunkNotFound => 4003,
            ErrorCode::IngestJobNotFound => 4004,

            ErrorCode::CollectionAlreadyExists => 5001,
            ErrorCode::DocumentAlreadyExists => 5002,
            ErrorCode::DuplicateDocument => 5003,

            ErrorCode::InvalidState => 6001,
            ErrorCode::EmptyContent => 6002,
            ErrorCode::InvalidId => 6003,

            ErrorCode::StoreError => 7001,
            ErrorCode::StoreClosed => 7002,
            ErrorCode::MigrationFailed => 7003,
            ErrorCode::VectorStoreError => 7004,
            ErrorCode::EmbeddingError => 7005,
            ErrorCode::ChunkingError => 7006,
            ErrorCode::LoadError => 7007,
            ErrorCode::IngestFailed => 7008,
            ErrorCode::InternalError => 7999,
        }
    }
}

/// Weave error taxonomy
#[derive(Error, Debug)]
pub enum Error {
    // Missing collaborators
    #[error("weave: no store configured")]
    NoStore,

    #[error("weave: no embedder configured")]
    NoEmbedder,

    #[error("weave: no vector store configured")]
    NoVectorStore,

    #[error("weave: no chunker configured")]
    NoChunker,

    #[error("weave: no retriever or embedder+vectorstore configured")]
    NoRetriever,

    // Not found
    #[error("weave: collection not found")]
    CollectionNotFound,

    #[error("weave: document not found")]
    DocumentNotFound,

    #[error("weave: chunk not found")]
    ChunkNotFound,

    #[error("weave: ingest job not found")]
    IngestJobNotFound,

    // Conflicts
    #[error("weave: collection already exists")]
    CollectionAlreadyExists,

    #[error("weave: document already exists")]
    DocumentAlreadyExists,

    #[error("weave: duplicate document (same content hash)")]
    DuplicateDocument,

    // State
    #[error("weave: invalid state transition")]
    InvalidState,

    #[error("weave: empty content")]
    EmptyContent,

    #[error("weave: invalid id: {message}")]
    InvalidId { message: String },

    // Infrastructure
    #[error("weave: store: {message}")]
    Store { message: String },

    #[error("weave: store closed")]
    StoreClosed,

    #[error("weave: migration failed: {message}")]
    MigrationFailed { message: String },

    #[error("weave: vector store: {message}")]
    VectorStore { message: String },

    #[error("weave: embedding: {message}")]
    Embedding { message: String },

    #[error("weave: chunking: {message}")]
    Chunking { message: String },

    #[error("weave: load: {message}")]
    Load { message: String },

    /// A pipeline stage failed; carries the stage label so callers see
    /// `weave: <stage>: <underlying>`.
    #[error("weave: {stage}: {source}")]
    Stage {
        stage: &'static str,
        #[source]
        source: Box<Error>,
    },

    /// Ingest failed after the document record was created. Carries the
    /// document id so callers can observe the failed document alongside
    /// the wrapped cause.
    #[error("weave: ingest failed: {source}")]
    IngestFailed {
        document_id: Id,
        #[source]
        source: Box<Error>,
    },

    #[error("weave: {message}")]
    Internal { message: String },
}

impl Error {
    /// Wrap an error with a pipeline stage label.
    pub fn stage(stage: &'static str, source: Error) -> Self {
        Error::Stage {
            stage,
            source: Box::new(source),
        }
    }

    /// Get the error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::NoStore => ErrorCode::NoStore,
            Error::NoEmbedder => ErrorCode::NoEmbedder,
            Error::NoVectorStore => ErrorCode::NoVectorStore,
            Error::NoChunker => ErrorCode::NoChunker,
            Error::NoRetriever => ErrorCode::NoRetriever,
            Error::CollectionNotFound => ErrorCode::CollectionNotFound,
            Error::DocumentNotFound => ErrorCode::DocumentNotFound,
            Error::ChunkNotFound => ErrorCode::ChunkNotFound,
            Error::IngestJobNotFound => ErrorCode::IngestJobNotFound,
            Error::CollectionAlreadyExists => ErrorCode::CollectionAlreadyExists,
            Error::DocumentAlreadyExists => ErrorCode::DocumentAlreadyExists,
            Error::DuplicateDocument => ErrorCode::DuplicateDocument,
            Error::InvalidState => ErrorCode::InvalidState,
            Error::EmptyContent => ErrorCode::EmptyContent,
            Error::InvalidId { .. } => ErrorCode::InvalidId,
            Error::Store { .. } => ErrorCode::StoreError,
            Error::StoreClosed => ErrorCode::StoreClosed,
            Error::MigrationFailed { .. } => ErrorCode::MigrationFailed,
            Error::VectorStore { .. } => ErrorCode::VectorStoreError,
            Error::Embedding { .. } => ErrorCode::EmbeddingError,
            Error::Chunking { .. } => ErrorCode::ChunkingError,
            Error::Load { .. } => ErrorCode::LoadError,
            Error::Stage { source, .. } => source.code(),
            Error::IngestFailed { .. } => ErrorCode::IngestFailed,
            Error::Internal { .. } => ErrorCode::InternalError,
        }
    }

    /// Get the HTTP status code an HTTP façade should map this error to.
    pub fn http_status(&self) -> u16 {
        match self {
            // 400 Bad Request
            Error::EmptyContent | Error::InvalidId { .. } | Error::InvalidState => 400,

            // 404 Not Found
            Error::CollectionNotFound
            | Error::DocumentNotFound
            | Error::ChunkNotFound
            | Error::IngestJobNotFound => 404,

            // 409 Conflict
            Error::CollectionAlreadyExists
            | Error::DocumentAlreadyExists
            | Error::DuplicateDocument => 409,

            // Wrapped errors map through to the underlying cause.
            Error::Stage { source, .. } | Error::IngestFailed { source, .. } => {
                source.http_status()
            }

            // 502 Bad Gateway for upstream embedding failures
            Error::Embedding { .. } => 502,

            // 500 for everything infrastructure-shaped
            Error::NoStore
            | Error::NoEmbedder
            | Error::NoVectorStore
            | Error::NoChunker
            | Error::NoRetriever
            | Error::Store { .. }
            | Error::StoreClosed
            | Error::MigrationFailed { .. }
            | Error::VectorStore { .. }
            | Error::Chunking { .. }
            | Error::Load { .. }
            | Error::Internal { .. } => 500,
        }
    }

    /// Check if this error is a not-found sentinel
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::CollectionNotFound
                | Error::DocumentNotFound
                | Error::ChunkNotFound
                | Error::IngestJobNotFound
        )
    }

    /// Check if this error is a conflict
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Error::CollectionAlreadyExists
                | Error::DocumentAlreadyExists
                | Error::DuplicateDocument
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::Prefix;

    #[test]
    fn test_error_code_mapping() {
        let err = Error::CollectionNotFound;
        assert_eq!(err.code(), ErrorCode::CollectionNotFound);
        assert_eq!(err.http_status(), 404);
        assert!(err.is_not_found());
    }

    #[test]
    fn test_conflict_mapping() {
        let err = Error::DuplicateDocument;
        assert_eq!(err.http_status(), 409);
        assert!(err.is_conflict());
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_stage_wrapping() {
        let err = Error::stage("embed", Error::Embedding {
            message: "connection refused".into(),
        });
        assert_eq!(err.to_string(), "weave: embed: weave: embedding: connection refused");
        assert_eq!(err.code(), ErrorCode::EmbeddingError);
        assert_eq!(err.http_status(), 502);
    }

    #[test]
    fn test_ingest_failed_carries_document_id() {
        let doc_id = Id::new(Prefix::Document);
        let err = Error::IngestFailed {
            document_id: doc_id.clone(),
            source: Box::new(Error::stage("chunk", Error::Chunking {
                message: "bad input".into(),
            })),
        };
        match &err {
            Error::IngestFailed { document_id, .. } => assert_eq!(*document_id, doc_id),
            _ => unreachable!(),
        }
        assert!(err.to_string().starts_with("weave: ingest failed:"));
    }
}
