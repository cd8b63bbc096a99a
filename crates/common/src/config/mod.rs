//! Engine configuration
//!
//! Supports loading configuration from:
//! - TOML configuration files
//! - Environment variables (prefixed with WEAVE__)
//! - Default values

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the Weave engine
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Target chunk size in tokens when the collection does not specify one
    #[serde(default = "default_chunk_size")]
    pub default_chunk_size: usize,

    /// Overlap between chunks in tokens when the collection does not specify one
    #[serde(default = "default_chunk_overlap")]
    pub default_chunk_overlap: usize,

    /// Embedding model name stamped on new collections
    #[serde(default = "default_embedding_model")]
    pub default_embedding_model: String,

    /// Chunking strategy stamped on new collections
    #[serde(default = "default_chunk_strategy")]
    pub default_chunk_strategy: String,

    /// Default number of results for retrieval
    #[serde(default = "default_top_k")]
    pub default_top_k: usize,

    /// Maximum time to wait for graceful shutdown, in seconds
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,

    /// Maximum number of documents processed concurrently during batch
    /// ingestion. Reserved: batch ingestion currently runs sequentially.
    #[serde(default = "default_ingest_concurrency")]
    pub ingest_concurrency: usize,
}

fn default_chunk_size() -> usize { 512 }
fn default_chunk_overlap() -> usize { 50 }
fn default_embedding_model() -> String { crate::DEFAULT_EMBEDDING_MODEL.to_string() }
fn default_chunk_strategy() -> String { crate::DEFAULT_CHUNK_STRATEGY.to_string() }
fn default_top_k() -> usize { 10 }
fn default_shutdown_timeout() -> u64 { 30 }
fn default_ingest_concurrency() -> usize { 4 }

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_chunk_size: default_chunk_size(),
            default_chunk_overlap: default_chunk_overlap(),
            default_embedding_model: default_embedding_model(),
            default_chunk_strategy: default_chunk_strategy(),
            default_top_k: default_top_k(),
            shutdown_timeout_secs: default_shutdown_timeout(),
            ingest_concurrency: default_ingest_concurrency(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from files and environment
    ///
    /// Reads `config/weave.toml` if present, then applies `WEAVE__`-prefixed
    /// environment variables (e.g. `WEAVE__DEFAULT_TOP_K=20`).
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name("config/weave").required(false))
            .add_source(
                Environment::with_prefix("WEAVE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load from a specific TOML file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name(path))
            .add_source(
                Environment::with_prefix("WEAVE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Get the shutdown timeout as a Duration
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}
