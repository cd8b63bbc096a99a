//! Format-typed text extraction
//!
//! Loaders turn raw document bytes into plain text for the chunking stage.
//! The engine calls [`Loader::load`] only when [`Loader::supports`] returns
//! true for the document's MIME hint.

mod csv;
mod directory;
mod html;
mod json;
mod markdown;
mod text;
mod url;

pub use csv::CsvLoader;
pub use directory::DirectoryLoader;
pub use html::HtmlLoader;
pub use json::JsonLoader;
pub use markdown::MarkdownLoader;
pub use text::TextLoader;
pub use url::UrlLoader;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use weave_common::errors::Result;
use weave_common::models::Metadata;

/// Extracted text and metadata from a loaded document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoadResult {
    /// Extracted text content
    pub content: String,
    /// Format-specific metadata (e.g. row counts, source url)
    #[serde(default)]
    pub metadata: Metadata,
    /// Detected MIME type of the source document
    #[serde(default)]
    pub mime_type: String,
}

/// Extracts text content from a document source.
#[async_trait]
pub trait Loader: Send + Sync {
    /// Extract text from raw document bytes.
    async fn load(&self, data: &[u8]) -> Result<LoadResult>;

    /// Whether this loader can handle the given MIME type.
    fn supports(&self, mime_type: &str) -> bool;
}

/// Dispatches to the first registered loader that supports the MIME type.
pub struct FormatLoader {
    loaders: Vec<Box<dyn Loader>>,
}

impl FormatLoader {
    /// Create an empty dispatcher.
    pub fn new() -> Self {
        Self { loaders: Vec::new() }
    }

    /// Create a dispatcher pre-loaded with the standard format loaders
    /// (text, markdown, HTML, JSON, CSV).
    pub fn with_defaults() -> Self {
        let mut loader = Self::new();
        loader.register(Box::new(TextLoader::new()));
        loader.register(Box::new(MarkdownLoader::new()));
        loader.register(Box::new(HtmlLoader::new()));
        loader.register(Box::new(JsonLoader::new()));
        loader.register(Box::new(CsvLoader::new()));
        loader
    }

    /// Register an additional loader. Earlier registrations win on overlap.
    pub fn register(&mut self, loader: Box<dyn Loader>) {
        self.loaders.push(loader);
    }

    fn find(&self, mime_type: &str) -> Option<&dyn Loader> {
        self.loaders
            .iter()
            .find(|l| l.supports(mime_type))
            .map(|l| l.as_ref())
    }

    /// Extract text using the loader registered for the MIME type.
    pub async fn load_as(&self, mime_type: &str, data: &[u8]) -> Result<LoadResult> {
        match self.find(mime_type) {
            Some(loader) => loader.load(data).await,
            None => Err(weave_common::errors::Error::Load {
                message: format!("no loader for mime type {mime_type:?}"),
            }),
        }
    }
}

impl Default for FormatLoader {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[async_trait]
impl Loader for FormatLoader {
    async fn load(&self, data: &[u8]) -> Result<LoadResult> {
        // Without a MIME hint, treat the input as plain text.
        self.load_as("text/plain", data).await
    }

    fn supports(&self, mime_type: &str) -> bool {
        self.find(mime_type).is_some()
    }
}

/// MIME type for common file extensions; empty when unknown.
pub(crate) fn mime_from_ext(ext: &str) -> &'static str {
    match ext.to_ascii_lowercase().as_str() {
        "md" | "markdown" => "text/markdown",
        "csv" => "text/csv",
        "json" => "application/json",
        "html" | "htm" => "text/html",
        "txt" | "text" | "log" => "text/plain",
        _ => "",
    }
}
