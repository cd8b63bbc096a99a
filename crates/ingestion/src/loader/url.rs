//! URL loader

use async_trait::async_trait;
use std::sync::Arc;

use super::{LoadResult, Loader};
use weave_common::errors::{Error, Result};

/// Fetches content from a URL and delegates extraction to another loader.
///
/// The input bytes are the URL itself (`text/uri-list` content); the fetched
/// body is handed to the delegate for text extraction.
pub struct UrlLoader {
    client: reqwest::Client,
    delegate: Arc<dyn Loader>,
}

impl UrlLoader {
    /// Create a loader that extracts fetched content with the delegate.
    pub fn new(delegate: Arc<dyn Loader>) -> Self {
        Self {
            client: reqwest::Client::new(),
            delegate,
        }
    }

    /// Create a loader with a custom HTTP client.
    pub fn with_client(client: reqwest::Client, delegate: Arc<dyn Loader>) -> Self {
        Self { client, delegate }
    }

    /// Fetch a URL and extract content using the delegate loader.
    pub async fn load_url(&self, url: &str) -> Result<LoadResult> {
        let response = self.client.get(url).send().await.map_err(|e| Error::Load {
            message: format!("url {url}: {e}"),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Load {
                message: format!("url {url}: status {status}"),
            });
        }

        let body = response.bytes().await.map_err(|e| Error::Load {
            message: format!("url {url}: {e}"),
        })?;

        let mut result = self.delegate.load(&body).await?;
        result
            .metadata
            .insert("source_url".to_string(), url.to_string());
        Ok(result)
    }
}

#[async_trait]
impl Loader for UrlLoader {
    async fn load(&self, data: &[u8]) -> Result<LoadResult> {
        let url = String::from_utf8_lossy(data);
        let url = url.trim();
        if url.is_empty() {
            return Err(Error::Load {
                message: "url loader requires a URL as input".to_string(),
            });
        }
        self.load_url(url).await
    }

    fn supports(&self, mime_type: &str) -> bool {
        mime_type == "text/uri-list"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::TextLoader;

    #[test]
    fn test_supports_uri_list_only() {
        let loader = UrlLoader::new(Arc::new(TextLoader::new()));
        assert!(loader.supports("text/uri-list"));
        assert!(!loader.supports("text/plain"));
    }

    #[tokio::test]
    async fn test_empty_input_is_error() {
        let loader = UrlLoader::new(Arc::new(TextLoader::new()));
        let err = loader.load(b"  ").await.unwrap_err();
        assert!(err.to_string().contains("requires a URL"));
    }
}
