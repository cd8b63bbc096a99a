//! Plain text loader

use async_trait::async_trait;

use super::{LoadResult, Loader};
use weave_common::errors::Result;
use weave_common::models::Metadata;

/// Passes plain text through unchanged.
#[derive(Debug, Default)]
pub struct TextLoader;

impl TextLoader {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Loader for TextLoader {
    async fn load(&self, data: &[u8]) -> Result<LoadResult> {
        Ok(LoadResult {
            content: String::from_utf8_lossy(data).into_owned(),
            metadata: Metadata::new(),
            mime_type: "text/plain".to_string(),
        })
    }

    fn supports(&self, mime_type: &str) -> bool {
        mime_type == "text/plain" || mime_type.is_empty()
    }
}
