//! Markdown loader

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

use super::{LoadResult, Loader};
use weave_common::errors::Result;
use weave_common::models::Metadata;

static RE_CODE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```[^`]*```").expect("code block regex"));
static RE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`{1,3}[^`]*`{1,3}").expect("inline code regex"));
static RE_IMAGES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[([^\]]*)\]\([^)]+\)").expect("image regex"));
static RE_LINKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").expect("link regex"));
static RE_HEADERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#{1,6}\s+").expect("header regex"));
static RE_BOLD_ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*{1,3}([^*]+)\*{1,3}").expect("emphasis regex"));
static RE_HR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[-*_]{3,}\s*$").expect("rule regex"));
static RE_LIST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*[-*+]\s+").expect("list regex"));
static RE_NUM_LIST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*\d+\.\s+").expect("numbered list regex"));

/// Strips Markdown formatting and returns plain text.
#[derive(Debug, Default)]
pub struct MarkdownLoader;

impl MarkdownLoader {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Loader for MarkdownLoader {
    async fn load(&self, data: &[u8]) -> Result<LoadResult> {
        let text = String::from_utf8_lossy(data);

        let text = RE_CODE_BLOCK.replace_all(&text, "");
        let text = RE_CODE.replace_all(&text, "");
        let text = RE_IMAGES.replace_all(&text, "$1");
        let text = RE_LINKS.replace_all(&text, "$1");
        let text = RE_HEADERS.replace_all(&text, "");
        let text = RE_BOLD_ITALIC.replace_all(&text, "$1");
        let text = RE_HR.replace_all(&text, "");
        let text = RE_LIST_MARKER.replace_all(&text, "");
        let text = RE_NUM_LIST.replace_all(&text, "");

        Ok(LoadResult {
            content: text.trim().to_string(),
            metadata: Metadata::new(),
            mime_type: "text/markdown".to_string(),
        })
    }

    fn supports(&self, mime_type: &str) -> bool {
        mime_type == "text/markdown" || mime_type == "text/x-markdown"
    }
}
