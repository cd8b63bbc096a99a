//! HTML loader

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

use super::{LoadResult, Loader};
use weave_common::errors::Result;
use weave_common::models::Metadata;

static RE_SCRIPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style|noscript)\b[^>]*>.*?</(script|style|noscript)>")
        .expect("script regex")
});
static RE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("comment regex"));
static RE_BLOCK_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</(p|div|h[1-6]|li|tr)>|<br\s*/?>").expect("block regex")
});
static RE_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag regex"));
static RE_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]+").expect("space regex"));
static RE_BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{2,}").expect("blank line regex"));

/// Extracts text from HTML, dropping script/style content and replacing
/// block-element boundaries with newlines.
#[derive(Debug, Default)]
pub struct HtmlLoader;

impl HtmlLoader {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Loader for HtmlLoader {
    async fn load(&self, data: &[u8]) -> Result<LoadResult> {
        let text = String::from_utf8_lossy(data);

        let text = RE_SCRIPT.replace_all(&text, "");
        let text = RE_COMMENT.replace_all(&text, "");
        let text = RE_BLOCK_END.replace_all(&text, "\n");
        let text = RE_TAG.replace_all(&text, " ");
        let text = decode_entities(&text);
        let text = RE_SPACE.replace_all(&text, " ");

        let trimmed: String = text
            .lines()
            .map(str::trim)
            .collect::<Vec<_>>()
            .join("\n");
        let text = RE_BLANK_LINES.replace_all(&trimmed, "\n");

        Ok(LoadResult {
            content: text.trim().to_string(),
            metadata: Metadata::new(),
            mime_type: "text/html".to_string(),
        })
    }

    fn supports(&self, mime_type: &str) -> bool {
        mime_type == "text/html" || mime_type == "application/xhtml+xml"
    }
}

/// Decode the handful of entities that matter for extracted prose.
fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
}
