//! CSV loader

use async_trait::async_trait;

use super::{LoadResult, Loader};
use weave_common::errors::Result;
use weave_common::models::Metadata;

/// Loads CSV content, joining each row's cells into a line of text.
#[derive(Debug)]
pub struct CsvLoader {
    /// Separator placed between cells in the output.
    separator: String,
}

impl CsvLoader {
    pub fn new() -> Self {
        Self {
            separator: " | ".to_string(),
        }
    }

    pub fn with_separator(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
        }
    }
}

impl Default for CsvLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Loader for CsvLoader {
    async fn load(&self, data: &[u8]) -> Result<LoadResult> {
        let text = String::from_utf8_lossy(data);
        let records = parse_csv(&text);

        let mut out = String::new();
        for row in &records {
            out.push_str(&row.join(&self.separator));
            out.push('\n');
        }

        let mut metadata = Metadata::new();
        metadata.insert("row_count".to_string(), records.len().to_string());

        Ok(LoadResult {
            content: out.trim().to_string(),
            metadata,
            mime_type: "text/csv".to_string(),
        })
    }

    fn supports(&self, mime_type: &str) -> bool {
        mime_type == "text/csv"
    }
}

/// Minimal CSV parser: comma-separated cells, double-quote quoting with `""`
/// escapes, rows on line breaks. Variable column counts are allowed.
fn parse_csv(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    cell.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' if cell.is_empty() => in_quotes = true,
            ',' if !in_quotes => {
                row.push(std::mem::take(&mut cell));
            }
            '\r' if !in_quotes => {}
            '\n' if !in_quotes => {
                row.push(std::mem::take(&mut cell));
                if row.iter().any(|c| !c.is_empty()) {
                    rows.push(std::mem::take(&mut row));
                } else {
                    row.clear();
                }
            }
            _ => cell.push(c),
        }
    }

    if !cell.is_empty() || !row.is_empty() {
        row.push(cell);
        if row.iter().any(|c| !c.is_empty()) {
            rows.push(row);
        }
    }

    rows
}
