//! JSON loader

use async_trait::async_trait;
use serde_json::Value;

use super::{LoadResult, Loader};
use weave_common::errors::{Error, Result};
use weave_common::models::Metadata;

/// Extracts text content from JSON documents, optionally restricted to
/// specific fields.
#[derive(Debug, Default)]
pub struct JsonLoader {
    /// Fields to extract. Empty means extract all leaf values.
    fields: Vec<String>,
}

impl JsonLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict extraction to the named object fields.
    pub fn with_fields(fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl Loader for JsonLoader {
    async fn load(&self, data: &[u8]) -> Result<LoadResult> {
        let value: Value = serde_json::from_slice(data).map_err(|e| Error::Load {
            message: format!("json: {e}"),
        })?;

        let mut out = String::new();
        if self.fields.is_empty() {
            extract_all(&value, &mut out);
        } else {
            extract_fields(&value, &self.fields, &mut out);
        }

        Ok(LoadResult {
            content: out.trim().to_string(),
            metadata: Metadata::new(),
            mime_type: "application/json".to_string(),
        })
    }

    fn supports(&self, mime_type: &str) -> bool {
        mime_type == "application/json"
    }
}

fn extract_fields(value: &Value, fields: &[String], out: &mut String) {
    match value {
        Value::Object(map) => {
            for field in fields {
                if let Some(v) = map.get(field) {
                    push_scalar(v, out);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                extract_fields(item, fields, out);
            }
        }
        _ => {}
    }
}

fn extract_all(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            for v in map.values() {
                extract_all(v, out);
            }
        }
        Value::Array(items) => {
            for item in items {
                extract_all(item, out);
            }
        }
        _ => push_scalar(value, out),
    }
}

fn push_scalar(value: &Value, out: &mut String) {
    match value {
        Value::String(s) => {
            out.push_str(s);
            out.push('\n');
        }
        Value::Number(n) => {
            out.push_str(&n.to_string());
            out.push('\n');
        }
        Value::Bool(b) => {
            out.push_str(if *b { "true" } else { "false" });
            out.push('\n');
        }
        Value::Null => {}
        // Nested containers selected by field name flatten recursively.
        other => extract_all(other, out),
    }
}
