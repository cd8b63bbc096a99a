//! Directory loader

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use walkdir::WalkDir;

use super::{mime_from_ext, LoadResult, Loader};
use weave_common::errors::{Error, Result};

/// Recursively walks a directory and loads each supported file through the
/// registered delegate loaders. Unsupported files are skipped.
pub struct DirectoryLoader {
    loaders: Vec<Arc<dyn Loader>>,
}

impl DirectoryLoader {
    pub fn new(loaders: Vec<Arc<dyn Loader>>) -> Self {
        Self { loaders }
    }

    /// Walk `dir` and return one load result per supported file, in
    /// traversal order. Each result carries a `source_path` metadata key.
    pub async fn load_dir(&self, dir: impl AsRef<Path>) -> Result<Vec<LoadResult>> {
        let mut results = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).sort_by_file_name() {
            let entry = entry.map_err(|e| Error::Load {
                message: format!("directory: {e}"),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let mime = path
                .extension()
                .and_then(|e| e.to_str())
                .map(mime_from_ext)
                .unwrap_or("");
            if mime.is_empty() {
                continue;
            }

            let Some(loader) = self.find(mime) else {
                continue;
            };

            let data = tokio::fs::read(path).await.map_err(|e| Error::Load {
                message: format!("directory {}: {e}", path.display()),
            })?;

            let mut result = loader.load(&data).await.map_err(|e| Error::Load {
                message: format!("directory {}: {e}", path.display()),
            })?;
            result
                .metadata
                .insert("source_path".to_string(), path.display().to_string());
            results.push(result);
        }

        Ok(results)
    }

    fn find(&self, mime_type: &str) -> Option<&Arc<dyn Loader>> {
        self.loaders.iter().find(|l| l.supports(mime_type))
    }
}

#[async_trait]
impl Loader for DirectoryLoader {
    /// Not supported: directories have no byte stream. Use
    /// [`DirectoryLoader::load_dir`].
    async fn load(&self, _data: &[u8]) -> Result<LoadResult> {
        Err(Error::Load {
            message: "directory loader requires a path; use load_dir".to_string(),
        })
    }

    fn supports(&self, _mime_type: &str) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{MarkdownLoader, TextLoader};

    #[tokio::test]
    async fn test_loads_supported_files_and_skips_rest() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "plain file").unwrap();
        std::fs::write(dir.path().join("b.md"), "# Heading\n\nbody").unwrap();
        std::fs::write(dir.path().join("c.bin"), [0u8, 1, 2]).unwrap();

        let loader = DirectoryLoader::new(vec![
            Arc::new(TextLoader::new()),
            Arc::new(MarkdownLoader::new()),
        ]);

        let results = loader.load_dir(dir.path()).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].content, "plain file");
        assert_eq!(results[1].content, "Heading\n\nbody");
        assert!(results[0].metadata.get("source_path").unwrap().ends_with("a.txt"));
    }

    #[tokio::test]
    async fn test_direct_load_is_error() {
        let loader = DirectoryLoader::new(vec![]);
        assert!(loader.load(b"x").await.is_err());
    }
}
