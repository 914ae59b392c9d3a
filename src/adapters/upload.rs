use crate::core::UploadedFile;
use crate::utils::error::Result;
use std::path::{Path, PathBuf};

/// Guesses a content type from the file extension, the way a browser labels an upload.
pub fn guess_mime_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("json") => "application/json",
        Some("csv") => "text/csv",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

/// A file on disk presented as an upload.
#[derive(Debug, Clone)]
pub struct LocalFile {
    path: PathBuf,
    mime_type: String,
}

impl LocalFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mime_type = guess_mime_type(&path).to_string();
        Self { path, mime_type }
    }

    pub fn with_mime_type(path: impl Into<PathBuf>, mime_type: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            mime_type: mime_type.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl UploadedFile for LocalFile {
    fn mime_type(&self) -> &str {
        &self.mime_type
    }

    async fn text(&self) -> Result<String> {
        let text = tokio::fs::read_to_string(&self.path).await?;
        Ok(text)
    }
}

/// An upload whose content is already in memory.
#[derive(Debug, Clone)]
pub struct InMemoryFile {
    mime_type: String,
    content: String,
}

impl InMemoryFile {
    pub fn new(mime_type: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            content: content.into(),
        }
    }

    pub fn json(content: impl Into<String>) -> Self {
        Self::new("application/json", content)
    }
}

impl UploadedFile for InMemoryFile {
    fn mime_type(&self) -> &str {
        &self.mime_type
    }

    async fn text(&self) -> Result<String> {
        Ok(self.content.clone())
    }
}
