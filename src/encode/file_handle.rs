use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;

/// A user-selected file whose contents are only reachable through an async read.
///
/// The encoder borrows a handle for the duration of one read; ownership stays
/// with the caller.
#[async_trait]
pub trait FileHandle: Send + Sync {
    /// File name as presented to the backend (no directory components).
    fn name(&self) -> &str;

    /// Read the entire contents in one shot.
    async fn read_all(&self) -> std::io::Result<Bytes>;
}

/// A file on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalFile {
    path: PathBuf,
    name: String,
}

impl LocalFile {
    /// Create a handle for `path`. The file is not touched until it is read.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self { path, name }
    }

    /// Override the name sent to the backend.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl FileHandle for LocalFile {
    fn name(&self) -> &str {
        &self.name
    }

    async fn read_all(&self) -> std::io::Result<Bytes> {
        tokio::fs::read(&self.path).await.map(Bytes::from)
    }
}

/// A file already held in memory.
#[derive(Debug, Clone)]
pub struct MemoryFile {
    name: String,
    data: Bytes,
}

impl MemoryFile {
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }
}

#[async_trait]
impl FileHandle for MemoryFile {
    fn name(&self) -> &str {
        &self.name
    }

    async fn read_all(&self) -> std::io::Result<Bytes> {
        Ok(self.data.clone())
    }
}
