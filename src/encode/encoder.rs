use base64::prelude::{Engine as _, BASE64_STANDARD};
use tracing::debug;

use super::FileHandle;
use crate::error::ClientError;

/// Result of encoding one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedFile {
    /// Name reported by the file handle
    pub name: String,

    /// Standard base64 (padded) of the full file contents
    pub contents_base64: String,

    /// Size of the raw contents in bytes
    pub size: usize,
}

/// Read `file` to completion and base64-encode its contents.
///
/// The file is read exactly once and buffered in memory. A failed read
/// surfaces as [`ClientError::ReadFailed`].
pub async fn encode_file<F>(file: &F) -> Result<EncodedFile, ClientError>
where
    F: FileHandle + ?Sized,
{
    let name = file.name().to_string();
    let bytes = file
        .read_all()
        .await
        .map_err(|e| ClientError::ReadFailed {
            name: name.clone(),
            message: e.to_string(),
        })?;

    debug!("Encoding '{}' ({} bytes)", name, bytes.len());

    Ok(EncodedFile {
        contents_base64: BASE64_STANDARD.encode(&bytes),
        size: bytes.len(),
        name,
    })
}
