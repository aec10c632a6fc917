//! Binary-to-text encoding of files selected for upload.
//!
//! Uploads carry file contents as base64 text inside a JSON body, never as raw
//! bytes. [`encode_file`] performs the single read-to-completion and the
//! encoding; the dependent POST is only built from its result.

mod encoder;
mod file_handle;

pub use encoder::{encode_file, EncodedFile};
pub use file_handle::{FileHandle, LocalFile, MemoryFile};
