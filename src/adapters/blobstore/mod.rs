//! Blob store abstraction
//!
//! Attachments live in a blob store keyed by an opaque reference. The store's
//! implementation is an out-of-scope collaborator; the pipeline only needs a
//! byte stream per reference. [`FsBlobStore`] serves blobs from a directory,
//! one file per reference.

use crate::domain::{BlobRef, ExportError, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::io::AsyncRead;

/// Byte-stream source keyed by blob reference
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Opens a read stream for one blob
    ///
    /// # Errors
    ///
    /// Returns `BlobNotFound` for an unknown reference; any other failure to
    /// open the stream surfaces as an I/O error.
    async fn open_read(&self, blob_ref: &BlobRef) -> Result<Box<dyn AsyncRead + Send + Unpin>>;
}

/// Filesystem-backed blob store
///
/// Blob references are opaque file names directly under the root directory.
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    /// Creates a store serving blobs from `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn open_read(&self, blob_ref: &BlobRef) -> Result<Box<dyn AsyncRead + Send + Unpin>> {
        let path = self.root.join(blob_ref.as_str());
        match tokio::fs::File::open(&path).await {
            Ok(file) => Ok(Box::new(file)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ExportError::BlobNotFound(blob_ref.clone()))
            }
            Err(e) => Err(ExportError::Io(format!("opening blob {blob_ref}: {e}"))),
        }
    }
}
