//! Domain error types
//!
//! Error taxonomy for the export pipeline. Fatal errors unwind the whole
//! export with staging cleanup guaranteed; retrieval failures are per
//! attachment and recorded as warnings instead of aborting.

use crate::domain::ids::{BlobRef, PlanId};
use thiserror::Error;

/// Main export error type
///
/// This is the primary error type used throughout the pipeline. Each variant
/// maps to the stage that produced it, so callers can report which stage
/// failed without inspecting message text.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The requested master plan does not exist
    #[error("Master plan not found: {0}")]
    PlanNotFound(PlanId),

    /// Data-source read error while building the report tree
    #[error("Report assembly failed: {0}")]
    AssemblyFailed(String),

    /// Rendering engine or content error - fatal to the export
    #[error("Document rendering failed: {0}")]
    RenderFailed(String),

    /// Per-attachment retrieval error - non-fatal, recorded and skipped
    #[error("Attachment retrieval failed for {attachment}: {reason}")]
    RetrievalFailed { attachment: String, reason: String },

    /// The blob store holds no blob for the reference
    #[error("Blob not found: {0}")]
    BlobNotFound(BlobRef),

    /// Archive writer error - fatal, no partial archive is produced
    #[error("Archive packaging failed: {0}")]
    PackagingFailed(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ExportError {
    /// Name of the pipeline stage this error belongs to
    ///
    /// Used at the CLI boundary so a failed export names the stage that
    /// failed in its message.
    pub fn stage(&self) -> &'static str {
        match self {
            ExportError::Configuration(_) => "configuration",
            ExportError::PlanNotFound(_) | ExportError::AssemblyFailed(_) => "assembly",
            ExportError::RenderFailed(_) => "rendering",
            ExportError::RetrievalFailed { .. } | ExportError::BlobNotFound(_) => "retrieval",
            ExportError::PackagingFailed(_) => "packaging",
            ExportError::Io(_) => "io",
            ExportError::Serialization(_) => "serialization",
        }
    }

    /// Whether this error aborts the whole export
    ///
    /// Only per-attachment retrieval failures are survivable; everything
    /// else unwinds the export before an archive is produced.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            ExportError::RetrievalFailed { .. } | ExportError::BlobNotFound(_)
        )
    }
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        ExportError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for ExportError {
    fn from(err: toml::de::Error) -> Self {
        ExportError::Configuration(format!("TOML parse error: {err}"))
    }
}
