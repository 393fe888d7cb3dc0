//! Result type alias for the export pipeline

use super::errors::ExportError;

/// Result type alias using [`ExportError`] as the error type
pub type Result<T> = std::result::Result<T, ExportError>;
