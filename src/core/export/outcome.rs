//! Export outcome and warning reporting

use crate::domain::PlanId;
use std::path::PathBuf;
use std::time::Duration;

/// A recorded, non-fatal attachment retrieval failure
///
/// The export continues without the file; the rendered documents remain
/// valid. Fields are plain strings so a warning can still be reported when a
/// retrieval task fails before its identifiers are known.
#[derive(Debug, Clone)]
pub struct RetrievalWarning {
    pub objection_id: String,
    pub attachment_id: String,
    pub filename: String,
    pub reason: String,
}

/// Result of a completed export
#[derive(Debug, Clone)]
pub struct ExportOutcome {
    /// Plan the report covers
    pub plan_id: PlanId,

    /// Path of the produced archive
    pub archive_path: PathBuf,

    /// Number of objections in the report
    pub objections: usize,

    /// Number of attachment retrievals that were scheduled
    pub attachments_scheduled: usize,

    /// Non-fatal retrieval failures, surfaced alongside the archive
    pub warnings: Vec<RetrievalWarning>,

    /// Duration of the export
    pub duration: Duration,
}

impl ExportOutcome {
    /// Number of attachments that made it into the archive
    pub fn attachments_retrieved(&self) -> usize {
        self.attachments_scheduled.saturating_sub(self.warnings.len())
    }

    /// Whether every scheduled retrieval succeeded
    pub fn is_complete(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Logs the outcome, one WARN line per recorded retrieval failure
    pub fn log_summary(&self) {
        tracing::info!(
            plan_id = %self.plan_id,
            archive = %self.archive_path.display(),
            objections = self.objections,
            attachments_retrieved = self.attachments_retrieved(),
            attachments_failed = self.warnings.len(),
            duration_ms = self.duration.as_millis() as u64,
            "Export completed"
        );

        for warning in &self.warnings {
            tracing::warn!(
                objection_id = %warning.objection_id,
                attachment_id = %warning.attachment_id,
                filename = %warning.filename,
                reason = %warning.reason,
                "Attachment missing from archive"
            );
        }
    }
}
