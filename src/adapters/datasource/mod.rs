//! Portal data source abstraction
//!
//! The portal's document database is an out-of-scope collaborator; the
//! pipeline consumes it read-only through [`ReportDataSource`]. The bundled
//! [`JsonDataSource`] adapter reads exported collection files, which is
//! enough to run the pipeline end to end without the database.

pub mod json;

use crate::domain::{AttachmentId, AttachmentMeta, Objection, Plan, PlanId, Result, Review, ReviewId};
use async_trait::async_trait;

pub use json::JsonDataSource;

/// Read-only hierarchical data source for report assembly
///
/// Implementations must not reorder results: the assembler's retrieval order
/// determines document numbering in the exported report.
#[async_trait]
pub trait ReportDataSource: Send + Sync {
    /// Looks up a plan by id; `None` if it does not exist
    async fn find_plan_by_id(&self, id: &PlanId) -> Result<Option<Plan>>;

    /// All public reviews attached to a plan
    async fn find_reviews_by_plan(&self, plan_id: &PlanId) -> Result<Vec<Review>>;

    /// All objections filed during one review period
    async fn find_objections_by_review(&self, review_id: &ReviewId) -> Result<Vec<Objection>>;

    /// Metadata records for the given attachment ids
    ///
    /// Unknown ids are omitted from the result rather than reported as
    /// errors; the caller treats unresolved references as non-fatal.
    async fn find_attachment_metadata(&self, ids: &[AttachmentId]) -> Result<Vec<AttachmentMeta>>;
}
