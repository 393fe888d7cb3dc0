//! Domain models and types for the export pipeline
//!
//! This module contains the value types, identifier newtypes, error taxonomy
//! and `Result` alias used throughout the crate:
//!
//! - **Strongly-typed identifiers** ([`PlanId`], [`ReviewId`], [`ObjectionId`],
//!   [`AttachmentId`], [`BlobRef`])
//! - **Report models** ([`Plan`], [`Review`], [`Objection`], [`AttachmentMeta`],
//!   [`ReportTree`])
//! - **Error type** ([`ExportError`]) and the crate-wide [`Result`]
//!
//! The newtype pattern keeps ids from different collections apart at compile
//! time, and [`normalize_ids`] is the single place where the source data's
//! scalar-or-list attachment references become a deduplicated id sequence.

pub mod errors;
pub mod ids;
pub mod model;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::ExportError;
pub use ids::{AttachmentId, BlobRef, ObjectionId, PlanId, ReviewId};
pub use model::{
    normalize_ids, AttachmentMeta, AttachmentRefs, GeoPoint, Objection, Plan, ReportTree, Review,
    Submitter,
};
pub use result::Result;
