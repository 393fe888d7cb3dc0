//! Report domain models
//!
//! Value types for the report hierarchy: plan, public reviews, objections and
//! attachment metadata, plus the [`ReportTree`] assembled once per export.
//! All optional fields are explicit; the rendering layer substitutes
//! "not provided" where a value is absent.

use crate::domain::ids::{AttachmentId, BlobRef, ObjectionId, PlanId, ReviewId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A master development plan subject to public review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub id: PlanId,
    pub title: String,
    /// Name of the map layer the plan is published on
    pub layer_name: String,
    /// External registry identifier (labelled "MoLG ID" in rendered output)
    pub external_id: String,
}

/// A time-bounded public comment period attached to one plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub plan_id: PlanId,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

/// Geographic point a citizen pinned their objection to
///
/// Both coordinates are independently optional; rendering shows
/// "not provided" per missing coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

/// The person who filed an objection; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Submitter {
    pub name: Option<String>,
    pub institution: Option<String>,
    pub department: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// A citizen submission against a plan during a review period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objection {
    pub id: ObjectionId,
    pub review_id: ReviewId,
    pub created_at: DateTime<Utc>,
    pub category: Option<String>,
    pub comment: String,
    pub location: Option<GeoPoint>,
    pub submitter: Submitter,
    /// Normalized attachment references (deduplicated, first-seen order)
    pub attachment_ids: Vec<AttachmentId>,
}

/// Metadata record for one binary attachment stored in the blob store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachmentMeta {
    pub id: AttachmentId,
    pub filename: String,
    pub blob_ref: BlobRef,
}

/// Raw attachment reference as it appears in source documents
///
/// Source data may supply a single id or a list of ids; both normalize to
/// the same deduplicated sequence via [`normalize_ids`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttachmentRefs {
    One(String),
    Many(Vec<String>),
}

/// Normalizes a scalar-or-list attachment reference into attachment ids
///
/// Empty and whitespace-only values are dropped, duplicates collapse, and
/// first-seen order is preserved. A scalar `"a"` and the list `["a"]`
/// produce identical results.
pub fn normalize_ids(refs: Option<&AttachmentRefs>) -> Vec<AttachmentId> {
    let raw: Vec<&str> = match refs {
        None => Vec::new(),
        Some(AttachmentRefs::One(id)) => vec![id.as_str()],
        Some(AttachmentRefs::Many(ids)) => ids.iter().map(String::as_str).collect(),
    };

    let mut ids = Vec::new();
    for value in raw {
        if let Ok(id) = AttachmentId::new(value) {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
    }
    ids
}

/// In-memory hierarchical assembly of one plan's reviews, objections and
/// attachment metadata
///
/// Built once per export request and read-only thereafter; accessors are the
/// only way in, so no component can mutate the tree during rendering.
#[derive(Debug, Clone)]
pub struct ReportTree {
    plan: Plan,
    objections: Vec<Objection>,
    attachments: HashMap<AttachmentId, AttachmentMeta>,
}

impl ReportTree {
    /// Assembles a tree from its parts
    pub fn new(
        plan: Plan,
        objections: Vec<Objection>,
        attachments: HashMap<AttachmentId, AttachmentMeta>,
    ) -> Self {
        Self {
            plan,
            objections,
            attachments,
        }
    }

    /// The plan this report covers
    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    /// Objections in stable retrieval order
    ///
    /// Document numbering ("Objection #N") is 1-based over this order.
    pub fn objections(&self) -> &[Objection] {
        &self.objections
    }

    /// Resolves one objection's attachment references to metadata records
    ///
    /// Ids with no matching metadata are silently excluded; the objection's
    /// remaining attachments keep their normalized order.
    pub fn attachments_for(&self, objection: &Objection) -> Vec<&AttachmentMeta> {
        objection
            .attachment_ids
            .iter()
            .filter_map(|id| self.attachments.get(id))
            .collect()
    }
}
