//! JSON collection file adapter
//!
//! Reads the portal's collections from JSON array files in one directory:
//! `masterplans.json`, `publicreviews.json`, `objections.json` and
//! `attachments.json`. Raw document shapes mirror the portal's loosely-typed
//! records (optional fields, scalar-or-list attachment references) and are
//! converted into the crate's fixed value types at load time.

use crate::adapters::datasource::ReportDataSource;
use crate::domain::model::{normalize_ids, AttachmentRefs, GeoPoint, Submitter};
use crate::domain::{
    AttachmentId, AttachmentMeta, BlobRef, ExportError, Objection, ObjectionId, Plan, PlanId,
    Result, Review, ReviewId,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Raw master plan document
#[derive(Debug, Deserialize)]
struct RawPlan {
    #[serde(rename = "_id")]
    id: String,
    title: Option<String>,
    #[serde(rename = "layerName")]
    layer_name: Option<String>,
    #[serde(rename = "molgId")]
    molg_id: Option<String>,
}

/// Raw public review document
#[derive(Debug, Deserialize)]
struct RawReview {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "masterplanId")]
    masterplan_id: String,
    #[serde(rename = "startDate")]
    start_date: Option<DateTime<Utc>>,
    #[serde(rename = "endDate")]
    end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct RawLocation {
    lat: Option<f64>,
    lng: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct RawPerson {
    name: Option<String>,
    institution: Option<String>,
    department: Option<String>,
    phone: Option<String>,
    email: Option<String>,
}

/// Raw objection document
#[derive(Debug, Deserialize)]
struct RawObjection {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "publicReviewId")]
    public_review_id: String,
    created: DateTime<Utc>,
    category: Option<String>,
    #[serde(default)]
    comment: String,
    location: Option<RawLocation>,
    person: Option<RawPerson>,
    /// A single id or a list of ids, depending on how the objection was filed
    #[serde(rename = "attachmentId")]
    attachment_id: Option<AttachmentRefs>,
}

/// Raw attachment metadata document
#[derive(Debug, Deserialize)]
struct RawAttachment {
    #[serde(rename = "_id")]
    id: String,
    filename: String,
    /// Blob store key; defaults to the metadata id when absent
    #[serde(rename = "blobRef")]
    blob_ref: Option<String>,
}

/// Data source over JSON collection files, loaded fully into memory
pub struct JsonDataSource {
    plans: Vec<Plan>,
    reviews: Vec<Review>,
    objections: Vec<Objection>,
    attachments: Vec<AttachmentMeta>,
}

impl JsonDataSource {
    /// Loads all four collection files from `dir`
    ///
    /// A missing collection file is treated as an empty collection: a fresh
    /// portal may not have any attachments yet.
    ///
    /// # Errors
    ///
    /// Returns `AssemblyFailed` if a file cannot be read or parsed, or if a
    /// document is missing a required identifier.
    pub async fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();

        let raw_plans: Vec<RawPlan> = read_collection(dir.join("masterplans.json")).await?;
        let raw_reviews: Vec<RawReview> = read_collection(dir.join("publicreviews.json")).await?;
        let raw_objections: Vec<RawObjection> =
            read_collection(dir.join("objections.json")).await?;
        let raw_attachments: Vec<RawAttachment> =
            read_collection(dir.join("attachments.json")).await?;

        let plans = raw_plans
            .into_iter()
            .map(convert_plan)
            .collect::<Result<Vec<_>>>()?;
        let reviews = raw_reviews
            .into_iter()
            .map(convert_review)
            .collect::<Result<Vec<_>>>()?;
        let objections = raw_objections
            .into_iter()
            .map(convert_objection)
            .collect::<Result<Vec<_>>>()?;
        let attachments = raw_attachments
            .into_iter()
            .map(convert_attachment)
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            plans = plans.len(),
            reviews = reviews.len(),
            objections = objections.len(),
            attachments = attachments.len(),
            dir = %dir.display(),
            "Loaded portal collections"
        );

        Ok(Self {
            plans,
            reviews,
            objections,
            attachments,
        })
    }
}

async fn read_collection<T: DeserializeOwned>(path: PathBuf) -> Result<Vec<T>> {
    match tokio::fs::read(&path).await {
        Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
            ExportError::AssemblyFailed(format!("parsing {}: {e}", path.display()))
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(ExportError::AssemblyFailed(format!(
            "reading {}: {e}",
            path.display()
        ))),
    }
}

fn convert_plan(raw: RawPlan) -> Result<Plan> {
    Ok(Plan {
        id: PlanId::new(raw.id).map_err(ExportError::AssemblyFailed)?,
        title: raw.title.unwrap_or_default(),
        layer_name: raw.layer_name.unwrap_or_default(),
        external_id: raw.molg_id.unwrap_or_default(),
    })
}

fn convert_review(raw: RawReview) -> Result<Review> {
    Ok(Review {
        id: ReviewId::new(raw.id).map_err(ExportError::AssemblyFailed)?,
        plan_id: PlanId::new(raw.masterplan_id).map_err(ExportError::AssemblyFailed)?,
        start_date: raw.start_date,
        end_date: raw.end_date,
    })
}

fn convert_objection(raw: RawObjection) -> Result<Objection> {
    let person = raw.person.unwrap_or_default();
    Ok(Objection {
        id: ObjectionId::new(raw.id).map_err(ExportError::AssemblyFailed)?,
        review_id: ReviewId::new(raw.public_review_id).map_err(ExportError::AssemblyFailed)?,
        created_at: raw.created,
        category: raw.category,
        comment: raw.comment,
        location: raw.location.map(|l| GeoPoint {
            lat: l.lat,
            lng: l.lng,
        }),
        submitter: Submitter {
            name: person.name,
            institution: person.institution,
            department: person.department,
            phone: person.phone,
            email: person.email,
        },
        attachment_ids: normalize_ids(raw.attachment_id.as_ref()),
    })
}

fn convert_attachment(raw: RawAttachment) -> Result<AttachmentMeta> {
    let id = AttachmentId::new(raw.id).map_err(ExportError::AssemblyFailed)?;
    let blob_ref = match raw.blob_ref {
        Some(blob_ref) => BlobRef::new(blob_ref).map_err(ExportError::AssemblyFailed)?,
        None => BlobRef::new(id.as_str()).map_err(ExportError::AssemblyFailed)?,
    };
    Ok(AttachmentMeta {
        id,
        filename: raw.filename,
        blob_ref,
    })
}

#[async_trait]
impl ReportDataSource for JsonDataSource {
    async fn find_plan_by_id(&self, id: &PlanId) -> Result<Option<Plan>> {
        Ok(self.plans.iter().find(|p| &p.id == id).cloned())
    }

    async fn find_reviews_by_plan(&self, plan_id: &PlanId) -> Result<Vec<Review>> {
        Ok(self
            .reviews
            .iter()
            .filter(|r| &r.plan_id == plan_id)
            .cloned()
            .collect())
    }

    async fn find_objections_by_review(&self, review_id: &ReviewId) -> Result<Vec<Objection>> {
        Ok(self
            .objections
            .iter()
            .filter(|o| &o.review_id == review_id)
            .cloned()
            .collect())
    }

    async fn find_attachment_metadata(&self, ids: &[AttachmentId]) -> Result<Vec<AttachmentMeta>> {
        Ok(self
            .attachments
            .iter()
            .filter(|a| ids.contains(&a.id))
            .cloned()
            .collect())
    }
}
