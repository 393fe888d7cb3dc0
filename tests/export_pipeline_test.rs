//! End-to-end tests for the export pipeline
//!
//! Drives the orchestrator with an in-memory data source, a filesystem blob
//! store, and a renderer stand-in that writes the document HTML verbatim, so
//! archive contents can be inspected without a browser.

use async_trait::async_trait;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tosca_export::adapters::{BlobStore, DocumentRenderer, FsBlobStore, ReportDataSource};
use tosca_export::core::export::{ExportOrchestrator, ExportSettings};
use tosca_export::domain::{
    AttachmentId, AttachmentMeta, BlobRef, ExportError, GeoPoint, Objection, ObjectionId, Plan,
    PlanId, Result, Review, ReviewId, Submitter,
};

/// Fixed-content data source covering one plan with one review
struct InMemoryDataSource {
    plan: Plan,
    reviews: Vec<Review>,
    objections: Vec<Objection>,
    attachments: Vec<AttachmentMeta>,
}

#[async_trait]
impl ReportDataSource for InMemoryDataSource {
    async fn find_plan_by_id(&self, id: &PlanId) -> Result<Option<Plan>> {
        Ok((self.plan.id == *id).then(|| self.plan.clone()))
    }

    async fn find_reviews_by_plan(&self, plan_id: &PlanId) -> Result<Vec<Review>> {
        Ok(self
            .reviews
            .iter()
            .filter(|r| r.plan_id == *plan_id)
            .cloned()
            .collect())
    }

    async fn find_objections_by_review(&self, review_id: &ReviewId) -> Result<Vec<Objection>> {
        Ok(self
            .objections
            .iter()
            .filter(|o| o.review_id == *review_id)
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

/// Renderer stand-in that writes the HTML bytes to the output path
struct HtmlEchoRenderer;

#[async_trait]
impl DocumentRenderer for HtmlEchoRenderer {
    async fn render(&mut self, html: &str, output: &Path) -> Result<()> {
        tokio::fs::write(output, html.as_bytes())
            .await
            .map_err(|e| ExportError::RenderFailed(e.to_string()))?;
        Ok(())
    }
}

/// Blob store whose streams never produce data; the write half of each
/// duplex pipe is kept alive so reads pend instead of hitting EOF.
struct StalledBlobStore {
    writers: std::sync::Mutex<Vec<tokio::io::DuplexStream>>,
}

impl StalledBlobStore {
    fn new() -> Self {
        Self {
            writers: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl BlobStore for StalledBlobStore {
    async fn open_read(
        &self,
        _blob_ref: &BlobRef,
    ) -> Result<Box<dyn tokio::io::AsyncRead + Send + Unpin>> {
        let (reader, writer) = tokio::io::duplex(8);
        self.writers.lock().unwrap().push(writer);
        Ok(Box::new(reader))
    }
}

/// Renderer stand-in that fails on a configured render call
struct FailingRenderer {
    fail_on_call: usize,
    calls: usize,
}

#[async_trait]
impl DocumentRenderer for FailingRenderer {
    async fn render(&mut self, html: &str, output: &Path) -> Result<()> {
        self.calls += 1;
        if self.calls >= self.fail_on_call {
            return Err(ExportError::RenderFailed("session closed".to_string()));
        }
        tokio::fs::write(output, html.as_bytes())
            .await
            .map_err(|e| ExportError::RenderFailed(e.to_string()))?;
        Ok(())
    }
}

fn plan_id() -> PlanId {
    PlanId::from_str("plan-1").unwrap()
}

fn fixture_source() -> InMemoryDataSource {
    let created = "2024-05-01T10:30:00Z".parse().unwrap();
    InMemoryDataSource {
        plan: Plan {
            id: plan_id(),
            title: "Riverside district plan".to_string(),
            layer_name: "masterplans".to_string(),
            external_id: "MOLG-42".to_string(),
        },
        reviews: vec![Review {
            id: ReviewId::from_str("rev-1").unwrap(),
            plan_id: plan_id(),
            start_date: None,
            end_date: None,
        }],
        objections: vec![
            Objection {
                id: ObjectionId::from_str("obj-1").unwrap(),
                review_id: ReviewId::from_str("rev-1").unwrap(),
                created_at: created,
                category: Some("Noise".to_string()),
                comment: "Construction hours are too long.".to_string(),
                location: None,
                submitter: Submitter {
                    name: Some("A. Resident".to_string()),
                    ..Submitter::default()
                },
                attachment_ids: vec![],
            },
            Objection {
                id: ObjectionId::from_str("obj-2").unwrap(),
                review_id: ReviewId::from_str("rev-1").unwrap(),
                created_at: created,
                category: None,
                comment: "The access road cuts through my parcel.".to_string(),
                location: Some(GeoPoint {
                    lat: Some(10.0),
                    lng: Some(20.0),
                }),
                submitter: Submitter::default(),
                attachment_ids: vec![AttachmentId::from_str("att-1").unwrap()],
            },
        ],
        attachments: vec![AttachmentMeta {
            id: AttachmentId::from_str("att-1").unwrap(),
            filename: "site.jpg".to_string(),
            blob_ref: BlobRef::from_str("blob-att-1").unwrap(),
        }],
    }
}

fn settings(workdir: &Path) -> ExportSettings {
    ExportSettings {
        output_dir: workdir.join("export"),
        staging_dir: Some(workdir.join("staging")),
        retrieval_concurrency: 4,
        retrieval_timeout: Duration::from_secs(10),
    }
}

fn archive_entry_names(path: &Path) -> Vec<String> {
    let file = std::fs::File::open(path).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect()
}

fn archive_entry_bytes(path: &Path, name: &str) -> Vec<u8> {
    let file = std::fs::File::open(path).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    let mut entry = archive.by_name(name).unwrap();
    let mut bytes = Vec::new();
    entry.read_to_end(&mut bytes).unwrap();
    bytes
}

async fn orchestrator_with(
    workdir: &Path,
    source: InMemoryDataSource,
    renderer: Box<dyn DocumentRenderer>,
) -> ExportOrchestrator {
    let blob_root = workdir.join("blobs");
    tokio::fs::create_dir_all(&blob_root).await.unwrap();
    tokio::fs::write(blob_root.join("blob-att-1"), b"jpeg bytes")
        .await
        .unwrap();
    tokio::fs::create_dir_all(workdir.join("staging"))
        .await
        .unwrap();

    ExportOrchestrator::new(
        Arc::new(source),
        Arc::new(FsBlobStore::new(blob_root)),
        renderer,
        settings(workdir),
    )
}

#[tokio::test]
async fn test_export_produces_complete_archive() {
    let workdir = tempfile::tempdir().unwrap();
    let mut orchestrator =
        orchestrator_with(workdir.path(), fixture_source(), Box::new(HtmlEchoRenderer)).await;

    let outcome = orchestrator.export_report(&plan_id()).await.unwrap();

    assert_eq!(outcome.objections, 2);
    assert_eq!(outcome.attachments_scheduled, 1);
    assert_eq!(outcome.attachments_retrieved(), 1);
    assert!(outcome.is_complete());
    assert_eq!(
        outcome.archive_path,
        workdir.path().join("export").join("plan-1.zip")
    );

    let names = archive_entry_names(&outcome.archive_path);
    assert!(names.contains(&"objections-plan-1.pdf".to_string()));
    assert!(names.contains(&"objection-obj-1/objection-obj-1.pdf".to_string()));
    assert!(names.contains(&"objection-obj-2/objection-obj-2.pdf".to_string()));
    assert!(names.contains(&"objection-obj-2/attachment-site.jpg".to_string()));
    // obj-1 has no attachments, so its folder holds only the document.
    assert!(!names.iter().any(|n| n.starts_with("objection-obj-1/attachment-")));

    let attachment = archive_entry_bytes(&outcome.archive_path, "objection-obj-2/attachment-site.jpg");
    assert_eq!(attachment, b"jpeg bytes");
}

#[tokio::test]
async fn test_summary_document_content_and_ordering() {
    let workdir = tempfile::tempdir().unwrap();
    let mut orchestrator =
        orchestrator_with(workdir.path(), fixture_source(), Box::new(HtmlEchoRenderer)).await;

    let outcome = orchestrator.export_report(&plan_id()).await.unwrap();
    let summary =
        String::from_utf8(archive_entry_bytes(&outcome.archive_path, "objections-plan-1.pdf"))
            .unwrap();

    assert!(summary.contains("Riverside district plan"));
    assert!(summary.contains("MOLG-42"));
    // Objections keep data-source order and are numbered from one.
    let first = summary.find("Objection #1").unwrap();
    let second = summary.find("Objection #2").unwrap();
    assert!(first < second);
    assert!(summary.find("Construction hours are too long.").unwrap() < second);

    // Missing fields render as placeholders, present ones verbatim.
    assert!(summary.contains("Noise"));
    assert!(summary.contains("not provided"));
    assert!(summary.contains("Latitude: 10, Longitude: 20"));
    assert!(summary.contains("site.jpg"));
}

#[tokio::test]
async fn test_export_plan_without_objections() {
    let workdir = tempfile::tempdir().unwrap();
    let mut source = fixture_source();
    source.objections.clear();
    source.attachments.clear();
    let mut orchestrator =
        orchestrator_with(workdir.path(), source, Box::new(HtmlEchoRenderer)).await;

    let outcome = orchestrator.export_report(&plan_id()).await.unwrap();

    assert_eq!(outcome.objections, 0);
    assert_eq!(outcome.attachments_scheduled, 0);
    let names = archive_entry_names(&outcome.archive_path);
    assert_eq!(names, vec!["objections-plan-1.pdf".to_string()]);
}

#[tokio::test]
async fn test_unknown_plan_fails_before_staging() {
    let workdir = tempfile::tempdir().unwrap();
    let mut orchestrator =
        orchestrator_with(workdir.path(), fixture_source(), Box::new(HtmlEchoRenderer)).await;

    let missing = PlanId::from_str("no-such-plan").unwrap();
    let err = orchestrator.export_report(&missing).await.unwrap_err();

    assert!(matches!(err, ExportError::PlanNotFound(_)));
    // Nothing was staged and no archive was produced.
    let mut staged = tokio::fs::read_dir(workdir.path().join("staging")).await.unwrap();
    assert!(staged.next_entry().await.unwrap().is_none());
    assert!(!workdir.path().join("export").exists());
}

#[tokio::test]
async fn test_missing_blob_is_a_warning_not_a_failure() {
    let workdir = tempfile::tempdir().unwrap();
    let mut source = fixture_source();
    source.attachments[0].blob_ref = BlobRef::from_str("blob-gone").unwrap();
    let mut orchestrator =
        orchestrator_with(workdir.path(), source, Box::new(HtmlEchoRenderer)).await;

    let outcome = orchestrator.export_report(&plan_id()).await.unwrap();

    assert_eq!(outcome.attachments_scheduled, 1);
    assert_eq!(outcome.attachments_retrieved(), 0);
    assert!(!outcome.is_complete());
    assert_eq!(outcome.warnings.len(), 1);
    assert_eq!(outcome.warnings[0].objection_id, "obj-2");
    assert_eq!(outcome.warnings[0].filename, "site.jpg");

    // The archive still exists; only the attachment entry is absent.
    let names = archive_entry_names(&outcome.archive_path);
    assert!(names.contains(&"objection-obj-2/objection-obj-2.pdf".to_string()));
    assert!(!names.contains(&"objection-obj-2/attachment-site.jpg".to_string()));
}

#[tokio::test]
async fn test_render_failure_removes_staging_and_archive() {
    let workdir = tempfile::tempdir().unwrap();
    // Fail on the second render, after the first objection document has
    // already been written into staging.
    let renderer = FailingRenderer {
        fail_on_call: 2,
        calls: 0,
    };
    let mut orchestrator =
        orchestrator_with(workdir.path(), fixture_source(), Box::new(renderer)).await;

    let err = orchestrator.export_report(&plan_id()).await.unwrap_err();

    assert!(matches!(err, ExportError::RenderFailed(_)));
    assert_eq!(err.stage(), "rendering");

    // The staging parent is empty again and no archive was written.
    let mut staged = tokio::fs::read_dir(workdir.path().join("staging")).await.unwrap();
    assert!(staged.next_entry().await.unwrap().is_none());
    assert!(!workdir.path().join("export").join("plan-1.zip").exists());
}

#[tokio::test]
async fn test_render_failure_aborts_in_flight_retrievals() {
    let workdir = tempfile::tempdir().unwrap();
    tokio::fs::create_dir_all(workdir.path().join("staging"))
        .await
        .unwrap();

    // obj-1 gets the attachment, so its retrieval is already running against
    // the stalled store when obj-2's render fails.
    let mut source = fixture_source();
    source.objections[0].attachment_ids = vec![AttachmentId::from_str("att-1").unwrap()];
    source.objections[1].attachment_ids.clear();

    let mut orchestrator = ExportOrchestrator::new(
        Arc::new(source),
        Arc::new(StalledBlobStore::new()),
        Box::new(FailingRenderer {
            fail_on_call: 2,
            calls: 0,
        }),
        ExportSettings {
            retrieval_timeout: Duration::from_secs(60),
            ..settings(workdir.path())
        },
    );

    // The unwind must abort the stalled retrieval instead of waiting out
    // its 60s deadline.
    let err = tokio::time::timeout(Duration::from_secs(10), orchestrator.export_report(&plan_id()))
        .await
        .unwrap()
        .unwrap_err();

    assert!(matches!(err, ExportError::RenderFailed(_)));
    let mut staged = tokio::fs::read_dir(workdir.path().join("staging")).await.unwrap();
    assert!(staged.next_entry().await.unwrap().is_none());
    assert!(!workdir.path().join("export").join("plan-1.zip").exists());
}

#[tokio::test]
async fn test_duplicate_attachment_filenames_are_both_archived() {
    let workdir = tempfile::tempdir().unwrap();
    let mut source = fixture_source();
    source.objections[1].attachment_ids = vec![
        AttachmentId::from_str("att-1").unwrap(),
        AttachmentId::from_str("att-2").unwrap(),
    ];
    source.attachments.push(AttachmentMeta {
        id: AttachmentId::from_str("att-2").unwrap(),
        filename: "site.jpg".to_string(),
        blob_ref: BlobRef::from_str("blob-att-2").unwrap(),
    });

    let mut orchestrator =
        orchestrator_with(workdir.path(), source, Box::new(HtmlEchoRenderer)).await;
    tokio::fs::write(workdir.path().join("blobs").join("blob-att-2"), b"second upload")
        .await
        .unwrap();

    let outcome = orchestrator.export_report(&plan_id()).await.unwrap();

    assert_eq!(outcome.attachments_scheduled, 2);
    assert!(outcome.is_complete());
    assert_eq!(
        archive_entry_bytes(&outcome.archive_path, "objection-obj-2/attachment-site.jpg"),
        b"jpeg bytes"
    );
    assert_eq!(
        archive_entry_bytes(
            &outcome.archive_path,
            "objection-obj-2/attachment-att-2-site.jpg"
        ),
        b"second upload"
    );
}
