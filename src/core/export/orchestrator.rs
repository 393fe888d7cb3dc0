//! Export orchestrator
//!
//! Sequences the pipeline for one export request:
//! Assembling -> Rendering/Retrieving (interleaved per objection) ->
//! Packaging -> Done, with a terminal Failed reachable from every stage.
//! The orchestrator owns the staging directory's lifetime and the rendering
//! session; retrieval tasks overlap rendering of subsequent objections but
//! packaging waits behind the join barrier.

use crate::adapters::blobstore::BlobStore;
use crate::adapters::datasource::ReportDataSource;
use crate::adapters::renderer::DocumentRenderer;
use crate::config::ExportConfig;
use crate::core::archive;
use crate::core::assemble::assemble;
use crate::core::export::outcome::ExportOutcome;
use crate::core::retrieve::RetrievalTasks;
use crate::core::staging::StagingArea;
use crate::core::template;
use crate::domain::{ExportError, PlanId, ReportTree, Result};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Runtime settings for the export pipeline
#[derive(Debug, Clone)]
pub struct ExportSettings {
    /// Directory where finished archives are written
    pub output_dir: PathBuf,

    /// Parent directory for staging trees; system temp when `None`
    pub staging_dir: Option<PathBuf>,

    /// Maximum attachment retrievals in flight at once
    pub retrieval_concurrency: usize,

    /// Deadline for a single attachment retrieval
    pub retrieval_timeout: Duration,
}

impl ExportSettings {
    /// Builds settings from the export section of the configuration
    pub fn from_config(config: &ExportConfig) -> Self {
        Self {
            output_dir: PathBuf::from(&config.output_dir),
            staging_dir: config.staging_dir.as_ref().map(PathBuf::from),
            retrieval_concurrency: config.retrieval_concurrency,
            retrieval_timeout: Duration::from_secs(config.retrieval_timeout_secs),
        }
    }
}

/// Drives one export request end to end
///
/// The renderer is owned exclusively, so all render calls for an export are
/// serialized by construction; concurrent exports each construct their own
/// orchestrator with their own session.
pub struct ExportOrchestrator {
    data_source: Arc<dyn ReportDataSource>,
    blob_store: Arc<dyn BlobStore>,
    renderer: Box<dyn DocumentRenderer>,
    settings: ExportSettings,
}

impl ExportOrchestrator {
    /// Creates an orchestrator over the given collaborators
    pub fn new(
        data_source: Arc<dyn ReportDataSource>,
        blob_store: Arc<dyn BlobStore>,
        renderer: Box<dyn DocumentRenderer>,
        settings: ExportSettings,
    ) -> Self {
        Self {
            data_source,
            blob_store,
            renderer,
            settings,
        }
    }

    /// Exports the report for one plan and returns the archive path
    ///
    /// # Errors
    ///
    /// Returns the stage-specific error on any fatal failure; the staging
    /// directory is removed before the error surfaces. Per-attachment
    /// retrieval failures do not fail the export and come back as warnings
    /// on the outcome.
    pub async fn export_report(&mut self, plan_id: &PlanId) -> Result<ExportOutcome> {
        let export_id = Uuid::new_v4();
        let started = Instant::now();

        tracing::info!(export_id = %export_id, plan_id = %plan_id, "Starting report export");

        // Assembling: fails before any staging directory exists.
        let tree = assemble(self.data_source.as_ref(), plan_id).await?;

        let staging = StagingArea::create(self.settings.staging_dir.as_deref())?;
        let mut tasks = RetrievalTasks::new(
            self.settings.retrieval_concurrency,
            self.settings.retrieval_timeout,
        );

        // Rendering/Retrieving: a render failure unwinds the export, but
        // in-flight retrievals must stop writing before staging is deleted.
        if let Err(err) = self
            .render_and_schedule(&tree, plan_id, &staging, &mut tasks)
            .await
        {
            tasks.abort_all().await;
            tracing::error!(
                export_id = %export_id,
                plan_id = %plan_id,
                stage = err.stage(),
                error = %err,
                "Export failed, removing staging directory"
            );
            return Err(err);
        }

        // Barrier: every retrieval reaches a terminal outcome before packaging.
        let warnings = tasks.join_all().await;
        let attachments_scheduled = tasks.scheduled();

        // Packaging.
        let archive_path = self.package(plan_id, &staging).await?;

        if let Err(err) = staging.cleanup() {
            tracing::warn!(error = %err, "Staging directory left behind");
        }

        let outcome = ExportOutcome {
            plan_id: plan_id.clone(),
            archive_path,
            objections: tree.objections().len(),
            attachments_scheduled,
            warnings,
            duration: started.elapsed(),
        };
        outcome.log_summary();
        Ok(outcome)
    }

    /// Renders every objection document plus the summary and schedules
    /// attachment retrievals as each objection's directory becomes ready
    async fn render_and_schedule(
        &mut self,
        tree: &ReportTree,
        plan_id: &PlanId,
        staging: &StagingArea,
        tasks: &mut RetrievalTasks,
    ) -> Result<()> {
        let mut fragments = Vec::with_capacity(tree.objections().len());

        for objection in tree.objections() {
            let attachments = tree.attachments_for(objection);
            let fragment = template::objection_fragment(objection, &attachments);
            let html = template::objection_document(tree.plan(), &fragment);

            let dir = staging.objection_dir(&objection.id).await?;
            let document_path = StagingArea::objection_document_path(&dir, &objection.id);
            self.renderer.render(&html, &document_path).await?;

            // Retrievals overlap rendering of subsequent objections; the
            // renderer and the blob store are disjoint resources.
            let mut taken = HashSet::new();
            for attachment in attachments {
                tasks.spawn(
                    Arc::clone(&self.blob_store),
                    objection.id.clone(),
                    attachment.clone(),
                    StagingArea::attachment_path(
                        &dir,
                        &attachment.id,
                        &attachment.filename,
                        &mut taken,
                    ),
                );
            }

            fragments.push(fragment);
        }

        let summary_html = template::summary_document(tree.plan(), &fragments);
        self.renderer
            .render(&summary_html, &staging.summary_document_path(plan_id))
            .await?;

        tracing::debug!(
            plan_id = %plan_id,
            documents = fragments.len() + 1,
            retrievals = tasks.scheduled(),
            "Rendered all documents"
        );
        Ok(())
    }

    /// Packs the staging tree into the output archive
    async fn package(&self, plan_id: &PlanId, staging: &StagingArea) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.settings.output_dir)
            .await
            .map_err(|e| {
                ExportError::PackagingFailed(format!(
                    "creating output directory {}: {e}",
                    self.settings.output_dir.display()
                ))
            })?;

        let archive_path = self.settings.output_dir.join(format!("{plan_id}.zip"));
        let staging_root = staging.root().to_path_buf();
        let target = archive_path.clone();

        let packed = tokio::task::spawn_blocking(move || archive::pack(&staging_root, &target))
            .await
            .unwrap_or_else(|e| {
                Err(ExportError::PackagingFailed(format!(
                    "packaging task failed: {e}"
                )))
            });

        if let Err(err) = packed {
            let _ = tokio::fs::remove_file(&archive_path).await;
            return Err(err);
        }

        Ok(archive_path)
    }
}
