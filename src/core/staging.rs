//! Staging directory lifecycle
//!
//! One staging tree per export request: a sub-directory per objection holding
//! the rendered document and copied attachments, and the summary document at
//! the root. The tree is owned by a `TempDir`, so it is removed on every exit
//! path; nothing outside one export's orchestrator may touch it.

use crate::domain::{AttachmentId, ExportError, ObjectionId, PlanId, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const STAGING_PREFIX: &str = "tosca-export-";

/// Ephemeral on-disk working area for one export
pub struct StagingArea {
    dir: TempDir,
}

impl StagingArea {
    /// Creates a fresh staging directory
    ///
    /// With a `parent` the staging tree is created beneath it (the parent is
    /// created if needed); otherwise the system temp directory is used.
    pub fn create(parent: Option<&Path>) -> Result<Self> {
        let dir = match parent {
            Some(parent) => {
                std::fs::create_dir_all(parent).map_err(|e| {
                    ExportError::Io(format!(
                        "creating staging parent {}: {e}",
                        parent.display()
                    ))
                })?;
                TempDir::with_prefix_in(STAGING_PREFIX, parent)
            }
            None => TempDir::with_prefix(STAGING_PREFIX),
        }
        .map_err(|e| ExportError::Io(format!("creating staging directory: {e}")))?;

        tracing::debug!(path = %dir.path().display(), "Created staging directory");
        Ok(Self { dir })
    }

    /// Root of the staging tree
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Path of the summary document at the staging root
    pub fn summary_document_path(&self, plan_id: &PlanId) -> PathBuf {
        self.root().join(format!("objections-{plan_id}.pdf"))
    }

    /// Creates (if needed) and returns one objection's staging sub-directory
    pub async fn objection_dir(&self, id: &ObjectionId) -> Result<PathBuf> {
        let dir = self.root().join(format!("objection-{id}"));
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| ExportError::Io(format!("creating {}: {e}", dir.display())))?;
        Ok(dir)
    }

    /// Path of an objection's rendered document inside its sub-directory
    pub fn objection_document_path(dir: &Path, id: &ObjectionId) -> PathBuf {
        dir.join(format!("objection-{id}.pdf"))
    }

    /// Destination path for one attachment inside an objection sub-directory
    ///
    /// Attachment names come from citizen uploads; only the final path
    /// component of the original filename is kept. `taken` tracks names
    /// already claimed within the objection: a second attachment with the
    /// same filename gets the attachment id spliced in rather than
    /// overwriting the first.
    pub fn attachment_path(
        dir: &Path,
        id: &AttachmentId,
        filename: &str,
        taken: &mut HashSet<String>,
    ) -> PathBuf {
        let base = Path::new(filename)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_string());
        let mut name = format!("attachment-{base}");
        if !taken.insert(name.clone()) {
            name = format!("attachment-{id}-{base}");
            taken.insert(name.clone());
        }
        dir.join(name)
    }

    /// Removes the staging tree, reporting any error
    ///
    /// Dropping a `StagingArea` also removes the tree; this explicit form
    /// surfaces cleanup failures instead of swallowing them.
    pub fn cleanup(self) -> Result<()> {
        let path = self.dir.path().to_path_buf();
        self.dir
            .close()
            .map_err(|e| ExportError::Io(format!("removing staging {}: {e}", path.display())))
    }
}
