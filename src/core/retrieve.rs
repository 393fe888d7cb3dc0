//! Attachment retrieval
//!
//! Copies attachment blobs into the staging tree. Retrievals run as tracked
//! tasks with a bounded concurrency limit and a per-retrieval deadline; the
//! orchestrator must drain the task set before packaging, so every scheduled
//! copy has reached a terminal outcome when the archive is written.

use crate::adapters::blobstore::BlobStore;
use crate::core::export::outcome::RetrievalWarning;
use crate::domain::{AttachmentMeta, ExportError, ObjectionId, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Copies one blob from the store to `destination`
///
/// # Errors
///
/// Returns `RetrievalFailed` if the stream cannot be opened or the copy does
/// not complete. The caller removes any partially written file.
pub async fn retrieve(
    store: &dyn BlobStore,
    attachment: &AttachmentMeta,
    destination: &Path,
) -> Result<()> {
    let failed = |reason: String| ExportError::RetrievalFailed {
        attachment: attachment.id.to_string(),
        reason,
    };

    let mut reader = store
        .open_read(&attachment.blob_ref)
        .await
        .map_err(|e| failed(e.to_string()))?;

    let mut file = tokio::fs::File::create(destination)
        .await
        .map_err(|e| failed(format!("creating {}: {e}", destination.display())))?;

    tokio::io::copy(&mut reader, &mut file)
        .await
        .map_err(|e| failed(format!("copying blob {}: {e}", attachment.blob_ref)))?;

    file.flush()
        .await
        .map_err(|e| failed(format!("flushing {}: {e}", destination.display())))?;

    Ok(())
}

/// Tracked retrieval tasks for one export
///
/// Every spawned retrieval is held in a `JoinSet`; [`join_all`] is the
/// barrier packaging waits behind. Concurrency is bounded by a semaphore
/// shared across the export.
///
/// [`join_all`]: RetrievalTasks::join_all
pub struct RetrievalTasks {
    tasks: JoinSet<Option<RetrievalWarning>>,
    limit: Arc<Semaphore>,
    deadline: Duration,
    scheduled: usize,
}

impl RetrievalTasks {
    /// Creates an empty task set with the given concurrency bound
    pub fn new(concurrency: usize, deadline: Duration) -> Self {
        Self {
            tasks: JoinSet::new(),
            limit: Arc::new(Semaphore::new(concurrency.max(1))),
            deadline,
            scheduled: 0,
        }
    }

    /// Number of retrievals scheduled so far
    pub fn scheduled(&self) -> usize {
        self.scheduled
    }

    /// Schedules one attachment retrieval
    ///
    /// The task waits for a concurrency permit, copies the blob under the
    /// deadline, and on any failure removes the partial file and reports a
    /// warning instead of an error.
    pub fn spawn(
        &mut self,
        store: Arc<dyn BlobStore>,
        objection_id: ObjectionId,
        attachment: AttachmentMeta,
        destination: PathBuf,
    ) {
        let limit = Arc::clone(&self.limit);
        let deadline = self.deadline;
        self.scheduled += 1;

        self.tasks.spawn(async move {
            let warning = |reason: String| RetrievalWarning {
                objection_id: objection_id.to_string(),
                attachment_id: attachment.id.to_string(),
                filename: attachment.filename.clone(),
                reason,
            };

            let _permit = match limit.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => return Some(warning("retrieval pool closed".to_string())),
            };

            let result =
                tokio::time::timeout(deadline, retrieve(store.as_ref(), &attachment, &destination))
                    .await;

            let reason = match result {
                Ok(Ok(())) => {
                    tracing::debug!(
                        attachment_id = %attachment.id,
                        destination = %destination.display(),
                        "Retrieved attachment"
                    );
                    return None;
                }
                Ok(Err(e)) => e.to_string(),
                Err(_) => format!("retrieval exceeded deadline of {}s", deadline.as_secs()),
            };

            let _ = tokio::fs::remove_file(&destination).await;
            Some(warning(reason))
        });
    }

    /// Waits for every scheduled retrieval to reach a terminal outcome
    ///
    /// This is the synchronization barrier before packaging. Failures come
    /// back as warnings; a panicked task is recorded the same way.
    pub async fn join_all(&mut self) -> Vec<RetrievalWarning> {
        let mut warnings = Vec::new();
        while let Some(joined) = self.tasks.join_next().await {
            match joined {
                Ok(Some(warning)) => {
                    tracing::warn!(
                        attachment_id = %warning.attachment_id,
                        reason = %warning.reason,
                        "Attachment retrieval failed, continuing without it"
                    );
                    warnings.push(warning);
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::error!(error = %e, "Retrieval task failed");
                    warnings.push(RetrievalWarning {
                        objection_id: "unknown".to_string(),
                        attachment_id: "unknown".to_string(),
                        filename: String::new(),
                        reason: format!("retrieval task failed: {e}"),
                    });
                }
            }
        }
        warnings
    }

    /// Aborts in-flight retrievals and waits for them to finish
    ///
    /// Used when the export is unwinding: staging is about to be deleted and
    /// no task may still be writing into it.
    pub async fn abort_all(&mut self) {
        self.tasks.shutdown().await;
    }
}
