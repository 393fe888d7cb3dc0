//! Hierarchy assembler
//!
//! Builds the in-memory report tree for one plan: plan -> reviews ->
//! objections, plus a secondary join from the objections' attachment ids to
//! attachment metadata. One logical read, no mutation of source collections,
//! no retries; a transient data-source error aborts the export before any
//! staging directory exists.

use crate::adapters::datasource::ReportDataSource;
use crate::domain::{AttachmentId, ExportError, PlanId, ReportTree, Result};
use std::collections::HashMap;

/// Assembles the report tree for `plan_id`
///
/// # Errors
///
/// Returns `PlanNotFound` if the plan does not exist and `AssemblyFailed`
/// for any data-source read error.
pub async fn assemble(source: &dyn ReportDataSource, plan_id: &PlanId) -> Result<ReportTree> {
    let plan = source
        .find_plan_by_id(plan_id)
        .await
        .map_err(as_assembly_error)?
        .ok_or_else(|| ExportError::PlanNotFound(plan_id.clone()))?;

    let reviews = source
        .find_reviews_by_plan(plan_id)
        .await
        .map_err(as_assembly_error)?;

    let mut objections = Vec::new();
    for review in &reviews {
        let batch = source
            .find_objections_by_review(&review.id)
            .await
            .map_err(as_assembly_error)?;
        objections.extend(batch);
    }

    // Collect the distinct referenced attachment ids across all objections.
    let mut referenced: Vec<AttachmentId> = Vec::new();
    for objection in &objections {
        for id in &objection.attachment_ids {
            if !referenced.contains(id) {
                referenced.push(id.clone());
            }
        }
    }

    let attachments = if referenced.is_empty() {
        HashMap::new()
    } else {
        source
            .find_attachment_metadata(&referenced)
            .await
            .map_err(as_assembly_error)?
            .into_iter()
            .map(|meta| (meta.id.clone(), meta))
            .collect()
    };

    tracing::info!(
        plan_id = %plan_id,
        reviews = reviews.len(),
        objections = objections.len(),
        attachments = attachments.len(),
        "Assembled report tree"
    );

    Ok(ReportTree::new(plan, objections, attachments))
}

/// Wraps data-source errors as `AssemblyFailed`, keeping already-wrapped ones
fn as_assembly_error(err: ExportError) -> ExportError {
    match err {
        ExportError::AssemblyFailed(_) => err,
        other => ExportError::AssemblyFailed(other.to_string()),
    }
}
