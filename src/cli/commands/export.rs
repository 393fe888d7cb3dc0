//! Export command implementation
//!
//! Wires the configured adapters into an orchestrator and runs one export.

use crate::adapters::blobstore::FsBlobStore;
use crate::adapters::datasource::JsonDataSource;
use crate::adapters::renderer::ChromiumRenderer;
use crate::config::load_config;
use crate::core::export::{ExportOrchestrator, ExportSettings};
use crate::domain::{ExportError, PlanId};
use clap::Args;
use std::str::FromStr;
use std::sync::Arc;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Plan to export
    #[arg(long)]
    pub plan_id: String,

    /// Override the archive output directory
    #[arg(long)]
    pub output: Option<String>,
}

impl ExportArgs {
    /// Execute the export command
    ///
    /// Exit codes: 0 success, 2 configuration error, 3 plan not found,
    /// 4 export failure.
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(plan_id = %self.plan_id, "Starting export command");

        let mut config = match load_config(config_path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Configuration error: {e}");
                return Ok(2);
            }
        };

        if let Some(output) = &self.output {
            tracing::info!(output = %output, "Overriding output directory from CLI");
            config.export.output_dir = output.clone();
        }

        let plan_id = match PlanId::from_str(&self.plan_id) {
            Ok(id) => id,
            Err(e) => {
                eprintln!("Invalid plan id: {e}");
                return Ok(2);
            }
        };

        let data_source = JsonDataSource::load(&config.data.collections_dir).await?;
        let blob_store = FsBlobStore::new(&config.blobstore.root);
        let renderer = ChromiumRenderer::launch(&config.renderer)?;

        let mut orchestrator = ExportOrchestrator::new(
            Arc::new(data_source),
            Arc::new(blob_store),
            Box::new(renderer),
            ExportSettings::from_config(&config.export),
        );

        match orchestrator.export_report(&plan_id).await {
            Ok(outcome) => {
                println!("Archive written to {}", outcome.archive_path.display());
                if !outcome.is_complete() {
                    println!(
                        "Warning: {} attachment(s) could not be retrieved and are missing from the archive",
                        outcome.warnings.len()
                    );
                }
                Ok(0)
            }
            Err(ExportError::PlanNotFound(id)) => {
                eprintln!("Export failed: master plan {id} does not exist");
                Ok(3)
            }
            Err(e) => {
                eprintln!("Export failed during {}: {e}", e.stage());
                Ok(4)
            }
        }
    }
}
