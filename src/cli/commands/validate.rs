//! Validate config command implementation

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("Validating configuration file: {config_path}");

        let config = match load_config(config_path) {
            Ok(config) => config,
            Err(e) => {
                println!("Configuration is invalid");
                println!("  Error: {e}");
                return Ok(2);
            }
        };

        println!("Configuration is valid");
        println!();
        println!("Configuration summary:");
        println!("  Log level:             {}", config.application.log_level);
        println!("  Collections directory: {}", config.data.collections_dir);
        println!("  Blob store root:       {}", config.blobstore.root);
        println!("  Output directory:      {}", config.export.output_dir);
        println!(
            "  Retrieval concurrency: {}",
            config.export.retrieval_concurrency
        );
        println!(
            "  Render timeout:        {}s",
            config.renderer.render_timeout_secs
        );

        Ok(0)
    }
}
