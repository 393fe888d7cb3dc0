//! Init command implementation
//!
//! Generates a starter configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "tosca-export.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        if Path::new(&self.output).exists() && !self.force {
            println!("Configuration file already exists: {}", self.output);
            println!("Use --force to overwrite");
            return Ok(2);
        }

        match fs::write(&self.output, Self::starter_config()) {
            Ok(()) => {
                println!("Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Validate: tosca-export validate-config");
                println!("  3. Run an export: tosca-export export --plan-id <id>");
                Ok(0)
            }
            Err(e) => {
                eprintln!("Failed to write configuration file: {e}");
                Ok(5)
            }
        }
    }

    /// Starter configuration content
    fn starter_config() -> &'static str {
        r#"# tosca-export configuration
# Report export pipeline for the TOSCA citizen participation portal

[application]
# Log level: trace, debug, info, warn, error
log_level = "info"

[data]
# Directory holding the portal collection files:
# masterplans.json, publicreviews.json, objections.json, attachments.json
collections_dir = "data"

[blobstore]
# Directory holding attachment blobs, one file per blob reference
root = "blobs"

[renderer]
# Path to a Chromium/Chrome binary; auto-detected when omitted
# chrome_path = "/usr/bin/chromium"
render_timeout_secs = 120

[export]
# Directory where finished archives are written
output_dir = "export"
# Parent directory for per-export staging trees; system temp when omitted
# staging_dir = "staging"
retrieval_concurrency = 4
retrieval_timeout_secs = 60

[logging]
# Enable JSON file logging in addition to console output
local_enabled = false
local_path = "logs"
local_rotation = "daily"
"#
    }
}
