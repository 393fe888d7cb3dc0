// tosca-export - Report export pipeline for the TOSCA citizen participation portal
// Licensed under the MIT License

use clap::Parser;
use std::process;
use tosca_export::cli::{Cli, Commands};
use tosca_export::config::load_config;
use tosca_export::logging::{init_logging, resolve_settings};

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // The config file drives the log level and optional file logging. A load
    // failure here means console-only defaults; the command re-loads the
    // config and reports the error properly.
    let loaded = load_config(&cli.config).ok();
    let (log_level, logging_config) = resolve_settings(cli.log_level.as_deref(), loaded.as_ref());
    let _guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(5);
        }
    };

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        "tosca-export starting"
    );

    let exit_code = match execute_command(&cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            5
        }
    };

    process::exit(exit_code);
}

/// Execute the CLI command
async fn execute_command(cli: &Cli) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Export(args) => args.execute(&cli.config).await,
        Commands::ValidateConfig(args) => args.execute(&cli.config).await,
        Commands::Init(args) => args.execute().await,
    }
}
