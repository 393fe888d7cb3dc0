//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::ToscaConfig;
use crate::domain::errors::ExportError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (`${VAR}` syntax)
/// 3. Parses the TOML into [`ToscaConfig`]
/// 4. Applies environment variable overrides (`TOSCA_EXPORT_*` prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsing fails, a referenced
/// environment variable is unset, or validation fails.
pub fn load_config(path: impl AsRef<Path>) -> Result<ToscaConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ExportError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        ExportError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: ToscaConfig = toml::from_str(&contents)
        .map_err(|e| ExportError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config);

    config
        .validate()
        .map_err(|e| ExportError::Configuration(format!("Configuration validation failed: {e}")))?;

    Ok(config)
}

/// Substitutes environment variables in the format `${VAR_NAME}`
fn substitute_env_vars(contents: &str) -> Result<String> {
    // Pattern only needs to be built once per load; config files are tiny.
    let pattern = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}")
        .map_err(|e| ExportError::Configuration(format!("Invalid substitution pattern: {e}")))?;

    let mut missing = Vec::new();
    let substituted = pattern.replace_all(contents, |caps: &regex::Captures<'_>| {
        let name = &caps[1];
        match std::env::var(name) {
            Ok(value) => value,
            Err(_) => {
                missing.push(name.to_string());
                String::new()
            }
        }
    });

    if !missing.is_empty() {
        return Err(ExportError::Configuration(format!(
            "Environment variable(s) not set: {}",
            missing.join(", ")
        )));
    }

    Ok(substituted.into_owned())
}

/// Applies `TOSCA_EXPORT_*` environment variable overrides
///
/// Overrides take precedence over file values:
/// - `TOSCA_EXPORT_LOG_LEVEL`
/// - `TOSCA_EXPORT_DATA_DIR`
/// - `TOSCA_EXPORT_BLOBSTORE_ROOT`
/// - `TOSCA_EXPORT_OUTPUT_DIR`
fn apply_env_overrides(config: &mut ToscaConfig) {
    if let Ok(level) = std::env::var("TOSCA_EXPORT_LOG_LEVEL") {
        config.application.log_level = level;
    }
    if let Ok(dir) = std::env::var("TOSCA_EXPORT_DATA_DIR") {
        config.data.collections_dir = dir;
    }
    if let Ok(root) = std::env::var("TOSCA_EXPORT_BLOBSTORE_ROOT") {
        config.blobstore.root = root;
    }
    if let Ok(dir) = std::env::var("TOSCA_EXPORT_OUTPUT_DIR") {
        config.export.output_dir = dir;
    }
}
