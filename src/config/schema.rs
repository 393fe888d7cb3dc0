//! Configuration schema types
//!
//! Defines the configuration structure mapped from the TOML file.

use serde::{Deserialize, Serialize};

/// Main configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToscaConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Portal data source (collection files consumed read-only)
    #[serde(default)]
    pub data: DataConfig,

    /// Blob store holding attachment bytes
    #[serde(default)]
    pub blobstore: BlobStoreConfig,

    /// Rendering engine settings
    #[serde(default)]
    pub renderer: RendererConfig,

    /// Export pipeline settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ToscaConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.data.validate()?;
        self.blobstore.validate()?;
        self.renderer.validate()?;
        self.export.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(format!(
                "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                self.log_level
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Data source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory holding the portal collection files
    /// (masterplans.json, publicreviews.json, objections.json, attachments.json)
    #[serde(default = "default_collections_dir")]
    pub collections_dir: String,
}

impl DataConfig {
    fn validate(&self) -> Result<(), String> {
        if self.collections_dir.trim().is_empty() {
            return Err("data.collections_dir cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            collections_dir: default_collections_dir(),
        }
    }
}

/// Blob store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlobStoreConfig {
    /// Directory holding attachment blobs, one file per blob reference
    #[serde(default = "default_blobstore_root")]
    pub root: String,
}

impl BlobStoreConfig {
    fn validate(&self) -> Result<(), String> {
        if self.root.trim().is_empty() {
            return Err("blobstore.root cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Default for BlobStoreConfig {
    fn default() -> Self {
        Self {
            root: default_blobstore_root(),
        }
    }
}

/// Rendering engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RendererConfig {
    /// Path to a Chromium/Chrome binary; auto-detected when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chrome_path: Option<String>,

    /// Deadline for a single document render in seconds
    #[serde(default = "default_render_timeout_secs")]
    pub render_timeout_secs: u64,
}

impl RendererConfig {
    fn validate(&self) -> Result<(), String> {
        if self.render_timeout_secs == 0 {
            return Err("renderer.render_timeout_secs must be greater than zero".to_string());
        }
        Ok(())
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            chrome_path: None,
            render_timeout_secs: default_render_timeout_secs(),
        }
    }
}

/// Export pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory where finished archives are written
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Parent directory for per-export staging trees; system temp when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staging_dir: Option<String>,

    /// Maximum attachment retrievals in flight at once
    #[serde(default = "default_retrieval_concurrency")]
    pub retrieval_concurrency: usize,

    /// Deadline for a single attachment retrieval in seconds
    #[serde(default = "default_retrieval_timeout_secs")]
    pub retrieval_timeout_secs: u64,
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.output_dir.trim().is_empty() {
            return Err("export.output_dir cannot be empty".to_string());
        }
        if self.retrieval_concurrency == 0 || self.retrieval_concurrency > 64 {
            return Err(format!(
                "export.retrieval_concurrency must be between 1 and 64, got {}",
                self.retrieval_concurrency
            ));
        }
        if self.retrieval_timeout_secs == 0 {
            return Err("export.retrieval_timeout_secs must be greater than zero".to_string());
        }
        Ok(())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            staging_dir: None,
            retrieval_concurrency: default_retrieval_concurrency(),
            retrieval_timeout_secs: default_retrieval_timeout_secs(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable JSON file logging in addition to console output
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for rotated log files
    #[serde(default = "default_log_path")]
    pub local_path: String,

    /// Rotation policy: "daily" or "hourly"
    #[serde(default = "default_log_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when file logging is enabled".into());
        }
        if !["daily", "hourly"].contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid log rotation: {}. Must be 'daily' or 'hourly'",
                self.local_rotation
            ));
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_log_path(),
            local_rotation: default_log_rotation(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_collections_dir() -> String {
    "data".to_string()
}

fn default_blobstore_root() -> String {
    "blobs".to_string()
}

fn default_render_timeout_secs() -> u64 {
    120
}

fn default_output_dir() -> String {
    "export".to_string()
}

fn default_retrieval_concurrency() -> usize {
    4
}

fn default_retrieval_timeout_secs() -> u64 {
    60
}

fn default_log_path() -> String {
    "logs".to_string()
}

fn default_log_rotation() -> String {
    "daily".to_string()
}
