//! Configuration management
//!
//! TOML-backed configuration with environment variable substitution and
//! `TOSCA_EXPORT_*` overrides. See [`schema::ToscaConfig`] for the full
//! structure and [`loader::load_config`] for loading semantics.

pub mod loader;
pub mod schema;

pub use loader::load_config;
pub use schema::{
    ApplicationConfig, BlobStoreConfig, DataConfig, ExportConfig, LoggingConfig, RendererConfig,
    ToscaConfig,
};
