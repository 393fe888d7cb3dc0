// tosca-export - Report export pipeline for the TOSCA citizen participation portal
// Licensed under the MIT License

//! # tosca-export
//!
//! Report export pipeline for a citizen-participation portal: given a master
//! plan, it reconstructs the hierarchy of public reviews, objections and
//! attachments, renders each objection and a consolidated summary into
//! paginated PDF documents, retrieves attachment blobs, and packages
//! everything into a single ZIP archive.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Pipeline logic (assembly, templating, retrieval, packaging,
//!   orchestration)
//! - [`adapters`] - External collaborators behind traits (data source, blob
//!   store, rendering engine)
//! - [`domain`] - Value types, identifiers and the error taxonomy
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Guarantees
//!
//! - No partial output: a fatal failure in any stage removes the staging
//!   directory before the error surfaces, and no archive is produced.
//! - Serialized rendering: one export holds one rendering session, and
//!   `&mut` access makes concurrent renders within an export impossible.
//! - Join barrier: packaging starts only after every render has succeeded
//!   and every attachment retrieval has reached a terminal outcome.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tosca_export::adapters::{ChromiumRenderer, FsBlobStore, JsonDataSource};
//! use tosca_export::config::load_config;
//! use tosca_export::core::export::{ExportOrchestrator, ExportSettings};
//! use tosca_export::domain::PlanId;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("tosca-export.toml")?;
//!
//!     let data_source = JsonDataSource::load(&config.data.collections_dir).await?;
//!     let blob_store = FsBlobStore::new(&config.blobstore.root);
//!     let renderer = ChromiumRenderer::launch(&config.renderer)?;
//!
//!     let mut orchestrator = ExportOrchestrator::new(
//!         Arc::new(data_source),
//!         Arc::new(blob_store),
//!         Box::new(renderer),
//!         ExportSettings::from_config(&config.export),
//!     );
//!
//!     let outcome = orchestrator.export_report(&PlanId::new("plan-1")?).await?;
//!     println!("Archive written to {}", outcome.archive_path.display());
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
