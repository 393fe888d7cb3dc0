//! External collaborators behind trait seams
//!
//! The portal database, the blob store and the rendering engine are external
//! systems; the pipeline talks to them through the traits defined here, with
//! one concrete adapter each.

pub mod blobstore;
pub mod datasource;
pub mod renderer;

pub use blobstore::{BlobStore, FsBlobStore};
pub use datasource::{JsonDataSource, ReportDataSource};
pub use renderer::{ChromiumRenderer, DocumentRenderer};
