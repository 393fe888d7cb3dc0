//! Export orchestration
//!
//! The orchestrator sequences assembly, rendering, retrieval and packaging
//! for one export request; the outcome carries the archive path and any
//! retrieval warnings.

pub mod orchestrator;
pub mod outcome;

pub use orchestrator::{ExportOrchestrator, ExportSettings};
pub use outcome::{ExportOutcome, RetrievalWarning};
