//! Core pipeline logic
//!
//! The report export pipeline: hierarchy assembly, document templating,
//! staging lifecycle, attachment retrieval, archive packaging and the
//! orchestrator tying them together.

pub mod archive;
pub mod assemble;
pub mod export;
pub mod retrieve;
pub mod staging;
pub mod template;
