//! ibdseq-common — Shared types, errors, and the model/pathway catalog used across all ibdseq crates.

pub mod error;
pub mod catalog;

// Re-export commonly used types
pub use catalog::{Catalog, ModelSpec, Species};
pub use error::{ApiError, IbdSeqError, StatsError};
