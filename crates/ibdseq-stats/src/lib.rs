//! ibdseq-stats — Statistical summarizer for the IBD RNA-Seq platform.
//!
//! Every function here is a pure, deterministic transform of its inputs:
//! no randomness, no logging, no I/O outside [`export`] and the JSON
//! [`dataset::DatasetSource`]. Errors are the
//! [`StatsError`] taxonomy from `ibdseq-common` and are always returned to
//! the caller.

pub mod describe;
pub mod fold_change;
pub mod pvalue;
pub mod volcano;
pub mod weights;
pub mod scorer;
pub mod correlation;
pub mod pca;
pub mod dataset;
pub mod differential;
pub mod comparison;
pub mod concordance;
pub mod export;

pub use ibdseq_common::error::StatsError;

pub type Result<T> = std::result::Result<T, StatsError>;
