//! ibdseq-web — HTTP backend for the IBD RNA-Seq website.
//! Serves:
//!   - Gene expression and pathway chart data
//!   - Mouse model vs human comparison and target rankings
//!   - DE tables, volcano points, correlation matrix and PCA
//!   - The static site itself

pub mod config;
pub mod router;
pub mod handlers;
pub mod state;
pub mod setup;
