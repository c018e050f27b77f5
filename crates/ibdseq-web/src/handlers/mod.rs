//! HTTP handlers for all API routes.

pub mod expression;
pub mod pathways;
pub mod models;
pub mod targets;
pub mod search;
pub mod analysis;
pub mod system;

/// Split a comma-separated query value, dropping blanks.
pub(crate) fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Required query parameter, or 400.
pub(crate) fn required<'a>(
    value: &'a Option<String>,
    name: &str,
) -> Result<&'a str, ibdseq_common::error::ApiError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ibdseq_common::error::ApiError::BadRequest(format!("Missing query parameter: {name}")))
}
