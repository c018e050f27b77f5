use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Failures of the numeric summarizer. Every variant is reported to the
/// immediate caller; none is fatal since each computation is independent.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StatsError {
    /// Out-of-range or non-finite scalar (e.g. a p-value outside [0, 1]).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Zero control/baseline value in a fold-change denominator.
    #[error("Division by zero: {0}")]
    DivisionByZero(String),

    /// Not enough observations to compute the statistic.
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Zero-variance input where a variance is required.
    #[error("Degenerate input: {0}")]
    DegenerateInput(String),
}

impl StatsError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidInput(reason.into())
    }

    pub fn insufficient(reason: impl Into<String>) -> Self {
        Self::InsufficientData(reason.into())
    }

    pub fn degenerate(reason: impl Into<String>) -> Self {
        Self::DegenerateInput(reason.into())
    }

    /// Prefix the reason, keeping the variant.
    pub fn context(self, ctx: impl std::fmt::Display) -> Self {
        match self {
            Self::InvalidInput(r)     => Self::InvalidInput(format!("{ctx}: {r}")),
            Self::DivisionByZero(r)   => Self::DivisionByZero(format!("{ctx}: {r}")),
            Self::InsufficientData(r) => Self::InsufficientData(format!("{ctx}: {r}")),
            Self::DegenerateInput(r)  => Self::DegenerateInput(format!("{ctx}: {r}")),
        }
    }
}

#[derive(Debug, Error)]
pub enum IbdSeqError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unknown model: {0}")]
    UnknownModel(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Stats(#[from] StatsError),
}

pub type Result<T> = std::result::Result<T, IbdSeqError>;

/// Error surfaced by HTTP handlers. Serialized as `{"error": "<message>"}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Stats(#[from] StatsError),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_)   => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Stats(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<IbdSeqError> for ApiError {
    fn from(err: IbdSeqError) -> Self {
        match err {
            IbdSeqError::UnknownModel(id) => ApiError::NotFound(format!("Unknown model: {id}")),
            IbdSeqError::Stats(e) => ApiError::Stats(e),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
