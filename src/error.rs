//! Error types for Palingua
//!
//! Every failure the translation flow can hit is converted into one of these
//! variants and surfaced to the user as a JSON error banner; none of them
//! crash the process. All errors implement `IntoResponse` for Axum handlers.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Main error type for the application
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read config file '{path}': {source}")]
    ConfigFileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ConfigParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration in '{path}': {reason}")]
    ConfigValidationFailed { path: String, reason: String },

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("No usable model variant; tried: {tried}")]
    NoModelAvailable { tried: String },

    #[error("The remote service is rate limiting requests; wait a moment and try again")]
    RateLimitExceeded { model: String },

    #[error("Model '{model}' is not available from the remote service")]
    ModelUnavailable { model: String },

    #[error("Remote generation failed: {0}")]
    Unknown(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// True if a single advance-to-next-preference retry may help.
    ///
    /// Only a model-unavailable failure qualifies: a different preference
    /// entry may still exist in the remote catalog. Rate limiting and unknown
    /// failures must surface to the user instead of looping.
    pub fn is_model_unavailable(&self) -> bool {
        matches!(self, Self::ModelUnavailable { .. })
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::Config(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
            Self::ConfigFileRead { .. } => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
            Self::ConfigParseFailed { .. } => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
            Self::ConfigValidationFailed { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            Self::NoModelAvailable { .. } => (StatusCode::BAD_GATEWAY, self.to_string()),
            Self::RateLimitExceeded { .. } => (StatusCode::TOO_MANY_REQUESTS, self.to_string()),
            Self::ModelUnavailable { .. } => (StatusCode::BAD_GATEWAY, self.to_string()),
            Self::Unknown(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

/// Convenience type alias for Results
pub type AppResult<T> = Result<T, AppError>;
