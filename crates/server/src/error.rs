use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use pricematch::{PipelineError, SemanticError};
use serde::{Deserialize, Serialize};
use serde_json::json;

pub type ServerResult<T> = Result<T, ServerError>;

/// Server error types
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found")]
    NotFound,
}

/// API error response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ServerError {
    /// Get HTTP status code for this error
    fn status_code(&self) -> StatusCode {
        match self {
            ServerError::Authentication(_) => StatusCode::UNAUTHORIZED,
            ServerError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::NotFound => StatusCode::NOT_FOUND,
            ServerError::Pipeline(err) if err.is_validation() => StatusCode::UNPROCESSABLE_ENTITY,
            // Upstream embedding API failures.
            ServerError::Pipeline(PipelineError::Embedding(SemanticError::Provider { .. })) => {
                StatusCode::BAD_GATEWAY
            }
            ServerError::Pipeline(_) | ServerError::Internal(_) | ServerError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get error code string
    fn error_code(&self) -> &'static str {
        match self {
            ServerError::Authentication(_) => "AUTH_FAILED",
            ServerError::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            ServerError::BadRequest(_) => "BAD_REQUEST",
            ServerError::Pipeline(PipelineError::EmptyReferences) => "EMPTY_PRICELIST",
            ServerError::Pipeline(PipelineError::EmptyInquiries) => "EMPTY_INQUIRY",
            ServerError::Pipeline(PipelineError::Embedding(_)) => "EMBEDDING_ERROR",
            ServerError::Pipeline(_) => "PIPELINE_ERROR",
            ServerError::Internal(_) => "INTERNAL_ERROR",
            ServerError::Config(_) => "CONFIG_ERROR",
            ServerError::NotFound => "NOT_FOUND",
        }
    }

    /// Batch position for embedding failures, echoed to the client.
    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ServerError::Pipeline(PipelineError::Embedding(err)) => {
                let mut details = json!({ "batch_index": err.batch_index() });
                if let SemanticError::Provider { start, end, .. } = err {
                    details["start"] = json!(start);
                    details["end"] = json!(end);
                }
                Some(details)
            }
            _ => None,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = ErrorResponse {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message: self.to_string(),
                details: self.details(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<std::net::AddrParseError> for ServerError {
    fn from(err: std::net::AddrParseError) -> Self {
        ServerError::Config(format!("Invalid address: {err}"))
    }
}

impl From<std::io::Error> for ServerError {
    fn from(err: std::io::Error) -> Self {
        ServerError::Internal(format!("IO error: {err}"))
    }
}

impl From<serde_json::Error> for ServerError {
    fn from(err: serde_json::Error) -> Self {
        ServerError::BadRequest(format!("JSON parse error: {err}"))
    }
}

impl From<anyhow::Error> for ServerError {
    fn from(err: anyhow::Error) -> Self {
        ServerError::Internal(err.to_string())
    }
}
