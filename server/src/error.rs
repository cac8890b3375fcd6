use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use parley_common::api::ErrorResponse;
use parley_common::MessageId;

/// Failures reported by the HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("message {0} not found")]
    NotFound(MessageId),

    /// A required field was missing or blank. Nothing was changed.
    #[error("{0}")]
    InvalidInput(&'static str),

    /// The request could not be parsed at all.
    #[error("malformed request: {0}")]
    Malformed(String),
}

impl ServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::Malformed(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
