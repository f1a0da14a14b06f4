use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use shelf_upload::UploadResponse;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("store error: {0}")]
    Store(#[from] shelf_store::StoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

/// Request-level failure that never reached the orchestrator.
///
/// Upload outcomes, including failed ones, are answered with `200` and an
/// [`UploadResponse`]; only malformed requests take this path.
#[derive(Debug, Error)]
pub enum AppError {
    /// Multipart body could not be read (400, or 413 when over the limit).
    #[error("invalid multipart body: {0}")]
    Multipart(#[from] MultipartError),

    /// Body was readable but its contents were not (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Server-side fault (500). The message is logged, not returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Multipart(e) => e.status(),
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServerError> for AppError {
    fn from(e: ServerError) -> Self {
        Self::Internal(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::Internal(_) => {
                tracing::error!(error = %self, "internal server error");
                "An internal error occurred".to_string()
            }
            other => {
                tracing::warn!(error = %other, status = status.as_u16(), "rejected request");
                other.to_string()
            }
        };
        (status, Json(UploadResponse::failure(message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses() {
        assert_eq!(AppError::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::Internal("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_details_are_hidden() {
        let resp = AppError::Internal("db password wrong".into()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn server_error_becomes_internal() {
        let e: AppError = ServerError::Config("missing owner".into()).into();
        assert!(matches!(e, AppError::Internal(m) if m.contains("missing owner")));
    }
}
