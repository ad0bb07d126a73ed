/// Portal host error types
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PortalServerError>;

#[derive(Debug, Error)]
pub enum PortalServerError {
    #[error("No such path: {0}")]
    NotFound(String),

    #[error("Method {0} not allowed")]
    MethodNotAllowed(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Failed to read web client: {0}")]
    Io(#[from] std::io::Error),
}

impl PortalServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::Config(_) | Self::Internal(_) | Self::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for PortalServerError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Client errors echo the request detail; server errors stay opaque
        let message = match self {
            Self::NotFound(path) => path,
            Self::MethodNotAllowed(method) => method,
            other => {
                tracing::error!(error = %other, "Request failed");
                status
                    .canonical_reason()
                    .unwrap_or("Internal Server Error")
                    .to_string()
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_hide_details() {
        let response = PortalServerError::Config("secret path".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn io_errors_are_internal() {
        let err: PortalServerError = std::io::Error::other("disk").into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            PortalServerError::NotFound("/api/x".into()).status(),
            StatusCode::NOT_FOUND
        );
    }
}
