//! Error types for the portal client.

use nyamedia_core::PortalError;
use thiserror::Error;

/// Errors that can occur when talking to the portal backend.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error response
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Invalid backend URL
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse server response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Backend is offline or unreachable
    #[error("Server unreachable: {0}")]
    ServerUnreachable(String),
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

impl From<ClientError> for PortalError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Request(e) => PortalError::network(e.to_string()),
            ClientError::ServerUnreachable(msg) => PortalError::Network(msg),
            ClientError::ServerError { status, message } => {
                PortalError::Server { status, message }
            }
            ClientError::ParseError(msg) => PortalError::Parse(msg),
            ClientError::InvalidUrl(msg) => PortalError::Configuration(msg),
        }
    }
}
