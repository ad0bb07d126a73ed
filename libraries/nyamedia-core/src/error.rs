//! Error types for the portal client core

use thiserror::Error;

/// Result type alias using `PortalError`
pub type Result<T> = std::result::Result<T, PortalError>;

/// Core error type for the portal client
///
/// Errors stay typed inside the crate and are collapsed to a generic
/// user-facing message at the state boundary (see [`messages`]).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PortalError {
    /// Backend could not be reached
    #[error("Network error: {0}")]
    Network(String),

    /// Backend answered with a non-success status
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Backend payload could not be decoded
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Session storage access failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Login widget could not be mounted or unmounted
    #[error("Login widget error: {0}")]
    Widget(String),

    /// Page location could not be read or rewritten
    #[error("Location error: {0}")]
    Location(String),

    /// Login widget is misconfigured
    #[error("Invalid widget configuration: {0}")]
    Configuration(String),
}

impl PortalError {
    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a widget host error
    pub fn widget(msg: impl Into<String>) -> Self {
        Self::Widget(msg.into())
    }

    /// Create a configuration error
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

impl From<serde_json::Error> for PortalError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<url::ParseError> for PortalError {
    fn from(err: url::ParseError) -> Self {
        Self::Location(err.to_string())
    }
}

/// Generic messages shown to the user.
///
/// Every failure of a given category surfaces as the same string.
pub mod messages {
    /// Registration check failed
    pub const REGISTRATION_CHECK_FAILED: &str =
        "Failed to check registration status. Please try again later.";

    /// Pending/archived fetch failed
    pub const MEDIA_FETCH_FAILED: &str = "Failed to load media requests. Please try again later.";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_error_display_includes_status() {
        let err = PortalError::Server {
            status: 502,
            message: "bad gateway".to_string(),
        };
        assert_eq!(err.to_string(), "Server error (502): bad gateway");
    }

    #[test]
    fn json_error_converts_to_parse() {
        let err: PortalError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, PortalError::Parse(_)));
    }
}
