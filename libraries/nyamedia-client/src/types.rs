//! Client configuration.

use std::time::Duration;

/// Configuration for connecting to the portal backend.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the backend (e.g., "https://media.example.com")
    pub base_url: String,
    /// Whole-request timeout. Ignored in the browser, where the fetch API
    /// has no timeout knob.
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
