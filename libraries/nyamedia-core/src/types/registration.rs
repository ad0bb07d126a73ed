//! Registration status returned by the backend
use serde::{Deserialize, Serialize};

/// Link between a Telegram identity and an internal account.
///
/// Only these two fields are interpreted; anything else the backend sends is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationStatus {
    #[serde(default)]
    pub registered: bool,

    /// Account name on the media server, when registered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_username: Option<String>,
}

impl RegistrationStatus {
    pub fn registered(database_username: impl Into<String>) -> Self {
        Self {
            registered: true,
            database_username: Some(database_username.into()),
        }
    }

    pub fn unregistered() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_flag_reads_as_unregistered() {
        let status: RegistrationStatus = serde_json::from_str("{}").unwrap();
        assert!(!status.registered);
        assert!(status.database_username.is_none());
    }

    #[test]
    fn ignores_unknown_fields() {
        let status: RegistrationStatus =
            serde_json::from_str(r#"{"registered":true,"database_username":"foo","admin":true}"#)
                .unwrap();
        assert_eq!(status, RegistrationStatus::registered("foo"));
    }
}
