//! Telegram login payload
use super::de::int_or_numeric_string;
use serde::{Deserialize, Serialize};

/// User identity delivered by the Telegram login widget.
///
/// The `hash` signs the remaining fields. It is carried through untouched;
/// verifying it is the backend's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelegramUser {
    /// Telegram user id
    #[serde(deserialize_with = "int_or_numeric_string")]
    pub id: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,

    /// Unix timestamp of the authorization
    #[serde(deserialize_with = "int_or_numeric_string")]
    pub auth_date: i64,

    /// Widget signature over the other fields
    pub hash: String,
}

impl TelegramUser {
    /// Create a user with only the mandatory widget fields set.
    pub fn new(id: i64, auth_date: i64, hash: impl Into<String>) -> Self {
        Self {
            id,
            first_name: None,
            last_name: None,
            username: None,
            photo_url: None,
            auth_date,
            hash: hash.into(),
        }
    }

    /// Name to show in the UI.
    ///
    /// Falls back from full name to `@username` to the numeric id.
    pub fn display_name(&self) -> String {
        let full_name = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if !full_name.is_empty() {
            return full_name;
        }

        match self.username.as_deref().map(str::trim) {
            Some(username) if !username.is_empty() => format!("@{}", username),
            _ => self.id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_widget_payload() {
        let user: TelegramUser = serde_json::from_str(
            r#"{"id":42,"first_name":"Nya","username":"nya","auth_date":1700000000,"hash":"abc"}"#,
        )
        .unwrap();

        assert_eq!(user.id, 42);
        assert_eq!(user.first_name.as_deref(), Some("Nya"));
        assert!(user.last_name.is_none());
        assert_eq!(user.auth_date, 1_700_000_000);
    }

    #[test]
    fn accepts_numeric_strings() {
        let user: TelegramUser =
            serde_json::from_str(r#"{"id":"7","auth_date":"1700000000","hash":"h"}"#).unwrap();
        assert_eq!(user.id, 7);
        assert_eq!(user.auth_date, 1_700_000_000);
    }

    #[test]
    fn rejects_non_numeric_id() {
        let result = serde_json::from_str::<TelegramUser>(
            r#"{"id":"seven","auth_date":1700000000,"hash":"h"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn rejects_missing_hash() {
        let result = serde_json::from_str::<TelegramUser>(r#"{"id":1,"auth_date":1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn display_name_fallbacks() {
        let mut user = TelegramUser::new(5, 0, "h");
        assert_eq!(user.display_name(), "5");

        user.username = Some("kitty".to_string());
        assert_eq!(user.display_name(), "@kitty");

        user.first_name = Some("Ada".to_string());
        user.last_name = Some("Lovelace".to_string());
        assert_eq!(user.display_name(), "Ada Lovelace");
    }

    #[test]
    fn serialization_skips_absent_fields() {
        let json = serde_json::to_string(&TelegramUser::new(1, 2, "h")).unwrap();
        assert_eq!(json, r#"{"id":1,"auth_date":2,"hash":"h"}"#);
    }
}
