//! Media request types
use super::de::{lenient_id, null_as_default};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A media request as listed by `/api/pending` and `/api/archived`.
///
/// Every field may be missing; rendering degrades instead of failing.
/// Explicit `null`s read as absent and `id` may arrive as a numeric string.
/// Keys this type does not know are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Catalogue the request points at (e.g. "tmdb", "bangumi")
    #[serde(default, deserialize_with = "null_as_default")]
    pub source: String,

    /// Identifier within `source`
    #[serde(default, deserialize_with = "null_as_default")]
    pub media_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<i64>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MediaItem {
    /// Title for the card header.
    ///
    /// Untitled requests show `source:media_id`.
    pub fn display_title(&self) -> String {
        match self.title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() => title.to_string(),
            _ if self.source.is_empty() && self.media_id.is_empty() => format!("#{}", self.id),
            _ => format!("{}:{}", self.source, self.media_id),
        }
    }

    /// Decoded request status, if the backend sent one.
    pub fn request_status(&self) -> Option<RequestStatus> {
        self.status.map(RequestStatus::from_code)
    }
}

/// Lifecycle of a media request on the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    Submitted,
    Archived,
    Cancelled,
    Invalid,
    Unknown(i64),
}

impl RequestStatus {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::Submitted,
            1 => Self::Archived,
            2 => Self::Cancelled,
            3 => Self::Invalid,
            other => Self::Unknown(other),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::Archived => "archived",
            Self::Cancelled => "cancelled",
            Self::Invalid => "invalid",
            Self::Unknown(_) => "unknown",
        }
    }
}

/// Which backend list an item belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaList {
    Pending,
    Archived,
}

impl MediaList {
    /// Path of the backend endpoint serving this list
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::Pending => "/api/pending",
            Self::Archived => "/api/archived",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_item_deserializes() {
        let item: MediaItem = serde_json::from_str(
            r#"{"id":1,"source":"x","media_id":"y","created_at":"2024-01-01"}"#,
        )
        .unwrap();

        assert_eq!(item.id, 1);
        assert!(item.poster.is_none());
        assert!(item.title.is_none());
        assert!(item.extra.is_empty());
        assert_eq!(item.display_title(), "x:y");
    }

    #[test]
    fn unknown_keys_are_preserved() {
        let item: MediaItem =
            serde_json::from_str(r#"{"id":3,"request_user":99,"media_request_id":4}"#).unwrap();

        assert_eq!(item.extra.get("request_user"), Some(&Value::from(99)));
        assert_eq!(item.extra.get("media_request_id"), Some(&Value::from(4)));

        let round_trip = serde_json::to_value(&item).unwrap();
        assert_eq!(round_trip["request_user"], Value::from(99));
    }

    #[test]
    fn empty_object_degrades() {
        let item: MediaItem = serde_json::from_str("{}").unwrap();
        assert_eq!(item.display_title(), "#0");
        assert!(item.request_status().is_none());
    }

    #[test]
    fn nulls_and_string_ids_degrade() {
        let items: Vec<MediaItem> = serde_json::from_str(
            r#"[
                {"id":"7","source":null,"media_id":null,"created_at":null,"poster":null},
                {"id":null,"title":"Spirited Away"}
            ]"#,
        )
        .unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, 7);
        assert!(items[0].source.is_empty());
        assert!(items[0].created_at.is_empty());
        assert!(items[0].poster.is_none());
        assert_eq!(items[0].display_title(), "#7");
        assert_eq!(items[1].id, 0);
        assert_eq!(items[1].display_title(), "Spirited Away");
    }

    #[test]
    fn non_numeric_id_is_rejected() {
        assert!(serde_json::from_str::<MediaItem>(r#"{"id":"seven"}"#).is_err());
    }

    #[test]
    fn status_codes() {
        assert_eq!(RequestStatus::from_code(0), RequestStatus::Submitted);
        assert_eq!(RequestStatus::from_code(1).label(), "archived");
        assert_eq!(RequestStatus::from_code(9), RequestStatus::Unknown(9));
        assert_eq!(RequestStatus::from_code(9).label(), "unknown");
    }

    #[test]
    fn blank_title_falls_back() {
        let item = MediaItem {
            title: Some("   ".to_string()),
            source: "tmdb".to_string(),
            media_id: "603".to_string(),
            ..Default::default()
        };
        assert_eq!(item.display_title(), "tmdb:603");
    }
}
