//! Page configuration read from `<meta>` tags.

use nyamedia_core::page::{META_API_BASE, META_BOT_USERNAME, META_LOG_FILTER, META_REDIRECT_URL};
use web_sys::Document;

const DEFAULT_LOG_FILTER: &str = "info";

/// Settings the host page passes to the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageConfig {
    /// Raw bot handle; validated by the core
    pub bot_username: String,
    pub redirect_url: Option<String>,
    /// Absolute base URL of the backend API
    pub api_base: String,
    pub log_filter: String,
}

impl PageConfig {
    /// Read the meta tags of `document`. `origin` is the page origin, used
    /// when no API base is given or it is a path.
    pub fn from_document(document: &Document, origin: &str) -> Self {
        Self::from_lookup(|name| meta_content(document, name), origin)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>, origin: &str) -> Self {
        let value = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_base = match value(META_API_BASE) {
            Some(base) if base.starts_with('/') => {
                format!("{}{}", origin.trim_end_matches('/'), base)
            }
            Some(base) => base,
            None => origin.to_string(),
        };

        Self {
            bot_username: value(META_BOT_USERNAME).unwrap_or_default(),
            redirect_url: value(META_REDIRECT_URL),
            api_base,
            log_filter: value(META_LOG_FILTER).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        }
    }
}

fn meta_content(document: &Document, name: &str) -> Option<String> {
    document
        .query_selector(&format!("meta[name=\"{}\"]", name))
        .ok()
        .flatten()?
        .get_attribute("content")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(tags: &[(&str, &str)]) -> PageConfig {
        let tags: HashMap<String, String> = tags
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        PageConfig::from_lookup(|name| tags.get(name).cloned(), "https://portal.example")
    }

    #[test]
    fn defaults_to_page_origin() {
        let config = config(&[(META_BOT_USERNAME, "nyamedia_bot")]);
        assert_eq!(config.api_base, "https://portal.example");
        assert_eq!(config.bot_username, "nyamedia_bot");
        assert!(config.redirect_url.is_none());
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn path_api_base_is_made_absolute() {
        let config = config(&[(META_API_BASE, "/backend")]);
        assert_eq!(config.api_base, "https://portal.example/backend");
    }

    #[test]
    fn blank_values_count_as_missing() {
        let config = config(&[(META_REDIRECT_URL, "  "), (META_API_BASE, "")]);
        assert!(config.redirect_url.is_none());
        assert_eq!(config.api_base, "https://portal.example");
    }
}
