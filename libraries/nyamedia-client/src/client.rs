//! Portal backend client.

use crate::error::{ClientError, Result};
use crate::types::ClientConfig;
use async_trait::async_trait;
use nyamedia_core::{MediaItem, MediaList, PortalApi, PortalError, RegistrationStatus};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

/// Client for the portal's JSON API.
///
/// Cheap to clone; clones share the underlying connection pool.
///
/// # Example
///
/// ```ignore
/// use nyamedia_client::{ClientConfig, NyamediaClient};
///
/// let client = NyamediaClient::new(ClientConfig::new("https://media.example.com"))?;
/// let status = client.check_user(42).await?;
/// ```
#[derive(Debug, Clone)]
pub struct NyamediaClient {
    http: Client,
    base_url: String,
}

impl NyamediaClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let base_url = normalize_base_url(&config.base_url)?;
        let http = build_http(&config)?;

        Ok(Self { http, base_url })
    }

    /// Get the backend base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Ask whether a Telegram account is registered.
    pub async fn check_user(&self, telegram_id: i64) -> Result<RegistrationStatus> {
        self.get_json(&format!("/api/check_user/{}", telegram_id)).await
    }

    /// Fetch media requests that are still in progress.
    pub async fn pending(&self) -> Result<Vec<MediaItem>> {
        self.list(MediaList::Pending).await
    }

    /// Fetch completed media requests.
    pub async fn archived(&self) -> Result<Vec<MediaItem>> {
        self.list(MediaList::Archived).await
    }

    /// Fetch one of the media request lists.
    pub async fn list(&self, list: MediaList) -> Result<Vec<MediaItem>> {
        let items: Vec<MediaItem> = self.get_json(list.endpoint()).await?;
        debug!(endpoint = list.endpoint(), count = items.len(), "Fetched media list");
        Ok(items)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "GET");

        let response = self.http.get(&url).send().await.map_err(send_error)?;
        let status = response.status();

        if status.is_success() {
            response.json().await.map_err(|e| {
                ClientError::ParseError(format!("Invalid response from {}: {}", path, e))
            })
        } else {
            let message = response.text().await.unwrap_or_default();
            warn!(url = %url, status = status.as_u16(), "Request failed");
            Err(ClientError::ServerError {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl PortalApi for NyamediaClient {
    async fn check_user(&self, telegram_id: i64) -> nyamedia_core::Result<RegistrationStatus> {
        NyamediaClient::check_user(self, telegram_id)
            .await
            .map_err(PortalError::from)
    }

    async fn pending(&self) -> nyamedia_core::Result<Vec<MediaItem>> {
        NyamediaClient::pending(self).await.map_err(PortalError::from)
    }

    async fn archived(&self) -> nyamedia_core::Result<Vec<MediaItem>> {
        NyamediaClient::archived(self).await.map_err(PortalError::from)
    }
}

fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ClientError::InvalidUrl("URL cannot be empty".into()));
    }

    let url = Url::parse(trimmed)
        .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", trimmed, e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ClientError::InvalidUrl(
            "URL must start with http:// or https://".into(),
        ));
    }

    Ok(trimmed.to_string())
}

#[cfg(not(target_arch = "wasm32"))]
fn build_http(config: &ClientConfig) -> Result<Client> {
    use std::time::Duration;

    Client::builder()
        .timeout(config.timeout)
        .connect_timeout(Duration::from_secs(10))
        .user_agent(format!("Nyamedia/{}", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(ClientError::Request)
}

#[cfg(target_arch = "wasm32")]
fn build_http(_config: &ClientConfig) -> Result<Client> {
    Client::builder().build().map_err(ClientError::Request)
}

#[cfg(not(target_arch = "wasm32"))]
fn send_error(e: reqwest::Error) -> ClientError {
    if e.is_connect() || e.is_timeout() {
        ClientError::ServerUnreachable(e.to_string())
    } else {
        ClientError::Request(e)
    }
}

#[cfg(target_arch = "wasm32")]
fn send_error(e: reqwest::Error) -> ClientError {
    ClientError::Request(e)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slashes_are_trimmed() {
        assert_eq!(
            normalize_base_url("https://media.example.com//").unwrap(),
            "https://media.example.com"
        );
    }

    #[test]
    fn non_http_schemes_are_rejected() {
        assert!(matches!(
            normalize_base_url("ftp://media.example.com"),
            Err(ClientError::InvalidUrl(_))
        ));
        assert!(matches!(
            normalize_base_url("media.example.com"),
            Err(ClientError::InvalidUrl(_))
        ));
    }
}
