//! Platform seams for the portal client
//!
//! The core never touches browser APIs directly. Hosts provide these traits:
//! the browser build wires them to `sessionStorage`, `window.location` and the
//! DOM; tests and native tools use the in-memory versions in [`crate::memory`].
use crate::error::Result;
use crate::types::{MediaItem, RegistrationStatus, TelegramUser};
use crate::widget::WidgetScript;
use async_trait::async_trait;
use std::rc::Rc;

/// Key/value session storage (the browser's `sessionStorage`)
pub trait SessionStore {
    /// Read a value. `Ok(None)` when the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a key. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

impl<T: SessionStore + ?Sized> SessionStore for Rc<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// The page's current URL
pub trait PageLocation {
    /// Full URL of the page, used as the widget's auth target
    fn href(&self) -> Result<String>;

    /// Query string without the leading `?`; empty when there is none
    fn query(&self) -> Result<String>;

    /// Drop the query string from the visible URL without reloading
    fn strip_query(&self) -> Result<()>;
}

impl<T: PageLocation + ?Sized> PageLocation for Rc<T> {
    fn href(&self) -> Result<String> {
        (**self).href()
    }

    fn query(&self) -> Result<String> {
        (**self).query()
    }

    fn strip_query(&self) -> Result<()> {
        (**self).strip_query()
    }
}

/// Backend API consumed by the portal
///
/// Implemented over HTTP by `nyamedia-client`.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait PortalApi {
    /// `GET /api/check_user/{telegram_id}`
    async fn check_user(&self, telegram_id: i64) -> Result<RegistrationStatus>;

    /// `GET /api/pending`
    async fn pending(&self) -> Result<Vec<MediaItem>>;

    /// `GET /api/archived`
    async fn archived(&self) -> Result<Vec<MediaItem>>;
}

/// Handler the login widget calls with the signed user payload
pub type AuthCallback = Box<dyn Fn(TelegramUser)>;

/// Place where the login widget lives (a DOM container in the browser)
pub trait WidgetHost {
    /// Insert the widget script tag
    fn inject_script(&mut self, script: &WidgetScript) -> Result<()>;

    /// Remove the widget script tag and whatever it rendered
    fn remove_script(&mut self) -> Result<()>;

    /// Make `handler` reachable under `name` for the widget to call
    fn register_callback(&mut self, name: &str, handler: AuthCallback) -> Result<()>;

    /// Drop the handler registered under `name`
    fn unregister_callback(&mut self, name: &str) -> Result<()>;
}
