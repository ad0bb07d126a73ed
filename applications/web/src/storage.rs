//! `sessionStorage` adapter.

use crate::js;
use nyamedia_core::{PortalError, Result, SessionStore};
use web_sys::{Storage, Window};

/// Session store backed by the window's `sessionStorage`
pub struct BrowserSessionStore {
    storage: Storage,
}

impl BrowserSessionStore {
    /// Fails when storage is disabled (some private browsing modes).
    pub fn new(window: &Window) -> Result<Self> {
        let storage = window
            .session_storage()
            .map_err(js::error(PortalError::Storage))?
            .ok_or_else(|| PortalError::storage("sessionStorage is unavailable"))?;
        Ok(Self { storage })
    }
}

impl SessionStore for BrowserSessionStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(js::error(PortalError::Storage))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.storage
            .set_item(key, value)
            .map_err(js::error(PortalError::Storage))
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.storage
            .remove_item(key)
            .map_err(js::error(PortalError::Storage))
    }
}
