//! `window.location` adapter.

use crate::js;
use nyamedia_core::{PageLocation, PortalError, Result};
use wasm_bindgen::JsValue;
use web_sys::Window;

/// The browser's address bar
pub struct BrowserLocation {
    window: Window,
}

impl BrowserLocation {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl PageLocation for BrowserLocation {
    fn href(&self) -> Result<String> {
        self.window
            .location()
            .href()
            .map_err(js::error(PortalError::Location))
    }

    fn query(&self) -> Result<String> {
        let search = self
            .window
            .location()
            .search()
            .map_err(js::error(PortalError::Location))?;
        Ok(search.strip_prefix('?').unwrap_or(&search).to_string())
    }

    /// Rewrites the URL through `history.replaceState`, so no reload and no
    /// extra history entry.
    fn strip_query(&self) -> Result<()> {
        let location = self.window.location();
        let path = location
            .pathname()
            .map_err(js::error(PortalError::Location))?;
        let hash = location.hash().map_err(js::error(PortalError::Location))?;

        self.window
            .history()
            .map_err(js::error(PortalError::Location))?
            .replace_state_with_url(&JsValue::NULL, "", Some(&format!("{}{}", path, hash)))
            .map_err(js::error(PortalError::Location))
    }
}
