//! Telegram login widget integration
//!
//! The widget is a third-party script tag configured through `data-*`
//! attributes. After the user approves, it calls a page-supplied function with
//! the signed user payload. That function is an [`AuthCallback`] handed to
//! [`WidgetMount::mount`], registered with the host while the widget is mounted
//! and dropped on unmount.

use crate::error::{PortalError, Result};
use crate::traits::{AuthCallback, WidgetHost};
use tracing::{debug, info};

/// Script URL of the Telegram login widget
pub const WIDGET_SCRIPT_SRC: &str = "https://telegram.org/js/telegram-widget.js?22";

/// Name under which the auth callback is exposed to the widget
pub const AUTH_CALLBACK_NAME: &str = "onTelegramAuth";

/// Rendered button size
pub const WIDGET_SIZE: &str = "large";

/// The portal asks for permission to message the user
pub const WIDGET_REQUEST_ACCESS: &str = "write";

const MAX_HANDLE_LEN: usize = 64;

/// Validated widget configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetConfig {
    bot_username: String,
    redirect_url: Option<String>,
}

impl WidgetConfig {
    /// Build a config from the externally supplied bot handle and redirect URL.
    ///
    /// Fails when the handle is empty, numeric, or not a Telegram username.
    pub fn new(bot_username: &str, redirect_url: Option<&str>) -> Result<Self> {
        let bot_username = validate_bot_username(bot_username)?;
        let redirect_url = redirect_url
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_string);

        Ok(Self {
            bot_username,
            redirect_url,
        })
    }

    pub fn bot_username(&self) -> &str {
        &self.bot_username
    }

    pub fn redirect_url(&self) -> Option<&str> {
        self.redirect_url.as_deref()
    }

    /// Script tag for a page currently at `page_url`.
    ///
    /// The widget sends the user back to the configured redirect URL, or to
    /// the current page when none is configured.
    pub fn script(&self, page_url: &str) -> WidgetScript {
        let auth_url = self.redirect_url.as_deref().unwrap_or(page_url);

        let attributes = vec![
            ("data-telegram-login", self.bot_username.clone()),
            ("data-size", WIDGET_SIZE.to_string()),
            ("data-auth-url", auth_url.to_string()),
            ("data-request-access", WIDGET_REQUEST_ACCESS.to_string()),
            ("data-onauth", format!("{}(user)", AUTH_CALLBACK_NAME)),
        ];

        WidgetScript {
            src: WIDGET_SCRIPT_SRC,
            attributes,
        }
    }
}

/// Check a bot handle, returning it without a leading `@`.
pub fn validate_bot_username(raw: &str) -> Result<String> {
    let handle = raw.trim();
    let handle = handle.strip_prefix('@').unwrap_or(handle);

    if handle.is_empty() {
        return Err(PortalError::configuration(
            "bot username is not set (expected the bot's @handle)",
        ));
    }

    if handle.chars().all(|c| c.is_ascii_digit()) {
        return Err(PortalError::configuration(format!(
            "bot username must be the bot's @handle, not its numeric id ({})",
            handle
        )));
    }

    if handle.len() > MAX_HANDLE_LEN
        || !handle.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(PortalError::configuration(format!(
            "bot username {:?} is not a valid Telegram handle",
            handle
        )));
    }

    Ok(handle.to_string())
}

/// A `<script>` tag to inject
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetScript {
    pub src: &'static str,
    pub attributes: Vec<(&'static str, String)>,
}

impl WidgetScript {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Mount guard for the widget.
///
/// The script is injected at most once per logged-out period; mounting again
/// while mounted is a no-op.
#[derive(Debug, Default)]
pub struct WidgetMount {
    mounted: bool,
}

impl WidgetMount {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Register `on_auth` and inject the script.
    ///
    /// Returns `false` when the widget was already mounted.
    pub fn mount(
        &mut self,
        host: &mut dyn WidgetHost,
        script: &WidgetScript,
        on_auth: AuthCallback,
    ) -> Result<bool> {
        if self.mounted {
            debug!("Login widget already mounted");
            return Ok(false);
        }

        host.register_callback(AUTH_CALLBACK_NAME, on_auth)?;
        if let Err(e) = host.inject_script(script) {
            host.unregister_callback(AUTH_CALLBACK_NAME)?;
            return Err(e);
        }

        self.mounted = true;
        info!(
            bot = script.attribute("data-telegram-login").unwrap_or_default(),
            "Mounted login widget"
        );
        Ok(true)
    }

    /// Remove the script and drop the callback. No-op when not mounted.
    pub fn unmount(&mut self, host: &mut dyn WidgetHost) -> Result<()> {
        if !self.mounted {
            return Ok(());
        }

        self.mounted = false;
        host.remove_script()?;
        host.unregister_callback(AUTH_CALLBACK_NAME)?;
        debug!("Unmounted login widget");
        Ok(())
    }
}
