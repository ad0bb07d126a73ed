//! Page-level configuration handed from the host page to the browser client
//!
//! The portal host writes these as `<meta name=".." content="..">` tags; the
//! browser client reads them back on startup.

/// Telegram bot handle for the login widget
pub const META_BOT_USERNAME: &str = "nyamedia:bot-username";

/// Where the widget sends the browser after login
pub const META_REDIRECT_URL: &str = "nyamedia:redirect-url";

/// Base URL of the backend API; defaults to the page origin
pub const META_API_BASE: &str = "nyamedia:api-base";

/// `tracing` filter directives for the browser console
pub const META_LOG_FILTER: &str = "nyamedia:log";
