//! Nyamedia Portal Core
//!
//! Platform-agnostic client logic for the Nyamedia media-request portal.
//!
//! A user signs in with the Telegram login widget, the portal asks the backend
//! whether that Telegram account is registered, and registered users see their
//! pending and archived media requests.
//!
//! # Architecture
//!
//! - **Domain Types**: `TelegramUser`, `RegistrationStatus`, `MediaItem`
//! - **Platform Traits**: `SessionStore`, `PageLocation`, `WidgetHost`, `PortalApi`
//! - **State**: [`Portal`] drives login capture, the registration check and the
//!   media fetch; [`PortalView`] and [`render`] turn its state into markup
//! - **Error Handling**: unified `PortalError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use nyamedia_core::{render, LoginView, PortalView, WidgetConfig};
//!
//! let config = WidgetConfig::new("@nyamedia_bot", None).unwrap();
//! let script = config.script("https://portal.example/");
//! assert_eq!(script.attribute("data-telegram-login"), Some("nyamedia_bot"));
//!
//! let html = render(&PortalView::Login(LoginView {
//!     config_error: None,
//!     bot_username: Some(config.bot_username().to_string()),
//! }));
//! assert!(html.contains("telegram-login"));
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod memory;
pub mod page;
pub mod portal;
pub mod render;
pub mod session;
pub mod traits;
pub mod types;
pub mod view;
pub mod widget;

// Re-export commonly used types
pub use error::{messages, PortalError, Result};
pub use portal::{ChangeListener, CheckOutcome, Portal, PortalState};
pub use render::{render, WIDGET_CONTAINER_ID};
pub use session::{LoginSource, SESSION_KEY};
pub use traits::{AuthCallback, PageLocation, PortalApi, SessionStore, WidgetHost};
pub use types::{MediaItem, MediaList, RegistrationStatus, RequestStatus, TelegramUser};
pub use view::{
    CheckingView, DashboardTab, DashboardView, DeniedView, LoginView, MediaCard, PortalAction,
    PortalView, TabView,
};
pub use widget::{
    validate_bot_username, WidgetConfig, WidgetMount, WidgetScript, AUTH_CALLBACK_NAME,
    WIDGET_REQUEST_ACCESS, WIDGET_SCRIPT_SRC, WIDGET_SIZE,
};
