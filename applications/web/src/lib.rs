//! Nyamedia Portal - browser client
//!
//! WebAssembly bindings that run the portal core in the browser. The browser
//! supplies the platform pieces:
//!
//! - `sessionStorage` for the login payload ([`BrowserSessionStore`])
//! - `window.location` and `history.replaceState` ([`BrowserLocation`])
//! - a DOM container plus a global callback for the Telegram widget
//!   ([`DomWidgetHost`])
//!
//! # Usage
//!
//! ```js
//! import init, { WebPortal } from '/pkg/nyamedia_web.js';
//!
//! await init();
//! const portal = new WebPortal('app');
//! portal.start();
//! ```

mod app;
mod config;
mod js;
mod location;
mod logging;
mod storage;
mod widget_host;

pub use app::WebPortal;
pub use config::PageConfig;
pub use location::BrowserLocation;
pub use storage::BrowserSessionStore;
pub use widget_host::DomWidgetHost;
