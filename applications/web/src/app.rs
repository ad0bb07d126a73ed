//! WASM-facing portal wrapper
//!
//! Owns the [`Portal`], renders its view into a root element and re-renders
//! whenever the portal reports a state change.

use crate::config::PageConfig;
use crate::js;
use crate::location::BrowserLocation;
use crate::logging;
use crate::storage::BrowserSessionStore;
use crate::widget_host::DomWidgetHost;
use js_sys::Function;
use nyamedia_client::{ClientConfig, NyamediaClient};
use nyamedia_core::memory::MemorySessionStore;
use nyamedia_core::{
    render, AuthCallback, DashboardTab, Portal, PortalAction, SessionStore, TelegramUser,
    WidgetConfig, WIDGET_CONTAINER_ID,
};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::{debug, error, info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, Event};

struct App {
    portal: Portal<NyamediaClient>,
    root: Element,
    widget_host: RefCell<DomWidgetHost>,
    /// Markup currently in `root`
    rendered: RefCell<String>,
    on_change: RefCell<Option<Function>>,
    click_handler: RefCell<Option<Closure<dyn FnMut(Event)>>>,
}

impl App {
    /// Bring the DOM in line with the portal state.
    fn render(self: &Rc<Self>) {
        let html = render(&self.portal.view());

        // Replacing identical markup would tear down a mounted widget
        if *self.rendered.borrow() != html {
            self.root.set_inner_html(&html);
            *self.rendered.borrow_mut() = html;
        }

        let weak = Rc::downgrade(self);
        let synced = self
            .portal
            .sync_widget(&mut *self.widget_host.borrow_mut(), move || {
                auth_callback(weak)
            });
        if let Err(e) = synced {
            error!(error = %e, "Failed to sync login widget");
        }

        let on_change = self.on_change.borrow().clone();
        if let Some(callback) = on_change {
            if let Err(e) = callback.call0(&JsValue::NULL) {
                warn!(error = %js::describe(&e), "onChange callback threw");
            }
        }
    }

    fn attach_click_handler(self: &Rc<Self>) -> Result<(), JsValue> {
        let weak = Rc::downgrade(self);
        let handler = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let Some(app) = weak.upgrade() else {
                return;
            };
            let Some(action) = clicked_action(&event) else {
                return;
            };
            debug!(%action, "UI action");
            spawn_local(async move {
                app.portal.dispatch(action).await;
            });
        });

        self.root
            .add_event_listener_with_callback("click", handler.as_ref().unchecked_ref())?;
        *self.click_handler.borrow_mut() = Some(handler);
        Ok(())
    }

    fn detach_click_handler(&self) {
        if let Some(handler) = self.click_handler.borrow_mut().take() {
            let _ = self
                .root
                .remove_event_listener_with_callback("click", handler.as_ref().unchecked_ref());
        }
    }

    fn spawn_action(self: &Rc<Self>, action: PortalAction) {
        let app = Rc::clone(self);
        spawn_local(async move {
            app.portal.dispatch(action).await;
        });
    }
}

/// Widget callback: log the user in on the event loop.
fn auth_callback(app: Weak<App>) -> AuthCallback {
    Box::new(move |user: TelegramUser| {
        let Some(app) = app.upgrade() else {
            return;
        };
        spawn_local(async move {
            let outcome = app.portal.login(user).await;
            debug!(?outcome, "Widget login finished");
        });
    })
}

/// Action of the nearest `[data-action]` ancestor of the click target
fn clicked_action(event: &Event) -> Option<PortalAction> {
    let target = event.target()?.dyn_into::<Element>().ok()?;
    let element = target.closest("[data-action]").ok().flatten()?;
    let raw = element.get_attribute("data-action")?;

    match raw.parse() {
        Ok(action) => Some(action),
        Err(e) => {
            warn!(action = %raw, error = %e, "Unknown UI action");
            None
        }
    }
}

/// State summary handed to JavaScript
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Snapshot {
    telegram_id: Option<i64>,
    registered: Option<bool>,
    database_username: Option<String>,
    checking: bool,
    pending: usize,
    archived: usize,
    tab: &'static str,
    error: Option<String>,
}

/// Browser entry point for the portal
#[wasm_bindgen]
pub struct WebPortal {
    app: Rc<App>,
}

#[wasm_bindgen]
impl WebPortal {
    /// Attach to the element with id `root_id`
    #[wasm_bindgen(constructor)]
    pub fn new(root_id: &str) -> Result<WebPortal, JsValue> {
        console_error_panic_hook::set_once();

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let root = document
            .get_element_by_id(root_id)
            .ok_or_else(|| JsValue::from_str(&format!("element #{} not found", root_id)))?;

        let origin = window.location().origin()?;
        let page = PageConfig::from_document(&document, &origin);
        logging::init(&page.log_filter);

        let client = NyamediaClient::new(ClientConfig::new(&page.api_base))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let store: Box<dyn SessionStore> = match BrowserSessionStore::new(&window) {
            Ok(store) => Box::new(store),
            Err(e) => {
                warn!(error = %e, "Session storage unavailable, login will not survive a reload");
                Box::new(MemorySessionStore::new())
            }
        };

        let portal = Portal::new(
            client,
            store,
            Box::new(BrowserLocation::new(window.clone())),
            WidgetConfig::new(&page.bot_username, page.redirect_url.as_deref()),
        );

        let app = Rc::new(App {
            portal,
            root,
            widget_host: RefCell::new(DomWidgetHost::new(window, document, WIDGET_CONTAINER_ID)),
            rendered: RefCell::new(String::new()),
            on_change: RefCell::new(None),
            click_handler: RefCell::new(None),
        });

        let weak = Rc::downgrade(&app);
        app.portal.set_listener(move || {
            if let Some(app) = weak.upgrade() {
                app.render();
            }
        });
        app.attach_click_handler()?;
        app.render();

        info!(api = %page.api_base, "Portal attached to #{}", root_id);
        Ok(WebPortal { app })
    }

    /// Restore or capture the login and check registration
    pub fn start(&self) {
        let app = Rc::clone(&self.app);
        spawn_local(async move {
            let outcome = app.portal.start().await;
            debug!(?outcome, "Startup finished");
        });
    }

    /// Re-run the registration check and list fetch
    pub fn refresh(&self) {
        self.app.spawn_action(PortalAction::Refresh);
    }

    pub fn logout(&self) {
        self.app.portal.logout();
    }

    /// Leave the denial screen
    pub fn reset(&self) {
        self.app.portal.reset();
    }

    /// Switch dashboard tab: `pending`, `archived` or `subscriptions`
    #[wasm_bindgen(js_name = selectTab)]
    pub fn select_tab(&self, tab: &str) -> Result<bool, JsValue> {
        let tab: DashboardTab = tab.parse().map_err(|e: String| JsValue::from_str(&e))?;
        Ok(self.app.portal.select_tab(tab))
    }

    /// Call `callback` after every re-render
    #[wasm_bindgen(js_name = onChange)]
    pub fn on_change(&self, callback: Function) {
        *self.app.on_change.borrow_mut() = Some(callback);
    }

    /// Current state summary
    pub fn state(&self) -> Result<JsValue, JsValue> {
        let state = self.app.portal.state();
        let snapshot = Snapshot {
            telegram_id: state.user().map(|user| user.id),
            registered: state.registration().map(|status| status.registered),
            database_username: state
                .registration()
                .and_then(|status| status.database_username.clone()),
            checking: state.is_checking(),
            pending: state.pending().len(),
            archived: state.archived().len(),
            tab: state.tab().as_str(),
            error: state.error().map(str::to_string),
        };
        serde_wasm_bindgen::to_value(&snapshot)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    /// Detach from the page: unmount the widget and stop handling clicks
    pub fn destroy(&self) {
        self.app.portal.set_listener(|| {});
        self.app.detach_click_handler();
        if let Err(e) = self
            .app
            .portal
            .teardown_widget(&mut *self.app.widget_host.borrow_mut())
        {
            warn!(error = %e, "Failed to unmount login widget");
        }
        self.app.root.set_inner_html("");
        self.app.rendered.borrow_mut().clear();
    }
}
