//! DOM host for the Telegram login widget.
//!
//! The widget script is appended to a container element and calls back
//! through a function on `window`. That function only exists while the
//! widget is mounted; the core decides when that is.

use crate::js;
use nyamedia_core::{AuthCallback, PortalError, Result, TelegramUser, WidgetHost, WidgetScript};
use tracing::warn;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Window};

pub struct DomWidgetHost {
    window: Window,
    document: Document,
    container_id: String,
    script: Option<Element>,
    callback: Option<(String, Closure<dyn Fn(JsValue)>)>,
}

impl DomWidgetHost {
    pub fn new(window: Window, document: Document, container_id: impl Into<String>) -> Self {
        Self {
            window,
            document,
            container_id: container_id.into(),
            script: None,
            callback: None,
        }
    }

    fn container(&self) -> Option<Element> {
        self.document.get_element_by_id(&self.container_id)
    }
}

impl WidgetHost for DomWidgetHost {
    fn inject_script(&mut self, script: &WidgetScript) -> Result<()> {
        let container = self.container().ok_or_else(|| {
            PortalError::widget(format!("container #{} not found", self.container_id))
        })?;

        let element = self
            .document
            .create_element("script")
            .map_err(js::error(PortalError::Widget))?;
        element
            .set_attribute("src", script.src)
            .map_err(js::error(PortalError::Widget))?;
        element
            .set_attribute("async", "")
            .map_err(js::error(PortalError::Widget))?;
        for (name, value) in &script.attributes {
            element
                .set_attribute(name, value)
                .map_err(js::error(PortalError::Widget))?;
        }

        container
            .append_child(&element)
            .map_err(js::error(PortalError::Widget))?;
        self.script = Some(element);
        Ok(())
    }

    fn remove_script(&mut self) -> Result<()> {
        if let Some(script) = self.script.take() {
            script.remove();
        }
        // The widget renders an iframe next to its script tag
        if let Some(container) = self.container() {
            container.set_inner_html("");
        }
        Ok(())
    }

    fn register_callback(&mut self, name: &str, handler: AuthCallback) -> Result<()> {
        let closure = Closure::<dyn Fn(JsValue)>::new(move |payload: JsValue| {
            match parse_payload(&payload) {
                Ok(user) => handler(user),
                Err(e) => warn!(error = %e, "Ignoring malformed widget payload"),
            }
        });

        js_sys::Reflect::set(self.window.as_ref(), &JsValue::from_str(name), closure.as_ref())
            .map_err(js::error(PortalError::Widget))?;
        self.callback = Some((name.to_string(), closure));
        Ok(())
    }

    fn unregister_callback(&mut self, name: &str) -> Result<()> {
        js_sys::Reflect::delete_property(&self.window, &JsValue::from_str(name))
            .map_err(js::error(PortalError::Widget))?;
        if matches!(&self.callback, Some((registered, _)) if registered == name) {
            self.callback = None;
        }
        Ok(())
    }
}

/// The widget hands over a plain object; go through JSON so the payload is
/// decoded exactly like a stored session.
fn parse_payload(payload: &JsValue) -> Result<TelegramUser> {
    let json = js_sys::JSON::stringify(payload)
        .map(String::from)
        .map_err(js::error(PortalError::Parse))?;
    Ok(serde_json::from_str(&json)?)
}
