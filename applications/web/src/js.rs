//! Helpers for turning JavaScript exceptions into portal errors.

use nyamedia_core::PortalError;
use wasm_bindgen::{JsCast, JsValue};

/// Readable text for a thrown JS value.
pub(crate) fn describe(value: &JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    if let Some(text) = value.as_string() {
        return text;
    }
    js_sys::JSON::stringify(value)
        .map(String::from)
        .unwrap_or_else(|_| format!("{:?}", value))
}

/// Map a thrown JS value into the given error kind.
pub(crate) fn error(kind: fn(String) -> PortalError) -> impl Fn(JsValue) -> PortalError {
    move |value| kind(describe(&value))
}
