//! In-memory platform adapters
//!
//! Used by tests and by hosts that have no browser behind them.

use crate::error::Result;
use crate::traits::{AuthCallback, PageLocation, SessionStore, WidgetHost};
use crate::types::TelegramUser;
use crate::widget::WidgetScript;
use std::cell::RefCell;
use std::collections::HashMap;
use url::Url;

/// Session storage backed by a `HashMap`
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// A page URL that can be rewritten in place
#[derive(Debug)]
pub struct MemoryLocation {
    url: RefCell<Url>,
}

impl MemoryLocation {
    pub fn parse(href: &str) -> Result<Self> {
        Ok(Self {
            url: RefCell::new(Url::parse(href)?),
        })
    }
}

impl PageLocation for MemoryLocation {
    fn href(&self) -> Result<String> {
        Ok(self.url.borrow().to_string())
    }

    fn query(&self) -> Result<String> {
        Ok(self.url.borrow().query().unwrap_or_default().to_string())
    }

    fn strip_query(&self) -> Result<()> {
        self.url.borrow_mut().set_query(None);
        Ok(())
    }
}

/// Widget host that records what was mounted
#[derive(Default)]
pub struct MemoryWidgetHost {
    script: Option<WidgetScript>,
    injected: usize,
    callbacks: HashMap<String, AuthCallback>,
}

impl MemoryWidgetHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times a script was injected
    pub fn injected_count(&self) -> usize {
        self.injected
    }

    pub fn has_script(&self) -> bool {
        self.script.is_some()
    }

    pub fn script(&self) -> Option<&WidgetScript> {
        self.script.as_ref()
    }

    pub fn has_callback(&self, name: &str) -> bool {
        self.callbacks.contains_key(name)
    }

    /// Invoke the callback registered under `name`, as the widget would.
    ///
    /// Returns `false` when nothing is registered.
    pub fn fire(&self, name: &str, user: TelegramUser) -> bool {
        match self.callbacks.get(name) {
            Some(callback) => {
                callback(user);
                true
            }
            None => false,
        }
    }
}

impl WidgetHost for MemoryWidgetHost {
    fn inject_script(&mut self, script: &WidgetScript) -> Result<()> {
        self.script = Some(script.clone());
        self.injected += 1;
        Ok(())
    }

    fn remove_script(&mut self) -> Result<()> {
        self.script = None;
        Ok(())
    }

    fn register_callback(&mut self, name: &str, handler: AuthCallback) -> Result<()> {
        self.callbacks.insert(name.to_string(), handler);
        Ok(())
    }

    fn unregister_callback(&mut self, name: &str) -> Result<()> {
        self.callbacks.remove(name);
        Ok(())
    }
}
