//! Login capture and session rehydration
//!
//! A user becomes active either from the copy kept in session storage or from
//! the widget's redirect, which appends the signed payload to the page URL as
//! query parameters.

use crate::error::Result;
use crate::traits::{PageLocation, SessionStore};
use crate::types::TelegramUser;
use tracing::{debug, warn};

/// Session storage key holding the serialized login payload
pub const SESSION_KEY: &str = "telegram_user";

/// Where the active user came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginSource {
    /// Rehydrated from session storage
    Stored,
    /// Widget redirect parameters in the URL
    Callback,
    /// Widget invoked the injected callback handler
    Widget,
}

/// Read the stored user.
///
/// A payload that does not parse is removed and treated as logged out.
pub fn restore(store: &dyn SessionStore) -> Result<Option<TelegramUser>> {
    let Some(raw) = store.get(SESSION_KEY)? else {
        return Ok(None);
    };

    match serde_json::from_str::<TelegramUser>(&raw) {
        Ok(user) => {
            debug!(telegram_id = user.id, "Restored stored session");
            Ok(Some(user))
        }
        Err(e) => {
            warn!(error = %e, "Discarding corrupt stored session");
            store.remove(SESSION_KEY)?;
            Ok(None)
        }
    }
}

/// Save `user` as the session's login payload
pub fn persist(store: &dyn SessionStore, user: &TelegramUser) -> Result<()> {
    let raw = serde_json::to_string(user)?;
    store.set(SESSION_KEY, &raw)
}

/// Forget the stored login payload
pub fn clear(store: &dyn SessionStore) -> Result<()> {
    store.remove(SESSION_KEY)
}

/// Rebuild a user from widget redirect parameters.
///
/// Returns `None` unless `id`, `auth_date` and `hash` are all present and the
/// numeric ones parse.
pub fn parse_callback_query(query: &str) -> Option<TelegramUser> {
    let query = query.strip_prefix('?').unwrap_or(query);

    let mut id = None;
    let mut auth_date = None;
    let mut hash = None;
    let mut first_name = None;
    let mut last_name = None;
    let mut username = None;
    let mut photo_url = None;

    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        let value = value.into_owned();
        match key.as_ref() {
            "id" => id = Some(value),
            "auth_date" => auth_date = Some(value),
            "hash" => hash = Some(value),
            "first_name" => first_name = Some(value),
            "last_name" => last_name = Some(value),
            "username" => username = Some(value),
            "photo_url" => photo_url = Some(value),
            _ => {}
        }
    }

    let (id, auth_date, hash) = (id?, auth_date?, hash?);
    if hash.is_empty() {
        return None;
    }

    let (Ok(id), Ok(auth_date)) = (id.trim().parse::<i64>(), auth_date.trim().parse::<i64>()) else {
        warn!("Ignoring login parameters with non-numeric id or auth_date");
        return None;
    };

    Some(TelegramUser {
        id,
        first_name,
        last_name,
        username,
        photo_url,
        auth_date,
        hash,
    })
}

/// Resolve the active user on page load.
///
/// The stored payload is read first; widget redirect parameters, when present,
/// take precedence, are persisted over it, and are stripped from the URL.
/// Storage and location failures are logged and do not block the login: a
/// callback user that cannot be persisted is kept for this page only.
pub fn capture(
    store: &dyn SessionStore,
    location: &dyn PageLocation,
) -> Option<(TelegramUser, LoginSource)> {
    let stored = restore(store).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to read stored session");
        None
    });

    let query = location.query().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to read page URL");
        String::new()
    });

    if let Some(user) = parse_callback_query(&query) {
        if let Err(e) = persist(store, &user) {
            warn!(error = %e, "Failed to persist login, keeping it in memory only");
        }
        if let Err(e) = location.strip_query() {
            warn!(error = %e, "Failed to strip login parameters from URL");
        }
        // The signature is not checked here; the backend has to.
        warn!(telegram_id = user.id, "Adopting unverified widget login from URL");
        return Some((user, LoginSource::Callback));
    }

    stored.map(|user| (user, LoginSource::Stored))
}
