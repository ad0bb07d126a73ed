//! Portal state manager - core orchestration
//!
//! Holds the login state, drives the registration check and the media fetch,
//! and produces the view model. Platform access goes through the traits in
//! [`crate::traits`].
//!
//! # Request generations
//!
//! Every action that changes whose data is on screen (login, logout, reset, a
//! new check) bumps the generation counter. A response is applied only if the
//! generation it was issued under is still current, so a slow reply from a
//! previous session cannot overwrite the current one.
//!
//! State sits in a `RefCell` and is only borrowed between awaits, never
//! across one. The portal targets a single-threaded event loop.

use crate::error::{messages, PortalError, Result};
use crate::session::{self, LoginSource};
use crate::traits::{AuthCallback, PageLocation, PortalApi, SessionStore, WidgetHost};
use crate::types::{MediaItem, RegistrationStatus, TelegramUser};
use crate::view::{DashboardTab, PortalAction, PortalView};
use crate::widget::{WidgetConfig, WidgetMount};
use std::cell::RefCell;
use tracing::{debug, info, warn};

/// Result of a registration check (and the fetch that may follow it)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    /// No user is logged in; nothing was requested
    NoUser,
    /// Backend says the user is not registered
    Denied,
    /// Registered and both lists loaded
    Authorized,
    /// Registered, but loading the lists failed
    MediaFailed,
    /// The check itself failed
    CheckFailed,
    /// Session changed while the request was in flight; response dropped
    Stale,
}

/// Mutable portal state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PortalState {
    user: Option<TelegramUser>,
    login_source: Option<LoginSource>,
    registration: Option<RegistrationStatus>,
    pending: Vec<MediaItem>,
    archived: Vec<MediaItem>,
    error: Option<String>,
    tab: DashboardTab,
    checking: bool,
    loading_media: bool,
    generation: u64,
}

impl PortalState {
    pub fn user(&self) -> Option<&TelegramUser> {
        self.user.as_ref()
    }

    pub fn login_source(&self) -> Option<LoginSource> {
        self.login_source
    }

    pub fn registration(&self) -> Option<&RegistrationStatus> {
        self.registration.as_ref()
    }

    pub fn pending(&self) -> &[MediaItem] {
        &self.pending
    }

    pub fn archived(&self) -> &[MediaItem] {
        &self.archived
    }

    /// Generic message of the last failure, if any
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn tab(&self) -> DashboardTab {
        self.tab
    }

    /// A registration check is in flight
    pub fn is_checking(&self) -> bool {
        self.checking
    }

    /// Registered, lists not loaded yet
    pub fn is_loading_media(&self) -> bool {
        self.loading_media
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Drop everything tied to the current session, keeping the counter moving.
    fn cleared(&self) -> Self {
        Self {
            generation: self.generation + 1,
            ..Self::default()
        }
    }
}

/// Called after every visible state change
pub type ChangeListener = Box<dyn Fn()>;

/// The portal client
pub struct Portal<A> {
    api: A,
    store: Box<dyn SessionStore>,
    location: Box<dyn PageLocation>,
    widget: std::result::Result<WidgetConfig, PortalError>,
    widget_mount: RefCell<WidgetMount>,
    state: RefCell<PortalState>,
    listener: RefCell<Option<ChangeListener>>,
}

impl<A: PortalApi> Portal<A> {
    /// Create a portal.
    ///
    /// `widget` carries the outcome of validating the widget configuration; an
    /// error is shown in place of the login widget.
    pub fn new(
        api: A,
        store: Box<dyn SessionStore>,
        location: Box<dyn PageLocation>,
        widget: std::result::Result<WidgetConfig, PortalError>,
    ) -> Self {
        if let Err(e) = &widget {
            warn!(error = %e, "Login widget is misconfigured");
        }

        Self {
            api,
            store,
            location,
            widget,
            widget_mount: RefCell::new(WidgetMount::new()),
            state: RefCell::new(PortalState::default()),
            listener: RefCell::new(None),
        }
    }

    /// Register the function to call after state changes, replacing any
    /// previous one.
    ///
    /// The listener may read the portal (`view`, `state`, `sync_widget`) and
    /// may replace itself.
    pub fn set_listener(&self, listener: impl Fn() + 'static) {
        *self.listener.borrow_mut() = Some(Box::new(listener));
    }

    /// Copy of the current state
    pub fn state(&self) -> PortalState {
        self.state.borrow().clone()
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Current view model
    pub fn view(&self) -> PortalView {
        PortalView::from_state(&self.state.borrow(), self.widget.as_ref())
    }

    /// Page load: rehydrate or capture the login, then check registration.
    pub async fn start(&self) -> CheckOutcome {
        match session::capture(&*self.store, &*self.location) {
            Some((user, source)) => {
                self.adopt(user, source);
                self.check_registration().await
            }
            None => {
                debug!("No active session");
                CheckOutcome::NoUser
            }
        }
    }

    /// Login reported by the widget callback.
    pub async fn login(&self, user: TelegramUser) -> CheckOutcome {
        if let Err(e) = session::persist(&*self.store, &user) {
            warn!(error = %e, "Failed to persist login, keeping it in memory only");
        }
        info!(telegram_id = user.id, "Logged in through widget");
        self.adopt(user, LoginSource::Widget);
        self.check_registration().await
    }

    /// Check registration for the active user and, if registered, load both lists.
    pub async fn check_registration(&self) -> CheckOutcome {
        let (generation, telegram_id) = {
            let mut state = self.state.borrow_mut();
            let Some(telegram_id) = state.user.as_ref().map(|user| user.id) else {
                return CheckOutcome::NoUser;
            };
            state.generation += 1;
            state.error = None;
            state.checking = true;
            (state.generation, telegram_id)
        };
        self.notify();

        debug!(telegram_id, generation, "Checking registration");
        let result = self.api.check_user(telegram_id).await;

        let finished = {
            let mut state = self.state.borrow_mut();
            if state.generation != generation {
                debug!(generation, current = state.generation, "Dropping stale registration response");
                return CheckOutcome::Stale;
            }
            state.checking = false;

            match result {
                Ok(status) => {
                    info!(
                        telegram_id,
                        registered = status.registered,
                        "Registration status received"
                    );
                    let registered = status.registered;
                    state.registration = Some(status);
                    if registered {
                        state.loading_media = true;
                        None
                    } else {
                        Some(CheckOutcome::Denied)
                    }
                }
                Err(e) => {
                    warn!(telegram_id, error = %e, "Registration check failed");
                    state.error = Some(messages::REGISTRATION_CHECK_FAILED.to_string());
                    Some(CheckOutcome::CheckFailed)
                }
            }
        };
        self.notify();

        match finished {
            Some(outcome) => outcome,
            None => self.fetch_media(generation).await,
        }
    }

    /// Re-run the check and fetch for the current user.
    pub async fn refresh(&self) -> CheckOutcome {
        self.check_registration().await
    }

    /// Load pending and archived lists concurrently, all-or-error. On error
    /// both lists keep what they held before.
    async fn fetch_media(&self, generation: u64) -> CheckOutcome {
        let result = futures_util::try_join!(self.api.pending(), self.api.archived());

        let outcome = {
            let mut state = self.state.borrow_mut();
            if state.generation != generation {
                debug!(generation, current = state.generation, "Dropping stale media response");
                return CheckOutcome::Stale;
            }
            state.loading_media = false;

            match result {
                Ok((pending, archived)) => {
                    debug!(
                        pending = pending.len(),
                        archived = archived.len(),
                        "Fetched media requests"
                    );
                    state.pending = pending;
                    state.archived = archived;
                    CheckOutcome::Authorized
                }
                Err(e) => {
                    warn!(error = %e, "Failed to fetch media requests");
                    state.error = Some(messages::MEDIA_FETCH_FAILED.to_string());
                    CheckOutcome::MediaFailed
                }
            }
        };
        self.notify();
        outcome
    }

    /// Log out: clear session storage and all in-memory state.
    pub fn logout(&self) {
        self.clear_session();
        info!("Logged out");
    }

    /// Reset from the denial screen. Same effect as logout.
    pub fn reset(&self) {
        self.clear_session();
        info!("Session reset");
    }

    /// Switch dashboard tab. Disabled tabs are ignored.
    pub fn select_tab(&self, tab: DashboardTab) -> bool {
        if !tab.is_enabled() {
            return false;
        }
        self.state.borrow_mut().tab = tab;
        self.notify();
        true
    }

    /// Apply a UI action. Returns `true` when the state changed.
    pub async fn dispatch(&self, action: PortalAction) -> bool {
        match action {
            PortalAction::Logout => {
                self.logout();
                true
            }
            PortalAction::Reset => {
                self.reset();
                true
            }
            PortalAction::Refresh => self.refresh().await != CheckOutcome::NoUser,
            PortalAction::SelectTab(tab) => self.select_tab(tab),
        }
    }

    /// Mount the login widget while logged out, unmount it once a user is active.
    ///
    /// `on_auth` is only called when the widget actually gets mounted.
    pub fn sync_widget(
        &self,
        host: &mut dyn WidgetHost,
        on_auth: impl FnOnce() -> AuthCallback,
    ) -> Result<()> {
        let logged_out = self.state.borrow().user.is_none();
        let mut mount = self.widget_mount.borrow_mut();

        if !logged_out {
            return mount.unmount(host);
        }

        let Ok(config) = &self.widget else {
            return Ok(());
        };
        if mount.is_mounted() {
            return Ok(());
        }

        let script = config.script(&self.location.href()?);
        mount.mount(host, &script, on_auth())?;
        Ok(())
    }

    /// Unmount the widget regardless of login state (host teardown).
    pub fn teardown_widget(&self, host: &mut dyn WidgetHost) -> Result<()> {
        self.widget_mount.borrow_mut().unmount(host)
    }

    fn adopt(&self, user: TelegramUser, source: LoginSource) {
        {
            let mut state = self.state.borrow_mut();
            let next = PortalState {
                user: Some(user),
                login_source: Some(source),
                ..state.cleared()
            };
            *state = next;
        }
        self.notify();
    }

    fn clear_session(&self) {
        if let Err(e) = session::clear(&*self.store) {
            warn!(error = %e, "Failed to clear session storage");
        }
        {
            let mut state = self.state.borrow_mut();
            let next = state.cleared();
            *state = next;
        }
        self.notify();
    }

    /// Run the listener. Callers must not hold a borrow of `state`.
    ///
    /// The listener is taken out of its slot while it runs, so it may call
    /// `set_listener` itself; a replacement set that way is kept. Changes it
    /// triggers are not reported back to it.
    fn notify(&self) {
        let Some(listener) = self.listener.borrow_mut().take() else {
            return;
        };
        listener();

        let mut slot = self.listener.borrow_mut();
        if slot.is_none() {
            *slot = Some(listener);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryLocation, MemorySessionStore};
    use async_trait::async_trait;

    struct FixedApi {
        status: Result<RegistrationStatus>,
    }

    #[cfg_attr(not(target_arch = "wasm32"), async_trait)]
    #[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
    impl PortalApi for FixedApi {
        async fn check_user(&self, _telegram_id: i64) -> Result<RegistrationStatus> {
            self.status.clone()
        }

        async fn pending(&self) -> Result<Vec<MediaItem>> {
            Ok(vec![MediaItem::default()])
        }

        async fn archived(&self) -> Result<Vec<MediaItem>> {
            Ok(Vec::new())
        }
    }

    fn portal(status: Result<RegistrationStatus>) -> Portal<FixedApi> {
        Portal::new(
            FixedApi { status },
            Box::new(MemorySessionStore::new()),
            Box::new(MemoryLocation::parse("https://portal.example/").unwrap()),
            WidgetConfig::new("nyamedia_bot", None),
        )
    }

    #[tokio::test]
    async fn check_without_user_does_nothing() {
        let portal = portal(Ok(RegistrationStatus::registered("foo")));
        assert_eq!(portal.check_registration().await, CheckOutcome::NoUser);
        assert_eq!(portal.state().generation(), 0);
    }

    #[tokio::test]
    async fn registered_user_gets_lists() {
        let portal = portal(Ok(RegistrationStatus::registered("foo")));
        let outcome = portal.login(TelegramUser::new(1, 2, "h")).await;

        assert_eq!(outcome, CheckOutcome::Authorized);
        let state = portal.state();
        assert_eq!(state.pending().len(), 1);
        assert!(state.archived().is_empty());
        assert!(!state.is_checking());
        assert_eq!(state.login_source(), Some(LoginSource::Widget));
    }

    #[tokio::test]
    async fn failed_check_sets_generic_error() {
        let portal = portal(Err(PortalError::network("connection refused")));
        let outcome = portal.login(TelegramUser::new(1, 2, "h")).await;

        assert_eq!(outcome, CheckOutcome::CheckFailed);
        assert_eq!(
            portal.state().error(),
            Some(messages::REGISTRATION_CHECK_FAILED)
        );
        assert!(portal.state().registration().is_none());
    }

    #[test]
    fn subscriptions_tab_cannot_be_selected() {
        let portal = portal(Ok(RegistrationStatus::unregistered()));
        assert!(!portal.select_tab(DashboardTab::Subscriptions));
        assert!(portal.select_tab(DashboardTab::Archived));
        assert_eq!(portal.state().tab(), DashboardTab::Archived);
    }

    #[tokio::test]
    async fn listener_sees_each_step() {
        use std::rc::Rc;

        let portal = Rc::new(portal(Ok(RegistrationStatus::registered("foo"))));
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&seen);
        let weak = Rc::downgrade(&portal);
        portal.set_listener(move || {
            if let Some(portal) = weak.upgrade() {
                let checking = matches!(portal.view(), PortalView::Checking(_));
                sink.borrow_mut().push((checking, portal.state().is_loading_media()));
            }
        });

        portal.login(TelegramUser::new(1, 2, "h")).await;

        // adopt, check issued, status received, lists loaded
        assert_eq!(
            *seen.borrow(),
            vec![(true, false), (true, false), (false, true), (false, false)]
        );
    }

    #[test]
    fn listener_can_replace_itself() {
        use std::rc::Rc;

        let portal = Rc::new(portal(Ok(RegistrationStatus::unregistered())));
        let calls = Rc::new(RefCell::new(Vec::new()));

        let weak = Rc::downgrade(&portal);
        let first = Rc::clone(&calls);
        portal.set_listener(move || {
            first.borrow_mut().push("first");
            if let Some(portal) = weak.upgrade() {
                let second = Rc::clone(&first);
                portal.set_listener(move || second.borrow_mut().push("second"));
            }
        });

        portal.logout();
        portal.select_tab(DashboardTab::Archived);

        assert_eq!(*calls.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn listener_survives_nested_changes() {
        use std::rc::Rc;

        let portal = Rc::new(portal(Ok(RegistrationStatus::unregistered())));
        let count = Rc::new(RefCell::new(0));

        let weak = Rc::downgrade(&portal);
        let sink = Rc::clone(&count);
        portal.set_listener(move || {
            *sink.borrow_mut() += 1;
            if let Some(portal) = weak.upgrade() {
                if portal.state().tab() == DashboardTab::Pending {
                    portal.select_tab(DashboardTab::Archived);
                }
            }
        });

        portal.logout();
        portal.logout();

        assert_eq!(portal.state().tab(), DashboardTab::Archived);
        assert_eq!(*count.borrow(), 2);
    }

    #[test]
    fn logout_bumps_generation() {
        let portal = portal(Ok(RegistrationStatus::unregistered()));
        let before = portal.state().generation();
        portal.logout();
        assert_eq!(portal.state().generation(), before + 1);
    }
}
