//! View model
//!
//! Turns [`PortalState`] into one of the portal screens. Rendering to markup
//! lives in [`crate::render`]; this module only decides *what* is shown.

use crate::error::PortalError;
use crate::portal::PortalState;
use crate::types::MediaItem;
use crate::widget::WidgetConfig;
use std::fmt;
use std::str::FromStr;

/// Dashboard tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DashboardTab {
    #[default]
    Pending,
    Archived,
    /// Placeholder, always disabled
    Subscriptions,
}

impl DashboardTab {
    pub const ALL: [DashboardTab; 3] = [Self::Pending, Self::Archived, Self::Subscriptions];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Archived => "archived",
            Self::Subscriptions => "subscriptions",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Archived => "Archived",
            Self::Subscriptions => "Subscriptions",
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::Subscriptions)
    }
}

impl fmt::Display for DashboardTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DashboardTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "archived" => Ok(Self::Archived),
            "subscriptions" => Ok(Self::Subscriptions),
            other => Err(format!("unknown tab: {}", other)),
        }
    }
}

/// User actions, encoded in markup as `data-action` values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortalAction {
    Logout,
    Reset,
    Refresh,
    SelectTab(DashboardTab),
}

impl fmt::Display for PortalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Logout => f.write_str("logout"),
            Self::Reset => f.write_str("reset"),
            Self::Refresh => f.write_str("refresh"),
            Self::SelectTab(tab) => write!(f, "tab:{}", tab),
        }
    }
}

impl FromStr for PortalAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "logout" => Ok(Self::Logout),
            "reset" => Ok(Self::Reset),
            "refresh" => Ok(Self::Refresh),
            other => match other.strip_prefix("tab:") {
                Some(tab) => tab.parse().map(Self::SelectTab),
                None => Err(format!("unknown action: {}", other)),
            },
        }
    }
}

/// The screen to show
#[derive(Debug, Clone, PartialEq)]
pub enum PortalView {
    /// No user: login widget (or the configuration error replacing it)
    Login(LoginView),
    /// User known, registration status not yet known
    Checking(CheckingView),
    /// Backend says the user is not registered
    Denied(DeniedView),
    /// Registered user
    Dashboard(DashboardView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginView {
    /// Blocking configuration error; no widget is shown when set
    pub config_error: Option<String>,
    pub bot_username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckingView {
    pub user_name: String,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeniedView {
    pub user_name: String,
    pub telegram_id: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub user_name: String,
    pub photo_url: Option<String>,
    pub database_username: Option<String>,
    pub tabs: Vec<TabView>,
    pub active_tab: DashboardTab,
    pub cards: Vec<MediaCard>,
    /// Lists are still being fetched
    pub loading: bool,
    /// Shown when the active list has no cards
    pub empty_message: &'static str,
    pub error: Option<String>,
}

impl DashboardView {
    pub fn tab(&self, tab: DashboardTab) -> Option<&TabView> {
        self.tabs.iter().find(|t| t.tab == tab)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabView {
    pub tab: DashboardTab,
    /// e.g. `Pending (1)`
    pub label: String,
    pub active: bool,
    pub disabled: bool,
}

/// One media request card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaCard {
    pub id: i64,
    pub title: String,
    /// `source · media_id`
    pub reference: String,
    pub poster: Option<String>,
    pub summary: Option<String>,
    pub status: Option<&'static str>,
    pub created_at: Option<String>,
}

impl From<&MediaItem> for MediaCard {
    fn from(item: &MediaItem) -> Self {
        let reference = match (item.source.is_empty(), item.media_id.is_empty()) {
            (false, false) => format!("{} · {}", item.source, item.media_id),
            (false, true) => item.source.clone(),
            (true, false) => item.media_id.clone(),
            (true, true) => String::new(),
        };

        Self {
            id: item.id,
            title: item.display_title(),
            reference,
            poster: non_blank(item.poster.as_deref()),
            summary: non_blank(item.summary.as_deref()),
            status: item.request_status().map(|status| status.label()),
            created_at: non_blank(Some(item.created_at.as_str())),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl PortalView {
    /// Pick the screen for `state`.
    pub fn from_state(
        state: &PortalState,
        widget: Result<&WidgetConfig, &PortalError>,
    ) -> Self {
        let Some(user) = state.user() else {
            return Self::Login(match widget {
                Ok(config) => LoginView {
                    config_error: None,
                    bot_username: Some(config.bot_username().to_string()),
                },
                Err(e) => LoginView {
                    config_error: Some(e.to_string()),
                    bot_username: None,
                },
            });
        };

        let user_name = user.display_name();

        match state.registration() {
            None => Self::Checking(CheckingView {
                user_name,
                error: state.error().map(str::to_string),
            }),
            Some(status) if !status.registered => Self::Denied(DeniedView {
                user_name,
                telegram_id: user.id,
            }),
            Some(status) => {
                let active_tab = state.tab();
                let items: &[MediaItem] = match active_tab {
                    DashboardTab::Pending => state.pending(),
                    DashboardTab::Archived => state.archived(),
                    DashboardTab::Subscriptions => &[],
                };

                let tabs = DashboardTab::ALL
                    .iter()
                    .map(|&tab| {
                        let label = match tab {
                            DashboardTab::Pending => {
                                format!("{} ({})", tab.title(), state.pending().len())
                            }
                            DashboardTab::Archived => {
                                format!("{} ({})", tab.title(), state.archived().len())
                            }
                            DashboardTab::Subscriptions => tab.title().to_string(),
                        };
                        TabView {
                            tab,
                            label,
                            active: tab == active_tab,
                            disabled: !tab.is_enabled(),
                        }
                    })
                    .collect();

                Self::Dashboard(DashboardView {
                    user_name,
                    photo_url: non_blank(user.photo_url.as_deref()),
                    database_username: status.database_username.clone(),
                    tabs,
                    active_tab,
                    cards: items.iter().map(MediaCard::from).collect(),
                    loading: state.is_loading_media(),
                    empty_message: match active_tab {
                        DashboardTab::Pending => "No pending requests.",
                        DashboardTab::Archived => "No archived requests yet.",
                        DashboardTab::Subscriptions => "Subscriptions are not available yet.",
                    },
                    error: state.error().map(str::to_string),
                })
            }
        }
    }

    /// Whether this is the logged-out screen
    pub fn is_login(&self) -> bool {
        matches!(self, Self::Login(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_strings_round_trip() {
        for action in [
            PortalAction::Logout,
            PortalAction::Reset,
            PortalAction::Refresh,
            PortalAction::SelectTab(DashboardTab::Archived),
        ] {
            assert_eq!(action.to_string().parse::<PortalAction>(), Ok(action));
        }
    }

    #[test]
    fn unknown_actions_are_rejected() {
        assert!("dance".parse::<PortalAction>().is_err());
        assert!("tab:music".parse::<PortalAction>().is_err());
    }

    #[test]
    fn card_without_optional_fields() {
        let item: MediaItem = serde_json::from_str(
            r#"{"id":1,"source":"x","media_id":"y","created_at":"2024-01-01"}"#,
        )
        .unwrap();
        let card = MediaCard::from(&item);

        assert_eq!(card.title, "x:y");
        assert_eq!(card.reference, "x · y");
        assert!(card.poster.is_none());
        assert!(card.summary.is_none());
        assert!(card.status.is_none());
        assert_eq!(card.created_at.as_deref(), Some("2024-01-01"));
    }

    #[test]
    fn blank_poster_is_dropped() {
        let item = MediaItem {
            poster: Some(" ".to_string()),
            ..Default::default()
        };
        assert!(MediaCard::from(&item).poster.is_none());
    }

    #[test]
    fn logged_out_with_bad_config() {
        let err = PortalError::configuration("numeric id");
        let view = PortalView::from_state(&PortalState::default(), Err(&err));

        match view {
            PortalView::Login(login) => {
                assert!(login.config_error.unwrap().contains("numeric id"));
                assert!(login.bot_username.is_none());
            }
            other => panic!("Expected login view, got: {:?}", other),
        }
    }
}
