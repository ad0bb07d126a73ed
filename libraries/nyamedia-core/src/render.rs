//! HTML rendering of [`PortalView`]
//!
//! Produces a markup fragment for the portal root element. Every interpolated
//! value is escaped. Buttons carry `data-action` attributes (see
//! [`PortalAction`]) so the host can use a single delegated click handler.

use crate::view::{
    CheckingView, DashboardView, DeniedView, LoginView, MediaCard, PortalAction, PortalView,
};
use html_escape::{encode_double_quoted_attribute, encode_text};
use std::fmt::Write;

/// Id of the element the login widget script is injected into
pub const WIDGET_CONTAINER_ID: &str = "telegram-login";

/// Render a view to an HTML fragment.
pub fn render(view: &PortalView) -> String {
    let mut html = String::new();
    match view {
        PortalView::Login(login) => render_login(&mut html, login),
        PortalView::Checking(checking) => render_checking(&mut html, checking),
        PortalView::Denied(denied) => render_denied(&mut html, denied),
        PortalView::Dashboard(dashboard) => render_dashboard(&mut html, dashboard),
    }
    html
}

fn render_login(html: &mut String, view: &LoginView) {
    html.push_str(r#"<main class="portal portal-login">"#);
    html.push_str("<h1>Nyamedia</h1>");

    match &view.config_error {
        Some(error) => {
            html.push_str(r#"<div class="error" role="alert">"#);
            html.push_str("<strong>Configuration error</strong><p>");
            html.push_str(&encode_text(error));
            html.push_str("</p></div>");
        }
        None => {
            html.push_str("<p>Sign in with Telegram to see your media requests.</p>");
            let _ = write!(
                html,
                r#"<div id="{}" class="login-widget"></div>"#,
                WIDGET_CONTAINER_ID
            );
        }
    }

    html.push_str("</main>");
}

fn render_checking(html: &mut String, view: &CheckingView) {
    html.push_str(r#"<main class="portal portal-checking">"#);
    let _ = write!(
        html,
        "<p>Signed in as <strong>{}</strong>.</p>",
        encode_text(&view.user_name)
    );

    match &view.error {
        Some(error) => {
            render_error(html, error);
            render_button(html, PortalAction::Refresh, "Try again");
            render_button(html, PortalAction::Logout, "Log out");
        }
        None => html.push_str(r#"<p class="loading">Checking registration…</p>"#),
    }

    html.push_str("</main>");
}

fn render_denied(html: &mut String, view: &DeniedView) {
    html.push_str(r#"<main class="portal portal-denied">"#);
    html.push_str("<h1>Access denied</h1>");
    let _ = write!(
        html,
        "<p><strong>{}</strong> (Telegram id {}) is not registered. \
         Register with the bot first, then sign in again.</p>",
        encode_text(&view.user_name),
        view.telegram_id
    );
    render_button(html, PortalAction::Reset, "Start over");
    html.push_str("</main>");
}

fn render_dashboard(html: &mut String, view: &DashboardView) {
    html.push_str(r#"<main class="portal portal-dashboard">"#);

    html.push_str(r#"<header class="portal-header">"#);
    if let Some(photo) = &view.photo_url {
        let _ = write!(
            html,
            r#"<img class="avatar" src="{}" alt="">"#,
            encode_double_quoted_attribute(photo)
        );
    }
    let _ = write!(
        html,
        r#"<span class="user-name">{}</span>"#,
        encode_text(&view.user_name)
    );
    if let Some(account) = &view.database_username {
        let _ = write!(
            html,
            r#"<span class="account">Media account: {}</span>"#,
            encode_text(account)
        );
    }
    render_button(html, PortalAction::Refresh, "Refresh");
    render_button(html, PortalAction::Logout, "Log out");
    html.push_str("</header>");

    if let Some(error) = &view.error {
        render_error(html, error);
    }

    html.push_str(r#"<nav class="tabs" role="tablist">"#);
    for tab in &view.tabs {
        let mut class = String::from("tab");
        if tab.active {
            class.push_str(" active");
        }
        let _ = write!(
            html,
            r#"<button type="button" role="tab" class="{}" data-action="{}" aria-selected="{}"{}>{}</button>"#,
            class,
            PortalAction::SelectTab(tab.tab),
            tab.active,
            if tab.disabled { " disabled" } else { "" },
            encode_text(&tab.label)
        );
    }
    html.push_str("</nav>");

    let _ = write!(
        html,
        r#"<section class="cards" data-tab="{}">"#,
        view.active_tab
    );
    if view.loading {
        html.push_str(r#"<p class="loading">Loading requests…</p>"#);
    } else if view.cards.is_empty() {
        let _ = write!(html, r#"<p class="empty">{}</p>"#, view.empty_message);
    } else {
        for card in &view.cards {
            render_card(html, card);
        }
    }
    html.push_str("</section></main>");
}

fn render_card(html: &mut String, card: &MediaCard) {
    let _ = write!(html, r#"<article class="card" data-id="{}">"#, card.id);

    if let Some(poster) = &card.poster {
        let _ = write!(
            html,
            r#"<img class="poster" src="{}" alt="{}" loading="lazy">"#,
            encode_double_quoted_attribute(poster),
            encode_double_quoted_attribute(&card.title)
        );
    }

    html.push_str(r#"<div class="card-body">"#);
    let _ = write!(html, "<h2>{}</h2>", encode_text(&card.title));
    if !card.reference.is_empty() {
        let _ = write!(
            html,
            r#"<p class="reference">{}</p>"#,
            encode_text(&card.reference)
        );
    }
    if let Some(status) = card.status {
        let _ = write!(
            html,
            r#"<span class="status status-{0}">{0}</span>"#,
            status
        );
    }
    if let Some(summary) = &card.summary {
        let _ = write!(html, r#"<p class="summary">{}</p>"#, encode_text(summary));
    }
    if let Some(created_at) = &card.created_at {
        let _ = write!(
            html,
            r#"<time datetime="{}">{}</time>"#,
            encode_double_quoted_attribute(created_at),
            encode_text(created_at)
        );
    }
    html.push_str("</div></article>");
}

fn render_error(html: &mut String, error: &str) {
    let _ = write!(
        html,
        r#"<div class="error" role="alert">{}</div>"#,
        encode_text(error)
    );
}

fn render_button(html: &mut String, action: PortalAction, label: &str) {
    let _ = write!(
        html,
        r#"<button type="button" data-action="{}">{}</button>"#,
        action,
        encode_text(label)
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{DashboardTab, TabView};

    fn dashboard(cards: Vec<MediaCard>) -> DashboardView {
        DashboardView {
            user_name: "<script>".to_string(),
            photo_url: None,
            database_username: Some("foo".to_string()),
            tabs: vec![TabView {
                tab: DashboardTab::Pending,
                label: format!("Pending ({})", cards.len()),
                active: true,
                disabled: false,
            }],
            active_tab: DashboardTab::Pending,
            cards,
            loading: false,
            empty_message: "No pending requests.",
            error: None,
        }
    }

    #[test]
    fn login_view_has_widget_container() {
        let html = render(&PortalView::Login(LoginView {
            config_error: None,
            bot_username: Some("nyamedia_bot".to_string()),
        }));
        assert!(html.contains(r#"id="telegram-login""#));
        assert!(!html.contains("role=\"alert\""));
    }

    #[test]
    fn config_error_replaces_widget() {
        let html = render(&PortalView::Login(LoginView {
            config_error: Some("bad <handle>".to_string()),
            bot_username: None,
        }));
        assert!(!html.contains(WIDGET_CONTAINER_ID));
        assert!(html.contains("bad &lt;handle&gt;"));
    }

    #[test]
    fn user_values_are_escaped() {
        let html = render(&PortalView::Dashboard(dashboard(Vec::new())));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn empty_list_message() {
        let html = render(&PortalView::Dashboard(dashboard(Vec::new())));
        assert!(html.contains("No pending requests."));
    }

    #[test]
    fn loading_hides_empty_message() {
        let mut view = dashboard(Vec::new());
        view.loading = true;
        let html = render(&PortalView::Dashboard(view));
        assert!(html.contains("Loading requests"));
        assert!(!html.contains("No pending requests."));
    }

    #[test]
    fn poster_only_when_present() {
        let mut card = MediaCard {
            id: 1,
            title: "Film".to_string(),
            reference: "tmdb · 1".to_string(),
            poster: None,
            summary: None,
            status: Some("submitted"),
            created_at: None,
        };
        let html = render(&PortalView::Dashboard(dashboard(vec![card.clone()])));
        assert!(!html.contains("<img"));
        assert!(html.contains("status-submitted"));

        card.poster = Some("https://img.example/p.jpg?a=1&b=2".to_string());
        let html = render(&PortalView::Dashboard(dashboard(vec![card])));
        assert!(html.contains(r#"src="https://img.example/p.jpg?a=1&amp;b=2""#));
    }

    #[test]
    fn denied_view_offers_reset() {
        let html = render(&PortalView::Denied(DeniedView {
            user_name: "Nya".to_string(),
            telegram_id: 42,
        }));
        assert!(html.contains(r#"data-action="reset""#));
        assert!(html.contains("42"));
    }
}
