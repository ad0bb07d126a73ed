/// Static file serving for the web client (SPA with fallback to index.html)
use crate::config::PortalConfig;
use crate::error::{PortalServerError, Result};
use crate::state::AppState;
use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Method, Request},
    response::{Html, IntoResponse, Response},
};
use html_escape::encode_double_quoted_attribute;
use nyamedia_core::page::{META_API_BASE, META_BOT_USERNAME, META_REDIRECT_URL};
use std::fmt::Write;
use std::path::Path;
use tower::ServiceExt;
use tower_http::services::ServeDir;

/// Cache policy for fingerprinted build output under `/assets`
pub const ASSET_CACHE_CONTROL: &str = "public, max-age=31536000";

/// Page served when the web directory has no `index.html`
const BUILTIN_SHELL: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Nyamedia</title>
</head>
<body>
<div id="app"></div>
<script type="module">
import init, { WebPortal } from '/pkg/nyamedia_web.js';
await init();
new WebPortal('app').start();
</script>
</body>
</html>
"#;

/// Meta tags carrying the client configuration. Unset values are omitted.
pub fn render_meta_tags(config: &PortalConfig) -> String {
    let entries = [
        (META_BOT_USERNAME, Some(config.widget.bot_username.as_str())),
        (META_REDIRECT_URL, config.widget.redirect_url.as_deref()),
        (META_API_BASE, config.api.base_url.as_deref()),
    ];

    let mut tags = String::new();
    for (name, value) in entries {
        let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
            continue;
        };
        let _ = writeln!(
            tags,
            r#"<meta name="{}" content="{}">"#,
            name,
            encode_double_quoted_attribute(value)
        );
    }
    tags
}

/// Insert `tags` right before `</head>`, or at the top when there is none.
pub fn inject_meta(page: &str, tags: &str) -> String {
    match page.to_ascii_lowercase().find("</head>") {
        Some(at) => {
            let mut out = String::with_capacity(page.len() + tags.len());
            out.push_str(&page[..at]);
            out.push_str(tags);
            out.push_str(&page[at..]);
            out
        }
        None => format!("{}{}", tags, page),
    }
}

/// Fallback handler: real files from the web directory, everything else gets
/// the client page. Unknown paths under `/assets/` are a 404.
pub async fn spa_fallback(State(state): State<AppState>, req: Request<Body>) -> Result<Response> {
    if !matches!(*req.method(), Method::GET | Method::HEAD) {
        return Err(PortalServerError::MethodNotAllowed(req.method().to_string()));
    }

    let path = req.uri().path().to_string();
    if is_static_file(state.web_dir(), &path).await {
        let mut response = match ServeDir::new(state.web_dir()).oneshot(req).await {
            Ok(res) => res.into_response(),
            Err(e) => return Err(PortalServerError::Internal(e.to_string())),
        };

        if path.starts_with("/assets/") && response.status().is_success() {
            response.headers_mut().insert(
                header::CACHE_CONTROL,
                HeaderValue::from_static(ASSET_CACHE_CONTROL),
            );
        }
        return Ok(response);
    }

    // A missing build artifact must not come back as the HTML page
    if path.starts_with("/assets/") {
        return Err(PortalServerError::NotFound(path));
    }

    index_page(&state).await
}

/// `index.html` always goes through meta injection, so it is never served raw.
async fn is_static_file(web_dir: &Path, path: &str) -> bool {
    let relative = path.trim_start_matches('/');
    if relative.is_empty()
        || relative == "index.html"
        || relative.split('/').any(|segment| segment == "..")
    {
        return false;
    }

    tokio::fs::metadata(web_dir.join(relative))
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false)
}

async fn index_page(state: &AppState) -> Result<Response> {
    let index_path = state.web_dir().join("index.html");
    let page = match tokio::fs::read_to_string(&index_path).await {
        Ok(page) => page,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %index_path.display(), "No index.html, serving built-in shell");
            BUILTIN_SHELL.to_string()
        }
        Err(e) => return Err(e.into()),
    };

    let mut response = Html(inject_meta(&page, &state.meta_tags)).into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    Ok(response)
}
