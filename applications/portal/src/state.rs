/// Application state shared across handlers
use crate::config::PortalConfig;
use crate::static_files::render_meta_tags;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<PortalConfig>,
    /// `<meta>` tags injected into every served page
    pub meta_tags: Arc<str>,
}

impl AppState {
    pub fn new(config: PortalConfig) -> Self {
        let meta_tags = render_meta_tags(&config).into();
        Self {
            config: Arc::new(config),
            meta_tags,
        }
    }

    pub fn web_dir(&self) -> &PathBuf {
        &self.config.web.dir
    }
}
