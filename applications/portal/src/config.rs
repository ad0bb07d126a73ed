/// Portal host configuration
use crate::error::{PortalServerError, Result};
use nyamedia_core::validate_bot_username;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Environment variable prefix, e.g. `NYAMEDIA_WIDGET__BOT_USERNAME`
pub const ENV_PREFIX: &str = "NYAMEDIA";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PortalConfig {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub web: WebSettings,

    #[serde(default)]
    pub widget: WidgetSettings,

    #[serde(default)]
    pub api: ApiSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WebSettings {
    /// Built web client (index.html, pkg/, assets/)
    #[serde(default = "default_web_dir")]
    pub dir: PathBuf,
}

/// Login widget settings handed to the browser
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WidgetSettings {
    /// Telegram bot @handle
    #[serde(default)]
    pub bot_username: String,

    /// Where the widget sends the browser after login
    #[serde(default)]
    pub redirect_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ApiSettings {
    /// Backend base URL, absolute or a path on this host. Unset means the
    /// page origin.
    #[serde(default)]
    pub base_url: Option<String>,
}

impl PortalConfig {
    /// Load configuration from file and environment.
    ///
    /// `path` defaults to `config.toml` in the working directory; a missing
    /// default file is not an error, a missing explicit one is.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(PortalServerError::Config(format!(
                        "config file {} not found",
                        path.display()
                    )));
                }
                settings = settings.add_source(config::File::from(path));
            }
            None => {
                let default_path = PathBuf::from("config.toml");
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Nested keys are separated by a double underscore because key names
        // themselves contain single ones
        settings = settings.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| PortalServerError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| PortalServerError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        validate_bot_username(&self.widget.bot_username).map_err(|e| {
            PortalServerError::Config(format!(
                "{} (set {}_WIDGET__BOT_USERNAME)",
                e, ENV_PREFIX
            ))
        })?;

        if let Some(redirect) = non_blank(self.widget.redirect_url.as_deref()) {
            Url::parse(redirect).map_err(|e| {
                PortalServerError::Config(format!("invalid redirect URL {:?}: {}", redirect, e))
            })?;
        }

        if let Some(base) = non_blank(self.api.base_url.as_deref()) {
            if !base.starts_with('/') {
                let url = Url::parse(base).map_err(|e| {
                    PortalServerError::Config(format!("invalid API base URL {:?}: {}", base, e))
                })?;
                if !matches!(url.scheme(), "http" | "https") {
                    return Err(PortalServerError::Config(format!(
                        "API base URL must be http(s): {}",
                        base
                    )));
                }
            }
        }

        Ok(())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for WebSettings {
    fn default() -> Self {
        Self {
            dir: default_web_dir(),
        }
    }
}

// Default values
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_web_dir() -> PathBuf {
    PathBuf::from("./web")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_bot(bot: &str) -> PortalConfig {
        PortalConfig {
            widget: WidgetSettings {
                bot_username: bot.to_string(),
                redirect_url: None,
            },
            ..Default::default()
        }
    }

    #[test]
    fn defaults() {
        let config = PortalConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.web.dir, PathBuf::from("./web"));
        assert!(config.api.base_url.is_none());
    }

    #[test]
    fn missing_bot_handle_fails_validation() {
        let err = with_bot("").validate().unwrap_err();
        assert!(err.to_string().contains("NYAMEDIA_WIDGET__BOT_USERNAME"));
    }

    #[test]
    fn numeric_bot_id_fails_validation() {
        assert!(with_bot("987654321").validate().is_err());
        assert!(with_bot("@nyamedia_bot").validate().is_ok());
    }

    #[test]
    fn api_base_may_be_a_path() {
        let mut config = with_bot("nyamedia_bot");
        config.api.base_url = Some("/backend".to_string());
        assert!(config.validate().is_ok());

        config.api.base_url = Some("ftp://media.example.com".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_reads_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portal.toml");
        std::fs::write(
            &path,
            "[server]\nport = 9000\n\n[widget]\nbot_username = \"nyamedia_bot\"\n",
        )
        .unwrap();

        let config = PortalConfig::load(Some(&path)).unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.widget.bot_username, "nyamedia_bot");
    }

    #[test]
    fn load_rejects_missing_explicit_file() {
        let result = PortalConfig::load(Some(Path::new("/nonexistent/portal.toml")));
        assert!(matches!(result, Err(PortalServerError::Config(_))));
    }
}
