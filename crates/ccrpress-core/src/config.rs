use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Root application configuration, loaded from `~/.config/ccrpress/config.toml`.
///
/// Built once at process start and passed by reference to every collaborator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub upstream: UpstreamConfig,
    pub doi: DoiConfig,
    pub locale: LocaleConfig,
    pub journal: JournalConfig,
    pub pages: PagesConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the editorial backend, without the `/api/v1` suffix.
    pub base_url: String,
    /// Name of the environment variable holding the API token.
    pub token_env: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DoiConfig {
    /// Registrant prefix placed before the slash of every synthesized DOI.
    pub prefix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocaleConfig {
    /// Language tags tried in order when resolving localized fields.
    pub preference: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JournalConfig {
    pub title: String,
    pub abbrev_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issn: Option<String>,
    pub publisher: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PagesConfig {
    pub first_page_policy: FirstPagePolicy,
}

/// How the first printed page of a new article is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FirstPagePolicy {
    /// Continue pagination after the last published article of the issue.
    #[default]
    Continue,
    /// Every article starts on page 1.
    Restart,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

// ─── Defaults ──────────────────────────────────────────────

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://computationalcommunication.org/ccr".to_string(),
            token_env: "CCRPRESS_TOKEN".to_string(),
            timeout_secs: 30,
            user_agent: format!("ccrpress/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Default for DoiConfig {
    fn default() -> Self {
        Self {
            prefix: "10.5117".to_string(),
        }
    }
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            preference: vec!["en_US".to_string(), "en".to_string()],
        }
    }
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            title: "Computational Communication Research".to_string(),
            abbrev_title: "CCR".to_string(),
            issn: Some("2665-9085".to_string()),
            publisher: "Amsterdam University Press".to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

// ─── Load / Save ───────────────────────────────────────────

impl AppConfig {
    /// Standard config file path: `~/.config/ccrpress/config.toml`
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("CCRPRESS_CONFIG") {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("ccrpress")
            .join("config.toml")
    }

    /// Load config from disk, falling back to defaults if file doesn't exist.
    ///
    /// `CCRPRESS_BASE_URL` overrides the upstream base URL.
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        let mut config = Self::load_from(&path)?;
        if let Ok(base_url) = std::env::var("CCRPRESS_BASE_URL") {
            config.upstream.base_url = base_url;
        }
        config.validate()?;
        Ok(config)
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save config to the standard path.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        self.save_to(&path)
    }

    /// Save config to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_str)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.locale.preference.is_empty() {
            return Err(CoreError::ConfigError(
                "locale.preference must name at least one language".to_string(),
            ));
        }
        let prefix_ok = !self.doi.prefix.is_empty()
            && self
                .doi
                .prefix
                .chars()
                .all(|c| c.is_ascii_digit() || c == '.');
        if !prefix_ok {
            return Err(CoreError::ConfigError(format!(
                "doi.prefix must be digits and dots, got {:?}",
                self.doi.prefix
            )));
        }
        if self.upstream.base_url.trim().is_empty() {
            return Err(CoreError::ConfigError(
                "upstream.base_url is empty".to_string(),
            ));
        }
        Ok(())
    }

    /// API token read from the environment variable named in `upstream.token_env`.
    pub fn api_token(&self) -> Option<String> {
        std::env::var(&self.upstream.token_env)
            .ok()
            .filter(|token| !token.trim().is_empty())
    }
}
