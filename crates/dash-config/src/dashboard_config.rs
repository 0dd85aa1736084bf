//! Dashboard configuration
//!
//! Loaded once at startup from `.homedash.toml` and the environment, then
//! shared read-only with everything that needs a token, a username or a URL.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const DEFAULT_GITLAB_URL: &str = "https://gitlab.com";
const DEFAULT_SEARCH_URL: &str = "https://duckduckgo.com/?q={query}";

/// `[gitlab]` section
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct GitLabSettings {
    /// Instance root, e.g. `https://gitlab.com`
    pub base_url: String,
    pub token: Option<String>,
    pub username: Option<String>,
    /// Poll interval for the merge-request queues
    pub refresh_secs: u64,
    /// `per_page` for the list endpoint
    pub page_size: u32,
}

impl Default for GitLabSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GITLAB_URL.to_string(),
            token: None,
            username: None,
            refresh_secs: 300,
            page_size: 40,
        }
    }
}

/// Borrowed token and username, both known to be non-empty
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GitLabCredentials<'a> {
    pub token: &'a str,
    pub username: &'a str,
}

/// A GitLab setting that has to be present before any request is made
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingSetting {
    Token,
    Username,
}

impl MissingSetting {
    /// Instruction shown in place of the widget
    pub fn instructions(self) -> &'static str {
        match self {
            Self::Token => {
                "Set GITLAB_TOKEN (or gitlab.token in .homedash.toml) to a personal access token with read_api scope"
            }
            Self::Username => {
                "Set GITLAB_USERNAME (or gitlab.username in .homedash.toml) to your GitLab username"
            }
        }
    }
}

impl GitLabSettings {
    /// Token and username, or the first one that is missing
    pub fn credentials(&self) -> std::result::Result<GitLabCredentials<'_>, MissingSetting> {
        let token = non_empty(self.token.as_deref()).ok_or(MissingSetting::Token)?;
        let username = non_empty(self.username.as_deref()).ok_or(MissingSetting::Username)?;
        Ok(GitLabCredentials { token, username })
    }

    /// Base URL without trailing slash
    pub fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

/// `[weather]` section
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct WeatherSettings {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Location label shown instead of the reverse-geocoded name
    pub label: Option<String>,
    pub refresh_secs: u64,
    pub geolocation_timeout_secs: u64,
}

impl Default for WeatherSettings {
    fn default() -> Self {
        Self {
            latitude: None,
            longitude: None,
            label: None,
            refresh_secs: 900,
            geolocation_timeout_secs: 10,
        }
    }
}

impl WeatherSettings {
    /// Statically configured position, when both halves are set
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }

    pub fn configured_label(&self) -> Option<&str> {
        non_empty(self.label.as_deref())
    }
}

/// `[search]` section
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SearchSettings {
    /// URL template; `{query}` is replaced with the encoded query
    pub url: String,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_SEARCH_URL.to_string(),
        }
    }
}

impl SearchSettings {
    pub fn search_url(&self, query: &str) -> String {
        let encoded = urlencoding::encode(query.trim());
        if self.url.contains("{query}") {
            self.url.replace("{query}", &encoded)
        } else {
            format!("{}{}", self.url, encoded)
        }
    }
}

/// One `[[bookmarks]]` entry
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Bookmark {
    pub label: String,
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Complete dashboard configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    pub gitlab: GitLabSettings,
    pub weather: WeatherSettings,
    pub search: SearchSettings,
    pub bookmarks: Vec<Bookmark>,
}

impl DashboardConfig {
    /// Load config file and `.env`, apply environment overrides, or use defaults
    pub fn load() -> Self {
        match dotenvy::dotenv() {
            Ok(path) => log::debug!("Loaded environment from {:?}", path),
            Err(e) if e.not_found() => {}
            Err(e) => log::warn!("Failed to load .env: {}", e),
        }

        let config = match crate::load_config_file() {
            Some(content) => match Self::parse(&content) {
                Ok(config) => {
                    log::info!("Loaded dashboard config from file");
                    config
                }
                Err(e) => {
                    log::warn!("{:#}", e);
                    Self::default()
                }
            },
            None => {
                log::debug!("Using default dashboard config");
                Self::default()
            }
        };

        config.with_env(|key| std::env::var(key).ok())
    }

    /// Parse TOML content; absent keys take their defaults
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config file")
    }

    /// Apply environment overrides read through `lookup`.
    ///
    /// Empty values are ignored. Coordinates that are not numbers are
    /// ignored with a warning.
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = var("GITLAB_URL") {
            self.gitlab.base_url = url;
        }
        if let Some(token) = var("GITLAB_TOKEN") {
            self.gitlab.token = Some(token);
        }
        if let Some(username) = var("GITLAB_USERNAME") {
            self.gitlab.username = Some(username);
        }
        if let Some(label) = var("HOMEDASH_LOCATION") {
            self.weather.label = Some(label);
        }
        for (key, slot) in [
            ("HOMEDASH_LATITUDE", &mut self.weather.latitude),
            ("HOMEDASH_LONGITUDE", &mut self.weather.longitude),
        ] {
            if let Some(raw) = var(key) {
                match raw.trim().parse::<f64>() {
                    Ok(value) => *slot = Some(value),
                    Err(_) => log::warn!("Ignoring {}={:?}: not a number", key, raw),
                }
            }
        }

        self
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = DashboardConfig::default();
        assert_eq!(config.gitlab.base_url, "https://gitlab.com");
        assert_eq!(config.gitlab.page_size, 40);
        assert!(config.bookmarks.is_empty());
        assert_eq!(
            config.gitlab.credentials(),
            Err(MissingSetting::Token)
        );
    }

    #[test]
    fn test_config_deserialize_partial() {
        let config = DashboardConfig::parse(
            r#"
            [gitlab]
            base_url = "https://gitlab.example/"
            username = "alice"

            [weather]
            label = "Office"

            [[bookmarks]]
            label = "Grafana"
            url = "https://grafana.example"
            keywords = ["metrics", "dashboards"]
            "#,
        )
        .unwrap();

        assert_eq!(config.gitlab.base(), "https://gitlab.example");
        assert_eq!(config.gitlab.refresh_secs, 300);
        assert_eq!(config.weather.configured_label(), Some("Office"));
        assert_eq!(config.weather.coordinates(), None);
        assert_eq!(config.bookmarks.len(), 1);
        assert_eq!(config.bookmarks[0].description, None);
        assert_eq!(config.search, SearchSettings::default());
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(DashboardConfig::parse("[gitlab\nbase_url =").is_err());
    }

    #[test]
    fn test_env_overrides_file() {
        let config = DashboardConfig::parse("[gitlab]\ntoken = \"from-file\"")
            .unwrap()
            .with_env(env(&[
                ("GITLAB_TOKEN", "from-env"),
                ("GITLAB_USERNAME", "bob"),
                ("GITLAB_URL", ""),
                ("HOMEDASH_LATITUDE", "52.52"),
                ("HOMEDASH_LONGITUDE", "east"),
            ]));

        assert_eq!(config.gitlab.token.as_deref(), Some("from-env"));
        assert_eq!(config.gitlab.base_url, "https://gitlab.com");
        assert_eq!(config.weather.latitude, Some(52.52));
        assert_eq!(config.weather.longitude, None);
        assert_eq!(
            config.gitlab.credentials(),
            Ok(GitLabCredentials {
                token: "from-env",
                username: "bob"
            })
        );
    }

    #[test]
    fn test_blank_username_is_missing() {
        let mut settings = GitLabSettings {
            token: Some("t".to_string()),
            username: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(settings.credentials(), Err(MissingSetting::Username));
        settings.username = Some("carol".to_string());
        assert!(settings.credentials().is_ok());
    }

    #[test]
    fn test_search_url_encodes_query() {
        let search = SearchSettings::default();
        assert_eq!(
            search.search_url(" rust async "),
            "https://duckduckgo.com/?q=rust%20async"
        );

        let prefix_only = SearchSettings {
            url: "https://search.example/?q=".to_string(),
        };
        assert_eq!(prefix_only.search_url("a&b"), "https://search.example/?q=a%26b");
    }
}
