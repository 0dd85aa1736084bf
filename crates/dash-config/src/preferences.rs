//! Persisted UI preferences
//!
//! A flat JSON object on disk mapping fixed keys to JSON-encoded strings.
//! Reads never fail: a missing key, an unreadable file or a value that does
//! not decode all yield the key's default.

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::paths;

pub const THEME_KEY: &str = "homedash.theme";
pub const TIMEZONE_KEY: &str = "homedash.timezone";
pub const DISPLAY_NAME_KEY: &str = "homedash.displayName";
pub const WEATHER_DETAIL_KEY: &str = "homedash.weatherDetail";

/// Color scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeChoice {
    #[default]
    Dark,
    Light,
}

impl ThemeChoice {
    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}

/// Key/value preference store
#[derive(Debug, Clone, Default)]
pub struct Preferences {
    /// `None` keeps everything in memory
    path: Option<PathBuf>,
    values: BTreeMap<String, String>,
}

impl Preferences {
    /// Load from the config directory, or start empty
    pub fn load() -> Self {
        match paths::preferences_path() {
            Ok(path) => Self::load_from(path),
            Err(e) => {
                log::warn!("Preferences will not be persisted: {:#}", e);
                Self::default()
            }
        }
    }

    /// Load from `path`; a missing or corrupt file starts empty
    pub fn load_from(path: PathBuf) -> Self {
        let values = match Self::read_values(&path) {
            Ok(values) => values,
            Err(e) => {
                if path.exists() {
                    log::warn!("Ignoring preferences file: {:#}", e);
                }
                BTreeMap::new()
            }
        };
        Self {
            path: Some(path),
            values,
        }
    }

    fn read_values(path: &Path) -> Result<BTreeMap<String, String>> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read preferences file: {:?}", path))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse preferences file: {:?}", path))
    }

    /// Decoded value under `key`, or `default`
    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.values
            .get(key)
            .and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or(default)
    }

    /// Store `value` under `key` and write the file through
    pub fn set<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        let encoded = serde_json::to_string(value).context("Failed to encode preference")?;
        self.values.insert(key.to_string(), encoded);
        self.save()
    }

    fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content =
            serde_json::to_string_pretty(&self.values).context("Failed to serialize preferences")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write preferences file: {:?}", path))?;
        log::debug!("Saved preferences to {:?}", path);
        Ok(())
    }

    pub fn theme(&self) -> ThemeChoice {
        self.get(THEME_KEY, ThemeChoice::default())
    }

    pub fn set_theme(&mut self, theme: ThemeChoice) -> Result<()> {
        self.set(THEME_KEY, &theme)
    }

    /// Raw timezone string as typed by the user; empty means system zone
    pub fn timezone(&self) -> String {
        self.get(TIMEZONE_KEY, String::new())
    }

    pub fn set_timezone(&mut self, timezone: &str) -> Result<()> {
        self.set(TIMEZONE_KEY, &timezone.trim())
    }

    pub fn display_name(&self) -> String {
        self.get(DISPLAY_NAME_KEY, String::new())
    }

    pub fn set_display_name(&mut self, name: &str) -> Result<()> {
        self.set(DISPLAY_NAME_KEY, &name.trim())
    }

    pub fn weather_detail(&self) -> bool {
        self.get(WEATHER_DETAIL_KEY, false)
    }

    pub fn set_weather_detail(&mut self, detailed: bool) -> Result<()> {
        self.set(WEATHER_DETAIL_KEY, &detailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_on_first_read() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = Preferences::load_from(dir.path().join("preferences.json"));

        assert_eq!(prefs.theme(), ThemeChoice::Dark);
        assert_eq!(prefs.timezone(), "");
        assert_eq!(prefs.display_name(), "");
        assert!(!prefs.weather_detail());
    }

    #[test]
    fn test_values_survive_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("preferences.json");

        let mut prefs = Preferences::load_from(path.clone());
        prefs.set_theme(ThemeChoice::Light).unwrap();
        prefs.set_timezone(" Europe/Berlin ").unwrap();
        prefs.set_weather_detail(true).unwrap();

        let reloaded = Preferences::load_from(path.clone());
        assert_eq!(reloaded.theme(), ThemeChoice::Light);
        assert_eq!(reloaded.timezone(), "Europe/Berlin");
        assert!(reloaded.weather_detail());

        let raw = fs::read_to_string(path).unwrap();
        assert!(raw.contains(r#""homedash.theme": "\"light\"""#));
    }

    #[test]
    fn test_undecodable_value_falls_back_silently() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(
            &path,
            r#"{"homedash.theme": "\"sepia\"", "homedash.weatherDetail": "yes please"}"#,
        )
        .unwrap();

        let prefs = Preferences::load_from(path);
        assert_eq!(prefs.theme(), ThemeChoice::Dark);
        assert!(!prefs.weather_detail());
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(&path, "not json at all").unwrap();

        let mut prefs = Preferences::load_from(path.clone());
        assert_eq!(prefs.display_name(), "");
        prefs.set_display_name("Sam").unwrap();
        assert_eq!(Preferences::load_from(path).display_name(), "Sam");
    }

    #[test]
    fn test_theme_toggle() {
        assert_eq!(ThemeChoice::Dark.toggled(), ThemeChoice::Light);
        assert_eq!(ThemeChoice::Light.toggled(), ThemeChoice::Dark);
    }
}
