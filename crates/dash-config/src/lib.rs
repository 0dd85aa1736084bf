//! Configuration and file management for homedash
//!
//! This crate provides:
//! - File path utilities for config and cache files
//! - Configuration file loading (TOML) with environment overrides
//! - Dashboard configuration (DashboardConfig)
//! - Persisted UI preferences
//! - Timezone validation

pub mod config_file;
pub mod dashboard_config;
pub mod paths;
pub mod preferences;
pub mod timezone;

pub use config_file::load_config_file;
pub use dashboard_config::{
    Bookmark, DashboardConfig, GitLabCredentials, GitLabSettings, MissingSetting,
    SearchSettings, WeatherSettings,
};
pub use preferences::{Preferences, ThemeChoice};
pub use timezone::{resolve_timezone, ResolvedTimezone, Zone};
