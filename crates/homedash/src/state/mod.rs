//! Application State Module
//!
//! Contains all state types used by the application, organized by feature.

mod command_palette;
mod feed;
mod gitlab;
mod preferences;
mod prompt;

pub use command_palette::{CommandPaletteState, PaletteMode};
pub use feed::FeedState;
pub use gitlab::GitLabState;
pub use preferences::PreferencesState;
pub use prompt::PromptState;

use chrono::{DateTime, Utc};
use dash_config::DashboardConfig;
use std::sync::Arc;

use crate::capabilities::PanelCapabilities;
use crate::domain_models::{DashboardLinks, WeatherSnapshot};
use crate::theme::Theme;

/// Which surface receives keyboard input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Dashboard,
    Palette,
    Prompt,
}

/// Application state
#[derive(Debug, Clone)]
pub struct AppState {
    pub running: bool,
    /// Resolved once at startup, never mutated
    pub config: Arc<DashboardConfig>,
    pub links: DashboardLinks,
    pub theme: Theme,
    /// Time of the last tick
    pub now: DateTime<Utc>,
    pub preferences: PreferencesState,
    pub command_palette: CommandPaletteState,
    /// Present only while a prompt is shown
    pub prompt: Option<PromptState>,
    pub gitlab: GitLabState,
    pub weather: FeedState<WeatherSnapshot>,
}

impl AppState {
    pub fn new(
        config: Arc<DashboardConfig>,
        preferences: PreferencesState,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            running: true,
            links: DashboardLinks::from_settings(&config.gitlab),
            config,
            theme: Theme::for_choice(preferences.theme),
            now,
            preferences,
            command_palette: CommandPaletteState::default(),
            prompt: None,
            gitlab: GitLabState::default(),
            weather: FeedState::default(),
        }
    }

    pub fn focus(&self) -> Focus {
        if self.prompt.is_some() {
            Focus::Prompt
        } else if self.command_palette.is_open() {
            Focus::Palette
        } else {
            Focus::Dashboard
        }
    }

    /// Capabilities of the focused surface
    pub fn capabilities(&self) -> PanelCapabilities {
        match self.focus() {
            Focus::Dashboard => PanelCapabilities::empty(),
            Focus::Palette => PanelCapabilities::TEXT_INPUT | PanelCapabilities::ITEM_NAVIGATION,
            Focus::Prompt => PanelCapabilities::TEXT_INPUT,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(
            Arc::new(DashboardConfig::default()),
            PreferencesState::default(),
            Utc::now(),
        )
    }
}
