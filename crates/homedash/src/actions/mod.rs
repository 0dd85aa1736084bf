//! Actions module
//!
//! All actions in the application, tagged by the widget or concern they
//! target. Middleware observes every action; reducers turn the ones that
//! reach them into new state.

pub mod command_palette;
pub mod gitlab;
pub mod global;
pub mod preferences;
pub mod prompt;
pub mod weather;

pub use command_palette::CommandPaletteAction;
pub use gitlab::{Feed, GitLabAction};
pub use global::GlobalAction;
pub use preferences::PreferencesAction;
pub use prompt::{PromptAction, PromptKind};
pub use weather::WeatherAction;

/// Root action enum - tagged by domain
#[derive(Debug, Clone)]
pub enum Action {
    /// Application-wide actions (start, keys, tick, quit)
    Global(GlobalAction),
    /// Command palette overlay
    CommandPalette(CommandPaletteAction),
    /// Single-line text prompt overlay
    Prompt(PromptAction),
    /// Merge-request queues
    GitLab(GitLabAction),
    /// Weather panel
    Weather(WeatherAction),
    /// Persisted preferences
    Preferences(PreferencesAction),
}

impl Action {
    /// Periodic actions are logged at trace level only
    pub fn is_periodic(&self) -> bool {
        matches!(self, Action::Global(GlobalAction::Tick(_)))
    }
}
