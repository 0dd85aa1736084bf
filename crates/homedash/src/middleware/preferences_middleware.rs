//! Preferences Middleware
//!
//! Owns the preference store. Turns a submitted prompt into the matching
//! preference change and writes every change through to disk before the
//! reducer mirrors it into state.

use dash_config::Preferences;

use crate::actions::{Action, PreferencesAction, PromptAction, PromptKind};
use crate::dispatcher::Dispatcher;
use crate::middleware::Middleware;
use crate::state::AppState;

pub struct PreferencesMiddleware {
    store: Preferences,
}

impl PreferencesMiddleware {
    pub fn new(store: Preferences) -> Self {
        Self { store }
    }

    fn persist(&mut self, action: &PreferencesAction, state: &AppState) {
        let current = &state.preferences;
        let result = match action {
            PreferencesAction::ToggleTheme => self.store.set_theme(current.theme.toggled()),
            PreferencesAction::ToggleWeatherDetail => {
                self.store.set_weather_detail(!current.weather_detail)
            }
            PreferencesAction::SetTimezone(input) => self.store.set_timezone(input.trim()),
            PreferencesAction::SetDisplayName(name) => self.store.set_display_name(name.trim()),
        };
        if let Err(e) = result {
            log::warn!("Failed to save preferences: {:#}", e);
        }
    }
}

impl Middleware for PreferencesMiddleware {
    fn handle(&mut self, action: &Action, state: &AppState, dispatcher: &Dispatcher) -> bool {
        match action {
            Action::Prompt(PromptAction::Submit) => {
                if let Some(prompt) = &state.prompt {
                    let input = prompt.input.clone();
                    let change = match prompt.kind {
                        PromptKind::Timezone => PreferencesAction::SetTimezone(input),
                        PromptKind::DisplayName => PreferencesAction::SetDisplayName(input),
                    };
                    dispatcher.dispatch(Action::Preferences(change));
                }
            }
            Action::Preferences(change) => self.persist(change, state),
            _ => {}
        }
        true
    }
}
