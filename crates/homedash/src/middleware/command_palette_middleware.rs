//! Command Palette Middleware
//!
//! Activates the entry under the cursor when CommandPalette::Execute is
//! dispatched. Links go to the browser, in-app commands are dispatched as
//! their action. The Execute action itself continues to the reducer, which
//! closes the palette.

use crate::actions::{Action, CommandPaletteAction, GlobalAction};
use crate::commands::palette_entries;
use crate::dispatcher::Dispatcher;
use crate::middleware::Middleware;
use crate::state::AppState;

pub struct CommandPaletteMiddleware;

impl CommandPaletteMiddleware {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CommandPaletteMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl Middleware for CommandPaletteMiddleware {
    fn handle(&mut self, action: &Action, state: &AppState, dispatcher: &Dispatcher) -> bool {
        if let Action::CommandPalette(CommandPaletteAction::Execute) = action {
            let entries = palette_entries(state);
            let Some(entry) = entries.get(state.command_palette.selected_index) else {
                log::debug!("Command palette: nothing to execute");
                return true;
            };

            let item = entry.item();
            log::debug!("Command palette executing: {}", item.label);
            if let Some(href) = &item.href {
                dispatcher.dispatch(Action::Global(GlobalAction::OpenUrl(href.clone())));
            } else if let Some(command) = item.action {
                dispatcher.dispatch(command.to_action());
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;
    use dash_config::{Bookmark, DashboardConfig, ThemeChoice};
    use std::sync::{Arc, Mutex};

    /// Records every action that reaches it and consumes OpenUrl
    struct Recorder(Arc<Mutex<Vec<String>>>);

    impl Middleware for Recorder {
        fn handle(&mut self, action: &Action, _state: &AppState, _dispatcher: &Dispatcher) -> bool {
            if let Ok(mut seen) = self.0.lock() {
                seen.push(format!("{:?}", action));
            }
            !matches!(action, Action::Global(GlobalAction::OpenUrl(_)))
        }
    }

    fn store_with(config: DashboardConfig) -> (Store, Arc<Mutex<Vec<String>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut state = AppState::default();
        state.config = Arc::new(config);
        let mut store = Store::new(state);
        store.add_middleware(Box::new(CommandPaletteMiddleware::new()));
        store.add_middleware(Box::new(Recorder(seen.clone())));
        (store, seen)
    }

    #[test]
    fn test_executing_bookmark_opens_url_and_closes() {
        let config = DashboardConfig {
            bookmarks: vec![Bookmark {
                label: "Mail".to_string(),
                url: "https://mail.example".to_string(),
                description: None,
                keywords: Vec::new(),
            }],
            ..DashboardConfig::default()
        };
        let (mut store, seen) = store_with(config);
        store.dispatch(Action::CommandPalette(CommandPaletteAction::Open));
        store.dispatch(Action::CommandPalette(CommandPaletteAction::Execute));

        let seen = seen.lock().unwrap();
        assert!(seen
            .iter()
            .any(|a| a.contains("OpenUrl(\"https://mail.example\")")));
        assert!(!store.state().command_palette.is_open());
    }

    #[test]
    fn test_executing_command_dispatches_its_action() {
        let (mut store, _) = store_with(DashboardConfig::default());
        store.dispatch(Action::CommandPalette(CommandPaletteAction::Open));
        for c in "toggle theme".chars() {
            store.dispatch(Action::CommandPalette(CommandPaletteAction::Char(c)));
        }
        store.dispatch(Action::CommandPalette(CommandPaletteAction::Execute));

        assert_eq!(store.state().theme.choice, ThemeChoice::Light);
        assert!(!store.state().command_palette.is_open());
    }
}
