//! KeyboardMiddleware - translates keyboard events into context-aware actions
//!
//! ## Layer 1: Priority keys
//! Ctrl+C, the palette hotkey (Ctrl+K / Super+K) and Esc work everywhere.
//!
//! ## Layer 2: Capabilities
//! When the focused surface has TEXT_INPUT, character keys are typed into it
//! and never reach the shortcut layer, so `/` and `q` are just characters.
//!
//! ## Layer 3: Dashboard shortcuts
//! Single-key shortcuts, only when nothing with text input is focused.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::actions::{
    Action, CommandPaletteAction, GlobalAction, PreferencesAction, PromptAction, PromptKind,
};
use crate::dispatcher::Dispatcher;
use crate::middleware::Middleware;
use crate::state::{AppState, Focus};

pub struct KeyboardMiddleware;

impl KeyboardMiddleware {
    pub fn new() -> Self {
        Self
    }

    fn is_palette_hotkey(key: &KeyEvent) -> bool {
        matches!(key.code, KeyCode::Char('k') | KeyCode::Char('K'))
            && (key.modifiers.contains(KeyModifiers::CONTROL)
                || key.modifiers.contains(KeyModifiers::SUPER))
    }

    fn handle_key(&self, key: KeyEvent, state: &AppState, dispatcher: &Dispatcher) {
        let focus = state.focus();
        let capabilities = state.capabilities();

        // ═══════════════════════════════════════════════════════════════════
        // LAYER 1: Priority keys (always work)
        // ═══════════════════════════════════════════════════════════════════

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            log::debug!("Layer 1: Ctrl+C - dispatching Quit");
            dispatcher.dispatch(Action::Global(GlobalAction::Quit));
            return;
        }

        if Self::is_palette_hotkey(&key) {
            match focus {
                Focus::Dashboard => {
                    dispatcher.dispatch(Action::CommandPalette(CommandPaletteAction::Open))
                }
                Focus::Palette => {
                    dispatcher.dispatch(Action::CommandPalette(CommandPaletteAction::Close))
                }
                Focus::Prompt => log::debug!("Layer 1: palette hotkey ignored while prompting"),
            }
            return;
        }

        if key.code == KeyCode::Esc {
            match focus {
                Focus::Palette => {
                    dispatcher.dispatch(Action::CommandPalette(CommandPaletteAction::Close))
                }
                Focus::Prompt => dispatcher.dispatch(Action::Prompt(PromptAction::Cancel)),
                Focus::Dashboard => {}
            }
            return;
        }

        // ═══════════════════════════════════════════════════════════════════
        // LAYER 2: Capability-based routing
        // ═══════════════════════════════════════════════════════════════════

        if capabilities.accepts_text_input() {
            let edit = match key.code {
                KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    Some(TextEdit::Clear)
                }
                KeyCode::Char(c)
                    if !key.modifiers.contains(KeyModifiers::CONTROL)
                        && !key.modifiers.contains(KeyModifiers::ALT) =>
                {
                    Some(TextEdit::Char(c))
                }
                KeyCode::Backspace if key.modifiers.contains(KeyModifiers::SUPER) => {
                    Some(TextEdit::Clear)
                }
                KeyCode::Backspace => Some(TextEdit::Backspace),
                KeyCode::Enter => Some(TextEdit::Confirm),
                KeyCode::Down if capabilities.supports_item_navigation() => Some(TextEdit::Next),
                KeyCode::Up if capabilities.supports_item_navigation() => Some(TextEdit::Prev),
                _ => None,
            };

            match edit.and_then(|edit| edit.into_action(focus)) {
                Some(action) => dispatcher.dispatch(action),
                None => log::trace!("Layer 2: unhandled key {:?} in text input", key.code),
            }
            return;
        }

        // ═══════════════════════════════════════════════════════════════════
        // LAYER 3: Dashboard shortcuts
        // ═══════════════════════════════════════════════════════════════════

        if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            return;
        }

        let action = match key.code {
            KeyCode::Char('/') => Action::CommandPalette(CommandPaletteAction::Open),
            KeyCode::Char('q') => Action::Global(GlobalAction::Quit),
            KeyCode::Char('r') => Action::Global(GlobalAction::RefreshAll),
            KeyCode::Char('w') => Action::Preferences(PreferencesAction::ToggleWeatherDetail),
            KeyCode::Char('t') => Action::Preferences(PreferencesAction::ToggleTheme),
            KeyCode::Char('z') => Action::Prompt(PromptAction::Open(PromptKind::Timezone)),
            KeyCode::Char('n') => Action::Prompt(PromptAction::Open(PromptKind::DisplayName)),
            KeyCode::Char('g') => Action::Global(GlobalAction::OpenUrl(state.links.assigned())),
            _ => return,
        };
        log::debug!("Layer 3: {:?} -> {:?}", key.code, action);
        dispatcher.dispatch(action);
    }
}

impl Default for KeyboardMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

/// Text editing intent, before it is aimed at the focused surface
#[derive(Debug, Clone, Copy)]
enum TextEdit {
    Char(char),
    Backspace,
    Clear,
    Confirm,
    Next,
    Prev,
}

impl TextEdit {
    fn into_action(self, focus: Focus) -> Option<Action> {
        match focus {
            Focus::Palette => Some(Action::CommandPalette(match self {
                Self::Char(c) => CommandPaletteAction::Char(c),
                Self::Backspace => CommandPaletteAction::Backspace,
                Self::Clear => CommandPaletteAction::Clear,
                Self::Confirm => CommandPaletteAction::Execute,
                Self::Next => CommandPaletteAction::NavigateNext,
                Self::Prev => CommandPaletteAction::NavigatePrev,
            })),
            Focus::Prompt => {
                let action = match self {
                    Self::Char(c) => PromptAction::Char(c),
                    Self::Backspace => PromptAction::Backspace,
                    Self::Clear => PromptAction::Clear,
                    Self::Confirm => PromptAction::Submit,
                    Self::Next | Self::Prev => return None,
                };
                Some(Action::Prompt(action))
            }
            Focus::Dashboard => None,
        }
    }
}

impl Middleware for KeyboardMiddleware {
    fn handle(&mut self, action: &Action, state: &AppState, dispatcher: &Dispatcher) -> bool {
        if let Action::Global(GlobalAction::KeyPressed(key)) = action {
            self.handle_key(*key, state, dispatcher);
            // Raw keys never reach the reducer
            return false;
        }

        true
    }
}
