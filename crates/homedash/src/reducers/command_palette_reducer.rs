//! Command palette reducer
//!
//! Drives the Closed / OpenEmpty / OpenFiltered state machine. The entry
//! count for the current query is computed by the caller, so this stays a
//! pure transformation of the palette state.

use crate::actions::CommandPaletteAction;
use crate::state::{CommandPaletteState, PaletteMode};

fn mode_for(query: &str) -> PaletteMode {
    if query.is_empty() {
        PaletteMode::OpenEmpty
    } else {
        PaletteMode::OpenFiltered
    }
}

/// `entry_count` is the length of the result list for the current query.
pub fn reduce_command_palette(
    mut state: CommandPaletteState,
    action: &CommandPaletteAction,
    entry_count: usize,
) -> CommandPaletteState {
    match action {
        CommandPaletteAction::Open => {
            state = CommandPaletteState {
                mode: PaletteMode::OpenEmpty,
                ..CommandPaletteState::default()
            };
        }

        // Close and Execute both leave the palette closed and empty;
        // the middleware has already run the selected entry
        CommandPaletteAction::Close | CommandPaletteAction::Execute => {
            state = CommandPaletteState::default();
        }

        // Editing only applies while open
        _ if !state.is_open() => {}

        CommandPaletteAction::Char(c) => {
            state.query.push(*c);
            state.selected_index = 0;
            state.mode = mode_for(&state.query);
        }

        CommandPaletteAction::Backspace => {
            state.query.pop();
            state.selected_index = 0;
            state.mode = mode_for(&state.query);
        }

        CommandPaletteAction::Clear => {
            state.query.clear();
            state.selected_index = 0;
            state.mode = PaletteMode::OpenEmpty;
        }

        CommandPaletteAction::NavigateNext => {
            if entry_count > 0 {
                state.selected_index = (state.selected_index + 1).min(entry_count - 1);
            }
        }

        CommandPaletteAction::NavigatePrev => {
            state.selected_index = state.selected_index.saturating_sub(1);
        }
    }

    state
}
