use crate::actions::{Action, CommandPaletteAction, GlobalAction, PromptAction};
use crate::commands::palette_entries;
use crate::reducers::{
    command_palette_reducer::reduce_command_palette, gitlab_reducer::reduce_gitlab,
    preferences_reducer::reduce_preferences, prompt_reducer::reduce_prompt,
    weather_reducer::reduce_weather,
};
use crate::state::AppState;
use crate::theme::Theme;

/// Reducer - pure function that produces new state from current state + action
/// This is the root reducer that orchestrates all sub-reducers
pub fn reduce(mut state: AppState, action: &Action) -> AppState {
    match action {
        Action::Global(global) => match global {
            GlobalAction::Tick(now) => state.now = *now,
            GlobalAction::Quit => {
                log::info!("Quit requested");
                state.running = false;
            }
            GlobalAction::Start
            | GlobalAction::KeyPressed(_)
            | GlobalAction::RefreshAll
            | GlobalAction::OpenUrl(_) => {}
        },

        Action::CommandPalette(palette_action) => {
            let entry_count = match palette_action {
                CommandPaletteAction::NavigateNext => palette_entries(&state).len(),
                _ => 0,
            };
            state.command_palette =
                reduce_command_palette(state.command_palette, palette_action, entry_count);
        }

        Action::Prompt(prompt_action) => {
            // A prompt replaces the palette it was opened from
            if let PromptAction::Open(_) = prompt_action {
                state.command_palette = Default::default();
            }
            state.prompt = reduce_prompt(state.prompt.take(), prompt_action, &state.preferences);
        }

        Action::GitLab(gitlab_action) => {
            state.gitlab = reduce_gitlab(state.gitlab, gitlab_action, state.now);
        }

        Action::Weather(weather_action) => {
            state.weather = reduce_weather(state.weather, weather_action, state.now);
        }

        Action::Preferences(preferences_action) => {
            state.preferences = reduce_preferences(state.preferences, preferences_action);
            state.theme = Theme::for_choice(state.preferences.theme);
        }
    }

    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{PreferencesAction, PromptKind};
    use chrono::{TimeZone, Utc};
    use dash_config::ThemeChoice;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_tick_updates_clock() {
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();
        let state = reduce(AppState::default(), &Action::Global(GlobalAction::Tick(now)));
        assert_eq!(state.now, now);
        assert!(state.running);
    }

    #[test]
    fn test_quit_stops_running() {
        let state = reduce(AppState::default(), &Action::Global(GlobalAction::Quit));
        assert!(!state.running);
    }

    #[test]
    fn test_theme_toggle_switches_palette() {
        let state = reduce(
            AppState::default(),
            &Action::Preferences(PreferencesAction::ToggleTheme),
        );
        assert_eq!(state.preferences.theme, ThemeChoice::Light);
        assert_eq!(state.theme, Theme::light());
    }

    #[test]
    fn test_navigation_is_clamped_to_registry() {
        let mut state = reduce(
            AppState::default(),
            &Action::CommandPalette(CommandPaletteAction::Open),
        );
        let total = palette_entries(&state).len();
        for _ in 0..100 {
            state = reduce(
                state,
                &Action::CommandPalette(CommandPaletteAction::NavigateNext),
            );
        }
        assert_eq!(state.command_palette.selected_index, total - 1);
    }

    #[test]
    fn test_prompt_replaces_palette() {
        let state = reduce(
            AppState::default(),
            &Action::CommandPalette(CommandPaletteAction::Open),
        );
        let state = reduce(
            state,
            &Action::Prompt(PromptAction::Open(PromptKind::Timezone)),
        );
        assert!(!state.command_palette.is_open());
        assert_eq!(state.prompt.map(|p| p.kind), Some(PromptKind::Timezone));
    }
}
