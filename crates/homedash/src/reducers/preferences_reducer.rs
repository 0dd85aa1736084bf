//! Preferences reducer
//!
//! Persistence happens in the preferences middleware; this only mirrors the
//! change into state.

use crate::actions::PreferencesAction;
use crate::state::PreferencesState;

pub fn reduce_preferences(
    mut state: PreferencesState,
    action: &PreferencesAction,
) -> PreferencesState {
    match action {
        PreferencesAction::ToggleTheme => state.theme = state.theme.toggled(),
        PreferencesAction::ToggleWeatherDetail => state.weather_detail = !state.weather_detail,
        PreferencesAction::SetTimezone(input) => state.set_timezone(input),
        PreferencesAction::SetDisplayName(name) => state.display_name = name.trim().to_string(),
    }
    state
}
