//! Preference changes
//!
//! Reducers apply these to state; the preferences middleware persists them.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreferencesAction {
    ToggleTheme,
    ToggleWeatherDetail,
    /// Raw input; kept even when it is not a valid zone
    SetTimezone(String),
    SetDisplayName(String),
}
