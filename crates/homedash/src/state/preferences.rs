//! Preferences as shown by the UI

use dash_config::{resolve_timezone, Preferences, ResolvedTimezone, ThemeChoice};

#[derive(Debug, Clone, PartialEq)]
pub struct PreferencesState {
    pub theme: ThemeChoice,
    /// Raw timezone input, possibly invalid
    pub timezone_input: String,
    pub timezone: ResolvedTimezone,
    pub display_name: String,
    pub weather_detail: bool,
}

impl Default for PreferencesState {
    fn default() -> Self {
        Self {
            theme: ThemeChoice::default(),
            timezone_input: String::new(),
            timezone: resolve_timezone(""),
            display_name: String::new(),
            weather_detail: false,
        }
    }
}

impl PreferencesState {
    pub fn from_store(store: &Preferences) -> Self {
        let timezone_input = store.timezone();
        Self {
            theme: store.theme(),
            timezone: resolve_timezone(&timezone_input),
            timezone_input,
            display_name: store.display_name(),
            weather_detail: store.weather_detail(),
        }
    }

    /// Keep the raw input and re-resolve the zone
    pub fn set_timezone(&mut self, input: &str) {
        self.timezone_input = input.trim().to_string();
        self.timezone = resolve_timezone(&self.timezone_input);
    }
}
