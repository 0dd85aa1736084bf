//! Reducers
//!
//! Pure functions from (state, action) to state. The root reducer in
//! `app_reducer` routes each tagged action to the reducer of its widget.

pub mod app_reducer;
pub mod command_palette_reducer;
pub mod gitlab_reducer;
pub mod preferences_reducer;
pub mod prompt_reducer;
pub mod weather_reducer;
