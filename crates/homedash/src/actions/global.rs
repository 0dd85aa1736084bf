//! Global actions - not tied to any specific widget

use chrono::{DateTime, Utc};
use ratatui::crossterm::event::KeyEvent;

#[derive(Debug, Clone)]
pub enum GlobalAction {
    /// Dispatched once after the store is assembled; kicks off the first loads
    Start,
    /// Raw key pressed (before translation)
    KeyPressed(KeyEvent),
    /// Wall-clock tick, drives the clock and interval refreshes
    Tick(DateTime<Utc>),
    /// Refresh every data source now
    RefreshAll,
    /// Open a URL in the system browser
    OpenUrl(String),
    /// Quit the application
    Quit,
}
