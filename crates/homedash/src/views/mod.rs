//! Views
//!
//! Rendering is a pure function of `AppState`. The dashboard is always drawn;
//! the palette and the prompt are drawn on top of it while open.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    widgets::Block,
    Frame,
};

use crate::state::AppState;

pub mod command_palette_view;
pub mod dashboard_view;
pub mod prompt_view;
pub mod status_bar;

use status_bar::StatusBarWidget;

/// Render the entire application UI
pub fn render(state: &AppState, area: Rect, f: &mut Frame) {
    f.render_widget(Block::default().style(state.theme.background()), area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    dashboard_view::render(state, rows[0], f);
    f.render_widget(StatusBarWidget(state), rows[1]);

    if state.command_palette.is_open() {
        command_palette_view::render(state, area, f);
    }
    if let Some(prompt) = &state.prompt {
        prompt_view::render(state, prompt, area, f);
    }
}
