//! Status Bar Widget
//!
//! One row at the bottom of the screen: the last error of every widget that
//! has one (or the time of the last update) on the left, key hints on the
//! right.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Widget,
};

use crate::actions::Feed;
use crate::state::AppState;

/// `(widget, message)` for every widget currently showing an error
pub fn widget_errors(state: &AppState) -> Vec<(&'static str, &str)> {
    let gitlab = &state.gitlab;
    [
        (Feed::Assigned.label(), gitlab.assigned.error.as_deref()),
        (Feed::Review.label(), gitlab.review.error.as_deref()),
        (Feed::Merged.label(), gitlab.merged.error.as_deref()),
        ("Weather", state.weather.error.as_deref()),
    ]
    .into_iter()
    .filter_map(|(widget, error)| error.map(|message| (widget, message)))
    .collect()
}

const KEY_HINTS: [(&str, &str); 5] = [
    ("/", "palette"),
    ("r", "refresh"),
    ("w", "weather"),
    ("t", "theme"),
    ("q", "quit"),
];

pub struct StatusBarWidget<'a>(pub &'a AppState);

impl Widget for StatusBarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let state = self.0;
        let theme = &state.theme;

        if area.height < 1 {
            return;
        }
        buf.set_style(area, Style::default().bg(theme.bg_panel));

        let errors = widget_errors(state);
        let left = if errors.is_empty() {
            let last_update = [
                state.gitlab.assigned.last_updated,
                state.gitlab.review.last_updated,
                state.weather.last_updated,
            ]
            .into_iter()
            .flatten()
            .max();
            match last_update {
                Some(at) => Line::from(Span::styled(
                    format!(
                        " Updated {}",
                        state.preferences.timezone.zone.format(at, "%H:%M")
                    ),
                    theme.muted(),
                )),
                None => Line::from(Span::styled(" Loading…", theme.muted())),
            }
        } else {
            let mut spans = vec![Span::raw(" ")];
            for (index, (widget, message)) in errors.iter().enumerate() {
                if index > 0 {
                    spans.push(Span::styled(" | ", theme.muted()));
                }
                spans.push(Span::styled(format!("{}: ", widget), theme.error()));
                spans.push(Span::styled(*message, theme.text_secondary()));
            }
            Line::from(spans)
        };

        let mut hints = Vec::new();
        for (key, label) in KEY_HINTS {
            hints.push(Span::styled(key, theme.key_hint()));
            hints.push(Span::styled(format!(" {}  ", label), theme.muted()));
        }
        let hints = Line::from(hints);
        let hints_width = hints.width() as u16;

        let left_width = area.width.saturating_sub(hints_width);
        buf.set_line(area.x, area.y, &left, left_width);
        if hints_width <= area.width {
            buf.set_line(area.x + left_width, area.y, &hints, hints_width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_widget_errors_lists_failing_widgets_in_order() {
        let mut state = AppState::default();
        assert!(widget_errors(&state).is_empty());

        state.weather.error = Some("Location lookup timed out".to_string());
        state.gitlab.review.error = Some("HTTP 500".to_string());
        assert_eq!(
            widget_errors(&state),
            vec![
                ("Review requests", "HTTP 500"),
                ("Weather", "Location lookup timed out"),
            ]
        );
    }
}
