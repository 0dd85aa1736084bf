use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};

use crate::commands::{palette_entries, PaletteEntry};
use crate::state::AppState;
use crate::theme::Theme;

/// Popup rectangle centered in `area`
pub(crate) fn centered(area: Rect, percent_width: u16, max_width: u16, height: u16) -> Rect {
    let scaled = u32::from(area.width) * u32::from(percent_width) / 100;
    let width = u16::try_from(scaled)
        .unwrap_or(u16::MAX)
        .min(max_width)
        .min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    }
}

fn entry_row<'a>(theme: &Theme, entry: &'a PaletteEntry, selected: bool) -> Row<'a> {
    let item = entry.item();
    let indicator = if selected { "▶ " } else { "  " };

    let label_style = if entry.is_fallback() {
        theme.text_secondary().italic()
    } else {
        theme.text()
    };
    let (label_style, row_style) = if selected {
        (theme.selected(), theme.selected())
    } else {
        (label_style, theme.panel_background())
    };

    let mut label = vec![Span::styled(item.label.as_str(), label_style)];
    if let Some(badge) = &item.badge {
        label.push(Span::styled(format!("  {}", badge), theme.warning()));
    }

    Row::new(vec![
        Cell::from(indicator),
        Cell::from(Line::from(label)),
        Cell::from(Span::styled(item.source.label(), theme.muted())),
    ])
    .style(row_style)
}

/// Render the command palette as a centered floating panel
pub fn render(state: &AppState, area: Rect, f: &mut Frame) {
    let theme = &state.theme;
    let entries = palette_entries(state);
    let palette = &state.command_palette;

    // Dim everything underneath
    f.render_widget(
        Block::default().style(Style::default().bg(Color::Black).add_modifier(Modifier::DIM)),
        area,
    );

    let popup_height = (area.height / 10 * 6).clamp(10, 30);
    let popup_area = centered(area, 70, 100, popup_height);
    f.render_widget(Clear, popup_area);

    let footer_hint = Line::from(vec![
        Span::styled(" Enter", theme.key_hint()),
        Span::styled(" open  ", theme.muted()),
        Span::styled("↑/↓", theme.key_hint()),
        Span::styled(" navigate  ", theme.muted()),
        Span::styled("Esc", theme.key_hint()),
        Span::styled(" close ", theme.muted()),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Command Palette ({} results) ", entries.len()))
        .title_style(theme.panel_title())
        .title_bottom(footer_hint)
        .title_alignment(Alignment::Center)
        .border_style(theme.panel_border().add_modifier(Modifier::BOLD))
        .style(theme.panel_background());
    f.render_widget(block, popup_area);

    let inner = popup_area.inner(Margin {
        horizontal: 2,
        vertical: 1,
    });
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Input box
            Constraint::Min(3),    // Results
            Constraint::Length(2), // Details of the selected entry
        ])
        .split(inner);

    let input = if palette.query.is_empty() {
        Line::from(Span::styled(
            "Search bookmarks, merge requests and commands…",
            theme.muted().italic(),
        ))
    } else {
        Line::from(vec![
            Span::styled(palette.query.as_str(), theme.text()),
            Span::styled("▏", theme.key_hint()),
        ])
    };
    f.render_widget(
        Paragraph::new(input).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.panel_border())
                .style(theme.panel_background()),
        ),
        chunks[0],
    );

    if entries.is_empty() {
        f.render_widget(
            Paragraph::new("No matching commands")
                .style(theme.muted())
                .alignment(Alignment::Center),
            chunks[1],
        );
        return;
    }

    // Keep the cursor in view
    let visible = chunks[1].height as usize;
    let offset = (palette.selected_index + 1).saturating_sub(visible);
    let rows: Vec<Row> = entries
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible)
        .map(|(index, entry)| entry_row(theme, entry, index == palette.selected_index))
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(2),
            Constraint::Min(20),
            Constraint::Length(14),
        ],
    )
    .style(theme.panel_background());
    f.render_widget(table, chunks[1]);

    if let Some(selected) = entries.get(palette.selected_index) {
        let item = selected.item();
        let details = item
            .description
            .as_deref()
            .or(item.href.as_deref())
            .unwrap_or_default();
        f.render_widget(
            Paragraph::new(Span::styled(details, theme.text_secondary()))
                .wrap(Wrap { trim: false })
                .style(theme.panel_background()),
            chunks[2],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_fits_inside_area() {
        let area = Rect::new(0, 0, 80, 20);
        let popup = centered(area, 70, 100, 30);
        assert_eq!(popup, Rect::new(12, 0, 56, 20));

        let tiny = centered(Rect::new(5, 5, 10, 4), 70, 100, 10);
        assert!(tiny.width <= 10 && tiny.height <= 4);
        assert_eq!(tiny.x, 6);
    }
}
