use ratatui::{
    layout::{Alignment, Margin, Rect},
    style::Stylize,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::actions::PromptKind;
use crate::state::{AppState, PromptState};
use crate::views::command_palette_view::centered;

pub fn render(state: &AppState, prompt: &PromptState, area: Rect, f: &mut Frame) {
    let theme = &state.theme;
    let popup_area = centered(area, 60, 70, 5);
    f.render_widget(Clear, popup_area);

    let footer_hint = Line::from(vec![
        Span::styled(" Enter", theme.key_hint()),
        Span::styled(" save  ", theme.muted()),
        Span::styled("Ctrl+U", theme.key_hint()),
        Span::styled(" clear  ", theme.muted()),
        Span::styled("Esc", theme.key_hint()),
        Span::styled(" cancel ", theme.muted()),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", prompt.kind.title()))
        .title_style(theme.panel_title())
        .title_bottom(footer_hint)
        .title_alignment(Alignment::Center)
        .border_style(theme.panel_border())
        .style(theme.panel_background());
    f.render_widget(block, popup_area);

    let placeholder = match prompt.kind {
        PromptKind::Timezone => "e.g. Europe/Berlin",
        PromptKind::DisplayName => "Your name",
    };
    let input = if prompt.input.is_empty() {
        Line::from(Span::styled(placeholder, theme.muted().italic()))
    } else {
        Line::from(vec![
            Span::styled(prompt.input.as_str(), theme.text()),
            Span::styled("▏", theme.key_hint()),
        ])
    };

    let inner = popup_area.inner(Margin {
        horizontal: 2,
        vertical: 2,
    });
    f.render_widget(Paragraph::new(input), inner);
}
