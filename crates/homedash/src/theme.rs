use dash_config::ThemeChoice;
use ratatui::{prelude::*, style::palette::tailwind};

use crate::domain_models::{ReviewCategory, Tag};

/// Application theme - centralized color and style management
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub choice: ThemeChoice,

    // Background colors
    pub bg_primary: Color,
    pub bg_panel: Color,

    // Text colors
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,

    // Accent colors
    pub accent_primary: Color,
    pub accent_secondary: Color,

    // Status colors
    pub status_success: Color,
    pub status_error: Color,
    pub status_warning: Color,
    pub status_info: Color,

    // Selection colors
    pub selected_bg: Color,
    pub selected_fg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub fn for_choice(choice: ThemeChoice) -> Self {
        match choice {
            ThemeChoice::Dark => Self::dark(),
            ThemeChoice::Light => Self::light(),
        }
    }

    /// Dark theme (default)
    pub fn dark() -> Self {
        Self {
            choice: ThemeChoice::Dark,

            bg_primary: tailwind::SLATE.c950,
            bg_panel: tailwind::SLATE.c900,

            text_primary: tailwind::SLATE.c100,
            text_secondary: tailwind::SLATE.c300,
            text_muted: tailwind::SLATE.c400,

            accent_primary: tailwind::CYAN.c400,
            accent_secondary: tailwind::CYAN.c600,

            status_success: tailwind::GREEN.c400,
            status_error: tailwind::RED.c400,
            status_warning: tailwind::YELLOW.c400,
            status_info: tailwind::BLUE.c400,

            selected_bg: tailwind::BLUE.c500,
            selected_fg: Color::White,
        }
    }

    /// Light theme
    pub fn light() -> Self {
        Self {
            choice: ThemeChoice::Light,

            bg_primary: tailwind::SLATE.c50,
            bg_panel: tailwind::SLATE.c100,

            text_primary: tailwind::SLATE.c900,
            text_secondary: tailwind::SLATE.c700,
            text_muted: tailwind::SLATE.c500,

            accent_primary: tailwind::CYAN.c700,
            accent_secondary: tailwind::CYAN.c500,

            status_success: tailwind::GREEN.c700,
            status_error: tailwind::RED.c700,
            status_warning: tailwind::AMBER.c700,
            status_info: tailwind::BLUE.c700,

            selected_bg: tailwind::BLUE.c200,
            selected_fg: tailwind::SLATE.c950,
        }
    }

    // Prebuilt styles for common use cases

    /// Style for the whole screen
    pub fn background(&self) -> Style {
        Style::default().bg(self.bg_primary).fg(self.text_primary)
    }

    /// Style for panel backgrounds (palette, prompt)
    pub fn panel_background(&self) -> Style {
        Style::default().bg(self.bg_panel)
    }

    /// Style for panel borders
    pub fn panel_border(&self) -> Style {
        Style::default().fg(self.accent_secondary)
    }

    /// Style for panel titles
    pub fn panel_title(&self) -> Style {
        Style::default()
            .fg(self.accent_primary)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for key hints (e.g., "Enter" in "Enter open")
    pub fn key_hint(&self) -> Style {
        Style::default()
            .fg(self.accent_primary)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for the entry under the cursor
    pub fn selected(&self) -> Style {
        Style::default()
            .fg(self.selected_fg)
            .bg(self.selected_bg)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for error messages
    pub fn error(&self) -> Style {
        Style::default()
            .fg(self.status_error)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for success messages
    pub fn success(&self) -> Style {
        Style::default().fg(self.status_success)
    }

    /// Style for warning messages
    pub fn warning(&self) -> Style {
        Style::default().fg(self.status_warning)
    }

    /// Style for muted/helper text
    pub fn muted(&self) -> Style {
        Style::default().fg(self.text_muted)
    }

    /// Style for primary text
    pub fn text(&self) -> Style {
        Style::default().fg(self.text_primary)
    }

    /// Style for secondary text
    pub fn text_secondary(&self) -> Style {
        Style::default().fg(self.text_secondary)
    }

    /// Style for a merge-request tag
    pub fn tag(&self, tag: Tag) -> Style {
        let color = match tag {
            Tag::Pipeline | Tag::Conflicts => self.status_error,
            Tag::Stale => self.status_warning,
            Tag::Draft => self.text_muted,
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }

    /// Style for a review category marker
    pub fn review_category(&self, category: ReviewCategory) -> Style {
        let color = match category {
            ReviewCategory::NeedsReview => self.status_warning,
            ReviewCategory::InReview => self.status_info,
            ReviewCategory::Reviewed => self.status_success,
        };
        Style::default().fg(color)
    }
}
