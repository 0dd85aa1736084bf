//! Command registry for the palette
//!
//! The registry is rebuilt from state whenever it is needed: bookmarks come
//! from the config, shortcuts and highlights from the GitLab feeds, and the
//! weather and app commands are fixed. Order of registration is the order of
//! display; filtering never reorders.

use dash_config::{Bookmark, SearchSettings};

use crate::actions::{
    Action, GitLabAction, GlobalAction, PreferencesAction, PromptAction, PromptKind, WeatherAction,
};
use crate::domain_models::{DashboardLinks, Highlight};
use crate::state::AppState;

/// Entries shown for an empty query
pub const DEFAULT_RESULTS: usize = 12;
/// Upper bound on filtered entries
pub const MAX_RESULTS: usize = 24;

/// Where a command came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandSource {
    Bookmark,
    GitLabShortcut,
    GitLabHighlight,
    Weather,
    App,
    Fallback,
}

impl CommandSource {
    pub fn label(self) -> &'static str {
        match self {
            Self::Bookmark => "Bookmark",
            Self::GitLabShortcut => "GitLab",
            Self::GitLabHighlight => "Merge request",
            Self::Weather => "Weather",
            Self::App => "App",
            Self::Fallback => "Web",
        }
    }
}

/// In-app effect of a command without an href
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandAction {
    ToggleWeatherDetail,
    RefreshWeather,
    RefreshGitLab,
    ToggleTheme,
    EditTimezone,
    EditDisplayName,
    Quit,
}

impl CommandAction {
    pub fn to_action(self) -> Action {
        match self {
            Self::ToggleWeatherDetail => {
                Action::Preferences(PreferencesAction::ToggleWeatherDetail)
            }
            Self::RefreshWeather => Action::Weather(WeatherAction::Refresh),
            Self::RefreshGitLab => Action::GitLab(GitLabAction::Refresh),
            Self::ToggleTheme => Action::Preferences(PreferencesAction::ToggleTheme),
            Self::EditTimezone => Action::Prompt(PromptAction::Open(PromptKind::Timezone)),
            Self::EditDisplayName => Action::Prompt(PromptAction::Open(PromptKind::DisplayName)),
            Self::Quit => Action::Global(GlobalAction::Quit),
        }
    }
}

/// A single palette entry. Exactly one of `href` and `action` is set.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandItem {
    pub id: String,
    pub label: String,
    pub description: Option<String>,
    pub href: Option<String>,
    pub action: Option<CommandAction>,
    pub keywords: Vec<String>,
    pub badge: Option<String>,
    pub source: CommandSource,
}

impl CommandItem {
    fn link(id: String, label: String, href: String, source: CommandSource) -> Self {
        Self {
            id,
            label,
            description: None,
            href: Some(href),
            action: None,
            keywords: Vec::new(),
            badge: None,
            source,
        }
    }

    fn command(
        id: &str,
        label: &str,
        description: &str,
        action: CommandAction,
        source: CommandSource,
    ) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            description: Some(description.to_string()),
            href: None,
            action: Some(action),
            keywords: Vec::new(),
            badge: None,
            source,
        }
    }

    fn with_keywords(mut self, keywords: &[&str]) -> Self {
        self.keywords = keywords.iter().map(|k| k.to_string()).collect();
        self
    }

    /// Case-insensitive substring match over label, description and keywords.
    /// `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        let mut haystack = self.label.to_lowercase();
        if let Some(description) = &self.description {
            haystack.push(' ');
            haystack.push_str(&description.to_lowercase());
        }
        for keyword in &self.keywords {
            haystack.push(' ');
            haystack.push_str(&keyword.to_lowercase());
        }
        haystack.contains(needle)
    }
}

/// Result row: a real command or the web-search fallback
#[derive(Debug, Clone, PartialEq)]
pub enum PaletteEntry {
    Command(CommandItem),
    Fallback(CommandItem),
}

impl PaletteEntry {
    pub fn item(&self) -> &CommandItem {
        match self {
            Self::Command(item) | Self::Fallback(item) => item,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

fn bookmark_items(bookmarks: &[Bookmark]) -> impl Iterator<Item = CommandItem> + '_ {
    bookmarks.iter().enumerate().map(|(index, bookmark)| CommandItem {
        description: bookmark.description.clone(),
        keywords: bookmark.keywords.clone(),
        ..CommandItem::link(
            format!("bookmark:{}", index),
            bookmark.label.clone(),
            bookmark.url.clone(),
            CommandSource::Bookmark,
        )
    })
}

fn shortcut_items(links: &DashboardLinks) -> Vec<CommandItem> {
    [
        ("assigned", "Assigned merge requests", links.assigned()),
        ("reviewing", "Review requests", links.reviewing()),
        ("merged", "Recently merged", links.merged()),
    ]
    .into_iter()
    .map(|(key, label, url)| {
        CommandItem::link(
            format!("gitlab:{}", key),
            label.to_string(),
            url,
            CommandSource::GitLabShortcut,
        )
        .with_keywords(&["gitlab", "mr", "merge request"])
    })
    .collect()
}

fn highlight_item(highlight: &Highlight) -> CommandItem {
    let badge = highlight
        .tags
        .first()
        .map(|tag| tag.label().to_string())
        .or_else(|| highlight.badge.clone());
    CommandItem {
        description: Some(highlight.meta.clone()),
        keywords: vec![format!("!{}", highlight.iid), "mr".to_string()],
        badge,
        ..CommandItem::link(
            format!("mr:{}", highlight.id),
            highlight.title.clone(),
            highlight.url.clone(),
            CommandSource::GitLabHighlight,
        )
    }
}

fn weather_items(weather_detail: bool) -> Vec<CommandItem> {
    let toggle_label = if weather_detail {
        "Show compact weather"
    } else {
        "Show detailed weather"
    };
    vec![
        CommandItem::command(
            "weather:detail",
            toggle_label,
            "Switch between the summary and the hourly/daily outlook",
            CommandAction::ToggleWeatherDetail,
            CommandSource::Weather,
        )
        .with_keywords(&["forecast", "rain"]),
        CommandItem::command(
            "weather:refresh",
            "Refresh weather",
            "Fetch the forecast again",
            CommandAction::RefreshWeather,
            CommandSource::Weather,
        )
        .with_keywords(&["forecast"]),
    ]
}

fn app_items() -> Vec<CommandItem> {
    vec![
        CommandItem::command(
            "app:theme",
            "Toggle theme",
            "Switch between the dark and light palette",
            CommandAction::ToggleTheme,
            CommandSource::App,
        )
        .with_keywords(&["dark", "light"]),
        CommandItem::command(
            "app:timezone",
            "Set timezone",
            "Clock timezone as an IANA id, e.g. Europe/Berlin",
            CommandAction::EditTimezone,
            CommandSource::App,
        )
        .with_keywords(&["clock", "time"]),
        CommandItem::command(
            "app:name",
            "Set display name",
            "Name used in the greeting",
            CommandAction::EditDisplayName,
            CommandSource::App,
        )
        .with_keywords(&["greeting"]),
        CommandItem::command(
            "app:refresh-gitlab",
            "Refresh merge requests",
            "Reload assigned, review and merged queues",
            CommandAction::RefreshGitLab,
            CommandSource::App,
        )
        .with_keywords(&["gitlab"]),
        CommandItem::command(
            "app:quit",
            "Quit",
            "Exit the dashboard",
            CommandAction::Quit,
            CommandSource::App,
        )
        .with_keywords(&["exit"]),
    ]
}

/// All commands in registration order
pub fn build_registry(
    bookmarks: &[Bookmark],
    links: &DashboardLinks,
    highlights: &[&Highlight],
    weather_detail: bool,
) -> Vec<CommandItem> {
    bookmark_items(bookmarks)
        .chain(shortcut_items(links))
        .chain(highlights.iter().map(|h| highlight_item(h)))
        .chain(weather_items(weather_detail))
        .chain(app_items())
        .collect()
}

/// Web search for the raw query
pub fn web_search_fallback(search: &SearchSettings, query: &str) -> CommandItem {
    CommandItem {
        description: Some("No matching command".to_string()),
        ..CommandItem::link(
            "fallback:search".to_string(),
            format!("Search the web for \"{}\"", query.trim()),
            search.search_url(query.trim()),
            CommandSource::Fallback,
        )
    }
}

/// Filter the registry by a free-text query.
///
/// An empty query yields the first `DEFAULT_RESULTS` items. Otherwise matches
/// keep registry order up to `MAX_RESULTS`; with no match at all the fallback,
/// if given, is the only entry.
pub fn filter_commands(
    items: &[CommandItem],
    query: &str,
    fallback: Option<CommandItem>,
) -> Vec<PaletteEntry> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return items
            .iter()
            .take(DEFAULT_RESULTS)
            .cloned()
            .map(PaletteEntry::Command)
            .collect();
    }

    let matches: Vec<PaletteEntry> = items
        .iter()
        .filter(|item| item.matches(&needle))
        .take(MAX_RESULTS)
        .cloned()
        .map(PaletteEntry::Command)
        .collect();

    match fallback {
        Some(fallback) if matches.is_empty() => vec![PaletteEntry::Fallback(fallback)],
        _ => matches,
    }
}

/// Entries for the palette as currently shown
pub fn palette_entries(state: &AppState) -> Vec<PaletteEntry> {
    let highlights = state.gitlab.all_highlights();
    let registry = build_registry(
        &state.config.bookmarks,
        &state.links,
        &highlights,
        state.preferences.weather_detail,
    );
    let query = &state.command_palette.query;
    let fallback = web_search_fallback(&state.config.search, query);
    filter_commands(&registry, query, Some(fallback))
}
