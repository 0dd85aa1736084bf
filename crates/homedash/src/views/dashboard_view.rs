//! Dashboard view - the always-visible base layer
//!
//! ```text
//! ┌ clock & greeting ─────────────────────────────────────────┐
//! ├ merge requests ──────────────────┬ weather ───────────────┤
//! │ metrics                          │                        │
//! │ assigned                         ├ bookmarks ─────────────┤
//! │ review requests                  │                        │
//! │ recently merged                  │                        │
//! └──────────────────────────────────┴────────────────────────┘
//! ```

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use dash_config::Zone;

use crate::actions::Feed;
use crate::domain_models::insights::MetricKey;
use crate::domain_models::weather::HourlyPoint;
use crate::domain_models::{Highlight, MergedHighlight, WeatherSnapshot};
use crate::state::{AppState, FeedState};
use crate::theme::Theme;

/// Hours shown in the detailed weather view
const DETAIL_HOURS: usize = 6;

pub fn render(state: &AppState, area: Rect, f: &mut Frame) {
    let header_height = if state.preferences.timezone.warning.is_some() {
        4
    } else {
        3
    };
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(header_height), Constraint::Min(0)])
        .split(area);

    render_header(state, rows[0], f);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(rows[1]);

    render_gitlab(state, columns[0], f);

    let weather_height = if state.preferences.weather_detail { 16 } else { 8 };
    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(weather_height), Constraint::Min(0)])
        .split(columns[1]);

    render_weather(state, side[0], f);
    render_bookmarks(state, side[1], f);
}

fn panel<'a>(theme: &Theme, title: impl Into<Line<'a>>) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .title_style(theme.panel_title())
        .border_style(theme.panel_border())
}

/// Greeting for the local hour, with the name when one is set
pub fn greeting(hour: u32, name: &str) -> String {
    let salutation = match hour {
        5..=11 => "Good morning",
        12..=17 => "Good afternoon",
        18..=22 => "Good evening",
        _ => "Good night",
    };
    let name = name.trim();
    if name.is_empty() {
        salutation.to_string()
    } else {
        format!("{}, {}", salutation, name)
    }
}

fn render_header(state: &AppState, area: Rect, f: &mut Frame) {
    let theme = &state.theme;
    let zone = &state.preferences.timezone.zone;

    let mut lines = vec![Line::from(vec![
        Span::styled(
            greeting(zone.hour(state.now), &state.preferences.display_name),
            theme.text().add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
        Span::styled(zone.format(state.now, "%H:%M:%S"), theme.key_hint()),
        Span::styled(zone.format(state.now, "  %A, %d %B %Y"), theme.text_secondary()),
        Span::styled(format!("  ({})", zone.name()), theme.muted()),
    ])];

    if let Some(warning) = &state.preferences.timezone.warning {
        lines.push(Line::from(Span::styled(warning.clone(), theme.warning())));
    }

    f.render_widget(Paragraph::new(lines).block(panel(theme, " homedash ")), area);
}

/// Title suffix describing the load state of a feed
fn feed_title<T>(label: &str, feed: &FeedState<T>) -> String {
    if feed.loading {
        format!(" {} (loading…) ", label)
    } else if feed.error.is_some() {
        format!(" {} (failed) ", label)
    } else {
        format!(" {} ", label)
    }
}

fn render_gitlab(state: &AppState, area: Rect, f: &mut Frame) {
    let theme = &state.theme;
    let gitlab = &state.gitlab;

    if let Some(notice) = &gitlab.notice {
        let text = vec![
            Line::from(Span::styled("GitLab is not configured", theme.warning())),
            Line::from(""),
            Line::from(Span::styled(notice.clone(), theme.text_secondary())),
        ];
        f.render_widget(
            Paragraph::new(text)
                .wrap(Wrap { trim: true })
                .block(panel(theme, " Merge requests ")),
            area,
        );
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Percentage(40),
            Constraint::Percentage(40),
            Constraint::Min(4),
        ])
        .split(area);

    render_metrics(state, rows[0], f);

    let assigned: Vec<&Highlight> = gitlab
        .assigned
        .data
        .iter()
        .flat_map(|insights| insights.highlights.iter())
        .collect();
    render_highlights(
        theme,
        &feed_title(Feed::Assigned.label(), &gitlab.assigned),
        &assigned,
        false,
        rows[1],
        f,
    );

    let review: Vec<&Highlight> = gitlab.review.data.iter().flatten().collect();
    render_highlights(
        theme,
        &feed_title(Feed::Review.label(), &gitlab.review),
        &review,
        true,
        rows[2],
        f,
    );

    let merged: Vec<&MergedHighlight> = gitlab.merged.data.iter().flatten().collect();
    render_merged(
        theme,
        &feed_title(Feed::Merged.label(), &gitlab.merged),
        &merged,
        rows[3],
        f,
    );
}

fn render_metrics(state: &AppState, area: Rect, f: &mut Frame) {
    let theme = &state.theme;
    let Some(insights) = &state.gitlab.assigned.data else {
        f.render_widget(
            Paragraph::new(Span::styled("No data yet", theme.muted()))
                .block(panel(theme, " Overview ")),
            area,
        );
        return;
    };

    let mut spans = Vec::new();
    for (index, metric) in insights.metrics.iter().enumerate() {
        if index > 0 {
            spans.push(Span::styled("  ·  ", theme.muted()));
        }
        let value_style = if metric.value > 0 && metric.key != MetricKey::Open {
            theme.warning().add_modifier(Modifier::BOLD)
        } else {
            theme.text().add_modifier(Modifier::BOLD)
        };
        spans.push(Span::styled(format!("{} ", metric.label), theme.text_secondary()));
        spans.push(Span::styled(metric.value.to_string(), value_style));
    }

    f.render_widget(
        Paragraph::new(Line::from(spans)).block(panel(theme, " Overview ")),
        area,
    );
}

fn highlight_item<'a>(
    theme: &Theme,
    highlight: &'a Highlight,
    show_category: bool,
) -> ListItem<'a> {
    let mut title = Vec::new();
    if show_category {
        title.push(Span::styled(
            format!("[{}] ", highlight.category.label()),
            theme.review_category(highlight.category),
        ));
    }
    for tag in &highlight.tags {
        title.push(Span::styled(format!("{} ", tag.label()), theme.tag(*tag)));
    }
    if let Some(badge) = &highlight.badge {
        title.push(Span::styled(format!("{} ", badge), theme.muted()));
    }
    title.push(Span::styled(highlight.title.as_str(), theme.text()));

    let mut meta = vec![Span::styled(format!("  {}", highlight.meta), theme.muted())];
    if reviewed_by_user(highlight) {
        meta.push(Span::styled("  · you reviewed", theme.success()));
    }

    ListItem::new(vec![Line::from(title), Line::from(meta)])
}

/// The user commented on or approved the merge request
fn reviewed_by_user(highlight: &Highlight) -> bool {
    highlight.review.and_then(|review| review.reviewed) == Some(true)
}

fn render_highlights(
    theme: &Theme,
    title: &str,
    highlights: &[&Highlight],
    show_category: bool,
    area: Rect,
    f: &mut Frame,
) {
    let block = panel(theme, title.to_string());
    if highlights.is_empty() {
        f.render_widget(
            Paragraph::new(Span::styled("Nothing here", theme.muted())).block(block),
            area,
        );
        return;
    }

    let items: Vec<ListItem> = highlights
        .iter()
        .map(|h| highlight_item(theme, h, show_category))
        .collect();
    f.render_widget(List::new(items).block(block), area);
}

fn render_merged(
    theme: &Theme,
    title: &str,
    merged: &[&MergedHighlight],
    area: Rect,
    f: &mut Frame,
) {
    let block = panel(theme, title.to_string());
    if merged.is_empty() {
        f.render_widget(
            Paragraph::new(Span::styled("Nothing merged this week", theme.muted())).block(block),
            area,
        );
        return;
    }

    let items: Vec<ListItem> = merged
        .iter()
        .map(|m| {
            ListItem::new(Line::from(vec![
                Span::styled("✓ ", theme.success()),
                Span::styled(m.title.as_str(), theme.text()),
                Span::styled(format!("  {}", m.meta), theme.muted()),
            ]))
        })
        .collect();
    f.render_widget(List::new(items).block(block), area);
}

/// Up to `DETAIL_HOURS` points from the current hour on
fn upcoming_hours(snapshot: &WeatherSnapshot) -> Vec<&HourlyPoint> {
    let observed = snapshot.current.observed_at;
    snapshot
        .hourly
        .iter()
        .filter(|point| point.time + chrono::Duration::hours(1) > observed)
        .take(DETAIL_HOURS)
        .collect()
}

fn percent(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.0}%", v))
        .unwrap_or_else(|| "–".to_string())
}

fn degrees(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.0}°", v))
        .unwrap_or_else(|| "–".to_string())
}

fn weather_lines<'a>(
    theme: &Theme,
    snapshot: &'a WeatherSnapshot,
    detailed: bool,
) -> Vec<Line<'a>> {
    let condition = snapshot.current.condition();
    let mut lines = vec![
        Line::from(vec![
            Span::raw(format!("{} ", condition.icon)),
            Span::styled(
                format!("{:.1}°C", snapshot.current.temperature),
                theme.text().add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  {}", condition.description), theme.text_secondary()),
        ]),
        Line::from(Span::styled(
            format!("Feels like {}", degrees(snapshot.current.feels_like)),
            theme.muted(),
        )),
        Line::from(Span::styled(snapshot.next_rain.label(), theme.text())),
    ];

    if detailed {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Next hours", theme.panel_title())));
        for point in upcoming_hours(snapshot) {
            lines.push(Line::from(vec![
                Span::styled(point.time.format("%H:%M  ").to_string(), theme.text_secondary()),
                Span::styled(format!("{:>4}", percent(point.probability)), theme.text()),
                Span::styled(
                    point
                        .amount
                        .map(|mm| format!("  {:.1} mm", mm))
                        .unwrap_or_default(),
                    theme.muted(),
                ),
            ]));
        }

        lines.push(Line::from(Span::styled("Next days", theme.panel_title())));
        for day in &snapshot.daily {
            let condition = day
                .code
                .map(|code| crate::domain_models::weather::describe(code, true).icon)
                .unwrap_or(" ");
            lines.push(Line::from(vec![
                Span::styled(day.date.format("%a  ").to_string(), theme.text_secondary()),
                Span::raw(format!("{} ", condition)),
                Span::styled(
                    format!("{} / {}", degrees(day.min), degrees(day.max)),
                    theme.text(),
                ),
                Span::styled(
                    format!("  rain {}", percent(day.precipitation_chance)),
                    theme.muted(),
                ),
            ]));
        }
    }

    lines
}

fn stale_note(zone: &Zone, snapshot: &WeatherSnapshot) -> String {
    format!("Showing data from {}", zone.format(snapshot.fetched_at, "%H:%M"))
}

fn render_weather(state: &AppState, area: Rect, f: &mut Frame) {
    let theme = &state.theme;
    let weather = &state.weather;

    let title = match &weather.data {
        Some(snapshot) => feed_title(&snapshot.location, weather),
        None => feed_title("Weather", weather),
    };
    let block = panel(theme, title);

    let mut lines = Vec::new();
    if let Some(error) = &weather.error {
        lines.push(Line::from(Span::styled(error.clone(), theme.error())));
    }

    match &weather.data {
        Some(snapshot) => {
            let body = weather_lines(theme, snapshot, state.preferences.weather_detail);
            if weather.error.is_some() {
                // Last good snapshot, shown dimmed next to the error
                lines.push(Line::from(Span::styled(
                    stale_note(&state.preferences.timezone.zone, snapshot),
                    theme.muted(),
                )));
                lines.extend(body.into_iter().map(|line| {
                    line.patch_style(Style::default().add_modifier(Modifier::DIM))
                }));
            } else {
                lines.extend(body);
            }
        }
        None if weather.loading => {
            lines.push(Line::from(Span::styled("Loading weather…", theme.muted())));
        }
        None => {}
    }

    f.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(block),
        area,
    );
}

fn render_bookmarks(state: &AppState, area: Rect, f: &mut Frame) {
    let theme = &state.theme;
    let block = panel(theme, " Bookmarks ");
    let bookmarks = &state.config.bookmarks;

    if bookmarks.is_empty() {
        f.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("Add [[bookmarks]] to .homedash.toml, open with ", theme.muted()),
                Span::styled("/", theme.key_hint()),
            ]))
            .wrap(Wrap { trim: true })
            .block(block),
            area,
        );
        return;
    }

    let items: Vec<ListItem> = bookmarks
        .iter()
        .map(|bookmark| {
            ListItem::new(Line::from(vec![
                Span::styled(bookmark.label.as_str(), theme.text()),
                Span::styled(format!("  {}", bookmark.url), theme.muted().italic()),
            ]))
        })
        .collect();
    f.render_widget(List::new(items).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting() {
        assert_eq!(greeting(8, "Ada"), "Good morning, Ada");
        assert_eq!(greeting(13, "  "), "Good afternoon");
        assert_eq!(greeting(20, ""), "Good evening");
        assert_eq!(greeting(2, "Ada"), "Good night, Ada");
    }

    #[test]
    fn test_feed_title() {
        let mut feed: FeedState<()> = FeedState::default();
        assert_eq!(feed_title("Assigned", &feed), " Assigned ");
        feed.start(1);
        assert_eq!(feed_title("Assigned", &feed), " Assigned (loading…) ");
        feed.fail(1, "boom".to_string());
        assert_eq!(feed_title("Assigned", &feed), " Assigned (failed) ");
    }

    #[test]
    fn test_reviewed_marker_needs_known_engagement() {
        use crate::domain_models::insights::highlight_for;
        use crate::domain_models::review::ReviewState;
        use chrono::Utc;
        use dash_client::MergeRequest;

        let now = Utc::now();
        let mut highlight = highlight_for(&MergeRequest::new(1, "x", now), now);
        assert!(!reviewed_by_user(&highlight));

        highlight.review = Some(ReviewState::new(None, Some(false), None));
        assert!(!reviewed_by_user(&highlight));

        highlight.review = Some(ReviewState::new(Some(false), Some(true), None));
        assert!(reviewed_by_user(&highlight));
    }

    #[test]
    fn test_stale_note_uses_fetch_time() {
        use crate::domain_models::weather::{CurrentConditions, NextRain};
        use chrono::{NaiveDate, TimeZone, Utc};

        let fetched_at = Utc.with_ymd_and_hms(2024, 5, 10, 7, 5, 0).unwrap();
        let snapshot = WeatherSnapshot {
            location: "Berlin".to_string(),
            current: CurrentConditions {
                temperature: 12.0,
                feels_like: None,
                code: 0,
                is_day: true,
                observed_at: NaiveDate::from_ymd_opt(2024, 5, 10)
                    .unwrap()
                    .and_hms_opt(9, 0, 0)
                    .unwrap(),
            },
            next_rain: NextRain::NoneExpected,
            hourly: Vec::new(),
            daily: Vec::new(),
            fetched_at,
        };
        let zone = dash_config::resolve_timezone("Europe/Berlin").zone;
        assert_eq!(stale_note(&zone, &snapshot), "Showing data from 09:05");
    }
}
