//! Merge-request insights
//!
//! Turns one batch of merge requests into counts with deep links and a short
//! ranked list of the ones that need attention. Everything here is a pure
//! function of the batch and the injected `now`.

use chrono::{DateTime, Duration, Utc};
use dash_client::MergeRequest;

use super::links::DashboardLinks;
use super::review::{ReviewCategory, ReviewState};

/// Merge requests not updated for this long are stale
pub const STALE_AFTER_HOURS: i64 = 48;
/// Length of every ranked list
pub const MAX_HIGHLIGHTS: usize = 10;
/// Window for the recently merged list
pub const MERGED_WINDOW_DAYS: i64 = 7;

/// Attention markers, declared in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tag {
    Pipeline,
    Conflicts,
    Draft,
    Stale,
}

impl Tag {
    pub fn label(self) -> &'static str {
        match self {
            Self::Pipeline => "Pipeline",
            Self::Conflicts => "Conflicts",
            Self::Draft => "Draft",
            Self::Stale => "Stale",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKey {
    Open,
    Stale,
    Pipeline,
    Conflicts,
}

/// One counter in the metrics row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusItem {
    pub key: MetricKey,
    pub label: &'static str,
    pub value: usize,
    /// Equivalent filtered view in GitLab
    pub url: String,
}

/// Display-ready summary of one merge request
#[derive(Debug, Clone, PartialEq)]
pub struct Highlight {
    pub id: u64,
    pub project_id: u64,
    pub iid: u64,
    pub title: String,
    pub url: String,
    pub meta: String,
    /// Legacy badge, only when no tag applies
    pub badge: Option<String>,
    pub tags: Vec<Tag>,
    pub stale: bool,
    pub conflict: bool,
    pub score: i32,
    pub updated_at: DateTime<Utc>,
    /// Only set for the reviewer queue
    pub review: Option<ReviewState>,
    pub category: ReviewCategory,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Insights {
    pub metrics: Vec<StatusItem>,
    pub highlights: Vec<Highlight>,
}

/// Entry of the recently merged list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedHighlight {
    pub id: u64,
    pub title: String,
    pub url: String,
    pub meta: String,
    pub merged_at: DateTime<Utc>,
}

pub fn is_stale(mr: &MergeRequest, now: DateTime<Utc>) -> bool {
    mr.updated_at < now - Duration::hours(STALE_AFTER_HOURS)
}

/// +3 failed pipeline, +3 conflict, +2 stale, -1 draft
pub fn priority_score(mr: &MergeRequest, now: DateTime<Utc>) -> i32 {
    let mut score = 0;
    if mr.pipeline.is_failed() {
        score += 3;
    }
    if mr.merge_status.is_conflict() {
        score += 3;
    }
    if is_stale(mr, now) {
        score += 2;
    }
    if mr.draft {
        score -= 1;
    }
    score
}

pub fn derive_tags(mr: &MergeRequest, now: DateTime<Utc>) -> Vec<Tag> {
    let mut tags = Vec::new();
    if mr.pipeline.is_failed() {
        tags.push(Tag::Pipeline);
    }
    if mr.merge_status.is_conflict() {
        tags.push(Tag::Conflicts);
    }
    if mr.draft {
        tags.push(Tag::Draft);
    }
    if is_stale(mr, now) {
        tags.push(Tag::Stale);
    }
    tags
}

/// Human age such as `5m`, `3h` or `2d`
pub fn format_age(age: Duration) -> String {
    let minutes = age.num_minutes().max(0);
    match minutes {
        0 => "just now".to_string(),
        1..=59 => format!("{}m", minutes),
        60..=2879 => format!("{}h", minutes / 60),
        _ => format!("{}d", minutes / (60 * 24)),
    }
}

fn ago(age: Duration) -> String {
    match format_age(age).as_str() {
        "just now" => "just now".to_string(),
        short => format!("{} ago", short),
    }
}

fn meta_line(mr: &MergeRequest, now: DateTime<Utc>) -> String {
    let mut parts = Vec::new();
    if !mr.source_branch.is_empty() && !mr.target_branch.is_empty() {
        parts.push(format!("{} → {}", mr.source_branch, mr.target_branch));
    }
    parts.push(format!("updated {}", ago(now - mr.updated_at)));
    parts.push(match mr.user_notes_count {
        1 => "1 note".to_string(),
        n => format!("{} notes", n),
    });
    parts.join(" · ")
}

/// Project one merge request into a highlight (no review state yet)
pub fn highlight_for(mr: &MergeRequest, now: DateTime<Utc>) -> Highlight {
    let tags = derive_tags(mr, now);
    let badge = if tags.is_empty() {
        mr.badge.clone()
    } else {
        None
    };

    Highlight {
        id: mr.id,
        project_id: mr.project_id,
        iid: mr.iid,
        title: mr.title.clone(),
        url: mr.web_url.clone(),
        meta: meta_line(mr, now),
        badge,
        stale: tags.contains(&Tag::Stale),
        conflict: tags.contains(&Tag::Conflicts),
        tags,
        score: priority_score(mr, now),
        updated_at: mr.updated_at,
        review: None,
        category: ReviewCategory::default(),
    }
}

/// Score descending, most recently updated first on ties
pub fn rank(highlights: &mut [Highlight]) {
    highlights.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| b.updated_at.cmp(&a.updated_at))
    });
}

/// Metrics and the top highlights for one batch
pub fn build_insights(
    mrs: &[MergeRequest],
    now: DateTime<Utc>,
    links: &DashboardLinks,
) -> Insights {
    let stale = mrs.iter().filter(|mr| is_stale(mr, now)).count();
    let failing = mrs.iter().filter(|mr| mr.pipeline.is_failed()).count();
    let conflicts = mrs.iter().filter(|mr| mr.merge_status.is_conflict()).count();

    let metrics = vec![
        StatusItem {
            key: MetricKey::Open,
            label: "Open",
            value: mrs.len(),
            url: links.assigned(),
        },
        StatusItem {
            key: MetricKey::Stale,
            label: "Stale",
            value: stale,
            url: links.stale(),
        },
        StatusItem {
            key: MetricKey::Pipeline,
            label: "Pipeline failing",
            value: failing,
            url: links.failing_pipelines(),
        },
        StatusItem {
            key: MetricKey::Conflicts,
            label: "Conflicts",
            value: conflicts,
            url: links.conflicts(),
        },
    ];

    let mut highlights: Vec<Highlight> = mrs.iter().map(|mr| highlight_for(mr, now)).collect();
    rank(&mut highlights);
    highlights.truncate(MAX_HIGHLIGHTS);

    Insights {
        metrics,
        highlights,
    }
}

/// Merge requests merged within the last week, newest first
pub fn build_merged(mrs: &[MergeRequest], now: DateTime<Utc>) -> Vec<MergedHighlight> {
    let cutoff = now - Duration::days(MERGED_WINDOW_DAYS);
    let mut merged: Vec<MergedHighlight> = mrs
        .iter()
        .filter_map(|mr| {
            let merged_at = mr.merged_at.filter(|at| *at >= cutoff)?;
            Some(MergedHighlight {
                id: mr.id,
                title: mr.title.clone(),
                url: mr.web_url.clone(),
                meta: format!("merged {}", ago(now - merged_at)),
                merged_at,
            })
        })
        .collect();
    merged.sort_by(|a, b| b.merged_at.cmp(&a.merged_at));
    merged.truncate(MAX_HIGHLIGHTS);
    merged
}
