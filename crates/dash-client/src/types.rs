//! GitLab data transfer objects
//!
//! The raw `Gitlab*` structs mirror the REST payloads with every field
//! optional. [`MergeRequest`] is the validated record the rest of the
//! application works with.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Pipeline state of the merge request's head pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineStatus {
    Pending,
    Running,
    Success,
    Failed,
    /// A pipeline exists but did not run to a verdict (canceled, skipped, manual)
    None,
    /// The payload carried no pipeline at all
    Unknown,
}

impl PipelineStatus {
    fn from_api(status: Option<&str>) -> Self {
        match status {
            Some("failed") => Self::Failed,
            Some("success") => Self::Success,
            Some("running") => Self::Running,
            Some(
                "pending" | "created" | "preparing" | "scheduled" | "waiting_for_resource"
                | "waiting_for_callback",
            ) => Self::Pending,
            Some(_) => Self::None,
            Option::None => Self::Unknown,
        }
    }

    pub fn is_failed(self) -> bool {
        self == Self::Failed
    }
}

/// Mergeability as reported by GitLab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MergeStatus {
    Mergeable,
    Conflict,
    /// Not computed yet, or not reported
    Unknown,
}

impl MergeStatus {
    fn from_api(raw: &GitlabMergeRequest) -> Self {
        if raw.has_conflicts == Some(true) {
            return Self::Conflict;
        }
        let detailed = raw.detailed_merge_status.as_deref();
        let legacy = raw.merge_status.as_deref();
        match (detailed, legacy) {
            (Some("conflict"), _) | (_, Some("cannot_be_merged")) => Self::Conflict,
            (Some("mergeable"), _) | (_, Some("can_be_merged")) => Self::Mergeable,
            _ => Self::Unknown,
        }
    }

    pub fn is_conflict(self) -> bool {
        self == Self::Conflict
    }
}

/// A merge request as consumed by the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeRequest {
    pub id: u64,
    pub iid: u64,
    pub project_id: u64,
    pub title: String,
    pub web_url: String,
    pub source_branch: String,
    pub target_branch: String,
    pub updated_at: DateTime<Utc>,
    pub merged_at: Option<DateTime<Utc>>,
    pub merge_status: MergeStatus,
    pub draft: bool,
    pub pipeline: PipelineStatus,
    pub reviewers: Vec<String>,
    pub assignees: Vec<String>,
    pub labels: Vec<String>,
    /// Usernames that approved; `None` when the payload did not say
    pub approvals: Option<Vec<String>>,
    pub user_notes_count: u32,
    /// `None` when GitLab did not report discussion resolution
    pub discussions_resolved: Option<bool>,
    /// Free-form single badge some instances attach to the payload
    pub badge: Option<String>,
}

impl MergeRequest {
    /// Minimal record for tests and fixtures
    pub fn new(id: u64, title: impl Into<String>, updated_at: DateTime<Utc>) -> Self {
        Self {
            id,
            iid: id,
            project_id: 1,
            title: title.into(),
            web_url: String::new(),
            source_branch: String::new(),
            target_branch: String::new(),
            updated_at,
            merged_at: None,
            merge_status: MergeStatus::Unknown,
            draft: false,
            pipeline: PipelineStatus::Unknown,
            reviewers: Vec::new(),
            assignees: Vec::new(),
            labels: Vec::new(),
            approvals: None,
            user_notes_count: 0,
            discussions_resolved: None,
            badge: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct GitlabUser {
    username: String,
}

#[derive(Debug, Clone, Deserialize)]
struct GitlabPipeline {
    status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct GitlabApproval {
    user: GitlabUser,
}

#[derive(Debug, Clone, Deserialize)]
struct GitlabMergeRequest {
    id: u64,
    #[serde(default)]
    iid: Option<u64>,
    #[serde(default)]
    project_id: Option<u64>,
    title: String,
    #[serde(default)]
    web_url: Option<String>,
    #[serde(default)]
    source_branch: Option<String>,
    #[serde(default)]
    target_branch: Option<String>,
    updated_at: DateTime<Utc>,
    #[serde(default)]
    merged_at: Option<DateTime<Utc>>,
    #[serde(default)]
    merge_status: Option<String>,
    #[serde(default)]
    detailed_merge_status: Option<String>,
    #[serde(default)]
    has_conflicts: Option<bool>,
    #[serde(default)]
    draft: Option<bool>,
    #[serde(default)]
    work_in_progress: Option<bool>,
    #[serde(default)]
    head_pipeline: Option<GitlabPipeline>,
    #[serde(default)]
    pipeline: Option<GitlabPipeline>,
    #[serde(default)]
    reviewers: Option<Vec<GitlabUser>>,
    #[serde(default)]
    assignees: Option<Vec<GitlabUser>>,
    #[serde(default)]
    labels: Option<Vec<String>>,
    #[serde(default)]
    approved_by: Option<Vec<GitlabApproval>>,
    #[serde(default)]
    user_notes_count: Option<u32>,
    #[serde(default)]
    blocking_discussions_resolved: Option<bool>,
    #[serde(default)]
    badge: Option<String>,
}

fn title_marks_draft(title: &str) -> bool {
    let lower = title.trim_start().to_lowercase();
    ["draft:", "[draft]", "(draft)", "wip:", "[wip]"]
        .iter()
        .any(|prefix| lower.starts_with(prefix))
}

impl From<GitlabMergeRequest> for MergeRequest {
    fn from(raw: GitlabMergeRequest) -> Self {
        let merge_status = MergeStatus::from_api(&raw);
        let pipeline = PipelineStatus::from_api(
            raw.head_pipeline
                .as_ref()
                .or(raw.pipeline.as_ref())
                .map(|p| p.status.as_deref().unwrap_or("")),
        );
        let draft =
            raw.draft.or(raw.work_in_progress).unwrap_or(false) || title_marks_draft(&raw.title);

        Self {
            id: raw.id,
            iid: raw.iid.unwrap_or(raw.id),
            project_id: raw.project_id.unwrap_or_default(),
            web_url: raw.web_url.unwrap_or_default(),
            source_branch: raw.source_branch.unwrap_or_default(),
            target_branch: raw.target_branch.unwrap_or_default(),
            updated_at: raw.updated_at,
            merged_at: raw.merged_at,
            merge_status,
            draft,
            pipeline,
            reviewers: raw
                .reviewers
                .unwrap_or_default()
                .into_iter()
                .map(|u| u.username)
                .collect(),
            assignees: raw
                .assignees
                .unwrap_or_default()
                .into_iter()
                .map(|u| u.username)
                .collect(),
            labels: raw.labels.unwrap_or_default(),
            approvals: raw
                .approved_by
                .map(|list| list.into_iter().map(|a| a.user.username).collect()),
            user_notes_count: raw.user_notes_count.unwrap_or_default(),
            discussions_resolved: raw.blocking_discussions_resolved,
            badge: raw.badge.filter(|b| !b.trim().is_empty()),
            title: raw.title,
        }
    }
}

/// Parse a merge-request list payload.
///
/// A payload that is not an array yields an empty list; individual entries
/// that do not parse are skipped.
pub fn parse_merge_requests(payload: Value) -> Vec<MergeRequest> {
    let Value::Array(items) = payload else {
        log::warn!("Merge request payload is not an array, treating as empty");
        return Vec::new();
    };

    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<GitlabMergeRequest>(item) {
            Ok(raw) => Some(MergeRequest::from(raw)),
            Err(e) => {
                log::warn!("Skipping malformed merge request: {}", e);
                None
            }
        })
        .collect()
}

/// A note (comment) on a merge request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub author: String,
    /// Generated by GitLab itself (label changes, pushes, ...)
    pub system: bool,
}

#[derive(Debug, Deserialize)]
struct GitlabNote {
    author: GitlabUser,
    #[serde(default)]
    system: bool,
}

/// A discussion thread on a merge request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discussion {
    pub notes: Vec<DiscussionNote>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DiscussionNote {
    #[serde(default)]
    pub resolvable: bool,
    #[serde(default)]
    pub resolved: Option<bool>,
}

impl Discussion {
    /// A thread is open while any resolvable note in it is unresolved
    pub fn is_unresolved(&self) -> bool {
        self.notes
            .iter()
            .any(|n| n.resolvable && n.resolved != Some(true))
    }
}

#[derive(Debug, Deserialize)]
struct GitlabDiscussion {
    #[serde(default)]
    notes: Vec<DiscussionNote>,
}

pub(crate) fn parse_notes(payload: Value) -> crate::Result<Vec<Note>> {
    let raw: Vec<GitlabNote> = serde_json::from_value(payload)
        .map_err(|e| crate::ClientError::Decode(format!("notes: {}", e)))?;
    Ok(raw
        .into_iter()
        .map(|n| Note {
            author: n.author.username,
            system: n.system,
        })
        .collect())
}

pub(crate) fn parse_discussions(payload: Value) -> crate::Result<Vec<Discussion>> {
    let raw: Vec<GitlabDiscussion> = serde_json::from_value(payload)
        .map_err(|e| crate::ClientError::Decode(format!("discussions: {}", e)))?;
    Ok(raw
        .into_iter()
        .map(|d| Discussion { notes: d.notes })
        .collect())
}
