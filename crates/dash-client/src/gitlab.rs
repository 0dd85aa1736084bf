//! GitLab REST client
//!
//! Read-only access to the three endpoints the dashboard needs: the global
//! merge-request list and, per merge request, its notes and discussions.

use crate::error::{ClientError, Result};
use crate::fetch::HttpFetcher;
use crate::types::{
    parse_discussions, parse_merge_requests, parse_notes, Discussion, MergeRequest, Note,
};
use async_trait::async_trait;
use serde_json::Value;

/// `per_page` for notes and discussions; GitLab's maximum
const PAGE_SIZE: u32 = 100;
/// Upper bound on pages followed for one merge request
const MAX_PAGES: u32 = 50;

/// Which relation the user has to the merge requests being listed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeRequestRole {
    Assignee,
    Reviewer,
    Author,
}

impl MergeRequestRole {
    /// Query parameter GitLab uses to filter by this role
    pub fn username_param(self) -> &'static str {
        match self {
            Self::Assignee => "assignee_username",
            Self::Reviewer => "reviewer_username",
            Self::Author => "author_username",
        }
    }
}

/// Parameters for the merge-request list endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeRequestQuery {
    pub role: MergeRequestRole,
    pub username: String,
    /// `opened`, `merged`, `closed` or `all`
    pub state: &'static str,
    pub per_page: u32,
}

impl MergeRequestQuery {
    /// Open merge requests assigned to `username`
    pub fn assigned(username: impl Into<String>, per_page: u32) -> Self {
        Self {
            role: MergeRequestRole::Assignee,
            username: username.into(),
            state: "opened",
            per_page,
        }
    }

    /// Open merge requests where `username` is a reviewer
    pub fn reviewing(username: impl Into<String>, per_page: u32) -> Self {
        Self {
            role: MergeRequestRole::Reviewer,
            username: username.into(),
            state: "opened",
            per_page,
        }
    }

    /// Merge requests authored by `username` that were merged
    pub fn merged(username: impl Into<String>, per_page: u32) -> Self {
        Self {
            role: MergeRequestRole::Author,
            username: username.into(),
            state: "merged",
            per_page,
        }
    }

    /// Query string pairs in the order GitLab documents them
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("scope", "all".to_string()),
            ("state", self.state.to_string()),
            ("order_by", "updated_at".to_string()),
            ("sort", "desc".to_string()),
            ("per_page", self.per_page.to_string()),
            (self.role.username_param(), self.username.clone()),
        ]
    }
}

/// GitLab API client trait
///
/// Implementations must be `Send + Sync` so a single client can be shared by
/// every polling task.
#[async_trait]
pub trait GitLabClient: Send + Sync {
    /// List merge requests matching `query`.
    ///
    /// A payload that is not a list yields an empty vector rather than an error.
    async fn merge_requests(&self, query: &MergeRequestQuery) -> Result<Vec<MergeRequest>>;

    /// All notes on one merge request
    async fn notes(&self, project_id: u64, iid: u64) -> Result<Vec<Note>>;

    /// All discussion threads on one merge request
    async fn discussions(&self, project_id: u64, iid: u64) -> Result<Vec<Discussion>>;
}

/// [`GitLabClient`] backed by the REST API v4
#[derive(Debug, Clone)]
pub struct RestGitLabClient {
    fetcher: HttpFetcher,
    base_url: String,
    token: String,
}

impl RestGitLabClient {
    /// Create a client for `base_url` (e.g. `https://gitlab.com`).
    ///
    /// Fails with [`ClientError::MissingConfig`] before any request is made
    /// when the token is empty.
    pub fn new(fetcher: HttpFetcher, base_url: &str, token: &str) -> Result<Self> {
        if token.trim().is_empty() {
            return Err(ClientError::MissingConfig("GitLab token"));
        }
        Ok(Self {
            fetcher,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api/v4{}", self.base_url, path)
    }

    /// Every item of a paginated list endpoint, following `x-next-page`.
    ///
    /// Stops after [`MAX_PAGES`] pages with a warning. A page that is not a
    /// list is a decode error.
    async fn get_all_pages(&self, url: &str) -> Result<Value> {
        let mut items = Vec::new();
        let mut page = 1;
        for _ in 0..MAX_PAGES {
            let params = [
                ("per_page", PAGE_SIZE.to_string()),
                ("page", page.to_string()),
            ];
            let response = self
                .fetcher
                .get_page(url, &params, Some(&self.token))
                .await?;
            match response.body {
                Value::Array(batch) => items.extend(batch),
                _ => return Err(ClientError::Decode(format!("{}: expected a list", url))),
            }
            match response.next_page {
                Some(next) if next > page => page = next,
                _ => return Ok(Value::Array(items)),
            }
        }
        log::warn!("Stopped after {} pages of {}", MAX_PAGES, url);
        Ok(Value::Array(items))
    }
}

#[async_trait]
impl GitLabClient for RestGitLabClient {
    async fn merge_requests(&self, query: &MergeRequestQuery) -> Result<Vec<MergeRequest>> {
        let url = self.api_url("/merge_requests");
        let payload = self
            .fetcher
            .get_json(&url, &query.to_params(), Some(&self.token))
            .await?;
        let mrs = parse_merge_requests(payload);
        log::debug!(
            "Fetched {} merge requests ({:?}, state={})",
            mrs.len(),
            query.role,
            query.state
        );
        Ok(mrs)
    }

    async fn notes(&self, project_id: u64, iid: u64) -> Result<Vec<Note>> {
        let url = self.api_url(&format!(
            "/projects/{}/merge_requests/{}/notes",
            project_id, iid
        ));
        parse_notes(self.get_all_pages(&url).await?)
    }

    async fn discussions(&self, project_id: u64, iid: u64) -> Result<Vec<Discussion>> {
        let url = self.api_url(&format!(
            "/projects/{}/merge_requests/{}/discussions",
            project_id, iid
        ));
        parse_discussions(self.get_all_pages(&url).await?)
    }
}
