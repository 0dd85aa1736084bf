//! Deep links into GitLab's merge-request dashboard
//!
//! Every metric and shortcut links to the equivalent filtered list in
//! GitLab itself, using the dashboard's own query-string grammar.

use dash_config::GitLabSettings;

/// URL builder bound to one instance and user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardLinks {
    base: String,
    username: Option<String>,
}

impl DashboardLinks {
    pub fn new(base_url: &str, username: Option<&str>) -> Self {
        Self {
            base: base_url.trim_end_matches('/').to_string(),
            username: username
                .map(str::trim)
                .filter(|u| !u.is_empty())
                .map(str::to_string),
        }
    }

    pub fn from_settings(settings: &GitLabSettings) -> Self {
        Self::new(settings.base(), settings.username.as_deref())
    }

    fn dashboard(&self, state: &str, user_param: &str, extra: &[(&str, &str)]) -> String {
        let mut url = format!(
            "{}/dashboard/merge_requests?scope=all&state={}",
            self.base, state
        );
        if let Some(username) = &self.username {
            url.push_str(&format!("&{}={}", user_param, urlencoding::encode(username)));
        }
        for (key, value) in extra {
            url.push_str(&format!("&{}={}", key, urlencoding::encode(value)));
        }
        url
    }

    /// Open merge requests assigned to the user
    pub fn assigned(&self) -> String {
        self.dashboard("opened", "assignee_username", &[])
    }

    /// Open merge requests awaiting the user's review
    pub fn reviewing(&self) -> String {
        self.dashboard("opened", "reviewer_username", &[])
    }

    /// Merge requests the user authored that were merged
    pub fn merged(&self) -> String {
        self.dashboard("merged", "author_username", &[])
    }

    /// Assigned list, least recently updated first
    pub fn stale(&self) -> String {
        self.dashboard("opened", "assignee_username", &[("sort", "updated_asc")])
    }

    /// The dashboard cannot filter by pipeline status; lands on the assigned list.
    pub fn failing_pipelines(&self) -> String {
        self.assigned()
    }

    /// The dashboard cannot filter by conflicts; lands on the assigned list.
    pub fn conflicts(&self) -> String {
        self.assigned()
    }
}
