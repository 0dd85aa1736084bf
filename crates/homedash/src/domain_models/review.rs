//! Reviewer queue annotation
//!
//! Merge requests awaiting the user's review are classified from three
//! tri-state facts: did the user approve, did the user comment, and are all
//! discussions resolved. The merge request itself carries the approval list
//! and a resolution flag; two follow-up requests per item refine the rest.

use chrono::{DateTime, Utc};
use dash_client::{GitLabClient, MergeRequest};
use futures::future::join_all;

use super::insights::{build_insights, derive_tags, Highlight};
use super::links::DashboardLinks;

/// Review facts; `None` means unknown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReviewState {
    pub approved: Option<bool>,
    pub commented: Option<bool>,
    pub comments_resolved: Option<bool>,
    /// `commented OR approved`; derived, never set directly
    pub reviewed: Option<bool>,
}

/// Three-valued OR: one known `true` decides, otherwise unknown wins over `false`
fn any_true(a: Option<bool>, b: Option<bool>) -> Option<bool> {
    match (a, b) {
        (Some(true), _) | (_, Some(true)) => Some(true),
        (Some(false), Some(false)) => Some(false),
        _ => None,
    }
}

impl ReviewState {
    pub fn new(
        approved: Option<bool>,
        commented: Option<bool>,
        comments_resolved: Option<bool>,
    ) -> Self {
        Self {
            approved,
            commented,
            comments_resolved,
            reviewed: any_true(commented, approved),
        }
    }

    /// Seed from the merge request's own fields
    pub fn from_merge_request(mr: &MergeRequest, username: &str) -> Self {
        let approved = mr
            .approvals
            .as_ref()
            .map(|users| users.iter().any(|u| u == username));
        Self::new(approved, None, mr.discussions_resolved)
    }
}

/// Where a merge request sits in the reviewer queue
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReviewCategory {
    #[default]
    NeedsReview,
    InReview,
    Reviewed,
}

impl ReviewCategory {
    /// Total over every combination of known and unknown facts
    pub fn classify(state: &ReviewState) -> Self {
        let approved = state.approved == Some(true);
        let commented = state.commented == Some(true);
        let unresolved = state.comments_resolved == Some(false);

        if approved && !unresolved {
            Self::Reviewed
        } else if (commented && !approved) || (approved && unresolved) {
            Self::InReview
        } else {
            Self::NeedsReview
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::NeedsReview => "Needs review",
            Self::InReview => "In review",
            Self::Reviewed => "Reviewed",
        }
    }

    fn rank(self) -> u8 {
        match self {
            Self::NeedsReview => 0,
            Self::InReview => 1,
            Self::Reviewed => 2,
        }
    }
}

/// Refine one highlight's state with its notes and discussions.
///
/// Both requests run concurrently; a failed request leaves the
/// corresponding fact as it was.
async fn annotate(
    client: &dyn GitLabClient,
    highlight: &Highlight,
    base: ReviewState,
    username: &str,
) -> ReviewState {
    let (notes, discussions) = tokio::join!(
        client.notes(highlight.project_id, highlight.iid),
        client.discussions(highlight.project_id, highlight.iid),
    );

    let commented = match notes {
        Ok(notes) => Some(notes.iter().any(|n| !n.system && n.author == username)),
        Err(e) => {
            log::warn!("Notes for !{} unavailable: {}", highlight.iid, e);
            base.commented
        }
    };
    let comments_resolved = match discussions {
        Ok(discussions) => Some(!discussions.iter().any(|d| d.is_unresolved())),
        Err(e) => {
            log::warn!("Discussions for !{} unavailable: {}", highlight.iid, e);
            base.comments_resolved
        }
    };
    ReviewState::new(base.approved, commented, comments_resolved)
}

/// Needs-review first, then in-review, then reviewed; score and recency within
pub fn sort_queue(highlights: &mut [Highlight]) {
    highlights.sort_by(|a, b| {
        a.category
            .rank()
            .cmp(&b.category.rank())
            .then_with(|| b.score.cmp(&a.score))
            .then_with(|| b.updated_at.cmp(&a.updated_at))
    });
}

/// Build the reviewer queue for `mrs`.
///
/// Merge requests the user is also assigned to are left to the assigned
/// queue. Every remaining highlight is annotated concurrently and the batch
/// always completes, whatever individual requests do.
pub async fn build_review_queue(
    client: &dyn GitLabClient,
    mrs: &[MergeRequest],
    username: &str,
    now: DateTime<Utc>,
    links: &DashboardLinks,
) -> Vec<Highlight> {
    let reviewing: Vec<MergeRequest> = mrs
        .iter()
        .filter(|mr| !mr.assignees.iter().any(|a| a == username))
        .cloned()
        .collect();
    let highlights = build_insights(&reviewing, now, links).highlights;

    let annotations = highlights.iter().map(|highlight| {
        let base = reviewing
            .iter()
            .find(|mr| mr.id == highlight.id)
            .map(|mr| ReviewState::from_merge_request(mr, username))
            .unwrap_or_default();
        annotate(client, highlight, base, username)
    });
    let states = join_all(annotations).await;

    let mut queue: Vec<Highlight> = highlights
        .into_iter()
        .zip(states)
        .map(|(mut highlight, state)| {
            if let Some(mr) = reviewing.iter().find(|mr| mr.id == highlight.id) {
                highlight.tags = derive_tags(mr, now);
            }
            highlight.category = ReviewCategory::classify(&state);
            highlight.review = Some(state);
            highlight
        })
        .collect();

    sort_queue(&mut queue);
    queue
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone};
    use dash_client::{ClientError, Discussion, MergeRequestQuery, Note};
    use dash_client::types::DiscussionNote;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn state(
        approved: Option<bool>,
        commented: Option<bool>,
        comments_resolved: Option<bool>,
    ) -> ReviewState {
        ReviewState::new(approved, commented, comments_resolved)
    }

    #[test]
    fn test_classification_is_total() {
        use ReviewCategory::*;
        let t = Some(true);
        let f = Some(false);
        let u = None;

        let cases = [
            (state(t, t, t), Reviewed),
            (state(t, t, f), InReview),
            (state(t, t, u), Reviewed),
            (state(t, f, t), Reviewed),
            (state(t, f, f), InReview),
            (state(t, f, u), Reviewed),
            (state(f, t, t), InReview),
            (state(f, t, f), InReview),
            (state(f, t, u), InReview),
            (state(f, f, t), NeedsReview),
            (state(f, f, f), NeedsReview),
            (state(f, f, u), NeedsReview),
            (state(u, t, u), InReview),
            (state(u, u, f), NeedsReview),
            (ReviewState::default(), NeedsReview),
        ];

        for (input, expected) in cases {
            assert_eq!(ReviewCategory::classify(&input), expected, "{:?}", input);
        }
    }

    #[test]
    fn test_base_state_from_merge_request() {
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();
        let mut mr = MergeRequest::new(1, "x", now);
        assert_eq!(
            ReviewState::from_merge_request(&mr, "alice"),
            ReviewState::default()
        );

        mr.approvals = Some(vec!["bob".to_string()]);
        mr.discussions_resolved = Some(false);
        assert_eq!(
            ReviewState::from_merge_request(&mr, "alice"),
            state(Some(false), None, Some(false))
        );
    }

    /// In-memory client; a missing entry answers with HTTP 500
    #[derive(Default)]
    struct FakeGitLab {
        notes: HashMap<u64, Vec<Note>>,
        discussions: HashMap<u64, Vec<Discussion>>,
    }

    fn server_error() -> ClientError {
        ClientError::Http {
            status: 500,
            url: "fake".to_string(),
        }
    }

    #[async_trait]
    impl GitLabClient for FakeGitLab {
        async fn merge_requests(
            &self,
            _query: &MergeRequestQuery,
        ) -> dash_client::Result<Vec<MergeRequest>> {
            Ok(Vec::new())
        }

        async fn notes(&self, _project_id: u64, iid: u64) -> dash_client::Result<Vec<Note>> {
            self.notes.get(&iid).cloned().ok_or_else(server_error)
        }

        async fn discussions(
            &self,
            _project_id: u64,
            iid: u64,
        ) -> dash_client::Result<Vec<Discussion>> {
            self.discussions.get(&iid).cloned().ok_or_else(server_error)
        }
    }

    fn note(author: &str, system: bool) -> Note {
        Note {
            author: author.to_string(),
            system,
        }
    }

    fn open_thread() -> Discussion {
        Discussion {
            notes: vec![DiscussionNote {
                resolvable: true,
                resolved: Some(false),
            }],
        }
    }

    #[tokio::test]
    async fn test_review_queue_annotation_and_order() {
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();
        let links = DashboardLinks::new("https://gitlab.example", Some("alice"));

        // 1: approved, all resolved -> reviewed
        let mut approved = MergeRequest::new(1, "approved", now - Duration::hours(1));
        approved.approvals = Some(vec!["alice".to_string()]);
        // 2: commented by alice, open thread -> in review
        let commented = MergeRequest::new(2, "commented", now - Duration::hours(2));
        // 3: untouched -> needs review
        let untouched = MergeRequest::new(3, "untouched", now - Duration::hours(3));
        // 4: both lookups fail, base state unknown -> needs review
        let failing = MergeRequest::new(4, "failing", now - Duration::hours(4));
        // 5: alice is also the assignee -> not in the queue
        let mut assigned = MergeRequest::new(5, "assigned", now);
        assigned.assignees = vec!["alice".to_string()];

        let mut client = FakeGitLab::default();
        client.notes.insert(1, vec![]);
        client.discussions.insert(1, vec![]);
        client
            .notes
            .insert(2, vec![note("alice", false), note("alice", true)]);
        client.discussions.insert(2, vec![open_thread()]);
        client.notes.insert(3, vec![note("alice", true), note("bob", false)]);
        client.discussions.insert(3, vec![]);

        let queue = build_review_queue(
            &client,
            &[approved, commented, untouched, failing, assigned],
            "alice",
            now,
            &links,
        )
        .await;

        let order: Vec<(u64, ReviewCategory)> =
            queue.iter().map(|h| (h.id, h.category)).collect();
        assert_eq!(
            order,
            vec![
                (3, ReviewCategory::NeedsReview),
                (4, ReviewCategory::NeedsReview),
                (2, ReviewCategory::InReview),
                (1, ReviewCategory::Reviewed),
            ]
        );

        let failing = queue.iter().find(|h| h.id == 4).unwrap();
        assert_eq!(failing.review, Some(ReviewState::default()));

        let reviewed = queue.iter().find(|h| h.id == 1).unwrap();
        assert_eq!(
            reviewed.review,
            Some(state(Some(true), Some(false), Some(true)))
        );
    }

    #[tokio::test]
    async fn test_failed_lookup_keeps_base_state() {
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();
        let links = DashboardLinks::new("https://gitlab.example", Some("alice"));
        let mut mr = MergeRequest::new(7, "half known", now);
        mr.approvals = Some(vec!["alice".to_string()]);
        mr.discussions_resolved = Some(false);

        let mut client = FakeGitLab::default();
        client.notes.insert(7, vec![]);

        let queue = build_review_queue(&client, &[mr], "alice", now, &links).await;
        let review = queue[0].review.unwrap();
        assert_eq!(review.comments_resolved, Some(false));
        assert_eq!(queue[0].category, ReviewCategory::InReview);
    }

    #[tokio::test]
    async fn test_reviewed_follows_commented_or_approved() {
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();
        let links = DashboardLinks::new("https://gitlab.example", Some("alice"));

        // 10: approved, no notes of hers
        let mut approved = MergeRequest::new(10, "approved only", now);
        approved.approvals = Some(vec!["alice".to_string()]);
        // 11: commented, approvals known and without her
        let mut commented = MergeRequest::new(11, "commented only", now);
        commented.approvals = Some(vec![]);
        // 12: neither, both facts known
        let mut untouched = MergeRequest::new(12, "untouched", now);
        untouched.approvals = Some(vec!["bob".to_string()]);
        // 13: approvals unknown and notes lookup fails
        let unknown = MergeRequest::new(13, "unknown", now);
        // 14: approvals unknown, no notes of hers
        let half_known = MergeRequest::new(14, "half known", now);

        let mut client = FakeGitLab::default();
        client.notes.insert(10, vec![note("bob", false)]);
        client.notes.insert(11, vec![note("alice", false)]);
        client.notes.insert(12, vec![]);
        client.notes.insert(14, vec![]);

        let queue = build_review_queue(
            &client,
            &[approved, commented, untouched, unknown, half_known],
            "alice",
            now,
            &links,
        )
        .await;

        let reviewed = |id: u64| {
            let review = queue.iter().find(|h| h.id == id).unwrap().review.unwrap();
            assert_eq!(review.reviewed, any_true(review.commented, review.approved));
            review.reviewed
        };
        assert_eq!(reviewed(10), Some(true));
        assert_eq!(reviewed(11), Some(true));
        assert_eq!(reviewed(12), Some(false));
        assert_eq!(reviewed(13), None);
        assert_eq!(reviewed(14), None);
    }

    #[test]
    fn test_reviewed_truth_table() {
        let t = Some(true);
        let f = Some(false);
        let u = None;
        assert_eq!(state(t, u, u).reviewed, t);
        assert_eq!(state(u, t, u).reviewed, t);
        assert_eq!(state(f, t, u).reviewed, t);
        assert_eq!(state(f, f, u).reviewed, f);
        assert_eq!(state(f, u, u).reviewed, u);
        assert_eq!(ReviewState::default().reviewed, u);
    }
}
