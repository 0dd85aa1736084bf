//! GitLab queues reducer

use chrono::{DateTime, Utc};

use crate::actions::{Feed, GitLabAction};
use crate::state::GitLabState;

pub fn reduce_gitlab(
    mut state: GitLabState,
    action: &GitLabAction,
    now: DateTime<Utc>,
) -> GitLabState {
    match action {
        GitLabAction::Refresh => {}

        GitLabAction::NotConfigured(message) => {
            state.notice = Some(message.clone());
        }

        GitLabAction::LoadStarted { feed, generation } => {
            state.notice = None;
            match feed {
                Feed::Assigned => state.assigned.start(*generation),
                Feed::Review => state.review.start(*generation),
                Feed::Merged => state.merged.start(*generation),
            }
        }

        GitLabAction::AssignedLoaded {
            generation,
            insights,
        } => {
            state.assigned.succeed(*generation, insights.clone(), now);
        }

        GitLabAction::ReviewLoaded {
            generation,
            highlights,
        } => {
            state.review.succeed(*generation, highlights.clone(), now);
        }

        GitLabAction::MergedLoaded { generation, merged } => {
            state.merged.succeed(*generation, merged.clone(), now);
        }

        GitLabAction::LoadFailed {
            feed,
            generation,
            message,
        } => {
            let applied = match feed {
                Feed::Assigned => state.assigned.fail(*generation, message.clone()),
                Feed::Review => state.review.fail(*generation, message.clone()),
                Feed::Merged => state.merged.fail(*generation, message.clone()),
            };
            if applied {
                log::warn!("{} failed to load: {}", feed.label(), message);
            }
        }
    }

    state
}
