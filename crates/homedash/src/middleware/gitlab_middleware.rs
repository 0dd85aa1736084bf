//! GitLab Middleware
//!
//! Polls the three merge-request queues. Each queue has its own task slot:
//! a refresh aborts whatever load is still in flight for that queue and
//! starts a new generation. Failures are reported per queue and are not
//! retried until the next tick or manual refresh.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dash_client::{ClientError, GitLabClient, MergeRequestQuery};
use tokio::runtime::Handle;

use crate::actions::{Action, Feed, GitLabAction, GlobalAction};
use crate::dispatcher::Dispatcher;
use crate::domain_models::{build_insights, build_merged, build_review_queue};
use crate::middleware::{refresh_due, Middleware};
use crate::state::AppState;
use crate::task::TaskSlot;

pub struct GitLabMiddleware {
    runtime: Handle,
    /// `None` when no client could be built (usually a missing token)
    client: Option<Arc<dyn GitLabClient>>,
    assigned: TaskSlot,
    review: TaskSlot,
    merged: TaskSlot,
    last_refresh: Option<DateTime<Utc>>,
}

fn failed(feed: Feed, generation: u64, error: ClientError) -> Action {
    Action::GitLab(GitLabAction::LoadFailed {
        feed,
        generation,
        message: error.to_string(),
    })
}

impl GitLabMiddleware {
    pub fn new(runtime: Handle, client: Option<Arc<dyn GitLabClient>>) -> Self {
        Self {
            runtime,
            client,
            assigned: TaskSlot::new(),
            review: TaskSlot::new(),
            merged: TaskSlot::new(),
            last_refresh: None,
        }
    }

    fn refresh(&mut self, state: &AppState, dispatcher: &Dispatcher, now: DateTime<Utc>) {
        self.last_refresh = Some(now);

        let settings = &state.config.gitlab;
        let username = match settings.credentials() {
            Ok(credentials) => credentials.username.to_string(),
            Err(missing) => {
                log::info!("GitLab not configured: {:?}", missing);
                dispatcher.dispatch(Action::GitLab(GitLabAction::NotConfigured(
                    missing.instructions().to_string(),
                )));
                return;
            }
        };
        let Some(client) = self.client.clone() else {
            dispatcher.dispatch(Action::GitLab(GitLabAction::NotConfigured(
                "GitLab client unavailable, see the log for details".to_string(),
            )));
            return;
        };

        let page_size = settings.page_size;
        let links = state.links.clone();
        let merged_query = MergeRequestQuery::merged(username.clone(), page_size);
        log::info!("Refreshing merge requests for {}", username);

        {
            let client = client.clone();
            let dispatcher = dispatcher.clone();
            let query = MergeRequestQuery::assigned(username.clone(), page_size);
            let links = links.clone();
            self.assigned.restart(&self.runtime, move |generation| {
                dispatcher.dispatch(Action::GitLab(GitLabAction::LoadStarted {
                    feed: Feed::Assigned,
                    generation,
                }));
                async move {
                    let action = match client.merge_requests(&query).await {
                        Ok(mrs) => Action::GitLab(GitLabAction::AssignedLoaded {
                            generation,
                            insights: build_insights(&mrs, Utc::now(), &links),
                        }),
                        Err(e) => failed(Feed::Assigned, generation, e),
                    };
                    dispatcher.dispatch(action);
                }
            });
        }

        {
            let client = client.clone();
            let dispatcher = dispatcher.clone();
            let query = MergeRequestQuery::reviewing(username.clone(), page_size);
            self.review.restart(&self.runtime, move |generation| {
                dispatcher.dispatch(Action::GitLab(GitLabAction::LoadStarted {
                    feed: Feed::Review,
                    generation,
                }));
                async move {
                    let action = match client.merge_requests(&query).await {
                        Ok(mrs) => {
                            let highlights = build_review_queue(
                                client.as_ref(),
                                &mrs,
                                &username,
                                Utc::now(),
                                &links,
                            )
                            .await;
                            Action::GitLab(GitLabAction::ReviewLoaded {
                                generation,
                                highlights,
                            })
                        }
                        Err(e) => failed(Feed::Review, generation, e),
                    };
                    dispatcher.dispatch(action);
                }
            });
        }

        {
            let dispatcher = dispatcher.clone();
            let query = merged_query;
            self.merged.restart(&self.runtime, move |generation| {
                dispatcher.dispatch(Action::GitLab(GitLabAction::LoadStarted {
                    feed: Feed::Merged,
                    generation,
                }));
                async move {
                    let action = match client.merge_requests(&query).await {
                        Ok(mrs) => Action::GitLab(GitLabAction::MergedLoaded {
                            generation,
                            merged: build_merged(&mrs, Utc::now()),
                        }),
                        Err(e) => failed(Feed::Merged, generation, e),
                    };
                    dispatcher.dispatch(action);
                }
            });
        }
    }
}

impl Middleware for GitLabMiddleware {
    fn handle(&mut self, action: &Action, state: &AppState, dispatcher: &Dispatcher) -> bool {
        match action {
            Action::Global(GlobalAction::Start)
            | Action::Global(GlobalAction::RefreshAll)
            | Action::GitLab(GitLabAction::Refresh) => {
                self.refresh(state, dispatcher, state.now)
            }
            Action::Global(GlobalAction::Tick(now)) => {
                if refresh_due(self.last_refresh, *now, state.config.gitlab.refresh_secs) {
                    self.refresh(state, dispatcher, *now);
                }
            }
            _ => {}
        }
        true
    }
}
