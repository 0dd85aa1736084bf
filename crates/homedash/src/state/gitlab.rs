//! Merge-request queues state

use super::FeedState;
use crate::domain_models::{Highlight, Insights, MergedHighlight};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GitLabState {
    /// Instructions shown instead of the queues when credentials are missing
    pub notice: Option<String>,
    pub assigned: FeedState<Insights>,
    pub review: FeedState<Vec<Highlight>>,
    pub merged: FeedState<Vec<MergedHighlight>>,
}

impl GitLabState {
    /// Highlights of both open queues, assigned first, without duplicates
    pub fn all_highlights(&self) -> Vec<&Highlight> {
        let assigned = self
            .assigned
            .data
            .iter()
            .flat_map(|insights| insights.highlights.iter());
        let review = self.review.data.iter().flatten();

        let mut seen = std::collections::HashSet::new();
        assigned
            .chain(review)
            .filter(|h| seen.insert(h.id))
            .collect()
    }
}
