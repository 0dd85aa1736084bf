//! GitLab queue actions
//!
//! Every load is tagged with the generation of the task that produced it.
//! `LoadStarted` records the generation in state before any result of that
//! task can arrive, and results from any other generation are dropped.

use crate::domain_models::{Highlight, Insights, MergedHighlight};

/// The three independently polled queues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feed {
    Assigned,
    Review,
    Merged,
}

impl Feed {
    pub fn label(self) -> &'static str {
        match self {
            Self::Assigned => "Assigned",
            Self::Review => "Review requests",
            Self::Merged => "Recently merged",
        }
    }
}

#[derive(Debug, Clone)]
pub enum GitLabAction {
    /// Restart all three loads
    Refresh,
    /// Token or username missing; nothing was requested
    NotConfigured(String),
    LoadStarted {
        feed: Feed,
        generation: u64,
    },
    AssignedLoaded {
        generation: u64,
        insights: Insights,
    },
    ReviewLoaded {
        generation: u64,
        highlights: Vec<Highlight>,
    },
    MergedLoaded {
        generation: u64,
        merged: Vec<MergedHighlight>,
    },
    LoadFailed {
        feed: Feed,
        generation: u64,
        message: String,
    },
}
