//! Per-source load state
//!
//! Each polled source keeps its last good data, the last error and the
//! generation of the load it is waiting for. Results carrying any other
//! generation come from a superseded task and are dropped.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct FeedState<T> {
    /// Generation of the most recently started load
    pub generation: u64,
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl<T> Default for FeedState<T> {
    fn default() -> Self {
        Self {
            generation: 0,
            data: None,
            loading: false,
            error: None,
            last_updated: None,
        }
    }
}

impl<T> FeedState<T> {
    pub fn start(&mut self, generation: u64) {
        self.generation = generation;
        self.loading = true;
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    /// Replace the data wholesale. Returns false if the result was dropped.
    pub fn succeed(&mut self, generation: u64, data: T, now: DateTime<Utc>) -> bool {
        if !self.is_current(generation) {
            log::debug!(
                "Dropping result of generation {} (current {})",
                generation,
                self.generation
            );
            return false;
        }
        self.data = Some(data);
        self.loading = false;
        self.error = None;
        self.last_updated = Some(now);
        true
    }

    /// Record the failure; previous data stays for display next to the error.
    pub fn fail(&mut self, generation: u64, message: String) -> bool {
        if !self.is_current(generation) {
            log::debug!(
                "Dropping failure of generation {} (current {})",
                generation,
                self.generation
            );
            return false;
        }
        self.loading = false;
        self.error = Some(message);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_superseded_result_is_dropped() {
        let now = Utc::now();
        let mut feed: FeedState<&str> = FeedState::default();
        feed.start(1);
        feed.start(2);

        assert!(!feed.succeed(1, "old", now));
        assert_eq!(feed.data, None);
        assert!(feed.loading);

        assert!(feed.succeed(2, "new", now));
        assert_eq!(feed.data, Some("new"));
        assert!(!feed.loading);
        assert_eq!(feed.last_updated, Some(now));
    }

    #[test]
    fn test_failure_keeps_previous_data() {
        let now = Utc::now();
        let mut feed = FeedState::default();
        feed.start(1);
        feed.succeed(1, 42, now);
        feed.start(2);

        assert!(feed.fail(2, "HTTP 502".to_string()));
        assert_eq!(feed.data, Some(42));
        assert_eq!(feed.error.as_deref(), Some("HTTP 502"));

        assert!(!feed.fail(1, "late".to_string()));
        assert_eq!(feed.error.as_deref(), Some("HTTP 502"));
    }

    #[test]
    fn test_success_clears_error() {
        let now = Utc::now();
        let mut feed = FeedState::default();
        feed.start(1);
        feed.fail(1, "boom".to_string());
        feed.start(2);
        feed.succeed(2, "ok", now);
        assert_eq!(feed.error, None);
    }
}
