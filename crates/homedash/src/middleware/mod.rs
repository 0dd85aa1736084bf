use chrono::{DateTime, Duration, Utc};

use crate::actions::Action;
use crate::dispatcher::Dispatcher;
use crate::state::AppState;

pub mod browser_middleware;
pub mod command_palette_middleware;
pub mod gitlab_middleware;
pub mod keyboard_middleware;
pub mod logging;
pub mod preferences_middleware;
pub mod weather_middleware;

/// Middleware trait - intercepts actions before they reach the reducer
///
/// Middleware runs on the UI thread and must not block. Network work is
/// spawned onto the tokio runtime and reports back through the dispatcher.
pub trait Middleware: Send {
    /// Handle an action
    ///
    /// - `action`: The action to process
    /// - `state`: Current application state (read-only snapshot)
    /// - `dispatcher`: Use to dispatch actions that should re-enter middleware chain
    ///
    /// Returns `true` to continue chain, `false` to consume action
    fn handle(&mut self, action: &Action, state: &AppState, dispatcher: &Dispatcher) -> bool;
}

/// Whether a poller last run at `last` should run again at `now`
pub(crate) fn refresh_due(
    last: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    every_secs: u64,
) -> bool {
    let secs = i64::try_from(every_secs)
        .unwrap_or(i64::MAX)
        .clamp(1, i64::MAX / 1000);
    let every = Duration::seconds(secs);
    match last {
        None => true,
        Some(last) => now - last >= every,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_refresh_due() {
        let start = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();
        assert!(refresh_due(None, start, 300));
        assert!(!refresh_due(Some(start), start + Duration::seconds(299), 300));
        assert!(refresh_due(Some(start), start + Duration::seconds(300), 300));
        // Zero is treated as one second
        assert!(!refresh_due(Some(start), start, 0));
    }
}
