//! Weather panel reducer

use chrono::{DateTime, Utc};

use crate::actions::WeatherAction;
use crate::domain_models::WeatherSnapshot;
use crate::state::FeedState;

pub fn reduce_weather(
    mut state: FeedState<WeatherSnapshot>,
    action: &WeatherAction,
    now: DateTime<Utc>,
) -> FeedState<WeatherSnapshot> {
    match action {
        WeatherAction::Refresh => {}
        WeatherAction::LoadStarted { generation } => state.start(*generation),
        WeatherAction::Loaded {
            generation,
            snapshot,
        } => {
            state.succeed(*generation, snapshot.as_ref().clone(), now);
        }
        WeatherAction::Failed {
            generation,
            message,
        } => {
            if state.fail(*generation, message.clone()) {
                log::warn!("Weather unavailable: {}", message);
            }
        }
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_models::weather::{CurrentConditions, NextRain};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn snapshot(location: &str) -> WeatherSnapshot {
        let observed_at = NaiveDate::from_ymd_opt(2024, 5, 10)
            .and_then(|d| d.and_hms_opt(9, 0, 0))
            .unwrap();
        WeatherSnapshot {
            location: location.to_string(),
            current: CurrentConditions {
                temperature: 18.0,
                feels_like: None,
                code: 0,
                is_day: true,
                observed_at,
            },
            next_rain: NextRain::NoneExpected,
            hourly: Vec::new(),
            daily: Vec::new(),
            fetched_at: Utc::now(),
        }
    }

    #[test]
    fn test_failure_keeps_last_snapshot_and_late_results_drop() {
        let now = Utc::now();
        let mut state = FeedState::default();
        state = reduce_weather(state, &WeatherAction::LoadStarted { generation: 1 }, now);
        state = reduce_weather(
            state,
            &WeatherAction::Loaded {
                generation: 1,
                snapshot: Box::new(snapshot("Berlin")),
            },
            now,
        );
        state = reduce_weather(state, &WeatherAction::LoadStarted { generation: 2 }, now);
        state = reduce_weather(
            state,
            &WeatherAction::Failed {
                generation: 2,
                message: "Location lookup timed out".to_string(),
            },
            now,
        );

        assert_eq!(
            state.data.as_ref().map(|s| s.location.as_str()),
            Some("Berlin")
        );
        assert_eq!(state.error.as_deref(), Some("Location lookup timed out"));

        state = reduce_weather(
            state,
            &WeatherAction::Loaded {
                generation: 1,
                snapshot: Box::new(snapshot("Paris")),
            },
            now,
        );
        assert_eq!(
            state.data.as_ref().map(|s| s.location.as_str()),
            Some("Berlin")
        );
    }
}
