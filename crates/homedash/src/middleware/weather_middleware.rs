//! Weather Middleware
//!
//! Loads the weather snapshot on start, on manual refresh and whenever the
//! configured interval has passed. A new load aborts the previous one.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dash_client::{Geolocator, WeatherClient};
use tokio::runtime::Handle;

use crate::actions::{Action, GlobalAction, WeatherAction};
use crate::dispatcher::Dispatcher;
use crate::domain_models::load_snapshot;
use crate::middleware::{refresh_due, Middleware};
use crate::state::AppState;
use crate::task::TaskSlot;

pub struct WeatherMiddleware {
    runtime: Handle,
    client: Arc<dyn WeatherClient>,
    geolocator: Arc<dyn Geolocator>,
    slot: TaskSlot,
    last_refresh: Option<DateTime<Utc>>,
}

impl WeatherMiddleware {
    pub fn new(
        runtime: Handle,
        client: Arc<dyn WeatherClient>,
        geolocator: Arc<dyn Geolocator>,
    ) -> Self {
        Self {
            runtime,
            client,
            geolocator,
            slot: TaskSlot::new(),
            last_refresh: None,
        }
    }

    fn refresh(&mut self, state: &AppState, dispatcher: &Dispatcher, now: DateTime<Utc>) {
        self.last_refresh = Some(now);

        let settings = state.config.weather.clone();
        let client = self.client.clone();
        let geolocator = self.geolocator.clone();
        let dispatcher = dispatcher.clone();

        self.slot.restart(&self.runtime, move |generation| {
            dispatcher.dispatch(Action::Weather(WeatherAction::LoadStarted { generation }));
            async move {
                let action =
                    match load_snapshot(&settings, client.as_ref(), geolocator.as_ref()).await {
                        Ok(snapshot) => WeatherAction::Loaded {
                            generation,
                            snapshot: Box::new(snapshot),
                        },
                        Err(e) => WeatherAction::Failed {
                            generation,
                            message: format!("{:#}", e),
                        },
                    };
                dispatcher.dispatch(Action::Weather(action));
            }
        });
    }
}

impl Middleware for WeatherMiddleware {
    fn handle(&mut self, action: &Action, state: &AppState, dispatcher: &Dispatcher) -> bool {
        match action {
            Action::Global(GlobalAction::Start)
            | Action::Global(GlobalAction::RefreshAll)
            | Action::Weather(WeatherAction::Refresh) => {
                self.refresh(state, dispatcher, state.now)
            }
            Action::Global(GlobalAction::Tick(now)) => {
                if refresh_due(self.last_refresh, *now, state.config.weather.refresh_secs) {
                    self.refresh(state, dispatcher, *now);
                }
            }
            _ => {}
        }
        true
    }
}
