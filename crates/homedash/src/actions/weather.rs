//! Weather panel actions

use crate::domain_models::WeatherSnapshot;

#[derive(Debug, Clone)]
pub enum WeatherAction {
    Refresh,
    LoadStarted { generation: u64 },
    Loaded {
        generation: u64,
        snapshot: Box<WeatherSnapshot>,
    },
    Failed { generation: u64, message: String },
}
