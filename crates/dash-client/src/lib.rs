//! HTTP clients for the homedash data sources
//!
//! This crate is the schema boundary of the dashboard: everything that comes
//! back from a remote API is parsed here into strongly typed records, and
//! fields the API left out are carried as explicit "unknown" values instead
//! of being guessed.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐   ┌─────────────────┐   ┌─────────────┐
//! │ GitLabClient    │   │ WeatherClient   │   │ Geolocator  │
//! │ (trait)         │   │ (trait)         │   │ (trait)     │
//! └────────┬────────┘   └────────┬────────┘   └──────┬──────┘
//!          ▼                     ▼                   ▼
//! ┌─────────────────┐   ┌─────────────────┐   ┌─────────────┐
//! │RestGitLabClient │   │ OpenMeteoClient │   │IpGeolocator │
//! └────────┬────────┘   └────────┬────────┘   └──────┬──────┘
//!          └─────────────────────┼───────────────────┘
//!                                ▼
//!                        ┌───────────────┐
//!                        │  HttpFetcher  │
//!                        └───────────────┘
//! ```

pub mod error;
pub mod fetch;
pub mod gitlab;
pub mod types;
pub mod weather;

pub use error::{ClientError, Result};
pub use fetch::{HttpFetcher, Page};
pub use gitlab::{GitLabClient, MergeRequestQuery, MergeRequestRole, RestGitLabClient};
pub use types::{
    parse_merge_requests, Discussion, MergeRequest, MergeStatus, Note, PipelineStatus,
};
pub use weather::{
    Coordinates, DailyBlock, ForecastResponse, CurrentBlock, Geolocator, HourlyBlock,
    IpGeolocator, OpenMeteoClient, Place, WeatherClient,
};
