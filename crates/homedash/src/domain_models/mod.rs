//! Domain models
//!
//! Pure data transformations behind the widgets: merge-request insights,
//! reviewer annotation, deep links and the weather snapshot.
//! Nothing in here touches UI state.

pub mod insights;
pub mod links;
pub mod review;
pub mod weather;

pub use insights::{build_insights, build_merged, Highlight, Insights, MergedHighlight, Tag};
pub use links::DashboardLinks;
pub use review::{build_review_queue, ReviewCategory};
pub use weather::{load_snapshot, WeatherSnapshot};
