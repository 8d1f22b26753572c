//! covid-dash: attribute-driven dashboard widgets for COVID-19 statistics.
//!
//! Widgets (bar chart, data table, animated pie chart, line chart) react to
//! string attributes the way custom elements do and project their state into
//! backend-agnostic render frames. The `api` layer loads the daily summary,
//! falls back to bundled data, and wires row selection into the pie chart.

pub mod api;
pub mod core;
pub mod country;
pub mod error;
pub mod events;
pub mod host;
pub mod render;
pub mod telemetry;
pub mod widgets;

pub use api::{Dashboard, DashboardConfig};
pub use error::{DashError, DashResult};
