//! Dashboard orchestration: configuration, summary loading with static
//! fallback, and the wiring between the table and the pie chart.

mod alert;
pub mod config;
mod dashboard;
pub mod summary;
mod source;

pub use alert::{AlertSink, LogAlertSink};
pub use config::{
    CHART_COLORS, DATA_URL, DEFAULT_RECORD, DashboardConfig, default_chart_config,
    default_table_config,
};
pub use dashboard::{Dashboard, DatasetOrigin, DatasetStore};
pub use source::{HttpSummarySource, StaticSummarySource, SummarySource, static_summary};
pub use summary::{SummaryPayload, pie_data_for};

pub(crate) use source::get_json;
