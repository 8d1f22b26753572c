use std::time::Duration;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{DashError, DashResult};
use crate::widgets::{ColumnConfig, PieChartConfig, TableConfig};

pub const DATA_URL: &str = "https://api.covid19api.com/summary";
pub const DEFAULT_RECORD: &str = "Global";
pub const CHART_COLORS: [&str; 3] = ["#4b9dd1", "#f78851", "#a2d9a3"];
pub const DEFAULT_CONTAINER_WIDTH_PX: f64 = 450.0;

/// Record fields shown by the pie chart, in slice order.
pub const PIE_FIELDS: [&str; 3] = ["TotalConfirmed", "TotalDeaths", "TotalRecovered"];

/// Dashboard bootstrap configuration.
///
/// Serializable so hosts can ship their setup as JSON; every field falls back
/// to the stock dashboard when omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub data_url: String,
    pub default_record: String,
    pub chart_colors: Vec<String>,
    pub table: TableConfig,
    pub chart: PieChartConfig,
    pub container_width_px: f64,
    /// Request timeout for the remote fetch; `None` waits indefinitely.
    #[serde(with = "optional_millis")]
    pub request_timeout: Option<Duration>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let colors: Vec<String> = CHART_COLORS.iter().map(|c| (*c).to_owned()).collect();
        Self {
            data_url: DATA_URL.to_owned(),
            default_record: DEFAULT_RECORD.to_owned(),
            table: default_table_config(&colors),
            chart: default_chart_config(&colors),
            chart_colors: colors,
            container_width_px: DEFAULT_CONTAINER_WIDTH_PX,
            request_timeout: None,
        }
    }
}

impl DashboardConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(input: &str) -> DashResult<Self> {
        let config: Self = serde_json::from_str(input).map_err(|e| {
            DashError::InvalidData(format!("failed to parse dashboard config: {e}"))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> DashResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            DashError::InvalidData(format!("failed to serialize dashboard config: {e}"))
        })
    }

    pub fn validate(&self) -> DashResult<()> {
        if self.data_url.trim().is_empty() {
            return Err(DashError::InvalidData("data url must not be empty".to_owned()));
        }
        if self.default_record.trim().is_empty() {
            return Err(DashError::InvalidData(
                "default record must not be empty".to_owned(),
            ));
        }
        if !self.container_width_px.is_finite() || self.container_width_px < 0.0 {
            return Err(DashError::InvalidData(
                "container width must be finite and >= 0".to_owned(),
            ));
        }
        if self.request_timeout.is_some_and(|timeout| timeout.is_zero()) {
            return Err(DashError::InvalidData(
                "request timeout must be > 0".to_owned(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn with_data_url(mut self, url: impl Into<String>) -> Self {
        self.data_url = url.into();
        self
    }

    #[must_use]
    pub fn with_default_record(mut self, name: impl Into<String>) -> Self {
        self.default_record = name.into();
        self
    }

    /// Replaces the palette and rebuilds the stock table and chart configs
    /// around it.
    #[must_use]
    pub fn with_chart_colors(mut self, colors: Vec<String>) -> Self {
        self.table = default_table_config(&colors);
        self.chart = default_chart_config(&colors);
        self.chart_colors = colors;
        self
    }

    #[must_use]
    pub fn with_table(mut self, table: TableConfig) -> Self {
        self.table = table;
        self
    }

    #[must_use]
    pub fn with_chart(mut self, chart: PieChartConfig) -> Self {
        self.chart = chart;
        self
    }

    #[must_use]
    pub fn with_container_width(mut self, width_px: f64) -> Self {
        self.container_width_px = width_px;
        self
    }

    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Country column, per-country summary bars, then the three totals.
#[must_use]
pub fn default_table_config(colors: &[String]) -> TableConfig {
    let mut attributes = IndexMap::new();
    attributes.insert("colors".to_owned(), json!(colors));
    attributes.insert("maxVal".to_owned(), json!(2_000_000));
    attributes.insert("maxWidth".to_owned(), json!(150));

    TableConfig::new(vec![
        ColumnConfig::data("Country", "Country"),
        ColumnConfig::component(
            "Summary",
            "bar-chart",
            attributes,
            PIE_FIELDS.iter().map(|f| (*f).to_owned()).collect(),
        ),
        ColumnConfig::data("Total Confirmed", "TotalConfirmed"),
        ColumnConfig::data("Total Deaths", "TotalDeaths"),
        ColumnConfig::data("Total Recovered", "TotalRecovered"),
    ])
}

#[must_use]
pub fn default_chart_config(colors: &[String]) -> PieChartConfig {
    let category_labels = [
        ("TotalConfirmed", "Total Confirmed"),
        ("TotalDeaths", "Total Deaths"),
        ("TotalRecovered", "Total Recovered"),
    ]
    .into_iter()
    .map(|(field, label)| (field.to_owned(), label.to_owned()))
    .collect();
    PieChartConfig {
        colors: colors.to_vec(),
        category_labels,
    }
}

mod optional_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(duration) => serializer.serialize_some(&(duration.as_millis() as u64)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_millis))
    }
}
