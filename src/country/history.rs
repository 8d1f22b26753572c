use std::time::Duration;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::get_json;
use crate::error::{DashError, DashResult};
use crate::widgets::LineChartData;

pub const HISTORY_BASE_URL: &str = "https://api.covid19api.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HistoryStatus {
    Confirmed,
    Recovered,
    Deaths,
}

impl HistoryStatus {
    pub const ALL: [Self; 3] = [Self::Confirmed, Self::Recovered, Self::Deaths];

    #[must_use]
    pub fn path_segment(self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Recovered => "recovered",
            Self::Deaths => "deaths",
        }
    }
}

/// One day of cumulative counts as served by the history endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Cases")]
    pub cases: f64,
}

pub trait HistorySource {
    fn fetch(&mut self, country: &str, status: HistoryStatus) -> DashResult<Vec<HistoryEntry>>;
}

#[derive(Debug, Clone)]
pub struct HttpHistorySource {
    base_url: String,
    timeout: Option<Duration>,
}

impl Default for HttpHistorySource {
    fn default() -> Self {
        Self::new(HISTORY_BASE_URL)
    }
}

impl HttpHistorySource {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: None,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn url_for(&self, country: &str, status: HistoryStatus) -> String {
        format!(
            "{}/total/country/{}/status/{}",
            self.base_url.trim_end_matches('/'),
            country,
            status.path_segment()
        )
    }
}

impl HistorySource for HttpHistorySource {
    fn fetch(&mut self, country: &str, status: HistoryStatus) -> DashResult<Vec<HistoryEntry>> {
        let url = self.url_for(country, status);
        debug!(url = %url, "fetch country history");
        let body = get_json(&url, self.timeout)?;
        serde_json::from_value(body)
            .map_err(|e| DashError::InvalidPayload(format!("history for {country}: {e}")))
    }
}

/// Latest cumulative count and its increase over the previous day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatusTotals {
    pub total: f64,
    /// `None` until at least two days are known.
    pub new: Option<f64>,
}

impl StatusTotals {
    fn from_series(series: &[f64]) -> Option<Self> {
        let (&total, rest) = series.split_last()?;
        Some(Self {
            total,
            new: rest.last().map(|previous| total - previous),
        })
    }

    /// `+<new>` as shown under the total; empty when unknown.
    #[must_use]
    pub fn new_label(&self) -> String {
        self.new.map(|new| format!("+{new}")).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistorySummary {
    pub cases: Option<StatusTotals>,
    pub recovered: Option<StatusTotals>,
    pub deaths: Option<StatusTotals>,
}

/// Cumulative daily series for one country. Dates come from the confirmed
/// series.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CountryHistory {
    pub country: String,
    pub dates: Vec<String>,
    pub cases: Vec<f64>,
    pub recovered: Vec<f64>,
    pub deaths: Vec<f64>,
}

impl CountryHistory {
    /// Fetches confirmed, recovered and deaths in that order.
    pub fn fetch(source: &mut dyn HistorySource, country: &str) -> DashResult<Self> {
        let mut history = Self {
            country: country.to_owned(),
            ..Self::default()
        };
        for status in HistoryStatus::ALL {
            let entries = source.fetch(country, status)?;
            let counts = entries.iter().map(|entry| entry.cases).collect();
            match status {
                HistoryStatus::Confirmed => {
                    history.dates = entries.into_iter().map(|entry| entry.date).collect();
                    history.cases = counts;
                }
                HistoryStatus::Recovered => history.recovered = counts,
                HistoryStatus::Deaths => history.deaths = counts,
            }
        }
        debug!(country, days = history.dates.len(), "country history loaded");
        Ok(history)
    }

    #[must_use]
    pub fn summary(&self) -> HistorySummary {
        HistorySummary {
            cases: StatusTotals::from_series(&self.cases),
            recovered: StatusTotals::from_series(&self.recovered),
            deaths: StatusTotals::from_series(&self.deaths),
        }
    }

    #[must_use]
    pub fn date_labels(&self) -> Vec<String> {
        self.dates.iter().map(|date| format_history_date(date)).collect()
    }

    #[must_use]
    pub fn to_line_chart_data(&self) -> LineChartData {
        LineChartData {
            labels: self.date_labels(),
            series: vec![
                self.cases.clone(),
                self.recovered.clone(),
                self.deaths.clone(),
            ],
        }
    }
}

/// `"<day> <Mon>"` for an RFC 3339 timestamp or a plain `YYYY-MM-DD` date;
/// empty when the input is neither.
#[must_use]
pub fn format_history_date(input: &str) -> String {
    let input = input.trim();
    let date = DateTime::parse_from_rfc3339(input)
        .map(|date| date.date_naive())
        .or_else(|_| NaiveDate::parse_from_str(input, "%Y-%m-%d"));
    match date {
        Ok(date) => date.format("%-d %b").to_string(),
        Err(_) => String::new(),
    }
}
