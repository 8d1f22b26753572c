use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::error::{DashError, DashResult};

use super::{DashboardConfig, SummaryPayload};

const STATIC_SUMMARY_JSON: &str = include_str!("../../assets/static_summary.json");

/// Where the dashboard gets its summary body from.
pub trait SummarySource {
    /// Human-readable origin, used in alerts.
    fn location(&self) -> &str;

    fn fetch(&mut self) -> DashResult<Value>;
}

/// Blocking HTTP GET against the summary endpoint.
#[derive(Debug, Clone)]
pub struct HttpSummarySource {
    url: String,
    timeout: Option<Duration>,
}

impl HttpSummarySource {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: None,
        }
    }

    /// Source for `config.data_url`, honouring `config.request_timeout`.
    #[must_use]
    pub fn from_config(config: &DashboardConfig) -> Self {
        Self::new(config.data_url.clone()).with_timeout(config.request_timeout)
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

impl SummarySource for HttpSummarySource {
    fn location(&self) -> &str {
        &self.url
    }

    fn fetch(&mut self) -> DashResult<Value> {
        debug!(url = %self.url, "fetch summary");
        get_json(&self.url, self.timeout)
    }
}

/// GETs `url` and decodes the body as JSON; non-success statuses are errors.
pub(crate) fn get_json(url: &str, timeout: Option<Duration>) -> DashResult<Value> {
    let mut builder = reqwest::blocking::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    let client = builder
        .build()
        .map_err(|e| DashError::Fetch(format!("http client error: {e}")))?;
    client
        .get(url)
        .send()
        .and_then(|response| response.error_for_status())
        .map_err(|e| DashError::Fetch(format!("request error: {e}")))?
        .json()
        .map_err(|e| DashError::Fetch(format!("decode error: {e}")))
}

/// Serves a fixed JSON body. Used for the bundled fallback and in tests.
#[derive(Debug, Clone)]
pub struct StaticSummarySource {
    location: String,
    body: Value,
}

impl StaticSummarySource {
    #[must_use]
    pub fn new(location: impl Into<String>, body: Value) -> Self {
        Self {
            location: location.into(),
            body,
        }
    }

    /// The summary shipped with the crate.
    pub fn bundled() -> DashResult<Self> {
        Ok(Self::new("bundled static data", bundled_summary_value()?))
    }
}

impl SummarySource for StaticSummarySource {
    fn location(&self) -> &str {
        &self.location
    }

    fn fetch(&mut self) -> DashResult<Value> {
        Ok(self.body.clone())
    }
}

fn bundled_summary_value() -> DashResult<Value> {
    serde_json::from_str(STATIC_SUMMARY_JSON)
        .map_err(|e| DashError::InvalidPayload(format!("bundled summary is not json: {e}")))
}

/// Parsed bundled summary, used when the remote source fails.
pub fn static_summary() -> DashResult<SummaryPayload> {
    SummaryPayload::from_value(bundled_summary_value()?)
}
