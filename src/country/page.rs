use tracing::{debug, warn};

use crate::error::DashResult;
use crate::host::Element;
use crate::render::RenderFrame;
use crate::widgets::{LineChart, LineChartConfig};

use super::history::{CountryHistory, HistorySource, HistorySummary};
use super::list::{COUNTRIES, Country, find_by_code, find_by_name, partition_columns, search};

pub const PICKER_COLUMNS: usize = 3;
pub const LOADING_LABEL: &str = "Loading...";

/// Country history page: a searchable picker and a line chart of the selected
/// country's cumulative counts.
pub struct CountryPage<H: HistorySource> {
    source: H,
    picker_open: bool,
    query: String,
    selected: Option<String>,
    loading: bool,
    history: Option<CountryHistory>,
    chart: Element<LineChart>,
    chart_config: LineChartConfig,
}

impl<H: HistorySource> CountryPage<H> {
    #[must_use]
    pub fn new(source: H) -> Self {
        Self {
            source,
            picker_open: false,
            query: String::new(),
            selected: None,
            loading: false,
            history: None,
            chart: Element::new(LineChart::new()),
            chart_config: LineChartConfig::default(),
        }
    }

    #[must_use]
    pub fn with_chart_config(mut self, config: LineChartConfig) -> Self {
        self.chart_config = config;
        self
    }

    /// Country for a visitor's ISO code, if it is in the picker.
    #[must_use]
    pub fn country_for_code(code: &str) -> Option<&'static Country> {
        find_by_code(code)
    }

    #[must_use]
    pub fn columns(&self) -> Vec<&'static [Country]> {
        partition_columns(COUNTRIES, PICKER_COLUMNS)
    }

    #[must_use]
    pub fn is_picker_open(&self) -> bool {
        self.picker_open
    }

    /// Opening the picker clears the search.
    pub fn toggle_picker(&mut self) {
        self.picker_open = !self.picker_open;
        if self.picker_open {
            self.query.clear();
        }
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    #[must_use]
    pub fn visible_countries(&self) -> Vec<&'static Country> {
        search(&self.query).collect()
    }

    /// Heading shown above the summary.
    #[must_use]
    pub fn heading(&self) -> &str {
        if self.loading {
            LOADING_LABEL
        } else {
            self.selected.as_deref().unwrap_or_default()
        }
    }

    #[must_use]
    pub fn history(&self) -> Option<&CountryHistory> {
        self.history.as_ref()
    }

    #[must_use]
    pub fn summary(&self) -> Option<HistorySummary> {
        self.history.as_ref().map(CountryHistory::summary)
    }

    #[must_use]
    pub fn chart(&self) -> &Element<LineChart> {
        &self.chart
    }

    /// Loads the history of `name` and redraws the chart. Picking a country
    /// closes the picker.
    pub fn select_country(&mut self, name: &str) -> DashResult<HistorySummary> {
        if find_by_name(name).is_none() {
            warn!(country = name, "country not in picker list");
        }
        self.picker_open = false;
        self.selected = Some(name.to_owned());
        self.loading = true;

        let fetched = CountryHistory::fetch(&mut self.source, name);
        self.loading = false;
        let history = fetched?;

        self.chart
            .set_attribute("config", self.chart_config.to_attribute()?)?;
        self.chart
            .set_attribute("data", history.to_line_chart_data().to_attribute()?)?;
        let summary = history.summary();
        debug!(country = name, "country page updated");
        self.history = Some(history);
        Ok(summary)
    }

    pub fn render_frame(&self) -> DashResult<RenderFrame> {
        self.chart.render_frame()
    }
}

impl<H: HistorySource> std::fmt::Debug for CountryPage<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CountryPage")
            .field("picker_open", &self.picker_open)
            .field("query", &self.query)
            .field("selected", &self.selected)
            .field("history", &self.history)
            .finish()
    }
}
