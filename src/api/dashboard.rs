use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::core::{Record, Viewport, text_field};
use crate::error::{DashError, DashResult};
use crate::events::{EventContext, EventDispatcher, EventListener, WidgetEvent, WidgetEventKind};
use crate::host::{Element, WidgetRegistry};
use crate::render::{RenderFrame, Renderer};
use crate::widgets::{DataTable, PieChart};

use super::{
    AlertSink, DashboardConfig, SummaryPayload, SummarySource, pie_data_for, static_summary,
    summary::COUNTRY_FIELD,
};

/// Horizontal gap between the table and the pie chart in the composed frame.
const WIDGET_GAP_PX: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatasetOrigin {
    Remote,
    StaticFallback,
}

/// Last dataset handed to the widgets, read back by the reset control.
#[derive(Debug, Clone, Default)]
pub struct DatasetStore {
    current: Option<(SummaryPayload, DatasetOrigin)>,
}

impl DatasetStore {
    pub fn replace(&mut self, payload: SummaryPayload, origin: DatasetOrigin) {
        self.current = Some((payload, origin));
    }

    #[must_use]
    pub fn payload(&self) -> Option<&SummaryPayload> {
        self.current.as_ref().map(|(payload, _)| payload)
    }

    #[must_use]
    pub fn origin(&self) -> Option<DatasetOrigin> {
        self.current.as_ref().map(|(_, origin)| *origin)
    }

    /// Aggregate record labelled with `name` in its `Country` field.
    pub fn default_record(&self, name: &str) -> DashResult<Record> {
        let payload = self.payload().ok_or(DashError::NotLoaded)?;
        let mut record = Record::with_capacity(payload.global.len() + 1);
        record.insert(COUNTRY_FIELD.to_owned(), Value::String(name.to_owned()));
        for (field, value) in &payload.global {
            if field != COUNTRY_FIELD {
                record.insert(field.clone(), value.clone());
            }
        }
        Ok(record)
    }
}

/// Page bootstrap: loads the summary, feeds the table and the pie chart, and
/// reacts to row selection and reset.
pub struct Dashboard<S: SummarySource, A: AlertSink> {
    config: DashboardConfig,
    source: S,
    alerts: A,
    store: DatasetStore,
    table: Element<DataTable>,
    pie: Element<PieChart>,
    container_width: Rc<Cell<f64>>,
    reset_visible: bool,
    selected_row: Option<usize>,
    listeners: EventDispatcher,
}

impl<S: SummarySource, A: AlertSink> Dashboard<S, A> {
    pub fn new(config: DashboardConfig, source: S, alerts: A) -> DashResult<Self> {
        config.validate()?;
        let container_width = Rc::new(Cell::new(config.container_width_px));
        let registry = WidgetRegistry::standard();
        Ok(Self {
            table: Element::new(DataTable::new(registry)),
            pie: Element::new(PieChart::new(Rc::clone(&container_width))),
            config,
            source,
            alerts,
            store: DatasetStore::default(),
            container_width,
            reset_visible: false,
            selected_row: None,
            listeners: EventDispatcher::default(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    #[must_use]
    pub fn table(&self) -> &Element<DataTable> {
        &self.table
    }

    #[must_use]
    pub fn pie(&self) -> &Element<PieChart> {
        &self.pie
    }

    #[must_use]
    pub fn store(&self) -> &DatasetStore {
        &self.store
    }

    #[must_use]
    pub fn alerts(&self) -> &A {
        &self.alerts
    }

    #[must_use]
    pub fn reset_control_visible(&self) -> bool {
        self.reset_visible
    }

    #[must_use]
    pub fn selected_row(&self) -> Option<usize> {
        self.selected_row
    }

    /// Fetches, validates and displays the summary, falling back to the
    /// bundled data (after raising an alert) when any of those steps fails.
    pub fn load(&mut self) -> DashResult<DatasetOrigin> {
        let (payload, origin) = match self.load_remote() {
            Ok(payload) => (payload, DatasetOrigin::Remote),
            Err(err) => {
                let message = format!(
                    "Error when loading data from {} {err}. Loading static data instead.",
                    self.source.location()
                );
                warn!(error = %err, "summary load failed, using static data");
                self.alerts.alert(&message);
                let mut payload = static_summary()?;
                payload.sort_countries_by_confirmed();
                self.setup_components(&payload)?;
                (payload, DatasetOrigin::StaticFallback)
            }
        };

        info!(
            countries = payload.countries.len(),
            date = %payload.date,
            ?origin,
            "dashboard loaded"
        );
        self.store.replace(payload, origin);
        Ok(origin)
    }

    fn load_remote(&mut self) -> DashResult<SummaryPayload> {
        let mut payload = self.source.fetch().and_then(SummaryPayload::from_value)?;
        payload.sort_countries_by_confirmed();
        self.setup_components(&payload)?;
        Ok(payload)
    }

    fn setup_components(&mut self, payload: &SummaryPayload) -> DashResult<()> {
        self.table
            .set_attribute("config", self.config.table.to_attribute()?)?;
        self.table
            .set_attribute("data", encode("table data", &payload.countries)?)?;

        self.pie.set_attribute("config", self.config.chart.to_attribute()?)?;
        self.pie.set_attribute(
            "data",
            encode("chart data", &pie_data_for(&payload.global, &self.config.chart))?,
        )?;
        self.pie
            .set_attribute("chart-title", self.config.default_record.clone())?;
        self.selected_row = None;
        self.reset_visible = false;
        Ok(())
    }

    /// Clicks table row `index` and handles the resulting notifications.
    pub fn click_row(&mut self, index: usize) -> DashResult<()> {
        self.table.widget_mut().click_row(index)?;
        self.process_events()?;
        Ok(())
    }

    /// Drains widget notifications, reacts to them, then forwards each one to
    /// the registered listeners. Returns how many were handled.
    pub fn process_events(&mut self) -> DashResult<usize> {
        let events = self.table.drain_events();
        for event in &events {
            if !event.crosses_scope() {
                continue;
            }
            self.handle_event(event)?;
            let context = self.event_context();
            self.listeners.dispatch(event, &context);
        }
        Ok(events.len())
    }

    fn handle_event(&mut self, event: &WidgetEvent) -> DashResult<()> {
        match event.kind {
            WidgetEventKind::RowClicked => {
                self.update_pie(&event.detail)?;
                self.selected_row = self.table.widget().active_row();
                self.reset_visible = true;
                debug!(row = ?self.selected_row, "row selected");
            }
        }
        Ok(())
    }

    fn update_pie(&mut self, record: &Record) -> DashResult<()> {
        let data = pie_data_for(record, &self.config.chart);
        self.pie.set_attribute("data", encode("chart data", &data)?)?;
        let title = text_field(record, COUNTRY_FIELD).unwrap_or_default().to_owned();
        self.pie.set_attribute("chart-title", title)
    }

    /// Shows the aggregate record again and clears the table selection.
    pub fn reset_selection(&mut self) -> DashResult<()> {
        let record = self.store.default_record(&self.config.default_record)?;
        self.update_pie(&record)?;
        self.table
            .set_attribute("config", self.config.table.to_attribute()?)?;
        self.selected_row = None;
        self.reset_visible = false;
        debug!("selection reset");
        Ok(())
    }

    /// Advances pie transitions and nested table widgets.
    pub fn tick(&mut self, elapsed: Duration) {
        self.table.tick(elapsed);
        self.pie.tick(elapsed);
    }

    /// Records a new container width; the pie picks it up on its next update.
    pub fn set_container_width(&mut self, width_px: f64) {
        self.container_width.set(width_px);
    }

    pub fn register_listener(&mut self, listener: Box<dyn EventListener>) -> DashResult<()> {
        self.listeners.register(listener)
    }

    pub fn unregister_listener(&mut self, id: &str) -> bool {
        self.listeners.unregister(id)
    }

    fn event_context(&self) -> EventContext {
        EventContext {
            chart_title: self.pie.widget().title().map(str::to_owned),
            reset_visible: self.reset_visible,
            selected_row: self.selected_row,
            dataset_date: self.store.payload().map(|payload| payload.date.clone()),
        }
    }

    /// Table on the left, pie chart to its right.
    pub fn build_render_frame(&self) -> DashResult<RenderFrame> {
        let table = self.table.render_frame()?;
        let pie = self.pie.render_frame()?;

        let mut frame = RenderFrame::new(Viewport::new(0, 0));
        frame.append_translated(&table, 0.0, 0.0);
        let pie_x = if table.is_empty() {
            0.0
        } else {
            f64::from(table.viewport.width) + WIDGET_GAP_PX
        };
        frame.append_translated(&pie, pie_x, 0.0);
        if frame.is_empty() {
            return Ok(frame);
        }

        let width = if pie.is_empty() {
            f64::from(table.viewport.width)
        } else {
            pie_x + f64::from(pie.viewport.width)
        };
        let height = table.viewport.height.max(pie.viewport.height);
        frame.viewport = Viewport::from_px(width, f64::from(height));
        Ok(frame)
    }

    pub fn render<R: Renderer>(&self, renderer: &mut R) -> DashResult<()> {
        let frame = self.build_render_frame()?;
        renderer.render(&frame)
    }
}

fn encode<T: Serialize + ?Sized>(what: &str, value: &T) -> DashResult<String> {
    serde_json::to_string(value)
        .map_err(|e| DashError::InvalidData(format!("failed to encode {what}: {e}")))
}

impl<S: SummarySource, A: AlertSink> std::fmt::Debug for Dashboard<S, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("source", &self.source.location())
            .field("origin", &self.store.origin())
            .field("reset_visible", &self.reset_visible)
            .field("selected_row", &self.selected_row)
            .field("listeners", &self.listeners)
            .finish()
    }
}
