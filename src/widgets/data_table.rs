//! Generic table driven by a column configuration and a row list.
//!
//! Observed attributes:
//! - `config`: JSON [`TableConfig`]; `data` columns print a record field,
//!   `component` columns nest another widget in the cell
//! - `data`: JSON array of records
//!
//! Example config with one data column and one component column:
//!
//! ```json
//! {
//!   "columns": [
//!     { "type": "data", "label": "Country", "dataPropertyName": "Country" },
//!     {
//!       "type": "component",
//!       "label": "Summary",
//!       "componentName": "bar-chart",
//!       "componentAttributes": { "colors": ["#4b9dd1", "#f78851"], "maxWidth": 150 },
//!       "dataPropertyNames": ["TotalConfirmed", "TotalDeaths"]
//!     }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;
use std::time::Duration;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::core::{NumberLocale, Record, Viewport, attribute_string, display_value};
use crate::error::{DashError, DashResult};
use crate::events::WidgetEvent;
use crate::host::{AttributeChange, Element, Widget, WidgetLifecycle, WidgetRegistry};
use crate::render::{Color, LinePrimitive, RectPrimitive, RenderFrame, TextHAlign, TextPrimitive};

pub const DATA_TABLE_TAG: &str = "data-table";
/// Class carried by the cells of the selected row.
pub const ACTIVE_ROW_CLASS: &str = "active";

const OBSERVED_ATTRIBUTES: &[&str] = &["data", "config"];

const FONT_SIZE_PX: f64 = 14.0;
const CELL_PADDING_X: f64 = 20.0;
const CELL_PADDING_Y: f64 = 10.0;
const CHAR_WIDTH_RATIO: f64 = 0.6;
const LINE_HEIGHT_RATIO: f64 = 1.2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableConfig {
    pub columns: Vec<ColumnConfig>,
    /// Row selected before the first row render.
    #[serde(
        rename = "activeRowIndex",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub active_row_index: Option<usize>,
}

impl TableConfig {
    #[must_use]
    pub fn new(columns: Vec<ColumnConfig>) -> Self {
        Self {
            columns,
            active_row_index: None,
        }
    }

    #[must_use]
    pub fn with_active_row_index(mut self, index: Option<usize>) -> Self {
        self.active_row_index = index;
        self
    }

    /// JSON form suitable for the `config` attribute.
    pub fn to_attribute(&self) -> DashResult<String> {
        serde_json::to_string(self)
            .map_err(|err| DashError::InvalidData(format!("failed to encode table config: {err}")))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ColumnConfig {
    Data {
        label: String,
        #[serde(rename = "dataPropertyName")]
        data_property_name: String,
    },
    Component {
        label: String,
        #[serde(rename = "componentName")]
        component_name: String,
        #[serde(rename = "componentAttributes", default)]
        component_attributes: IndexMap<String, Value>,
        #[serde(rename = "dataPropertyNames", default)]
        data_property_names: Vec<String>,
    },
}

impl ColumnConfig {
    #[must_use]
    pub fn data(label: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Data {
            label: label.into(),
            data_property_name: field.into(),
        }
    }

    #[must_use]
    pub fn component(
        label: impl Into<String>,
        component_name: impl Into<String>,
        component_attributes: IndexMap<String, Value>,
        data_property_names: Vec<String>,
    ) -> Self {
        Self::Component {
            label: label.into(),
            component_name: component_name.into(),
            component_attributes,
            data_property_names,
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Data { label, .. } | Self::Component { label, .. } => label,
        }
    }
}

/// Position of a cell hosting a nested widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellKey {
    pub row: usize,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableCell {
    Text(String),
    /// Cell hosting a nested widget; `data` is the attribute last forwarded to it.
    Widget { tag: String, data: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
    pub active: bool,
}

impl TableRow {
    #[must_use]
    pub fn class(&self) -> Option<&'static str> {
        self.active.then_some(ACTIVE_ROW_CLASS)
    }
}

/// Nested widget cached for one cell, with the tag it was requested under.
struct NestedCell {
    tag: String,
    element: Element,
}

pub struct DataTable {
    registry: WidgetRegistry,
    locale: NumberLocale,
    config: Option<TableConfig>,
    data: Option<Vec<Record>>,
    active_row: Option<usize>,
    headers: Vec<String>,
    rows: Vec<TableRow>,
    nested: BTreeMap<CellKey, NestedCell>,
    nested_created: usize,
    outbox: Vec<WidgetEvent>,
    render_count: usize,
}

impl DataTable {
    #[must_use]
    pub fn new(registry: WidgetRegistry) -> Self {
        Self {
            registry,
            locale: NumberLocale::default(),
            config: None,
            data: None,
            active_row: None,
            headers: Vec::new(),
            rows: Vec::new(),
            nested: BTreeMap::new(),
            nested_created: 0,
            outbox: Vec::new(),
            render_count: 0,
        }
    }

    #[must_use]
    pub fn with_locale(mut self, locale: NumberLocale) -> Self {
        self.locale = locale;
        self
    }

    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    #[must_use]
    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    #[must_use]
    pub fn records(&self) -> &[Record] {
        self.data.as_deref().unwrap_or_default()
    }

    #[must_use]
    pub fn config(&self) -> Option<&TableConfig> {
        self.config.as_ref()
    }

    #[must_use]
    pub fn active_row(&self) -> Option<usize> {
        self.active_row
    }

    #[must_use]
    pub fn render_count(&self) -> usize {
        self.render_count
    }

    #[must_use]
    pub fn nested_widget(&self, row: usize, column: usize) -> Option<&Element> {
        self.nested
            .get(&CellKey { row, column })
            .map(|cell| &cell.element)
    }

    #[must_use]
    pub fn nested_widget_count(&self) -> usize {
        self.nested.len()
    }

    /// Number of nested widgets created over the table's lifetime.
    #[must_use]
    pub fn nested_widgets_created(&self) -> usize {
        self.nested_created
    }

    /// Selects row `index`, re-renders, and queues a `rowClicked` notification
    /// carrying the row's record.
    pub fn click_row(&mut self, index: usize) -> DashResult<()> {
        let len = self.rows.len();
        let record = match self.data.as_ref().and_then(|data| data.get(index)) {
            Some(record) if index < len => record.clone(),
            _ => return Err(DashError::RowOutOfRange { index, len }),
        };

        let previous_active = self.active_row.replace(index);
        if let Err(err) = self.update_rows() {
            self.active_row = previous_active;
            return Err(err);
        }
        debug!(row = index, "row clicked");
        self.outbox.push(WidgetEvent::row_clicked(record));
        Ok(())
    }

    fn update_headers(&mut self) {
        self.headers = self
            .config
            .as_ref()
            .map(|config| {
                config
                    .columns
                    .iter()
                    .map(|column| column.label().to_owned())
                    .collect()
            })
            .unwrap_or_default();
    }

    /// Rebuilds every row. Nested cells are reconciled into a fresh map and
    /// committed only when every cell accepted its data; on failure the
    /// previous rows and cells stay in place.
    fn update_rows(&mut self) -> DashResult<()> {
        let (Some(config), Some(data)) = (&self.config, &self.data) else {
            return Ok(());
        };

        let mut previous = std::mem::take(&mut self.nested);
        let mut staged = StagedCells::default();
        let built = build_rows(
            &self.registry,
            self.locale,
            self.active_row,
            config,
            data,
            &mut previous,
            &mut staged,
        );

        match built {
            Ok(rows) => {
                self.nested_created += staged.created;
                self.nested = staged.cells;
                self.rows = rows;
                self.render_count += 1;
                debug!(rows = self.rows.len(), nested = self.nested.len(), "render table rows");
                Ok(())
            }
            Err(err) => {
                for key in staged.reused {
                    let Some(mut cell) = staged.cells.remove(&key) else {
                        continue;
                    };
                    if let Some(TableCell::Widget { data, .. }) = self
                        .rows
                        .get(key.row)
                        .and_then(|row| row.cells.get(key.column))
                    {
                        if let Err(restore_err) = cell.element.set_attribute("data", data.clone()) {
                            warn!(error = %restore_err, row = key.row, "nested cell not restored");
                        }
                    }
                    previous.insert(key, cell);
                }
                self.nested = previous;
                warn!(error = %err, "table update rejected, keeping previous rows");
                Err(err)
            }
        }
    }

    fn column_widths(&self, nested_frames: &BTreeMap<CellKey, RenderFrame>) -> Vec<f64> {
        let mut widths: Vec<f64> = self.headers.iter().map(|label| text_width(label)).collect();
        for (row_index, row) in self.rows.iter().enumerate() {
            for (column_index, cell) in row.cells.iter().enumerate() {
                let content = match cell {
                    TableCell::Text(text) => text_width(text),
                    TableCell::Widget { .. } => nested_frames
                        .get(&CellKey {
                            row: row_index,
                            column: column_index,
                        })
                        .map_or(0.0, |frame| f64::from(frame.viewport.width)),
                };
                if let Some(width) = widths.get_mut(column_index) {
                    *width = width.max(content);
                }
            }
        }
        widths
            .into_iter()
            .map(|width| width + CELL_PADDING_X * 2.0)
            .collect()
    }
}

/// Nested cells built during one row pass.
#[derive(Default)]
struct StagedCells {
    cells: BTreeMap<CellKey, NestedCell>,
    /// Keys whose cell was carried over from the previous pass.
    reused: Vec<CellKey>,
    created: usize,
}

fn build_rows(
    registry: &WidgetRegistry,
    locale: NumberLocale,
    active_row: Option<usize>,
    config: &TableConfig,
    data: &[Record],
    previous: &mut BTreeMap<CellKey, NestedCell>,
    staged: &mut StagedCells,
) -> DashResult<Vec<TableRow>> {
    let mut rows = Vec::with_capacity(data.len());
    for (row_index, record) in data.iter().enumerate() {
        let mut cells = Vec::with_capacity(config.columns.len());
        for (column_index, column) in config.columns.iter().enumerate() {
            let cell = match column {
                ColumnConfig::Data {
                    data_property_name, ..
                } => TableCell::Text(display_value(record.get(data_property_name), locale)),
                ColumnConfig::Component {
                    component_name,
                    component_attributes,
                    data_property_names,
                    ..
                } => {
                    let key = CellKey {
                        row: row_index,
                        column: column_index,
                    };
                    let payload = project_fields(record, data_property_names)?;
                    let tag = component_name.to_ascii_lowercase();
                    let mut cell = match previous.remove(&key) {
                        Some(existing) if existing.tag == tag => {
                            staged.reused.push(key);
                            existing
                        }
                        replaced => {
                            if let Some(replaced) = replaced {
                                previous.insert(key, replaced);
                            }
                            let mut element = registry.create(&tag);
                            for (name, value) in component_attributes {
                                element.set_attribute(name, attribute_string(value))?;
                            }
                            staged.created += 1;
                            NestedCell {
                                tag: tag.clone(),
                                element,
                            }
                        }
                    };
                    let forwarded = cell.element.set_attribute("data", payload.clone());
                    staged.cells.insert(key, cell);
                    forwarded?;
                    TableCell::Widget { tag, data: payload }
                }
            };
            cells.push(cell);
        }
        rows.push(TableRow {
            cells,
            active: active_row == Some(row_index),
        });
    }
    Ok(rows)
}

/// JSON list of the record's values at `fields`; absent fields become `null`.
fn project_fields(record: &Record, fields: &[String]) -> DashResult<String> {
    let values: Vec<&Value> = fields
        .iter()
        .map(|field| record.get(field).unwrap_or(&Value::Null))
        .collect();
    serde_json::to_string(&values)
        .map_err(|err| DashError::InvalidData(format!("failed to encode cell data: {err}")))
}

fn text_width(text: &str) -> f64 {
    text.chars().count() as f64 * FONT_SIZE_PX * CHAR_WIDTH_RATIO
}

fn parse_json<T: serde::de::DeserializeOwned>(attribute: &str, value: &str) -> DashResult<T> {
    serde_json::from_str(value).map_err(|err| DashError::attribute(attribute, err))
}

impl Widget for DataTable {
    fn tag(&self) -> &str {
        DATA_TABLE_TAG
    }

    fn observed_attributes(&self) -> &'static [&'static str] {
        OBSERVED_ATTRIBUTES
    }

    fn attribute_changed(&mut self, change: &AttributeChange<'_>) -> DashResult<()> {
        match change.name {
            "config" => {
                let config: TableConfig = parse_json("config", change.new_value)?;
                let previous_active =
                    std::mem::replace(&mut self.active_row, config.active_row_index);
                let previous = self.config.replace(config);
                self.update_headers();
                if let Err(err) = self.update_rows() {
                    self.config = previous;
                    self.active_row = previous_active;
                    self.update_headers();
                    return Err(err);
                }
                Ok(())
            }
            "data" => {
                let data: Vec<Record> = parse_json("data", change.new_value)?;
                let previous = self.data.replace(data);
                if let Err(err) = self.update_rows() {
                    self.data = previous;
                    return Err(err);
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn lifecycle(&self) -> WidgetLifecycle {
        if self.render_count > 0 {
            WidgetLifecycle::Rendered
        } else if self.config.is_some() || self.data.is_some() {
            WidgetLifecycle::AttributesPartial
        } else {
            WidgetLifecycle::Unattached
        }
    }

    fn render_frame(&self) -> DashResult<RenderFrame> {
        if self.headers.is_empty() && self.rows.is_empty() {
            return Ok(RenderFrame::empty());
        }

        let mut nested_frames = BTreeMap::new();
        for (key, cell) in &self.nested {
            nested_frames.insert(*key, cell.element.render_frame()?);
        }

        let widths = self.column_widths(&nested_frames);
        let total_width: f64 = widths.iter().sum();
        let line_height = FONT_SIZE_PX * LINE_HEIGHT_RATIO;
        let header_height = line_height + CELL_PADDING_Y * 2.0;
        let header_fill = Color::from_rgb8(0xf1, 0xf1, 0xf1);
        let active_fill = Color::from_rgb8(0xfa, 0xfa, 0xfa);
        let border = Color::from_rgb8(0xcc, 0xcc, 0xcc);
        let text_color = Color::BLACK;

        let mut frame = RenderFrame::new(Viewport::new(0, 0));
        frame
            .rects
            .push(RectPrimitive::new(0.0, 0.0, total_width, header_height, header_fill));
        let mut x = 0.0;
        for (label, width) in self.headers.iter().zip(&widths) {
            if !label.is_empty() {
                frame.texts.push(
                    TextPrimitive::new(
                        label.clone(),
                        x + CELL_PADDING_X,
                        CELL_PADDING_Y + FONT_SIZE_PX,
                        FONT_SIZE_PX,
                        text_color,
                        TextHAlign::Left,
                    )
                    .bold(),
                );
            }
            x += width;
        }

        let mut y = header_height;
        for (row_index, row) in self.rows.iter().enumerate() {
            let content_height = row
                .cells
                .iter()
                .enumerate()
                .filter_map(|(column_index, _)| {
                    nested_frames.get(&CellKey {
                        row: row_index,
                        column: column_index,
                    })
                })
                .map(|nested| f64::from(nested.viewport.height))
                .fold(line_height, f64::max);
            let row_height = content_height + CELL_PADDING_Y * 2.0;

            if row.active {
                frame
                    .rects
                    .push(RectPrimitive::new(0.0, y, total_width, row_height, active_fill));
            }

            let mut x = 0.0;
            for (column_index, (cell, width)) in row.cells.iter().zip(&widths).enumerate() {
                match cell {
                    TableCell::Text(text) if !text.is_empty() => {
                        frame.texts.push(TextPrimitive::new(
                            text.clone(),
                            x + CELL_PADDING_X,
                            y + CELL_PADDING_Y + FONT_SIZE_PX,
                            FONT_SIZE_PX,
                            text_color,
                            TextHAlign::Left,
                        ))
                    }
                    TableCell::Text(_) => {}
                    TableCell::Widget { .. } => {
                        let key = CellKey {
                            row: row_index,
                            column: column_index,
                        };
                        if let Some(nested) = nested_frames.get(&key) {
                            frame.append_translated(nested, x + CELL_PADDING_X, y + CELL_PADDING_Y);
                        }
                    }
                }
                x += width;
            }

            y += row_height;
            frame
                .lines
                .push(LinePrimitive::new(0.0, y, total_width, y, 1.0, border));
        }

        frame.viewport = Viewport::from_px(total_width, y);
        Ok(frame)
    }

    fn tick(&mut self, elapsed: Duration) {
        for cell in self.nested.values_mut() {
            cell.element.tick(elapsed);
        }
    }

    /// Own notifications plus composed ones raised inside nested widgets.
    fn drain_events(&mut self) -> Vec<WidgetEvent> {
        let mut events: Vec<WidgetEvent> = self
            .nested
            .values_mut()
            .flat_map(|cell| cell.element.drain_events())
            .filter(WidgetEvent::crosses_scope)
            .collect();
        events.append(&mut self.outbox);
        events
    }
}

impl std::fmt::Debug for DataTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataTable")
            .field("headers", &self.headers)
            .field("rows", &self.rows.len())
            .field("active_row", &self.active_row)
            .field("nested", &self.nested.len())
            .finish()
    }
}
