//! Multi-series line chart used by the country history page.
//!
//! Observed attributes: `config` ([`LineChartConfig`] JSON) and `data`
//! ([`LineChartData`] JSON). Every series shares one vertical scale.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{LinearScale, Viewport};
use crate::error::{DashError, DashResult};
use crate::host::{AttributeChange, Widget, WidgetLifecycle};
use crate::render::{Color, LinePrimitive, RectPrimitive, RenderFrame, TextHAlign, TextPrimitive};

pub const LINE_CHART_TAG: &str = "line-chart";

const OBSERVED_ATTRIBUTES: &[&str] = &["config", "data"];

const LEGEND_HEIGHT_PX: f64 = 24.0;
const LEGEND_SWATCH_PX: f64 = 12.0;
const LEGEND_ITEM_WIDTH_PX: f64 = 110.0;
const AXIS_LABEL_HEIGHT_PX: f64 = 18.0;
const LABEL_FONT_PX: f64 = 11.0;
const SERIES_STROKE_PX: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSeriesConfig {
    pub label: String,
    pub color: String,
}

impl LineSeriesConfig {
    #[must_use]
    pub fn new(label: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            color: color.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineChartConfig {
    pub series: Vec<LineSeriesConfig>,
    pub width: f64,
    pub height: f64,
}

impl Default for LineChartConfig {
    fn default() -> Self {
        Self {
            series: vec![
                LineSeriesConfig::new("Cases", "#FFF"),
                LineSeriesConfig::new("Recovered", "#009688"),
                LineSeriesConfig::new("Deaths", "#f44336"),
            ],
            width: 600.0,
            height: 300.0,
        }
    }
}

impl LineChartConfig {
    pub fn to_attribute(&self) -> DashResult<String> {
        serde_json::to_string(self)
            .map_err(|err| DashError::InvalidData(format!("failed to encode line config: {err}")))
    }
}

/// X-axis labels plus one value list per configured series.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LineChartData {
    pub labels: Vec<String>,
    pub series: Vec<Vec<f64>>,
}

impl LineChartData {
    pub fn to_attribute(&self) -> DashResult<String> {
        serde_json::to_string(self)
            .map_err(|err| DashError::InvalidData(format!("failed to encode line data: {err}")))
    }
}

#[derive(Debug, Clone, Default)]
pub struct LineChart {
    config: Option<LineChartConfig>,
    data: Option<LineChartData>,
    render_count: usize,
}

impl LineChart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn config(&self) -> Option<&LineChartConfig> {
        self.config.as_ref()
    }

    #[must_use]
    pub fn data(&self) -> Option<&LineChartData> {
        self.data.as_ref()
    }

    #[must_use]
    pub fn render_count(&self) -> usize {
        self.render_count
    }

    /// Shared vertical scale over every plotted value.
    pub fn value_scale(&self) -> DashResult<LinearScale> {
        let data = self.data.as_ref().ok_or(DashError::NotLoaded)?;
        LinearScale::from_zero_to_max(data.series.iter().flatten())
    }

    fn plot_area(config: &LineChartConfig) -> (f64, f64, f64, f64) {
        let top = LEGEND_HEIGHT_PX;
        let height = (config.height - LEGEND_HEIGHT_PX - AXIS_LABEL_HEIGHT_PX).max(1.0);
        (0.0, top, config.width.max(1.0), height)
    }
}

fn parse_json<T: serde::de::DeserializeOwned>(attribute: &str, value: &str) -> DashResult<T> {
    serde_json::from_str(value).map_err(|err| DashError::attribute(attribute, err))
}

impl Widget for LineChart {
    fn tag(&self) -> &str {
        LINE_CHART_TAG
    }

    fn observed_attributes(&self) -> &'static [&'static str] {
        OBSERVED_ATTRIBUTES
    }

    fn attribute_changed(&mut self, change: &AttributeChange<'_>) -> DashResult<()> {
        match change.name {
            "config" => self.config = Some(parse_json("config", change.new_value)?),
            "data" => self.data = Some(parse_json("data", change.new_value)?),
            _ => return Ok(()),
        }
        if self.config.is_some() && self.data.is_some() {
            self.render_count += 1;
            debug!(
                points = self.data.as_ref().map_or(0, |data| data.labels.len()),
                "render line chart"
            );
        }
        Ok(())
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
        let (Some(config), Some(data)) = (&self.config, &self.data) else {
            return Ok(RenderFrame::empty());
        };
        if data.labels.is_empty() {
            return Ok(RenderFrame::empty());
        }

        let mut frame = RenderFrame::new(Viewport::from_px(config.width, config.height));
        let (left, top, width, height) = Self::plot_area(config);
        let scale = self.value_scale()?;
        let step = if data.labels.len() > 1 {
            width / (data.labels.len() - 1) as f64
        } else {
            0.0
        };

        for (index, series) in config.series.iter().enumerate() {
            let x = index as f64 * LEGEND_ITEM_WIDTH_PX;
            let color = Color::from_css(&series.color)?;
            frame.rects.push(RectPrimitive::new(
                x,
                (LEGEND_HEIGHT_PX - LEGEND_SWATCH_PX) / 2.0,
                LEGEND_SWATCH_PX,
                LEGEND_SWATCH_PX,
                color,
            ));
            frame.texts.push(TextPrimitive::new(
                series.label.clone(),
                x + LEGEND_SWATCH_PX + 4.0,
                LEGEND_HEIGHT_PX / 2.0 + LABEL_FONT_PX / 2.0,
                LABEL_FONT_PX,
                Color::BLACK,
                TextHAlign::Left,
            ));

            let Some(values) = data.series.get(index) else {
                continue;
            };
            let mut points = Vec::with_capacity(values.len());
            for (point, value) in values.iter().enumerate().take(data.labels.len()) {
                let y = top + height - scale.domain_to_pixel(*value, height)?;
                points.push((left + point as f64 * step, y));
            }
            for pair in points.windows(2) {
                frame.lines.push(LinePrimitive::new(
                    pair[0].0,
                    pair[0].1,
                    pair[1].0,
                    pair[1].1,
                    SERIES_STROKE_PX,
                    color,
                ));
            }
        }

        let baseline = top + height + AXIS_LABEL_HEIGHT_PX - 4.0;
        for (index, label) in data.labels.iter().enumerate() {
            if label.is_empty() {
                continue;
            }
            frame.texts.push(TextPrimitive::new(
                label.clone(),
                left + index as f64 * step,
                baseline,
                LABEL_FONT_PX,
                Color::BLACK,
                TextHAlign::Center,
            ));
        }

        Ok(frame)
    }
}
