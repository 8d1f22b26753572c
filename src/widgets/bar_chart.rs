//! Horizontal row of proportionally sized color blocks.
//!
//! Observed attributes:
//! - `colors`: comma-separated CSS colors, cycled when there are more bars
//!   than colors; a blank value leaves the chart without colors
//! - `maxwidth`: pixel width of a bar whose value equals `maxval`
//! - `maxval`: data value mapped to the full `maxwidth`
//! - `data`: comma-separated numbers, or a JSON array of values coerced the
//!   way record fields are

use serde_json::Value;
use tracing::{debug, warn};

use crate::core::Viewport;
use crate::error::{DashError, DashResult};
use crate::host::{AttributeChange, Widget, WidgetLifecycle};
use crate::render::{Color, RectPrimitive, RenderFrame};

pub const BAR_CHART_TAG: &str = "bar-chart";
pub const BAR_HEIGHT_PX: f64 = 20.0;

const OBSERVED_ATTRIBUTES: &[&str] = &["colors", "maxwidth", "maxval", "data"];

/// One rendered block. `width_px` keeps whatever the scale produced,
/// negative values included.
#[derive(Debug, Clone, PartialEq)]
pub struct BarBlock {
    pub width_px: i64,
    pub height_px: f64,
    pub color: String,
}

#[derive(Debug, Clone, Default)]
pub struct BarChart {
    colors: Option<Vec<String>>,
    max_width: Option<f64>,
    max_val: Option<f64>,
    data: Option<Vec<f64>>,
    blocks: Vec<BarBlock>,
    render_count: usize,
}

impl BarChart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn blocks(&self) -> &[BarBlock] {
        &self.blocks
    }

    #[must_use]
    pub fn render_count(&self) -> usize {
        self.render_count
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.colors.is_some()
            && self.max_width.is_some()
            && self.max_val.is_some()
            && self.data.is_some()
    }

    /// Width for `value` under the current scale, once both bounds are known.
    #[must_use]
    pub fn x_scale(&self, value: f64) -> Option<i64> {
        Some(bar_width(value, self.max_val?, self.max_width?))
    }

    fn build_chart(&mut self) {
        let (Some(colors), Some(max_val), Some(max_width), Some(data)) =
            (&self.colors, self.max_val, self.max_width, &self.data)
        else {
            return;
        };

        self.blocks = data
            .iter()
            .enumerate()
            .map(|(index, value)| BarBlock {
                width_px: bar_width(*value, max_val, max_width),
                height_px: BAR_HEIGHT_PX,
                color: colors[index % colors.len()].clone(),
            })
            .collect();
        self.render_count += 1;
        debug!(bars = self.blocks.len(), "render bar chart");
    }
}

/// `floor(value / max_val * max_width)`, saturating at the `i64` range.
#[must_use]
pub fn bar_width(value: f64, max_val: f64, max_width: f64) -> i64 {
    ((value / max_val) * max_width).floor() as i64
}

/// Parses bar values from a comma-separated list or a JSON array.
///
/// Blank entries count as zero; a blank attribute yields no bars. JSON
/// entries go through [`coerce_json_value`], so a record field that
/// arrives as a string still draws.
pub fn parse_bar_values(value: &str) -> DashResult<Vec<f64>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    if trimmed.starts_with('[') {
        let values: Vec<Value> = serde_json::from_str(trimmed)
            .map_err(|err| DashError::attribute("data", err))?;
        return Ok(values.iter().map(coerce_json_value).collect());
    }
    trimmed
        .split(',')
        .map(|entry| parse_number("data", entry))
        .collect()
}

/// Numbers pass through, numeric strings are parsed, `null` is zero and
/// booleans are one or zero. Anything else is NaN, which draws no block.
#[must_use]
fn coerce_json_value(value: &Value) -> f64 {
    match value {
        Value::Number(number) => number.as_f64().unwrap_or(f64::NAN),
        Value::String(text) => text.trim().parse::<f64>().unwrap_or(f64::NAN),
        Value::Null => 0.0,
        Value::Bool(flag) => f64::from(u8::from(*flag)),
        Value::Array(_) | Value::Object(_) => f64::NAN,
    }
}

fn parse_number(attribute: &str, entry: &str) -> DashResult<f64> {
    let entry = entry.trim();
    if entry.is_empty() {
        return Ok(0.0);
    }
    entry
        .parse::<f64>()
        .map_err(|err| DashError::attribute(attribute, format!("`{entry}`: {err}")))
}

fn parse_colors(value: &str) -> Option<Vec<String>> {
    let colors: Vec<String> = value
        .split(',')
        .map(str::trim)
        .filter(|color| !color.is_empty())
        .map(str::to_owned)
        .collect();
    (!colors.is_empty()).then_some(colors)
}

impl Widget for BarChart {
    fn tag(&self) -> &str {
        BAR_CHART_TAG
    }

    fn observed_attributes(&self) -> &'static [&'static str] {
        OBSERVED_ATTRIBUTES
    }

    fn attribute_changed(&mut self, change: &AttributeChange<'_>) -> DashResult<()> {
        match change.name {
            "colors" => self.colors = parse_colors(change.new_value),
            "maxwidth" => self.max_width = Some(parse_number("maxwidth", change.new_value)?),
            "maxval" => self.max_val = Some(parse_number("maxval", change.new_value)?),
            "data" => self.data = Some(parse_bar_values(change.new_value)?),
            _ => return Ok(()),
        }
        if self.is_ready() {
            self.build_chart();
        } else {
            debug!(attribute = change.name, "bar chart waiting for attributes");
        }
        Ok(())
    }

    fn lifecycle(&self) -> WidgetLifecycle {
        if self.render_count > 0 {
            WidgetLifecycle::Rendered
        } else if self.colors.is_some()
            || self.max_width.is_some()
            || self.max_val.is_some()
            || self.data.is_some()
        {
            WidgetLifecycle::AttributesPartial
        } else {
            WidgetLifecycle::Unattached
        }
    }

    /// Lays blocks out left to right; blocks with non-positive width take no space.
    fn render_frame(&self) -> DashResult<RenderFrame> {
        let mut rects = Vec::with_capacity(self.blocks.len());
        let mut x = 0.0;
        for block in &self.blocks {
            if block.width_px <= 0 {
                continue;
            }
            let width = block.width_px as f64;
            let color = Color::from_css(&block.color).unwrap_or_else(|err| {
                warn!(error = %err, "bar color not drawable, using transparent");
                Color::TRANSPARENT
            });
            rects.push(RectPrimitive::new(x, 0.0, width, block.height_px, color));
            x += width;
        }

        let mut frame = RenderFrame::new(Viewport::from_px(x, BAR_HEIGHT_PX));
        frame.rects = rects;
        Ok(frame)
    }
}
