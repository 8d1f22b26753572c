//! Animated pie chart with a legend.
//!
//! Observed attributes:
//! - `chart-title`: text shown above the chart
//! - `data`: JSON array of `{label, value}`
//! - `config`: JSON [`PieChartConfig`]; `colors` are cycled per label,
//!   `categoryLabels` drives the legend

use std::time::Duration;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::f64::consts::TAU;
use tracing::{debug, trace, warn};

use crate::core::{NumberLocale, Viewport, format_grouped};
use crate::error::{DashError, DashResult};
use crate::host::{AttributeChange, ContainerMetrics, Widget, WidgetLifecycle};
use crate::render::{ArcPrimitive, Color, RectPrimitive, RenderFrame, TextHAlign, TextPrimitive};

use super::transition::{ArcAngles, ArcTransition};

pub const PIE_CHART_TAG: &str = "pie-chart";
pub const LEGEND_ELEMENT_HEIGHT: f64 = 20.0;

const OBSERVED_ATTRIBUTES: &[&str] = &["data", "config", "chart-title"];

const LEGEND_RECT_PADDING: f64 = 3.0;
const LEGEND_TEXT_PADDING: f64 = 16.0;
const CHART_PADDING: f64 = 50.0;
const LABEL_BAND_INSET: f64 = 45.0;
const TITLE_FONT_PX: f64 = 18.0;
const TITLE_MARGIN_PX: f64 = 50.0;
const LEGEND_FONT_PX: f64 = 14.0;
const VALUE_FONT_PX: f64 = 14.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieChartConfig {
    pub colors: Vec<String>,
    /// Record field to legend label, in legend order.
    #[serde(rename = "categoryLabels", default)]
    pub category_labels: IndexMap<String, String>,
}

impl PieChartConfig {
    pub fn to_attribute(&self) -> DashResult<String> {
        serde_json::to_string(self)
            .map_err(|err| DashError::InvalidData(format!("failed to encode chart config: {err}")))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieDatum {
    pub label: String,
    #[serde(default)]
    pub value: f64,
}

impl PieDatum {
    #[must_use]
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Arc extents for `values` laid out clockwise from twelve o'clock in input
/// order. Non-positive values get an empty arc.
#[must_use]
pub fn pie_angles(values: &[f64]) -> Vec<ArcAngles> {
    let sum: f64 = values.iter().copied().filter(|v| *v > 0.0).sum();
    let k = if sum > 0.0 { TAU / sum } else { 0.0 };
    let mut angle = 0.0;
    values
        .iter()
        .map(|value| {
            let span = if *value > 0.0 { value * k } else { 0.0 };
            let arc = ArcAngles::new(angle, angle + span);
            angle += span;
            arc
        })
        .collect()
}

/// Chart geometry measured from the container width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieLayout {
    pub width: f64,
    pub height: f64,
    /// Band reserved above the pie for the legend.
    pub margin_top: f64,
    pub radius: f64,
    pub label_radius: f64,
}

impl PieLayout {
    #[must_use]
    pub fn measure(container_width: f64, categories: usize) -> Self {
        let width = if container_width.is_finite() {
            (container_width - CHART_PADDING).max(0.0)
        } else {
            0.0
        };
        let radius = width / 2.0;
        Self {
            width,
            height: width,
            margin_top: categories as f64 * LEGEND_ELEMENT_HEIGHT,
            radius,
            label_radius: (radius - LABEL_BAND_INSET).max(0.0),
        }
    }

    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0 + self.margin_top)
    }

    #[must_use]
    pub fn svg_height(&self) -> f64 {
        self.height + self.margin_top
    }
}

/// Render state of one arc, keyed by its label.
#[derive(Debug, Clone, PartialEq)]
pub struct PieArc {
    pub label: String,
    pub value: f64,
    pub color: Option<String>,
    pub target: ArcAngles,
    current: ArcAngles,
    transition: Option<ArcTransition>,
}

impl PieArc {
    fn entering(datum: &PieDatum, color: Option<String>, target: ArcAngles) -> Self {
        Self {
            label: datum.label.clone(),
            value: datum.value,
            color,
            target,
            current: target,
            transition: None,
        }
    }

    /// Starts a new transition from wherever the arc currently is.
    fn retarget(&mut self, datum: &PieDatum, color: Option<String>, target: ArcAngles) {
        self.value = datum.value;
        self.color = color;
        self.target = target;
        self.transition =
            (self.current != target).then(|| ArcTransition::new(self.current, target));
    }

    fn advance(&mut self, elapsed: Duration) {
        if let Some(transition) = &mut self.transition {
            self.current = transition.advance(elapsed);
            if transition.is_finished() {
                self.transition = None;
            }
        }
    }

    /// Extent drawn right now, mid-animation included.
    #[must_use]
    pub fn current(&self) -> ArcAngles {
        self.current
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    /// Value label anchor relative to the pie centre.
    #[must_use]
    pub fn label_offset(&self, layout: &PieLayout) -> (f64, f64) {
        self.current.centroid(layout.label_radius)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: Option<String>,
}

/// Ordinal color scale: each new key takes the next color, cycling.
#[derive(Debug, Clone, Default)]
struct OrdinalColors {
    range: Vec<String>,
    domain: IndexMap<String, usize>,
}

impl OrdinalColors {
    fn set_range(&mut self, range: Vec<String>) {
        self.range = range;
    }

    fn color_for(&mut self, key: &str) -> Option<String> {
        if self.range.is_empty() {
            return None;
        }
        let next = self.domain.len();
        let index = *self.domain.entry(key.to_owned()).or_insert(next);
        Some(self.range[index % self.range.len()].clone())
    }
}

pub struct PieChart {
    container: Box<dyn ContainerMetrics>,
    locale: NumberLocale,
    title: Option<String>,
    config: Option<PieChartConfig>,
    data: Option<Vec<PieDatum>>,
    colors: OrdinalColors,
    legend: Vec<LegendEntry>,
    layout: PieLayout,
    arcs: SmallVec<[PieArc; 4]>,
    render_count: usize,
}

impl PieChart {
    #[must_use]
    pub fn new(container: impl ContainerMetrics + 'static) -> Self {
        Self {
            container: Box::new(container),
            locale: NumberLocale::default(),
            title: None,
            config: None,
            data: None,
            colors: OrdinalColors::default(),
            legend: Vec::new(),
            layout: PieLayout::measure(0.0, 0),
            arcs: SmallVec::new(),
            render_count: 0,
        }
    }

    #[must_use]
    pub fn with_locale(mut self, locale: NumberLocale) -> Self {
        self.locale = locale;
        self
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    #[must_use]
    pub fn arcs(&self) -> &[PieArc] {
        &self.arcs
    }

    #[must_use]
    pub fn arc(&self, label: &str) -> Option<&PieArc> {
        self.arcs.iter().find(|arc| arc.label == label)
    }

    #[must_use]
    pub fn legend(&self) -> &[LegendEntry] {
        &self.legend
    }

    #[must_use]
    pub fn layout(&self) -> PieLayout {
        self.layout
    }

    #[must_use]
    pub fn render_count(&self) -> usize {
        self.render_count
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.arcs.iter().any(PieArc::is_animating)
    }

    /// Formatted value label of an arc.
    #[must_use]
    pub fn value_label(&self, arc: &PieArc) -> String {
        format_grouped(arc.value, self.locale)
    }

    fn update_legend(&mut self) {
        let Some(config) = &self.config else {
            return;
        };
        let colors = &config.colors;
        self.legend = config
            .category_labels
            .values()
            .enumerate()
            .map(|(index, label)| LegendEntry {
                label: label.clone(),
                color: (!colors.is_empty()).then(|| colors[index % colors.len()].clone()),
            })
            .collect();
        self.colors.set_range(config.colors.clone());
    }

    fn update_chart(&mut self) {
        let (Some(config), Some(data)) = (&self.config, &self.data) else {
            return;
        };

        self.layout = PieLayout::measure(
            self.container.client_width(),
            config.category_labels.len(),
        );

        let values: Vec<f64> = data.iter().map(|datum| datum.value).collect();
        let targets = pie_angles(&values);
        let mut previous: Vec<PieArc> = self.arcs.drain(..).collect();
        let mut next = SmallVec::with_capacity(data.len());

        for (datum, target) in data.iter().zip(targets) {
            let color = self.colors.color_for(&datum.label);
            let arc = match previous.iter().position(|arc| arc.label == datum.label) {
                Some(position) => {
                    let mut arc = previous.remove(position);
                    arc.retarget(datum, color, target);
                    arc
                }
                None => PieArc::entering(datum, color, target),
            };
            next.push(arc);
        }

        self.arcs = next;
        self.render_count += 1;
        debug!(
            arcs = self.arcs.len(),
            removed = previous.len(),
            width = self.layout.width,
            "render pie chart"
        );
    }
}

fn parse_json<T: serde::de::DeserializeOwned>(attribute: &str, value: &str) -> DashResult<T> {
    serde_json::from_str(value).map_err(|err| DashError::attribute(attribute, err))
}

fn css_or_transparent(color: Option<&str>) -> Color {
    match color.map(Color::from_css) {
        Some(Ok(color)) => color,
        Some(Err(err)) => {
            warn!(error = %err, "pie color not drawable, using transparent");
            Color::TRANSPARENT
        }
        None => Color::TRANSPARENT,
    }
}

impl Widget for PieChart {
    fn tag(&self) -> &str {
        PIE_CHART_TAG
    }

    fn observed_attributes(&self) -> &'static [&'static str] {
        OBSERVED_ATTRIBUTES
    }

    fn attribute_changed(&mut self, change: &AttributeChange<'_>) -> DashResult<()> {
        match change.name {
            "config" => {
                self.config = Some(parse_json("config", change.new_value)?);
                self.update_legend();
                self.update_chart();
            }
            "data" => {
                self.data = Some(parse_json("data", change.new_value)?);
                self.update_chart();
            }
            "chart-title" => self.title = Some(change.new_value.to_owned()),
            _ => {}
        }
        Ok(())
    }

    fn lifecycle(&self) -> WidgetLifecycle {
        if self.render_count > 0 {
            WidgetLifecycle::Rendered
        } else if self.config.is_some() || self.data.is_some() || self.title.is_some() {
            WidgetLifecycle::AttributesPartial
        } else {
            WidgetLifecycle::Unattached
        }
    }

    fn tick(&mut self, elapsed: Duration) {
        if !self.is_animating() {
            return;
        }
        for arc in &mut self.arcs {
            arc.advance(elapsed);
        }
        trace!(elapsed_ms = elapsed.as_millis() as u64, "advance pie transitions");
    }

    fn render_frame(&self) -> DashResult<RenderFrame> {
        let title = self.title.as_deref().filter(|title| !title.is_empty());
        if title.is_none() && self.legend.is_empty() && self.arcs.is_empty() {
            return Ok(RenderFrame::empty());
        }

        let mut frame = RenderFrame::new(Viewport::new(0, 0));
        let mut width = self.layout.width;

        if let Some(title) = title {
            frame.texts.push(
                TextPrimitive::new(
                    title.to_uppercase(),
                    0.0,
                    TITLE_MARGIN_PX + TITLE_FONT_PX,
                    TITLE_FONT_PX,
                    Color::BLACK,
                    TextHAlign::Left,
                )
                .bold(),
            );
            width = width.max(title.chars().count() as f64 * TITLE_FONT_PX * 0.6);
        }
        let top = TITLE_MARGIN_PX * 2.0 + TITLE_FONT_PX;

        let step = LEGEND_ELEMENT_HEIGHT + LEGEND_RECT_PADDING;
        for (index, entry) in self.legend.iter().enumerate() {
            let y = top + index as f64 * step;
            frame.rects.push(RectPrimitive::new(
                0.0,
                y,
                LEGEND_ELEMENT_HEIGHT,
                LEGEND_ELEMENT_HEIGHT,
                css_or_transparent(entry.color.as_deref()),
            ));
            if !entry.label.is_empty() {
                let text_x = LEGEND_ELEMENT_HEIGHT + LEGEND_RECT_PADDING;
                frame.texts.push(TextPrimitive::new(
                    entry.label.clone(),
                    text_x,
                    y + LEGEND_TEXT_PADDING,
                    LEGEND_FONT_PX,
                    Color::BLACK,
                    TextHAlign::Left,
                ));
                let text_width = entry.label.chars().count() as f64 * LEGEND_FONT_PX * 0.6;
                width = width.max(text_x + text_width);
            }
        }

        let (cx, cy) = self.layout.center();
        let cy = cy + top;
        for arc in &self.arcs {
            let current = arc.current();
            frame.arcs.push(ArcPrimitive {
                cx,
                cy,
                inner_radius: 0.0,
                outer_radius: self.layout.radius,
                start_angle: current.start,
                end_angle: current.end,
                fill_color: css_or_transparent(arc.color.as_deref()),
                stroke_width: 1.0,
                stroke_color: Color::WHITE,
            });
            let (dx, dy) = arc.label_offset(&self.layout);
            frame.texts.push(
                TextPrimitive::new(
                    self.value_label(arc),
                    cx + dx,
                    cy + dy,
                    VALUE_FONT_PX,
                    Color::BLACK,
                    TextHAlign::Center,
                )
                .bold(),
            );
        }

        let legend_bottom = top + self.legend.len() as f64 * step;
        let height = (top + self.layout.svg_height()).max(legend_bottom);
        frame.viewport = Viewport::from_px(width.max(1.0), height);
        Ok(frame)
    }
}

impl std::fmt::Debug for PieChart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PieChart")
            .field("title", &self.title)
            .field("arcs", &self.arcs)
            .field("legend", &self.legend)
            .field("layout", &self.layout)
            .finish()
    }
}
