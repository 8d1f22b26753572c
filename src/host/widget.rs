use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::DashResult;
use crate::events::WidgetEvent;
use crate::render::RenderFrame;

/// Where a widget instance stands in its attribute-driven lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WidgetLifecycle {
    /// No observed attribute has been supplied yet.
    Unattached,
    /// Some required attributes are present, others are still missing.
    AttributesPartial,
    /// At least one full render has happened.
    Rendered,
}

/// One observed attribute mutation forwarded by the host element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeChange<'a> {
    /// Lower-cased attribute name.
    pub name: &'a str,
    pub old_value: Option<&'a str>,
    pub new_value: &'a str,
}

/// Attribute-reactive rendering unit.
///
/// Hosts never call `attribute_changed` for names outside
/// `observed_attributes`; `Element` enforces that.
pub trait Widget {
    fn tag(&self) -> &str;

    /// Lower-cased names of the attributes this widget reacts to.
    fn observed_attributes(&self) -> &'static [&'static str];

    fn attribute_changed(&mut self, change: &AttributeChange<'_>) -> DashResult<()>;

    fn lifecycle(&self) -> WidgetLifecycle;

    /// Projects the current scene into drawing primitives, in local coordinates.
    fn render_frame(&self) -> DashResult<RenderFrame>;

    /// Advances running animations by `elapsed` on the host clock.
    fn tick(&mut self, _elapsed: Duration) {}

    /// Takes the notifications raised since the last call.
    fn drain_events(&mut self) -> Vec<WidgetEvent> {
        Vec::new()
    }
}
