use std::rc::Rc;

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::error::DashResult;
use crate::render::RenderFrame;
use crate::widgets::{BarChart, DataTable, LineChart, PieChart};

use super::{AttributeChange, Element, FixedWidth, Widget, WidgetLifecycle};

/// Container width handed to pie charts created by tag, e.g. inside a table cell.
pub const NESTED_CONTAINER_WIDTH_PX: f64 = 300.0;

pub type WidgetFactory = Rc<dyn Fn(&WidgetRegistry) -> Box<dyn Widget>>;

/// Maps tag names to widget factories.
///
/// Cloning is cheap; clones share the definitions made so far.
#[derive(Clone, Default)]
pub struct WidgetRegistry {
    factories: Rc<IndexMap<String, WidgetFactory>>,
}

impl WidgetRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every widget this crate ships.
    #[must_use]
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.define(crate::widgets::BAR_CHART_TAG, |_| Box::new(BarChart::new()));
        registry.define(crate::widgets::DATA_TABLE_TAG, |registry| {
            Box::new(DataTable::new(registry.clone()))
        });
        registry.define(crate::widgets::PIE_CHART_TAG, |_| {
            Box::new(PieChart::new(FixedWidth(NESTED_CONTAINER_WIDTH_PX)))
        });
        registry.define(crate::widgets::LINE_CHART_TAG, |_| Box::new(LineChart::new()));
        registry
    }

    /// Defines (or redefines) the factory for `tag`.
    pub fn define(
        &mut self,
        tag: &str,
        factory: impl Fn(&WidgetRegistry) -> Box<dyn Widget> + 'static,
    ) {
        let tag = tag.to_ascii_lowercase();
        debug!(tag = %tag, "define widget");
        Rc::make_mut(&mut self.factories).insert(tag, Rc::new(factory));
    }

    #[must_use]
    pub fn is_defined(&self, tag: &str) -> bool {
        self.factories.contains_key(&tag.to_ascii_lowercase())
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Creates an element for `tag`. Unknown tags yield an inert element that
    /// keeps its attributes and draws nothing.
    #[must_use]
    pub fn create(&self, tag: &str) -> Element {
        let tag = tag.to_ascii_lowercase();
        match self.factories.get(&tag) {
            Some(factory) => Element::from_boxed(factory(self)),
            None => {
                warn!(tag = %tag, "unknown widget tag, creating inert element");
                let inert: Box<dyn Widget> = Box::new(InertWidget::new(tag));
                Element::from_boxed(inert)
            }
        }
    }
}

impl std::fmt::Debug for WidgetRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetRegistry")
            .field("tags", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Placeholder for tags with no registered widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InertWidget {
    tag: String,
}

impl InertWidget {
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }
}

impl Widget for InertWidget {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn observed_attributes(&self) -> &'static [&'static str] {
        &[]
    }

    fn attribute_changed(&mut self, _change: &AttributeChange<'_>) -> DashResult<()> {
        Ok(())
    }

    fn lifecycle(&self) -> WidgetLifecycle {
        WidgetLifecycle::Unattached
    }

    fn render_frame(&self) -> DashResult<RenderFrame> {
        Ok(RenderFrame::empty())
    }
}
