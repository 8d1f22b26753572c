use std::fmt;
use std::time::Duration;

use indexmap::IndexMap;
use tracing::trace;

use crate::error::DashResult;
use crate::events::WidgetEvent;
use crate::render::RenderFrame;

use super::{AttributeChange, Widget};

/// Host-side element wrapping one widget.
///
/// Stores every attribute it is given (names lower-cased) and forwards only
/// the widget's observed ones.
pub struct Element<W: Widget + ?Sized = dyn Widget> {
    attributes: IndexMap<String, String>,
    widget: Box<W>,
}

impl<W: Widget> Element<W> {
    #[must_use]
    pub fn new(widget: W) -> Self {
        Self::from_boxed(Box::new(widget))
    }
}

impl<W: Widget + ?Sized> Element<W> {
    #[must_use]
    pub fn from_boxed(widget: Box<W>) -> Self {
        Self {
            attributes: IndexMap::new(),
            widget,
        }
    }

    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) -> DashResult<()> {
        let name = name.to_ascii_lowercase();
        let value = value.into();
        let old_value = self.attributes.insert(name.clone(), value.clone());

        let observed = self
            .widget
            .observed_attributes()
            .iter()
            .any(|attribute| *attribute == name);
        if !observed {
            trace!(tag = self.widget.tag(), attribute = %name, "ignore unobserved attribute");
            return Ok(());
        }

        let change = AttributeChange {
            name: &name,
            old_value: old_value.as_deref(),
            new_value: &value,
        };
        self.widget.attribute_changed(&change)
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    #[must_use]
    pub fn tag(&self) -> &str {
        self.widget.tag()
    }

    #[must_use]
    pub fn widget(&self) -> &W {
        &self.widget
    }

    pub fn widget_mut(&mut self) -> &mut W {
        &mut self.widget
    }

    pub fn render_frame(&self) -> DashResult<RenderFrame> {
        self.widget.render_frame()
    }

    pub fn tick(&mut self, elapsed: Duration) {
        self.widget.tick(elapsed);
    }

    pub fn drain_events(&mut self) -> Vec<WidgetEvent> {
        self.widget.drain_events()
    }
}

impl<W: Widget + ?Sized> fmt::Debug for Element<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("tag", &self.widget.tag())
            .field("attributes", &self.attributes)
            .field("lifecycle", &self.widget.lifecycle())
            .finish()
    }
}
