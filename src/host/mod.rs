//! Host-document model: elements carrying attribute maps, the widget contract
//! they drive, the tag registry and container measurement.

mod container;
mod element;
mod registry;
mod widget;

pub use container::{ContainerMetrics, FixedWidth};
pub use element::Element;
pub use registry::{InertWidget, NESTED_CONTAINER_WIDTH_PX, WidgetFactory, WidgetRegistry};
pub use widget::{AttributeChange, Widget, WidgetLifecycle};
