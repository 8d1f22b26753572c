use std::cell::Cell;
use std::rc::Rc;

/// Measures the rendered width of the box hosting a widget.
///
/// Widgets that size themselves from their container query this on every
/// update instead of caching a size.
pub trait ContainerMetrics {
    fn client_width(&self) -> f64;
}

/// Container with a width that never changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedWidth(pub f64);

impl ContainerMetrics for FixedWidth {
    fn client_width(&self) -> f64 {
        self.0
    }
}

/// Shared width cell the host updates on resize.
impl ContainerMetrics for Rc<Cell<f64>> {
    fn client_width(&self) -> f64 {
        self.get()
    }
}
