pub mod format;
pub mod scale;
pub mod types;

pub use format::{NumberLocale, attribute_string, display_value, format_grouped};
pub use scale::LinearScale;
pub use types::{Record, Viewport, number_field, text_field};
