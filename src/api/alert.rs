use tracing::warn;

/// Receives blocking user-facing warnings, e.g. a failed data load.
pub trait AlertSink {
    fn alert(&mut self, message: &str);
}

/// Emits alerts as `warn!` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAlertSink;

impl AlertSink for LogAlertSink {
    fn alert(&mut self, message: &str) {
        warn!(alert = message, "dashboard alert");
    }
}

/// Collects alerts in memory.
impl AlertSink for Vec<String> {
    fn alert(&mut self, message: &str) {
        self.push(message.to_owned());
    }
}
