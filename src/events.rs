//! Notifications raised by widgets and the listeners that observe them.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::Record;
use crate::error::{DashError, DashResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WidgetEventKind {
    /// A data-table row was clicked; detail is the full row record.
    RowClicked,
}

impl WidgetEventKind {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::RowClicked => "rowClicked",
        }
    }
}

/// Notification emitted by a widget.
///
/// `bubbles` events reach the document; `composed` events also cross the
/// isolated scope of a nested widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetEvent {
    pub kind: WidgetEventKind,
    pub bubbles: bool,
    pub composed: bool,
    pub detail: Record,
}

impl WidgetEvent {
    #[must_use]
    pub fn row_clicked(detail: Record) -> Self {
        Self {
            kind: WidgetEventKind::RowClicked,
            bubbles: true,
            composed: true,
            detail,
        }
    }

    /// Whether the event escapes the scope of the widget that raised it.
    #[must_use]
    pub fn crosses_scope(&self) -> bool {
        self.bubbles && self.composed
    }
}

/// Read-only dashboard state passed to listeners with each event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventContext {
    pub chart_title: Option<String>,
    pub reset_visible: bool,
    pub selected_row: Option<usize>,
    pub dataset_date: Option<String>,
}

/// Observer hook for widget notifications.
///
/// Listeners observe events after the dashboard has reacted to them; they
/// cannot mutate widget state directly.
pub trait EventListener {
    fn id(&self) -> &str;
    fn on_event(&mut self, event: &WidgetEvent, context: &EventContext);
}

#[derive(Default)]
pub struct EventDispatcher {
    listeners: Vec<Box<dyn EventListener>>,
}

impl EventDispatcher {
    pub fn register(&mut self, listener: Box<dyn EventListener>) -> DashResult<()> {
        if self
            .listeners
            .iter()
            .any(|existing| existing.id() == listener.id())
        {
            return Err(DashError::DuplicateListener(listener.id().to_owned()));
        }
        debug!(listener = listener.id(), "register event listener");
        self.listeners.push(listener);
        Ok(())
    }

    /// Removes a listener by id. Returns whether one was removed.
    pub fn unregister(&mut self, id: &str) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|listener| listener.id() != id);
        before != self.listeners.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn dispatch(&mut self, event: &WidgetEvent, context: &EventContext) {
        for listener in &mut self.listeners {
            listener.on_event(event, context);
        }
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field(
                "listeners",
                &self.listeners.iter().map(|l| l.id()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
