//! Observable state changes of the binding manager.

use bindery_core::{Channel, Mode, WidgetId};

/// Published on the manager's event channel after each state change.
///
/// Events are dropped when nobody drains the channel and it fills up.
#[derive(Debug, Clone, PartialEq)]
pub enum BindingEvent {
    ModeChanged(Mode),
    SelectionChanged(Option<WidgetId>),
    Bound {
        channel: Channel,
        widget: WidgetId,
        /// Channel the widget was moved off, if any.
        previous: Option<Channel>,
    },
    Unbound {
        channel: Channel,
        widget: WidgetId,
    },
    DeviceSelected(String),
    /// The active device vanished on re-enumeration. No reconnection is
    /// attempted.
    DeviceLost(String),
    /// A store write failed while handling a message.
    PersistenceFailed(String),
    BindingsLoaded {
        count: usize,
        /// Stored identities with no live widget.
        dropped: Vec<String>,
    },
}
