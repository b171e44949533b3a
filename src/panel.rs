//! Row model for a bindings list.

use bindery_core::{Channel, WidgetId};
use serde::Serialize;

/// One bound widget, as listed with a remove action and hover preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BindingRow {
    pub channel: Channel,
    #[serde(skip)]
    pub widget: WidgetId,
    /// Persisted identity of the widget.
    pub identity: String,
    /// Tag text, e.g. `"cc 7"`.
    pub label: String,
}
