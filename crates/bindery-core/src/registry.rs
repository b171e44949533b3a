//! Widget registry
//!
//! Widgets register on creation and deregister on destruction. Everything
//! else holds a [`WidgetId`] and looks the widget up here, so a destroyed
//! widget shows up as a lookup miss instead of a dangling reference.

use dashmap::DashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::widget::Widget;

/// Session-stable handle to a registered widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(u64);

impl WidgetId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

struct Entry {
    widget: Arc<dyn Widget>,
    /// Generated `"<kind>-<n>"` id, used when no explicit id is set.
    internal_id: String,
}

/// Thread-safe registry of eligible widgets. Clones share the same entries.
#[derive(Clone)]
pub struct WidgetRegistry {
    entries: Arc<DashMap<WidgetId, Entry>>,
    kind_counters: Arc<DashMap<String, u64>>,
    next_id: Arc<AtomicU64>,
}

impl WidgetRegistry {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            kind_counters: Arc::new(DashMap::new()),
            next_id: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Register a widget and return its handle.
    ///
    /// The generated internal id counts per kind in registration order, so it
    /// stays stable across sessions as long as widgets are created in the same
    /// order.
    pub fn register(&self, widget: Arc<dyn Widget>) -> WidgetId {
        let id = WidgetId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let internal_id = {
            let mut counter = self
                .kind_counters
                .entry(widget.kind().to_string())
                .or_insert(0);
            let n = *counter;
            *counter += 1;
            format!("{}-{}", widget.kind(), n)
        };

        tracing::debug!(
            "Registered widget {} ({})",
            id,
            widget.explicit_id().unwrap_or(internal_id.as_str())
        );
        self.entries.insert(
            id,
            Entry {
                widget,
                internal_id,
            },
        );
        id
    }

    pub fn deregister(&self, id: WidgetId) -> Option<Arc<dyn Widget>> {
        let removed = self.entries.remove(&id).map(|(_, entry)| entry.widget);
        if removed.is_some() {
            tracing::debug!("Deregistered widget {}", id);
        }
        removed
    }

    pub fn get(&self, id: WidgetId) -> Option<Arc<dyn Widget>> {
        self.entries.get(&id).map(|entry| Arc::clone(&entry.widget))
    }

    pub fn contains(&self, id: WidgetId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Persisted identity: explicit id if set, else the generated one.
    pub fn identity(&self, id: WidgetId) -> Option<String> {
        self.entries.get(&id).map(|entry| {
            entry
                .widget
                .explicit_id()
                .map(str::to_string)
                .unwrap_or_else(|| entry.internal_id.clone())
        })
    }

    pub fn internal_id(&self, id: WidgetId) -> Option<String> {
        self.entries.get(&id).map(|entry| entry.internal_id.clone())
    }

    /// Every live widget whose explicit or internal id equals `identity`, in
    /// registration order. Explicit ids are not required to be unique.
    pub fn resolve(&self, identity: &str) -> Vec<WidgetId> {
        let mut ids: Vec<WidgetId> = self
            .entries
            .iter()
            .filter(|entry| {
                entry.widget.explicit_id() == Some(identity) || entry.internal_id == identity
            })
            .map(|entry| *entry.key())
            .collect();
        ids.sort_unstable();
        ids
    }

    /// All registered handles in registration order.
    pub fn ids(&self) -> Vec<WidgetId> {
        let mut ids: Vec<WidgetId> = self.entries.iter().map(|entry| *entry.key()).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for WidgetRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for WidgetRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetRegistry")
            .field("num_widgets", &self.entries.len())
            .finish()
    }
}
