//! Channel binding table.
//!
//! Maps each channel to the set of widgets bound to it. A widget is bound to
//! at most one channel at a time; the reverse index doubles as the
//! "has bindings" set and is kept in lockstep with the forward map.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::registry::WidgetId;

/// Routing key carried by an incoming message (controller or note number).
pub type Channel = u8;

/// Result of [`BindingTable::assign`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignOutcome {
    /// Channel the widget was evicted from, if it was bound elsewhere.
    pub previous: Option<Channel>,
    /// False when the widget was already bound to this channel.
    pub changed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingTable {
    channels: BTreeMap<Channel, BTreeSet<WidgetId>>,
    bound: HashMap<WidgetId, Channel>,
}

impl BindingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `widget` to `channel`, evicting it from any other channel first.
    pub fn assign(&mut self, channel: Channel, widget: WidgetId) -> AssignOutcome {
        let previous = match self.bound.get(&widget) {
            Some(&current) if current == channel => {
                return AssignOutcome {
                    previous: None,
                    changed: false,
                };
            }
            Some(&current) => {
                self.detach(current, widget);
                Some(current)
            }
            None => None,
        };

        self.channels.entry(channel).or_default().insert(widget);
        self.bound.insert(widget, channel);
        AssignOutcome {
            previous,
            changed: true,
        }
    }

    /// Unbind the pair. Returns false (and does nothing) if it was not bound.
    pub fn remove(&mut self, channel: Channel, widget: WidgetId) -> bool {
        if self.bound.get(&widget) != Some(&channel) {
            return false;
        }
        self.detach(channel, widget);
        self.bound.remove(&widget);
        true
    }

    fn detach(&mut self, channel: Channel, widget: WidgetId) {
        if let Some(set) = self.channels.get_mut(&channel) {
            set.remove(&widget);
            if set.is_empty() {
                self.channels.remove(&channel);
            }
        }
    }

    pub fn channel_of(&self, widget: WidgetId) -> Option<Channel> {
        self.bound.get(&widget).copied()
    }

    pub fn has_bindings(&self, widget: WidgetId) -> bool {
        self.bound.contains_key(&widget)
    }

    /// Widgets bound to `channel`, in handle order.
    pub fn widgets_on(&self, channel: Channel) -> impl Iterator<Item = WidgetId> + '_ {
        self.channels
            .get(&channel)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    /// The "has bindings" index.
    pub fn bound_widgets(&self) -> impl Iterator<Item = WidgetId> + '_ {
        self.bound.keys().copied()
    }

    /// `(channel, widgets)` pairs in channel order. Empty channels never appear.
    pub fn iter(&self) -> impl Iterator<Item = (Channel, &BTreeSet<WidgetId>)> + '_ {
        self.channels.iter().map(|(channel, set)| (*channel, set))
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.bound.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bound.is_empty()
    }
}
