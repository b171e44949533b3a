//! Widget capability contract.
//!
//! Any control implementing [`Widget`] is eligible for channel binding. The
//! binding runtime only needs an identity, an overlay slot it may draw into,
//! and one of two input entry points chosen by [`InputCapability`].

mod controls;

pub use controls::{Bang, Button, Slider, Toggle};

use crossbeam_channel::Sender;
use parking_lot::Mutex;

use crate::overlay::{ChannelTag, LayerColor};

/// How a widget accepts values routed from a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputCapability {
    /// Receives the message value through [`Widget::set_external_value`].
    Continuous,
    /// Receives [`Widget::trigger`]; the message value is ignored.
    Trigger,
}

/// A bindable control.
///
/// Methods take `&self`; implementors keep their state behind interior
/// mutability so the registry can hand out shared references.
pub trait Widget: Send + Sync {
    /// Short type name, used to generate identities for widgets without an
    /// explicit id (e.g. `"slider"` → `"slider-0"`).
    fn kind(&self) -> &str;

    /// Explicit, user-assigned id.
    fn explicit_id(&self) -> Option<&str> {
        None
    }

    fn capability(&self) -> InputCapability;

    /// Continuous entry point. Called only for `InputCapability::Continuous`.
    fn set_external_value(&self, _value: u8) {}

    /// Momentary entry point. Called only for `InputCapability::Trigger`.
    fn trigger(&self) {}

    /// Scoped area the overlay controller draws into.
    fn overlay(&self) -> &OverlaySlot;
}

/// Overlay nodes currently attached to a widget.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overlay {
    pub layer: Option<LayerColor>,
    pub tag: Option<ChannelTag>,
}

/// Overlay storage owned by a widget, written only by the overlay controller.
#[derive(Debug, Default)]
pub struct OverlaySlot {
    inner: Mutex<Overlay>,
}

impl OverlaySlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Overlay {
        self.inner.lock().clone()
    }

    pub fn layer(&self) -> Option<LayerColor> {
        self.inner.lock().layer
    }

    pub fn tag(&self) -> Option<ChannelTag> {
        self.inner.lock().tag.clone()
    }

    pub(crate) fn set_layer(&self, layer: Option<LayerColor>) {
        self.inner.lock().layer = layer;
    }

    /// Replace the tag, returning the one that was attached.
    pub(crate) fn replace_tag(&self, tag: Option<ChannelTag>) -> Option<ChannelTag> {
        std::mem::replace(&mut self.inner.lock().tag, tag)
    }

    pub(crate) fn clear(&self) {
        *self.inner.lock() = Overlay::default();
    }
}

/// What a widget reports back out when it changes.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetEventKind {
    Press,
    Release,
    Input(f32),
    Bang,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WidgetEvent {
    /// Identity of the emitting widget (explicit id or kind).
    pub source: String,
    pub kind: WidgetEventKind,
}

/// Optional outgoing event sender shared by the reference controls.
#[derive(Debug, Default)]
pub(crate) struct EventOut {
    sender: Mutex<Option<Sender<WidgetEvent>>>,
}

impl EventOut {
    pub(crate) fn connect(&self, sender: Sender<WidgetEvent>) {
        *self.sender.lock() = Some(sender);
    }

    pub(crate) fn emit(&self, source: &str, kind: WidgetEventKind) {
        if let Some(sender) = self.sender.lock().as_ref() {
            // Receiver gone means nobody listens any more.
            let _ = sender.try_send(WidgetEvent {
                source: source.to_string(),
                kind,
            });
        }
    }
}
