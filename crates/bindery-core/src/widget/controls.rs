//! Reference controls: slider, button, toggle and bang.
//!
//! These model input semantics only. Rendering belongs to the host UI.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crossbeam_channel::Sender;
use parking_lot::Mutex;

use super::{EventOut, InputCapability, OverlaySlot, Widget, WidgetEvent, WidgetEventKind};

/// Highest 7-bit controller value.
const VALUE_MAX: f32 = 127.0;

macro_rules! common_builders {
    () => {
        pub fn with_id(mut self, id: impl Into<String>) -> Self {
            self.id = Some(id.into());
            self
        }

        /// Publish this control's events on `sender`.
        pub fn connect_events(&self, sender: Sender<WidgetEvent>) {
            self.events.connect(sender);
        }

        fn source(&self) -> &str {
            self.id.as_deref().unwrap_or(self.kind())
        }
    };
}

/// Continuous control mapping 0..=127 onto `[min, max]`.
#[derive(Debug)]
pub struct Slider {
    id: Option<String>,
    min: f32,
    max: f32,
    value: Mutex<f32>,
    overlay: OverlaySlot,
    events: EventOut,
}

impl Slider {
    pub fn new() -> Self {
        Self {
            id: None,
            min: 0.0,
            max: 1.0,
            value: Mutex::new(0.0),
            overlay: OverlaySlot::new(),
            events: EventOut::default(),
        }
    }

    common_builders!();

    pub fn with_range(mut self, min: f32, max: f32) -> Self {
        self.min = min;
        self.max = max;
        *self.value.get_mut() = min;
        self
    }

    pub fn value(&self) -> f32 {
        *self.value.lock()
    }

    /// User interaction: clamp to range, store and report.
    pub fn set_value(&self, value: f32) {
        let (lo, hi) = if self.min <= self.max {
            (self.min, self.max)
        } else {
            (self.max, self.min)
        };
        let value = value.clamp(lo, hi);
        *self.value.lock() = value;
        self.events.emit(self.source(), WidgetEventKind::Input(value));
    }
}

impl Default for Slider {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for Slider {
    fn kind(&self) -> &str {
        "slider"
    }

    fn explicit_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn capability(&self) -> InputCapability {
        InputCapability::Continuous
    }

    fn set_external_value(&self, value: u8) {
        let normalized = value as f32 / VALUE_MAX;
        let mapped = self.min + normalized * (self.max - self.min);
        *self.value.lock() = mapped;
        self.events.emit(self.source(), WidgetEventKind::Input(mapped));
    }

    fn overlay(&self) -> &OverlaySlot {
        &self.overlay
    }
}

/// Momentary push button.
///
/// A non-zero external value presses it (`Press` then `Input(1.0)`); zero
/// releases it, but only if a press was recorded.
#[derive(Debug, Default)]
pub struct Button {
    id: Option<String>,
    pressed: AtomicBool,
    overlay: OverlaySlot,
    events: EventOut,
}

impl Button {
    pub fn new() -> Self {
        Self::default()
    }

    common_builders!();

    pub fn is_pressed(&self) -> bool {
        self.pressed.load(Ordering::Acquire)
    }

    pub fn press(&self) {
        self.pressed.store(true, Ordering::Release);
        self.events.emit(self.source(), WidgetEventKind::Press);
        self.events.emit(self.source(), WidgetEventKind::Input(1.0));
    }

    pub fn release(&self) {
        if self.pressed.swap(false, Ordering::AcqRel) {
            self.events.emit(self.source(), WidgetEventKind::Release);
        }
    }
}

impl Widget for Button {
    fn kind(&self) -> &str {
        "button"
    }

    fn explicit_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn capability(&self) -> InputCapability {
        InputCapability::Continuous
    }

    fn set_external_value(&self, value: u8) {
        if value == 0 {
            self.release();
        } else {
            self.press();
        }
    }

    fn overlay(&self) -> &OverlaySlot {
        &self.overlay
    }
}

/// Two-state switch: non-zero is on, zero is off. Reports only changes.
#[derive(Debug, Default)]
pub struct Toggle {
    id: Option<String>,
    active: AtomicBool,
    overlay: OverlaySlot,
    events: EventOut,
}

impl Toggle {
    pub fn new() -> Self {
        Self::default()
    }

    common_builders!();

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    pub fn set_active(&self, active: bool) {
        if self.active.swap(active, Ordering::AcqRel) != active {
            let value = if active { 1.0 } else { 0.0 };
            self.events.emit(self.source(), WidgetEventKind::Input(value));
        }
    }
}

impl Widget for Toggle {
    fn kind(&self) -> &str {
        "toggle"
    }

    fn explicit_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn capability(&self) -> InputCapability {
        InputCapability::Continuous
    }

    fn set_external_value(&self, value: u8) {
        self.set_active(value != 0);
    }

    fn overlay(&self) -> &OverlaySlot {
        &self.overlay
    }
}

/// Momentary trigger without a value.
#[derive(Debug, Default)]
pub struct Bang {
    id: Option<String>,
    count: AtomicU64,
    overlay: OverlaySlot,
    events: EventOut,
}

impl Bang {
    pub fn new() -> Self {
        Self::default()
    }

    common_builders!();

    /// Number of triggers received so far.
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Acquire)
    }
}

impl Widget for Bang {
    fn kind(&self) -> &str {
        "bang"
    }

    fn explicit_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn capability(&self) -> InputCapability {
        InputCapability::Trigger
    }

    fn trigger(&self) {
        self.count.fetch_add(1, Ordering::AcqRel);
        self.events.emit(self.source(), WidgetEventKind::Bang);
    }

    fn overlay(&self) -> &OverlaySlot {
        &self.overlay
    }
}
