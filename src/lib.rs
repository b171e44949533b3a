//! # Bindery - Control-Surface Learn & Routing
//!
//! Binds incoming device channels to on-screen controls by demonstration and
//! routes later messages on those channels to every bound control.
//!
//! ## Architecture
//!
//! Bindery is an umbrella crate that coordinates:
//! - **bindery-core** - Widget contract and registry, binding table, overlay
//!   projection, persistence
//! - **bindery-midi-io** - Message parsing, device discovery and switching
//!
//! ## Quick Start
//!
//! ```ignore
//! use bindery::prelude::*;
//!
//! let registry = WidgetRegistry::new();
//! let gain = registry.register(Arc::new(Slider::new().with_id("gain")));
//!
//! let mut manager = BindingManager::builder()
//!     .registry(registry.clone())
//!     .build()?;
//! manager.discover()?;
//! manager.ready()?;
//!
//! // Learn: select a control, then move a knob
//! manager.toggle_mode();
//! manager.click(gain);
//! manager.pump();
//!
//! // Play
//! manager.toggle_mode();
//! manager.pump();
//! ```
//!
//! ## Feature Flags
//!
//! - `default` - Core runtime with the in-process device backend
//! - `midi-hardware` - Hardware MIDI input (midir)

/// Re-export of bindery-core for direct access
pub use bindery_core as core;

/// Re-export of bindery-midi-io for direct access
pub use bindery_midi_io as midi;

pub use bindery_core::{
    Bang, BinderConfig, BindingStore, BindingTable, Button, Channel, ChannelTag, FileStore,
    InputCapability, LayerColor, MemoryStore, Mode, Overlay, OverlaySlot, Palette, Slider,
    Toggle, Widget, WidgetEvent, WidgetEventKind, WidgetId, WidgetRegistry,
};

pub use bindery_midi_io::{ChannelMessage, DeviceBackend, DeviceInfo, MessageKind, VirtualBackend};

#[cfg(feature = "midi-hardware")]
pub use bindery_midi_io::MidirBackend;

mod error;
pub use error::{Error, Result};

mod builder;
mod event;
mod manager;
mod panel;

pub use builder::BindingManagerBuilder;
pub use event::BindingEvent;
pub use manager::BindingManager;
pub use panel::BindingRow;

/// Convenience prelude for common imports
pub mod prelude {
    pub use crate::{BindingEvent, BindingManager, BindingManagerBuilder, BindingRow};

    // Widgets
    pub use crate::core::{
        Bang, Button, InputCapability, Slider, Toggle, Widget, WidgetId, WidgetRegistry,
    };

    // Persistence
    pub use crate::core::{FileStore, MemoryStore};

    // Devices
    pub use crate::midi::{ChannelMessage, VirtualBackend};

    pub use std::sync::Arc;
}
