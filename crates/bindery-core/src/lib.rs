//! Core binding runtime for Bindery.
//!
//! Provides the widget capability contract, the widget registry, the channel
//! binding table, the overlay projection and the persistence adapter. Device
//! I/O lives in `bindery-midi-io`; orchestration lives in the `bindery` crate.

pub mod error;
pub use error::{Error, Result};

pub mod config;
pub use config::{BinderConfig, Palette};

pub mod widget;
pub use widget::{
    Bang, Button, InputCapability, Overlay, OverlaySlot, Slider, Toggle, Widget, WidgetEvent,
    WidgetEventKind,
};

pub mod registry;
pub use registry::{WidgetId, WidgetRegistry};

pub mod table;
pub use table::{AssignOutcome, BindingTable, Channel};

pub mod overlay;
pub use overlay::{ChannelTag, LayerColor, Mode, OverlayController};

pub mod store;
pub use store::{
    BindingStore, FileStore, LoadedBindings, MemoryStore, PersistedBindings, PersistenceAdapter,
};
