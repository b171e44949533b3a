//! Test helpers and fixtures for Bindery integration tests
//!
//! Every rig runs on the in-process [`VirtualBackend`] and a shared
//! [`MemoryStore`], so a second rig built on the same store plays the part of
//! the next session.

use std::sync::Arc;

use bindery::core::{BindingStore, Error as CoreError, OverlaySlot};
use bindery::prelude::*;
use parking_lot::Mutex;

/// Devices every rig enumerates, in discovery order.
pub const DEVICES: [&str; 2] = ["A", "B"];

pub struct Rig {
    pub manager: BindingManager,
    pub registry: WidgetRegistry,
    pub backend: VirtualBackend,
    pub store: MemoryStore,
}

impl Rig {
    /// Inject a control change from `device` and let the manager handle it.
    pub fn cc(&mut self, device: &str, channel: u8, value: u8) {
        self.backend.send(device, &[0xB0, channel, value]);
        self.manager.pump();
    }

    /// Inject a note-on from `device` and let the manager handle it.
    pub fn note(&mut self, device: &str, channel: u8, value: u8) {
        self.backend.send(device, &[0x90, channel, value]);
        self.manager.pump();
    }

    pub fn events(&self) -> Vec<BindingEvent> {
        self.manager.events().try_iter().collect()
    }

    pub fn stored(&self) -> Option<String> {
        self.store
            .read(self.manager.config().storage_key.as_str())
            .expect("memory store read")
    }
}

pub fn init_logging() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Discovered and ready rig with a fresh registry and store.
pub fn rig() -> Rig {
    rig_with(WidgetRegistry::new(), MemoryStore::new())
}

/// Discovered and ready rig over an existing registry and store.
pub fn rig_with(registry: WidgetRegistry, store: MemoryStore) -> Rig {
    let mut rig = unready_rig_with(registry, store);
    rig.manager.ready().expect("load stored bindings");
    rig
}

/// Discovered rig whose stored bindings have not been loaded yet.
pub fn unready_rig_with(registry: WidgetRegistry, store: MemoryStore) -> Rig {
    init_logging();
    let backend = VirtualBackend::with_devices(DEVICES);
    let mut manager = BindingManager::builder()
        .registry(registry.clone())
        .store(store.clone())
        .backend(backend.clone())
        .build()
        .expect("Failed to build binding manager");
    manager.discover().expect("discover virtual devices");
    Rig {
        manager,
        registry,
        backend,
        store,
    }
}

/// Continuous widget that records every external value it receives.
#[derive(Default)]
pub struct Recorder {
    pub values: Mutex<Vec<u8>>,
    overlay: OverlaySlot,
}

impl Widget for Recorder {
    fn kind(&self) -> &str {
        "recorder"
    }

    fn capability(&self) -> InputCapability {
        InputCapability::Continuous
    }

    fn set_external_value(&self, value: u8) {
        self.values.lock().push(value);
    }

    fn overlay(&self) -> &OverlaySlot {
        &self.overlay
    }
}

/// Store whose writes always fail.
pub struct BrokenStore;

impl BindingStore for BrokenStore {
    fn read(&self, _key: &str) -> bindery::core::Result<Option<String>> {
        Ok(None)
    }

    fn write(&self, _key: &str, _value: &str) -> bindery::core::Result<()> {
        Err(CoreError::Store("disk full".into()))
    }
}

pub fn register<W: Widget + 'static>(registry: &WidgetRegistry, widget: W) -> (WidgetId, Arc<W>) {
    let widget = Arc::new(widget);
    let id = registry.register(widget.clone());
    (id, widget)
}
