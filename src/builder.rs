//! Builder for configuring and constructing a `BindingManager`.

use crossbeam_channel::bounded;

use bindery_core::{BinderConfig, BindingStore, MemoryStore, Palette, WidgetRegistry};
use bindery_midi_io::{DeviceBackend, DeviceRegistry};

use crate::{BindingManager, Result};

/// Without an explicit store the manager keeps bindings in memory only; pass
/// a [`FileStore`](bindery_core::FileStore) to persist across sessions.
///
/// The device backend defaults to midir when the `midi-hardware` feature is
/// compiled, else to an empty [`VirtualBackend`](bindery_midi_io::VirtualBackend).
///
/// # Example
///
/// ```ignore
/// use bindery::prelude::*;
///
/// let manager = BindingManager::builder()
///     .tag_prefix("ch")
///     .preferred_device("nanoKONTROL")
///     .store(FileStore::new("/tmp/bindery"))
///     .build()?;
/// ```
#[derive(Default)]
pub struct BindingManagerBuilder {
    config: BinderConfig,
    registry: Option<WidgetRegistry>,
    store: Option<Box<dyn BindingStore>>,
    backend: Option<Box<dyn DeviceBackend>>,
}

impl BindingManagerBuilder {
    /// Replace the whole configuration.
    pub fn config(mut self, config: BinderConfig) -> Self {
        self.config = config;
        self
    }

    /// Default: `"bindery-bindings"`
    pub fn storage_key(mut self, key: impl Into<String>) -> Self {
        self.config.storage_key = key.into();
        self
    }

    pub fn palette(mut self, palette: Palette) -> Self {
        self.config.palette = palette;
        self
    }

    /// Default: `"cc"`
    pub fn tag_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.tag_prefix = prefix.into();
        self
    }

    pub fn preferred_device(mut self, name: impl Into<String>) -> Self {
        self.config.preferred_device = Some(name.into());
        self
    }

    /// Default: 1024
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.config.queue_capacity = capacity;
        self
    }

    /// Registry the bindable widgets register into. A fresh one is created
    /// if none is given.
    pub fn registry(mut self, registry: WidgetRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn store(mut self, store: impl BindingStore + 'static) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    pub fn backend(mut self, backend: impl DeviceBackend + 'static) -> Self {
        self.backend = Some(Box::new(backend));
        self
    }

    pub fn build(self) -> Result<BindingManager> {
        self.config.validate()?;

        let (message_tx, message_rx) = bounded(self.config.queue_capacity);
        let (event_tx, event_rx) = bounded(self.config.queue_capacity);

        let backend = self.backend.unwrap_or_else(default_backend);
        let devices = DeviceRegistry::new(backend, message_tx)
            .with_preferred(self.config.preferred_device.clone());
        let store = self
            .store
            .unwrap_or_else(|| Box::new(MemoryStore::new()));

        tracing::debug!(
            "Building binding manager (storage key '{}')",
            self.config.storage_key
        );
        Ok(BindingManager::from_parts(
            self.config,
            self.registry.unwrap_or_default(),
            store,
            devices,
            message_rx,
            event_tx,
            event_rx,
        ))
    }
}

#[cfg(feature = "midi-hardware")]
fn default_backend() -> Box<dyn DeviceBackend> {
    Box::new(bindery_midi_io::MidirBackend::default())
}

#[cfg(not(feature = "midi-hardware"))]
fn default_backend() -> Box<dyn DeviceBackend> {
    Box::new(bindery_midi_io::VirtualBackend::new())
}
