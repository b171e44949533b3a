//! BindingManager: learns channel bindings and routes messages to widgets.

use crossbeam_channel::{Receiver, Sender};

use bindery_core::{
    BinderConfig, BindingStore, BindingTable, Channel, InputCapability, Mode, OverlayController,
    PersistenceAdapter, WidgetId, WidgetRegistry,
};
use bindery_midi_io::{ChannelMessage, DeviceInfo, DeviceRegistry};

use crate::builder::BindingManagerBuilder;
use crate::event::BindingEvent;
use crate::panel::BindingRow;
use crate::Result;

/// Owns the binding table, mode, selection and active device.
///
/// Driven from a single thread through `&mut self`. Device callbacks only
/// enqueue parsed messages; [`pump`](Self::pump) drains the queue and handles
/// each message to completion before taking the next.
///
/// # Example
///
/// ```ignore
/// use bindery::prelude::*;
///
/// let registry = WidgetRegistry::new();
/// let cutoff = registry.register(Arc::new(Slider::new().with_id("cutoff")));
///
/// let mut manager = BindingManager::builder()
///     .registry(registry.clone())
///     .store(FileStore::default_location()?)
///     .build()?;
/// manager.discover()?;
/// manager.ready()?;
///
/// manager.toggle_mode();
/// manager.click(cutoff);
/// // Move a knob, then
/// manager.pump();
/// manager.toggle_mode();
/// ```
pub struct BindingManager {
    config: BinderConfig,
    registry: WidgetRegistry,
    table: BindingTable,
    mode: Mode,
    selection: Option<WidgetId>,
    /// Widgets with a click route, snapshotted on entering assign mode.
    eligible: Vec<WidgetId>,
    overlay: OverlayController,
    adapter: PersistenceAdapter,
    store: Box<dyn BindingStore>,
    devices: DeviceRegistry,
    messages: Receiver<ChannelMessage>,
    event_tx: Sender<BindingEvent>,
    event_rx: Receiver<BindingEvent>,
    ready: bool,
}

impl BindingManager {
    pub fn builder() -> BindingManagerBuilder {
        BindingManagerBuilder::default()
    }

    pub(crate) fn from_parts(
        config: BinderConfig,
        registry: WidgetRegistry,
        store: Box<dyn BindingStore>,
        devices: DeviceRegistry,
        messages: Receiver<ChannelMessage>,
        event_tx: Sender<BindingEvent>,
        event_rx: Receiver<BindingEvent>,
    ) -> Self {
        let overlay = OverlayController::new(config.palette.clone(), config.tag_prefix.clone());
        let adapter = PersistenceAdapter::new(config.storage_key.clone());
        Self {
            config,
            registry,
            table: BindingTable::new(),
            mode: Mode::Run,
            selection: None,
            eligible: Vec::new(),
            overlay,
            adapter,
            store,
            devices,
            messages,
            event_tx,
            event_rx,
            ready: false,
        }
    }

    pub fn config(&self) -> &BinderConfig {
        &self.config
    }

    pub fn registry(&self) -> &WidgetRegistry {
        &self.registry
    }

    pub fn table(&self) -> &BindingTable {
        &self.table
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn selection(&self) -> Option<WidgetId> {
        self.selection
    }

    pub fn overlay(&self) -> &OverlayController {
        &self.overlay
    }

    /// True once [`ready`](Self::ready) has loaded the stored bindings.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Receiver for [`BindingEvent`]s. Clones share one queue.
    pub fn events(&self) -> Receiver<BindingEvent> {
        self.event_rx.clone()
    }

    fn emit(&self, event: BindingEvent) {
        if self.event_tx.try_send(event).is_err() {
            tracing::trace!("Event queue full, dropping event");
        }
    }

    // =========================================================================
    // Startup
    // =========================================================================

    /// Load stored bindings. Call once every bindable widget is registered.
    ///
    /// Messages drained before this are discarded. A record that cannot be
    /// read or parsed is reported as an error; the manager still becomes
    /// ready with an empty table, and the next mutation overwrites it.
    pub fn ready(&mut self) -> Result<usize> {
        if self.ready {
            return Ok(self.table.len());
        }
        self.ready = true;

        let loaded = self.adapter.load(self.store.as_ref(), &self.registry)?;
        let Some(loaded) = loaded else {
            self.emit(BindingEvent::BindingsLoaded {
                count: 0,
                dropped: Vec::new(),
            });
            return Ok(0);
        };

        self.table = loaded.table;
        let count = self.table.len();
        tracing::info!(
            "Loaded {} binding(s), dropped {} missing widget(s)",
            count,
            loaded.dropped.len()
        );
        if self.mode == Mode::Assign {
            self.overlay
                .draw_assign(&self.registry, &self.eligible, &self.table, self.selection);
        }
        self.emit(BindingEvent::BindingsLoaded {
            count,
            dropped: loaded.dropped,
        });
        Ok(count)
    }

    // =========================================================================
    // Mode and selection
    // =========================================================================

    /// Flip between run and assign mode, returning the new mode.
    pub fn toggle_mode(&mut self) -> Mode {
        match self.mode {
            Mode::Run => {
                self.mode = Mode::Assign;
                self.eligible = self.registry.ids();
                self.overlay
                    .draw_assign(&self.registry, &self.eligible, &self.table, None);
            }
            Mode::Assign => {
                self.mode = Mode::Run;
                let had_selection = self.selection.take().is_some();
                self.overlay.strip(&self.registry);
                self.eligible.clear();
                if had_selection {
                    self.emit(BindingEvent::SelectionChanged(None));
                }
            }
        }
        tracing::info!("Entered {} mode", self.mode);
        self.emit(BindingEvent::ModeChanged(self.mode));
        self.mode
    }

    /// Route a click on `widget`. Selects it when in assign mode and the
    /// widget was registered when assign mode was entered.
    pub fn click(&mut self, widget: WidgetId) -> bool {
        if self.mode != Mode::Assign || !self.eligible.contains(&widget) {
            return false;
        }
        if !self.registry.contains(widget) {
            tracing::debug!("Ignoring click on removed widget {}", widget);
            return false;
        }

        let previous = self.selection.replace(widget);
        if let Some(old) = previous.filter(|old| *old != widget) {
            self.overlay
                .refresh_layer(&self.registry, old, &self.table, self.selection);
        }
        self.overlay
            .refresh_layer(&self.registry, widget, &self.table, self.selection);
        if previous != Some(widget) {
            self.emit(BindingEvent::SelectionChanged(Some(widget)));
        }
        true
    }

    // =========================================================================
    // Message handling
    // =========================================================================

    /// Handle every queued message, returning how many were taken.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(message) = self.messages.try_recv() {
            self.handle_message(message);
            handled += 1;
        }
        handled
    }

    /// Assign in assign mode, dispatch in run mode.
    pub fn handle_message(&mut self, message: ChannelMessage) {
        tracing::trace!(
            "Message {:?} channel {} value {}",
            message.kind(),
            message.channel,
            message.value
        );
        if !self.ready {
            tracing::debug!("Discarding message on channel {} before ready", message.channel);
            return;
        }
        match self.mode {
            Mode::Assign => self.learn(message.channel),
            Mode::Run => self.dispatch(message.channel, message.value),
        }
    }

    fn learn(&mut self, channel: Channel) {
        let Some(widget) = self.selection else {
            return;
        };
        if !self.registry.contains(widget) {
            tracing::debug!("Selected widget {} is gone, ignoring channel {}", widget, channel);
            return;
        }

        let outcome = self.table.assign(channel, widget);
        self.overlay.set_tag(&self.registry, widget, channel);
        self.overlay
            .refresh_layer(&self.registry, widget, &self.table, self.selection);
        self.persist();

        if outcome.changed {
            tracing::debug!("Bound widget {} to channel {}", widget, channel);
            self.emit(BindingEvent::Bound {
                channel,
                widget,
                previous: outcome.previous,
            });
        }
    }

    /// Push `value` to every widget bound to `channel`.
    pub fn dispatch(&self, channel: Channel, value: u8) {
        for id in self.table.widgets_on(channel) {
            let Some(widget) = self.registry.get(id) else {
                continue;
            };
            match widget.capability() {
                InputCapability::Continuous => widget.set_external_value(value),
                InputCapability::Trigger => widget.trigger(),
            }
        }
    }

    /// Save from inside message handling, where no caller can take an error.
    fn persist(&self) {
        if let Err(e) = self.adapter.save(self.store.as_ref(), &self.table, &self.registry) {
            tracing::warn!("Failed to persist bindings: {}", e);
            self.emit(BindingEvent::PersistenceFailed(e.to_string()));
        }
    }

    // =========================================================================
    // Bindings list
    // =========================================================================

    /// Remove one binding. Returns whether it existed.
    ///
    /// The record is rewritten either way.
    pub fn remove_binding(&mut self, channel: Channel, widget: WidgetId) -> Result<bool> {
        let removed = self.table.remove(channel, widget);
        if removed {
            self.overlay.binding_removed(
                &self.registry,
                self.mode,
                widget,
                &self.table,
                self.selection,
            );
        }
        self.adapter
            .save(self.store.as_ref(), &self.table, &self.registry)?;
        if removed {
            tracing::debug!("Unbound widget {} from channel {}", widget, channel);
            self.emit(BindingEvent::Unbound { channel, widget });
        }
        Ok(removed)
    }

    /// One row per live bound widget, by channel then identity.
    pub fn bindings(&self) -> Vec<BindingRow> {
        let mut rows: Vec<BindingRow> = self
            .table
            .iter()
            .flat_map(|(channel, widgets)| {
                widgets.iter().filter_map(move |&widget| {
                    let identity = self.registry.identity(widget)?;
                    Some(BindingRow {
                        channel,
                        widget,
                        identity,
                        label: self.overlay.tag(channel).text,
                    })
                })
            })
            .collect();
        rows.sort_by(|a, b| {
            a.channel
                .cmp(&b.channel)
                .then_with(|| a.identity.cmp(&b.identity))
        });
        rows
    }

    /// Preview `widget` while its row is hovered.
    pub fn hover_enter(&self, widget: WidgetId) {
        self.overlay.hover_enter(&self.registry, widget);
    }

    pub fn hover_exit(&self, widget: WidgetId) {
        self.overlay.hover_exit(
            &self.registry,
            self.mode,
            widget,
            &self.table,
            self.selection,
        );
    }

    /// The stored JSON record for the current table.
    pub fn export_bindings(&self) -> Result<String> {
        Ok(self.adapter.export(&self.table, &self.registry)?)
    }

    // =========================================================================
    // Devices
    // =========================================================================

    /// Enumerate devices and start listening to the preferred or first one.
    pub fn discover(&mut self) -> Result<()> {
        self.devices.discover()?;
        if let Some(name) = self.devices.active() {
            self.emit(BindingEvent::DeviceSelected(name));
        }
        Ok(())
    }

    /// Listen to `name` instead of the current device. An unknown name is an
    /// error and leaves the current device active.
    pub fn select_device(&mut self, name: &str) -> Result<()> {
        self.devices.select_device(name)?;
        if let Some(active) = self.devices.active() {
            self.emit(BindingEvent::DeviceSelected(active));
        }
        Ok(())
    }

    /// Re-enumerate devices. Returns the active device's name if it vanished.
    pub fn refresh_devices(&mut self) -> Result<Option<String>> {
        let lost = self.devices.refresh()?;
        if let Some(ref name) = lost {
            self.emit(BindingEvent::DeviceLost(name.clone()));
        }
        Ok(lost)
    }

    /// Device menu entries in discovery order.
    pub fn devices(&self) -> Vec<DeviceInfo> {
        self.devices.devices()
    }

    pub fn active_device(&self) -> Option<String> {
        self.devices.active()
    }
}

impl std::fmt::Debug for BindingManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BindingManager")
            .field("mode", &self.mode)
            .field("selection", &self.selection)
            .field("bindings", &self.table.len())
            .field("devices", &self.devices)
            .field("ready", &self.ready)
            .finish()
    }
}
