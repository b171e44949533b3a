//! Device registry: tracks the enumerated devices and the single active one.

use std::sync::Arc;

use arc_swap::ArcSwap;

use super::{DeviceBackend, DeviceInfo, MessageSender, Subscription};
use crate::{Error, Result};

/// Enumerates devices and keeps exactly one of them subscribed.
///
/// Messages from the active device go to the sink handed to [`new`](Self::new).
/// Before [`discover`](Self::discover) nothing is active and nothing arrives.
pub struct DeviceRegistry {
    backend: Box<dyn DeviceBackend>,
    sink: MessageSender,
    devices: Vec<String>,
    subscription: Option<Subscription>,
    /// Case-insensitive name fragment preferred on discovery.
    preferred: Option<String>,
    /// Active device name, readable without `&mut` access.
    active_name: Arc<ArcSwap<Option<String>>>,
}

impl DeviceRegistry {
    pub fn new(backend: Box<dyn DeviceBackend>, sink: MessageSender) -> Self {
        Self {
            backend,
            sink,
            devices: Vec::new(),
            subscription: None,
            preferred: None,
            active_name: Arc::new(ArcSwap::from_pointee(None)),
        }
    }

    pub fn with_preferred(mut self, preferred: Option<String>) -> Self {
        self.preferred = preferred;
        self
    }

    /// Enumerate devices and activate the preferred one, else the first.
    ///
    /// Finding no devices is not an error; nothing becomes active.
    pub fn discover(&mut self) -> Result<()> {
        self.devices = self.backend.enumerate()?;
        tracing::debug!("Discovered {} input device(s)", self.devices.len());

        let preferred = self.preferred.as_deref().map(str::to_lowercase);
        let chosen = preferred
            .and_then(|p| {
                self.devices
                    .iter()
                    .position(|d| d.to_lowercase().contains(&p))
            })
            .or(if self.devices.is_empty() { None } else { Some(0) });

        match chosen {
            Some(index) => {
                let name = self.devices[index].clone();
                self.activate(&name)
            }
            None => {
                self.deactivate();
                tracing::info!("No input devices available");
                Ok(())
            }
        }
    }

    /// Switch the active device.
    ///
    /// An unknown name leaves the current subscription in place.
    pub fn select_device(&mut self, name: &str) -> Result<()> {
        if !self.devices.iter().any(|d| d == name) {
            return Err(Error::DeviceNotFound(name.to_string()));
        }
        self.activate(name)
    }

    fn activate(&mut self, name: &str) -> Result<()> {
        // Old device stops delivering before the new one starts
        if let Some(previous) = self.subscription.take() {
            tracing::debug!("Unsubscribed from {}", previous.device());
        }
        self.active_name.store(Arc::new(None));

        let subscription = self
            .backend
            .subscribe(name, self.sink.clone())
            .map_err(|e| match e {
                // Listed at the last enumeration but gone now
                Error::DeviceNotFound(name) => Error::Disconnected(name),
                other => other,
            })?;
        self.subscription = Some(subscription);
        self.active_name.store(Arc::new(Some(name.to_string())));
        tracing::info!("Listening to input device {}", name);
        Ok(())
    }

    /// Drop the active subscription.
    pub fn deactivate(&mut self) {
        if let Some(previous) = self.subscription.take() {
            tracing::debug!("Unsubscribed from {}", previous.device());
        }
        self.active_name.store(Arc::new(None));
    }

    /// Re-enumerate. If the active device has disappeared it is deactivated
    /// and its name returned. No reconnection is attempted.
    pub fn refresh(&mut self) -> Result<Option<String>> {
        self.devices = self.backend.enumerate()?;
        let lost = match self.active() {
            Some(active) if !self.devices.iter().any(|d| *d == active) => Some(active),
            _ => None,
        };
        if let Some(ref name) = lost {
            tracing::warn!("Input device {} disappeared", name);
            self.deactivate();
        }
        Ok(lost)
    }

    pub fn active(&self) -> Option<String> {
        self.active_name.load().as_ref().clone()
    }

    /// Shared view of the active device name for other threads.
    pub fn active_handle(&self) -> Arc<ArcSwap<Option<String>>> {
        Arc::clone(&self.active_name)
    }

    pub fn is_connected(&self) -> bool {
        self.subscription.is_some()
    }

    /// Devices in discovery order, the active one flagged.
    pub fn devices(&self) -> Vec<DeviceInfo> {
        let active = self.active();
        self.devices
            .iter()
            .enumerate()
            .map(|(index, name)| DeviceInfo {
                index,
                name: name.clone(),
                is_active: active.as_deref() == Some(name.as_str()),
            })
            .collect()
    }
}

impl std::fmt::Debug for DeviceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceRegistry")
            .field("devices", &self.devices)
            .field("active", &self.active())
            .finish()
    }
}
