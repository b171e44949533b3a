//! In-process device backend.
//!
//! Devices are plain names; [`VirtualBackend::send`] injects raw bytes as if a
//! device had produced them. Used for software control sources and tests.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use super::{DeviceBackend, MessageSender, Subscription};
use crate::message::ChannelMessage;
use crate::{Error, Result};

#[derive(Default)]
struct Inner {
    devices: Vec<String>,
    /// device → (subscription token, sink)
    subscribers: HashMap<String, (u64, MessageSender)>,
    next_token: u64,
}

/// Clones share the same devices and subscribers.
#[derive(Clone, Default)]
pub struct VirtualBackend {
    inner: Arc<Mutex<Inner>>,
}

impl VirtualBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_devices<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let backend = Self::new();
        for name in names {
            backend.add_device(name);
        }
        backend
    }

    pub fn add_device(&self, name: impl Into<String>) {
        let name = name.into();
        let mut inner = self.inner.lock();
        if !inner.devices.contains(&name) {
            inner.devices.push(name);
        }
    }

    /// Unplug a device. Its subscriber stops receiving without being told.
    pub fn remove_device(&self, name: &str) {
        let mut inner = self.inner.lock();
        inner.devices.retain(|d| d != name);
        inner.subscribers.remove(name);
    }

    /// Deliver raw bytes from `device`. Returns true if a subscriber received
    /// a message.
    pub fn send(&self, device: &str, bytes: &[u8]) -> bool {
        let Some(message) = ChannelMessage::from_bytes(bytes) else {
            tracing::debug!("Dropping short message from {}: {:?}", device, bytes);
            return false;
        };
        let inner = self.inner.lock();
        match inner.subscribers.get(device) {
            Some((_, sink)) => sink.try_send(message).is_ok(),
            None => false,
        }
    }

    pub fn is_subscribed(&self, device: &str) -> bool {
        self.inner.lock().subscribers.contains_key(device)
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().subscribers.len()
    }
}

impl DeviceBackend for VirtualBackend {
    fn enumerate(&self) -> Result<Vec<String>> {
        Ok(self.inner.lock().devices.clone())
    }

    fn subscribe(&mut self, device: &str, sink: MessageSender) -> Result<Subscription> {
        let mut inner = self.inner.lock();
        if !inner.devices.iter().any(|d| d == device) {
            return Err(Error::DeviceNotFound(device.to_string()));
        }
        let token = inner.next_token;
        inner.next_token += 1;
        inner
            .subscribers
            .insert(device.to_string(), (token, sink));

        let guard = VirtualGuard {
            inner: Arc::clone(&self.inner),
            device: device.to_string(),
            token,
        };
        Ok(Subscription::new(device, guard))
    }
}

struct VirtualGuard {
    inner: Arc<Mutex<Inner>>,
    device: String,
    token: u64,
}

impl Drop for VirtualGuard {
    fn drop(&mut self) {
        let mut inner = self.inner.lock();
        // A newer subscription to the same device must survive
        if inner
            .subscribers
            .get(&self.device)
            .is_some_and(|(token, _)| *token == self.token)
        {
            inner.subscribers.remove(&self.device);
        }
    }
}
