//! Input device discovery and switching.

mod registry;
mod virtual_backend;

pub use registry::DeviceRegistry;
pub use virtual_backend::VirtualBackend;

use crossbeam_channel::Sender;
use serde::Serialize;

use crate::message::ChannelMessage;
use crate::Result;

/// Where a subscribed device delivers parsed messages.
pub type MessageSender = Sender<ChannelMessage>;

/// An enumerated input device as shown in a device menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    pub index: usize,
    pub name: String,
    pub is_active: bool,
}

/// Live connection to one device. Dropping it unsubscribes.
pub struct Subscription {
    device: String,
    _guard: Box<dyn Send>,
}

impl Subscription {
    pub fn new(device: impl Into<String>, guard: impl Send + 'static) -> Self {
        Self {
            device: device.into(),
            _guard: Box::new(guard),
        }
    }

    pub fn device(&self) -> &str {
        &self.device
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("device", &self.device)
            .finish()
    }
}

/// Source of input devices.
pub trait DeviceBackend: Send {
    /// Names of the currently available devices, in backend order.
    fn enumerate(&self) -> Result<Vec<String>>;

    /// Start delivering messages from `device` into `sink`.
    fn subscribe(&mut self, device: &str, sink: MessageSender) -> Result<Subscription>;
}
