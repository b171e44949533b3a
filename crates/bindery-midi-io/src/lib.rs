//! Control-surface input for Bindery.
//!
//! Parses raw device messages into [`ChannelMessage`]s and manages which
//! input device is listened to.
//!
//! Feature gates: `midi-io` (hardware input via midir). The
//! [`VirtualBackend`] is always available for software sources and tests.

pub mod error;
pub use error::{Error, Result};

mod message;
pub use message::{ChannelMessage, MessageKind};

pub mod device;
pub use device::{
    DeviceBackend, DeviceInfo, DeviceRegistry, MessageSender, Subscription, VirtualBackend,
};

#[cfg(feature = "midi-io")]
pub(crate) mod io;

#[cfg(feature = "midi-io")]
pub use io::MidirBackend;
