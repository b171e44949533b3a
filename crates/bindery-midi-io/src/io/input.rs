//! midir-backed [`DeviceBackend`].

use midir::{Ignore, MidiInput};

use crate::device::{DeviceBackend, MessageSender, Subscription};
use crate::message::ChannelMessage;
use crate::{Error, Result};

/// Lists and connects to the system's MIDI input ports by name.
#[derive(Debug, Clone)]
pub struct MidirBackend {
    client_name: String,
}

impl MidirBackend {
    pub fn new(client_name: impl Into<String>) -> Self {
        Self {
            client_name: client_name.into(),
        }
    }

    fn client(&self, suffix: &str) -> Result<MidiInput> {
        let mut input = MidiInput::new(&format!("{}-{}", self.client_name, suffix))?;
        input.ignore(Ignore::None);
        Ok(input)
    }
}

impl Default for MidirBackend {
    fn default() -> Self {
        Self::new("bindery")
    }
}

impl DeviceBackend for MidirBackend {
    fn enumerate(&self) -> Result<Vec<String>> {
        let input = self.client("device-list")?;
        let mut names = Vec::new();
        for (index, port) in input.ports().iter().enumerate() {
            match input.port_name(port) {
                Ok(name) => names.push(name),
                Err(e) => tracing::warn!("Skipping input port {}: {}", index, e),
            }
        }
        Ok(names)
    }

    fn subscribe(&mut self, device: &str, sink: MessageSender) -> Result<Subscription> {
        let input = self.client("input")?;
        let port = input
            .ports()
            .into_iter()
            .find(|port| input.port_name(port).is_ok_and(|name| name == device))
            .ok_or_else(|| Error::DeviceNotFound(device.to_string()))?;

        let source = device.to_string();
        let connection = input.connect(
            &port,
            "bindery-input",
            move |_timestamp, bytes, _| match ChannelMessage::from_bytes(bytes) {
                Some(message) => {
                    if sink.try_send(message).is_err() {
                        tracing::debug!("Input queue full, dropping message from {}", source);
                    }
                }
                None => tracing::trace!("Ignoring short message from {}: {:?}", source, bytes),
            },
            (),
        )?;

        Ok(Subscription::new(device, connection))
    }
}
