//! Discrete `(type, channel, value)` messages delivered by an input device.

use serde::{Deserialize, Serialize};

/// Message type decoded from the status byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageKind {
    NoteOff,
    NoteOn,
    PolyPressure,
    ControlChange,
    ProgramChange,
    ChannelPressure,
    PitchBend,
    System,
}

/// A three-byte device message.
///
/// `channel` is the routing key: the second byte of the message (controller
/// number for CC, note number for notes). The MIDI channel nibble of the
/// status byte is available through [`midi_channel`](Self::midi_channel) but
/// takes no part in routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelMessage {
    pub status: u8,
    pub channel: u8,
    pub value: u8,
}

impl ChannelMessage {
    pub fn new(status: u8, channel: u8, value: u8) -> Self {
        Self {
            status,
            channel,
            value,
        }
    }

    pub fn control_change(midi_channel: u8, controller: u8, value: u8) -> Self {
        Self::new(0xB0 | (midi_channel & 0x0F), controller, value)
    }

    pub fn note_on(midi_channel: u8, note: u8, velocity: u8) -> Self {
        Self::new(0x90 | (midi_channel & 0x0F), note, velocity)
    }

    pub fn note_off(midi_channel: u8, note: u8, velocity: u8) -> Self {
        Self::new(0x80 | (midi_channel & 0x0F), note, velocity)
    }

    /// Parse raw bytes. Anything shorter than three bytes is rejected; extra
    /// bytes are ignored. Byte values are taken as-is.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [status, channel, value, ..] => Some(Self::new(*status, *channel, *value)),
            _ => None,
        }
    }

    pub fn to_bytes(&self) -> [u8; 3] {
        [self.status, self.channel, self.value]
    }

    pub fn kind(&self) -> MessageKind {
        match self.status & 0xF0 {
            0x80 => MessageKind::NoteOff,
            0x90 => MessageKind::NoteOn,
            0xA0 => MessageKind::PolyPressure,
            0xB0 => MessageKind::ControlChange,
            0xC0 => MessageKind::ProgramChange,
            0xD0 => MessageKind::ChannelPressure,
            0xE0 => MessageKind::PitchBend,
            _ => MessageKind::System,
        }
    }

    /// MIDI channel (0-15) from the status byte.
    pub fn midi_channel(&self) -> u8 {
        self.status & 0x0F
    }
}
