//! Binding manager configuration.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Storage key the binding record is written under unless overridden.
pub const DEFAULT_STORAGE_KEY: &str = "bindery-bindings";

/// Overlay colours used while assigning channels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub unbound: String,
    pub bound: String,
    pub selected: String,
    /// Layer opacity, 0.0..=1.0.
    pub opacity: f32,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            unbound: "#4682b4".to_string(),
            bound: "#ffa500".to_string(),
            selected: "#f4e24b".to_string(),
            opacity: 0.3,
        }
    }
}

/// Configuration for the binding manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinderConfig {
    pub storage_key: String,
    pub palette: Palette,
    /// Prefix of the channel tag text, e.g. `"cc"` renders `"cc 7"`.
    pub tag_prefix: String,
    /// Case-insensitive name fragment of the device to activate on discovery.
    pub preferred_device: Option<String>,
    /// Bound of the incoming message queue.
    pub queue_capacity: usize,
}

impl Default for BinderConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            palette: Palette::default(),
            tag_prefix: "cc".to_string(),
            preferred_device: None,
            queue_capacity: 1024,
        }
    }
}

impl BinderConfig {
    pub fn validate(&self) -> Result<()> {
        if self.storage_key.trim().is_empty() {
            return Err(Error::InvalidConfig("storage_key must not be empty".into()));
        }
        if !(0.0..=1.0).contains(&self.palette.opacity) {
            return Err(Error::InvalidConfig(format!(
                "palette opacity {} out of range (0.0-1.0)",
                self.palette.opacity
            )));
        }
        if self.queue_capacity == 0 {
            return Err(Error::InvalidConfig(
                "queue_capacity must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Parse a config from JSON, filling missing fields with defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}
