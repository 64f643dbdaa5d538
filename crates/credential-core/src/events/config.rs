//! Live configuration-change notifications.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

/// A change reported by the live configuration source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ConfigEvent {
    /// A single property received a new raw value.
    PropertyChanged {
        /// Dotted property name, e.g. `password.expiry`.
        name: String,
        /// New value as text; parsing is left to the owner of the property.
        value: String,
        /// When the change was observed.
        timestamp: DateTime<Utc>,
    },
}

impl ConfigEvent {
    /// Creates a property change stamped with the current time.
    pub fn property_changed(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::PropertyChanged {
            name: name.into(),
            value: value.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Broadcast channel carrying [`ConfigEvent`]s to any number of listeners.
#[derive(Debug, Clone)]
pub struct ConfigBus {
    /// Sending half; receivers are created on demand.
    sender: broadcast::Sender<ConfigEvent>,
}

impl ConfigBus {
    /// Creates a bus buffering up to `capacity` undelivered events per listener.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribes a new listener.
    pub fn subscribe(&self) -> broadcast::Receiver<ConfigEvent> {
        self.sender.subscribe()
    }

    /// Publishes an event, returning the number of listeners that received it.
    pub fn publish(&self, event: ConfigEvent) -> usize {
        match self.sender.send(event) {
            Ok(count) => count,
            Err(_) => {
                debug!("Config event dropped: no listeners");
                0
            }
        }
    }
}

impl Default for ConfigBus {
    fn default() -> Self {
        Self::new(64)
    }
}
