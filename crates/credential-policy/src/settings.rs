//! Live policy settings.
//!
//! The expiry period and the STIG switch can change while the process runs.
//! Both live in atomics owned by [`LivePolicySettings`]; the enforcer reads
//! them on every call and a listener task writes them when a
//! [`ConfigEvent`] arrives. Readers may briefly observe the previous value.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use credential_core::config::policy::{DEFAULT_EXPIRY_DAYS, MIN_EXPIRY_DAYS};
use credential_core::config::{PASSWORD_EXPIRY_PROPERTY, PolicyConfig, STIG_ENABLED_PROPERTY};
use credential_core::events::ConfigEvent;

/// Atomically swapped policy values.
#[derive(Debug)]
pub struct LivePolicySettings {
    /// Days until a newly set password expires, always in `[1, 90]`.
    expiry_days: AtomicU32,
    /// Whether STIG checks run.
    stig_enabled: AtomicBool,
}

impl LivePolicySettings {
    /// Creates settings seeded from static configuration.
    pub fn new(expiry_days: u32, stig_enabled: bool) -> Self {
        Self {
            expiry_days: AtomicU32::new(clamp_expiry_days(i64::from(expiry_days))),
            stig_enabled: AtomicBool::new(stig_enabled),
        }
    }

    /// Creates settings from the policy section.
    pub fn from_config(config: &PolicyConfig) -> Self {
        Self::new(config.expiry_days, config.stig_enabled)
    }

    /// Current expiry period in days.
    pub fn expiry_days(&self) -> u32 {
        self.expiry_days.load(Ordering::Relaxed)
    }

    /// Whether STIG checks currently run.
    pub fn stig_enabled(&self) -> bool {
        self.stig_enabled.load(Ordering::Relaxed)
    }

    /// Sets the expiry period from a raw property value.
    ///
    /// Numbers are clamped to `[1, 90]`; anything unparseable reverts to 90.
    /// Returns the value now in effect.
    pub fn set_expiry_days(&self, raw: &str) -> u32 {
        let days = match raw.trim().parse::<i64>() {
            Ok(value) => clamp_expiry_days(value),
            Err(_) => {
                warn!(value = raw, "Invalid password expiry, using default");
                DEFAULT_EXPIRY_DAYS
            }
        };
        self.expiry_days.store(days, Ordering::Relaxed);
        days
    }

    /// Sets the STIG switch from a raw property value.
    ///
    /// Values other than `true`/`false` (any case) leave the switch unchanged.
    /// Returns the value now in effect.
    pub fn set_stig_enabled(&self, raw: &str) -> bool {
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" => self.stig_enabled.store(true, Ordering::Relaxed),
            "false" => self.stig_enabled.store(false, Ordering::Relaxed),
            _ => warn!(value = raw, "Invalid STIG flag, keeping current value"),
        }
        self.stig_enabled()
    }

    /// Applies a property change. Returns `false` if the property is not
    /// owned by the policy layer.
    pub fn apply_property(&self, name: &str, value: &str) -> bool {
        match name {
            PASSWORD_EXPIRY_PROPERTY => {
                let days = self.set_expiry_days(value);
                info!(expiry_days = days, "Password expiry updated");
                true
            }
            STIG_ENABLED_PROPERTY => {
                let enabled = self.set_stig_enabled(value);
                info!(stig_enabled = enabled, "STIG enforcement updated");
                true
            }
            _ => false,
        }
    }

    /// Applies a configuration event.
    pub fn apply_event(&self, event: &ConfigEvent) -> bool {
        match event {
            ConfigEvent::PropertyChanged { name, value, .. } => self.apply_property(name, value),
        }
    }

    /// Spawns a task applying every event received on `events` until the
    /// bus is dropped.
    pub fn spawn_listener(
        self: &Arc<Self>,
        mut events: broadcast::Receiver<ConfigEvent>,
    ) -> JoinHandle<()> {
        let settings = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => {
                        if !settings.apply_event(&event) {
                            debug!(?event, "Ignoring unrelated property change");
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Policy settings listener lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        debug!("Config bus closed, stopping policy settings listener");
                        break;
                    }
                }
            }
        })
    }
}

impl Default for LivePolicySettings {
    fn default() -> Self {
        Self::from_config(&PolicyConfig::default())
    }
}

fn clamp_expiry_days(value: i64) -> u32 {
    let clamped = value.clamp(i64::from(MIN_EXPIRY_DAYS), i64::from(DEFAULT_EXPIRY_DAYS));
    u32::try_from(clamped).unwrap_or(DEFAULT_EXPIRY_DAYS)
}
