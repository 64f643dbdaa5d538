//! Events consumed by the credential subsystem.
//!
//! Configuration changes arrive from the host's property source through a
//! broadcast channel; listeners pick out the properties they own.

pub mod config;

pub use config::{ConfigBus, ConfigEvent};
