//! # credential-core
//!
//! Core crate for the gateway credential subsystem. Contains the unified
//! error system, configuration schemas, typed identifiers, user/role/history
//! domain types, configuration-change events, and the traits through which
//! the hashing and policy crates reach external collaborators.
//!
//! This crate has **no** internal dependencies on other credential crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
