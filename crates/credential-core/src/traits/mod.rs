//! Traits defined in `credential-core` and implemented by the host system.
//!
//! The policy crate reaches role assignments and password history only
//! through these seams.

pub mod history;
pub mod role_lookup;

pub use history::PasswordHistoryStore;
pub use role_lookup::RoleLookup;
