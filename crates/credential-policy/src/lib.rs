//! # credential-policy
//!
//! Decides whether a candidate password may be adopted and when passwords
//! expire.
//!
//! ## Modules
//!
//! - `validator`: strength rules and the difference-from-current rule
//! - `enforcer`: the ordered STIG compliance check, admin detection, expiry
//! - `settings`: live, atomically swapped policy values and their listener
//! - `expiry`: expiry date arithmetic
//! - `memory`: in-memory role and history directory

pub mod enforcer;
pub mod expiry;
pub mod memory;
pub mod settings;
pub mod validator;

pub use enforcer::PasswordPolicyEnforcer;
pub use expiry::{calc_expiry_date, calc_expiry_millis};
pub use memory::InMemoryDirectory;
pub use settings::LivePolicySettings;
pub use validator::PasswordValidator;
