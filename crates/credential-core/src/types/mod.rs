//! Shared domain types consumed by the hashing and policy crates.

pub mod id;
pub mod password_change;
pub mod role;
pub mod user;

pub use id::UserId;
pub use password_change::PasswordChangeRecord;
pub use role::{Role, RoleTag};
pub use user::UserAccount;
