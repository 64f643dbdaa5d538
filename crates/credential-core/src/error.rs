//! Unified error types for the credential subsystem.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator. Three families never overlap:
//! an incorrect password, a hashing/format/configuration problem, and a
//! policy violation. None of them may carry password or hash bytes.

use std::fmt;
use thiserror::Error;

/// Fixed message for a failed verification. Never varies with the input.
pub const INCORRECT_PASSWORD_MESSAGE: &str = "Incorrect password";

/// Top-level error kind categorization used across the subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// A password did not match its stored verifier.
    IncorrectPassword,
    /// A stored verifier is malformed or carries an unknown prefix.
    InvalidVerifier,
    /// Hashing parameters or configuration values are out of range.
    Configuration,
    /// A candidate password breaks the password policy.
    PolicyViolation,
    /// An external collaborator (role lookup, history store) failed.
    ExternalService,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An I/O error occurred.
    Io,
    /// An internal error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IncorrectPassword => write!(f, "INCORRECT_PASSWORD"),
            Self::InvalidVerifier => write!(f, "INVALID_VERIFIER"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::PolicyViolation => write!(f, "POLICY_VIOLATION"),
            Self::ExternalService => write!(f, "EXTERNAL_SERVICE"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Io => write!(f, "IO"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified error used throughout the credential crates.
///
/// All crate-specific errors are mapped into `AppError` using `From` impls
/// or explicit `.map_err()` calls.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create the opaque verification failure.
    ///
    /// Takes no arguments so that no detail about the mismatch can leak.
    pub fn incorrect_password() -> Self {
        Self::new(ErrorKind::IncorrectPassword, INCORRECT_PASSWORD_MESSAGE)
    }

    /// Create a malformed-verifier error.
    pub fn invalid_verifier(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidVerifier, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create a policy violation carrying a user-facing reason.
    pub fn policy_violation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::PolicyViolation, message)
    }

    /// Create an external-service error.
    pub fn external_service(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ExternalService, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Returns `true` for a verification mismatch.
    pub fn is_incorrect_password(&self) -> bool {
        self.kind == ErrorKind::IncorrectPassword
    }

    /// Returns `true` for a malformed verifier or invalid hashing configuration.
    pub fn is_hashing_error(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::InvalidVerifier | ErrorKind::Configuration
        )
    }

    /// Returns `true` for a password policy violation.
    pub fn is_policy_violation(&self) -> bool {
        self.kind == ErrorKind::PolicyViolation
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Io, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incorrect_password_is_opaque() {
        let err = AppError::incorrect_password();
        assert!(err.is_incorrect_password());
        assert!(!err.is_hashing_error());
        assert!(!err.is_policy_violation());
        assert_eq!(err.to_string(), "INCORRECT_PASSWORD: Incorrect password");
        assert!(std::error::Error::source(&err).is_none());
    }

    #[test]
    fn test_kinds_are_disjoint() {
        let format = AppError::invalid_verifier("bad prefix");
        let config = AppError::configuration("work factor out of range");
        let policy = AppError::policy_violation("too short");

        assert!(format.is_hashing_error() && !format.is_policy_violation());
        assert!(config.is_hashing_error() && !config.is_incorrect_password());
        assert!(policy.is_policy_violation() && !policy.is_hashing_error());
    }

    #[test]
    fn test_clone_drops_source() {
        let io = std::io::Error::other("disk");
        let err = AppError::from(io);
        assert_eq!(err.kind, ErrorKind::Io);
        let cloned = err.clone();
        assert!(cloned.source.is_none());
        assert_eq!(cloned.message, err.message);
    }
}
