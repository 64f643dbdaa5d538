//! Prefix dispatch across verifier families.
//!
//! A credential store may hold verifiers of several formats side by side.
//! The registry resolves a verifier's family once, by prefix, and routes
//! verification to it. New verifiers are always CryptL7.

use std::fmt;

use rand::rngs::OsRng;
use tracing::{debug, warn};

use credential_core::config::CredentialConfig;
use credential_core::error::AppError;

use crate::sha512_crypt;
use crate::verifier::{self, VerifierCodec};

/// A verifier format known to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashFamily {
    /// `$L7H$` CryptL7 verifiers.
    CryptL7,
    /// `$6$` SHA-512-crypt verifiers.
    Sha512Crypt,
}

impl HashFamily {
    /// Every family, in dispatch order.
    pub const ALL: [HashFamily; 2] = [HashFamily::CryptL7, HashFamily::Sha512Crypt];

    /// The prefix that selects this family.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::CryptL7 => verifier::PREFIX,
            Self::Sha512Crypt => sha512_crypt::PREFIX,
        }
    }

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CryptL7 => "CryptL7",
            Self::Sha512Crypt => "SHA-512-crypt",
        }
    }

    /// Resolves the family owning `verifier` by prefix.
    pub fn for_verifier(verifier: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|family| verifier.starts_with(family.prefix()))
    }
}

impl fmt::Display for HashFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Hashes new passwords and verifies stored verifiers of any known family.
#[derive(Debug, Clone)]
pub struct PasswordHasherRegistry {
    /// CryptL7 codec used for new verifiers and `$L7H$` checks.
    codec: VerifierCodec,
    /// Rounds for explicitly requested SHA-512-crypt hashes.
    legacy_rounds: u32,
}

impl PasswordHasherRegistry {
    /// Creates a registry around an existing codec.
    pub fn new(codec: VerifierCodec, legacy_rounds: u32) -> Self {
        Self {
            codec,
            legacy_rounds,
        }
    }

    /// Creates a registry from configuration, failing fast on bad values.
    pub fn from_config(config: &CredentialConfig) -> Result<Self, AppError> {
        let codec = VerifierCodec::new(&config.hashing)?;
        Ok(Self::new(codec, config.legacy.rounds))
    }

    /// The CryptL7 codec.
    pub fn codec(&self) -> &VerifierCodec {
        &self.codec
    }

    /// Prefix of newly created verifiers.
    pub fn prefix(&self) -> &'static str {
        self.codec.prefix()
    }

    /// Hashes `password` into a new CryptL7 verifier.
    pub fn hash_password(&self, password: &[u8]) -> Result<String, AppError> {
        self.codec.hash_password(password)
    }

    /// Hashes `password` as SHA-512-crypt with a fresh salt.
    ///
    /// Only for interoperability with systems that require `$6$` hashes.
    pub fn hash_legacy_password(&self, password: &[u8]) -> String {
        let salt = sha512_crypt::generate_salt(&mut OsRng, self.legacy_rounds);
        sha512_crypt::crypt(password, &salt)
    }

    /// Resolves the family of `verifier`.
    pub fn resolve(&self, verifier: &str) -> Result<HashFamily, AppError> {
        HashFamily::for_verifier(verifier)
            .ok_or_else(|| AppError::invalid_verifier("Unsupported password verifier prefix"))
    }

    /// Verifies `password` against a stored verifier of any known family.
    ///
    /// Mismatches in every family surface as the same opaque
    /// incorrect-password error.
    pub fn verify_password(&self, password: &[u8], verifier: &str) -> Result<(), AppError> {
        let family = self.resolve(verifier).inspect_err(|_| {
            warn!("Rejected verifier with unknown prefix");
        })?;
        debug!(family = %family, "Verifying password");

        match family {
            HashFamily::CryptL7 => self.codec.verify_password(password, verifier),
            HashFamily::Sha512Crypt => {
                if !sha512_crypt::verify_hash_text_format(verifier) {
                    return Err(AppError::invalid_verifier(
                        "Malformed SHA-512-crypt verifier",
                    ));
                }
                if sha512_crypt::verify_password(password, verifier) {
                    Ok(())
                } else {
                    Err(AppError::incorrect_password())
                }
            }
        }
    }

    /// Returns whether `verifier` is well formed for some known family.
    pub fn is_verifier_recognized(&self, verifier: &str) -> bool {
        match HashFamily::for_verifier(verifier) {
            Some(HashFamily::CryptL7) => self.codec.is_verifier_recognized(verifier),
            Some(HashFamily::Sha512Crypt) => sha512_crypt::verify_hash_text_format(verifier),
            None => false,
        }
    }

    /// Returns whether `verifier` should be replaced by a fresh CryptL7
    /// verifier at the configured work factor.
    pub fn needs_rehash(&self, verifier: &str) -> bool {
        match HashFamily::for_verifier(verifier) {
            Some(HashFamily::CryptL7) => self.codec.needs_rehash(verifier),
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEGACY: &str = "$6$saltstring$svn8UoSVapNtMuq1ukKS4tPQd8iKwSMHWjl/O817G3uBnIFNjnQJuesI68u4OTLiBFdcbYEdFCoEOfaS35inz1";

    fn registry() -> PasswordHasherRegistry {
        let mut config = CredentialConfig::default();
        config.hashing.default_work_factor = 3;
        config.legacy.rounds = 1000;
        PasswordHasherRegistry::from_config(&config).unwrap()
    }

    #[test]
    fn test_family_resolution() {
        assert_eq!(HashFamily::for_verifier("$L7H$abc$def"), Some(HashFamily::CryptL7));
        assert_eq!(HashFamily::for_verifier(LEGACY), Some(HashFamily::Sha512Crypt));
        assert_eq!(HashFamily::for_verifier("$2y$05$abc"), None);
        assert_eq!(HashFamily::for_verifier(""), None);
    }

    #[test]
    fn test_new_verifiers_are_cryptl7() {
        let registry = registry();
        let verifier = registry.hash_password(b"Secret#1").unwrap();
        assert!(verifier.starts_with(registry.prefix()));
        assert!(registry.verify_password(b"Secret#1", &verifier).is_ok());
        assert!(!registry.needs_rehash(&verifier));
    }

    #[test]
    fn test_legacy_dispatch() {
        let registry = registry();
        assert!(registry.verify_password(b"Hello world!", LEGACY).is_ok());
        let err = registry.verify_password(b"hello world!", LEGACY).unwrap_err();
        assert!(err.is_incorrect_password());
        assert!(registry.is_verifier_recognized(LEGACY));
        assert!(registry.needs_rehash(LEGACY));
    }

    #[test]
    fn test_legacy_hashing() {
        let registry = registry();
        let verifier = registry.hash_legacy_password(b"Secret#1");
        assert!(verifier.starts_with("$6$rounds=1000$"));
        assert!(registry.verify_password(b"Secret#1", &verifier).is_ok());
    }

    #[test]
    fn test_unknown_and_malformed_are_format_errors() {
        let registry = registry();
        let unknown = registry.verify_password(b"pw", "$2y$05$abcdef").unwrap_err();
        assert!(unknown.is_hashing_error());
        assert!(!registry.is_verifier_recognized("$2y$05$abcdef"));

        let malformed = registry.verify_password(b"pw", "$6$salt$short").unwrap_err();
        assert!(malformed.is_hashing_error());
        assert!(!malformed.is_incorrect_password());
    }
}
