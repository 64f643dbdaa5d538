//! Fixed-output digest capability used by the CryptL7 engine.
//!
//! A [`Hasher`] owns mutable digest state and must not be shared between
//! concurrent computations. Create one per call with
//! [`DigestAlgorithm::new_hasher`]; construction is trivial next to the
//! thousands of rounds a single hash performs.

use std::fmt;
use std::str::FromStr;

use sha2::digest::{Digest, FixedOutputReset};
use sha2::{Sha256, Sha384, Sha512};

use credential_core::config::hashing::canonical_digest_name;
use credential_core::error::AppError;

/// A streaming fixed-output digest.
pub trait Hasher: Send {
    /// Canonical algorithm name, e.g. `"SHA-256"`.
    fn algorithm(&self) -> &'static str;

    /// Output size in bytes.
    fn output_size(&self) -> usize;

    /// Feeds `data` into the running digest.
    fn update(&mut self, data: &[u8]);

    /// Returns the digest of everything fed so far and resets the state.
    fn finalize_reset(&mut self) -> Vec<u8>;

    /// One-shot digest of `data`.
    fn digest(&mut self, data: &[u8]) -> Vec<u8> {
        self.update(data);
        self.finalize_reset()
    }
}

/// [`Hasher`] backed by a RustCrypto SHA-2 implementation.
#[derive(Clone)]
pub struct Sha2Hasher<D> {
    /// Running digest state.
    inner: D,
    /// Canonical algorithm name.
    name: &'static str,
}

impl<D: Digest + Default> Sha2Hasher<D> {
    /// Creates a fresh hasher reporting `name` as its algorithm.
    pub fn new(name: &'static str) -> Self {
        Self {
            inner: D::new(),
            name,
        }
    }
}

impl<D> fmt::Debug for Sha2Hasher<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sha2Hasher").field("name", &self.name).finish()
    }
}

impl<D> Hasher for Sha2Hasher<D>
where
    D: Digest + FixedOutputReset + Send,
{
    fn algorithm(&self) -> &'static str {
        self.name
    }

    fn output_size(&self) -> usize {
        <D as Digest>::output_size()
    }

    fn update(&mut self, data: &[u8]) {
        Digest::update(&mut self.inner, data);
    }

    fn finalize_reset(&mut self) -> Vec<u8> {
        Digest::finalize_reset(&mut self.inner).to_vec()
    }
}

/// Supported underlying digests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DigestAlgorithm {
    /// SHA-256, 32-byte output.
    Sha256,
    /// SHA-384, 48-byte output.
    Sha384,
    /// SHA-512, 64-byte output.
    Sha512,
}

impl DigestAlgorithm {
    /// Resolves a configured digest name.
    pub fn from_name(name: &str) -> Result<Self, AppError> {
        match canonical_digest_name(name) {
            Some("SHA-256") => Ok(Self::Sha256),
            Some("SHA-384") => Ok(Self::Sha384),
            Some("SHA-512") => Ok(Self::Sha512),
            _ => Err(AppError::configuration(format!(
                "Unsupported message digest algorithm '{name}'"
            ))),
        }
    }

    /// Canonical name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sha256 => "SHA-256",
            Self::Sha384 => "SHA-384",
            Self::Sha512 => "SHA-512",
        }
    }

    /// Output size in bytes.
    pub fn output_size(&self) -> usize {
        match self {
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }

    /// Creates a new, exclusively owned hasher.
    pub fn new_hasher(&self) -> Box<dyn Hasher> {
        match self {
            Self::Sha256 => Box::new(Sha2Hasher::<Sha256>::new(self.name())),
            Self::Sha384 => Box::new(Sha2Hasher::<Sha384>::new(self.name())),
            Self::Sha512 => Box::new(Sha2Hasher::<Sha512>::new(self.name())),
        }
    }
}

impl Default for DigestAlgorithm {
    fn default() -> Self {
        Self::Sha256
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DigestAlgorithm {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}
