//! `$L7H$` verifier strings.
//!
//! Layout: `$L7H$` + base64(work factor byte ‖ salt) + `$` + base64(hash),
//! using the standard padded base64 alphabet.

use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use serde::Serialize;
use tracing::{debug, warn};

use credential_core::config::HashingConfig;
use credential_core::error::AppError;

use crate::consteq::constant_time_eq;
use crate::cryptl7::CryptL7;
use crate::digest::DigestAlgorithm;

/// Prefix identifying CryptL7 verifiers.
pub const PREFIX: &str = "$L7H$";

/// The parts of a CryptL7 verifier.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct DecodedVerifier {
    /// Work factor the hash was computed with.
    pub work_factor: u8,
    /// Salt bytes.
    pub salt: Vec<u8>,
    /// Hash bytes.
    pub hash: Vec<u8>,
}

impl fmt::Debug for DecodedVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedVerifier")
            .field("work_factor", &self.work_factor)
            .field("salt_len", &self.salt.len())
            .field("hash_len", &self.hash.len())
            .finish()
    }
}

/// Builds a verifier string from its parts.
pub fn encode(work_factor: u8, salt: &[u8], hash: &[u8]) -> String {
    let mut header = Vec::with_capacity(salt.len() + 1);
    header.push(work_factor);
    header.extend_from_slice(salt);
    format!("{PREFIX}{}${}", STANDARD.encode(&header), STANDARD.encode(hash))
}

/// Parses a verifier string into its parts without hashing anything.
pub fn decode(verifier: &str) -> Result<DecodedVerifier, AppError> {
    let body = verifier
        .strip_prefix(PREFIX)
        .ok_or_else(|| AppError::invalid_verifier("Verifier does not carry the $L7H$ prefix"))?;

    let (header, hash) = body
        .split_once('$')
        .ok_or_else(|| AppError::invalid_verifier("Verifier is missing the hash section"))?;
    if header.is_empty() || hash.is_empty() || hash.contains('$') {
        return Err(AppError::invalid_verifier("Verifier sections are malformed"));
    }

    let header = STANDARD
        .decode(header)
        .map_err(|_| AppError::invalid_verifier("Verifier salt section is not valid base64"))?;
    let hash = STANDARD
        .decode(hash)
        .map_err(|_| AppError::invalid_verifier("Verifier hash section is not valid base64"))?;

    let (work_factor, salt) = header
        .split_first()
        .ok_or_else(|| AppError::invalid_verifier("Verifier salt section is empty"))?;
    if hash.is_empty() {
        return Err(AppError::invalid_verifier("Verifier hash section is empty"));
    }

    Ok(DecodedVerifier {
        work_factor: *work_factor,
        salt: salt.to_vec(),
        hash,
    })
}

/// Creates and checks CryptL7 verifiers.
#[derive(Debug, Clone)]
pub struct VerifierCodec {
    /// Engine with its parameter bounds.
    engine: CryptL7,
    /// Digest underlying the engine.
    algorithm: DigestAlgorithm,
    /// Work factor for new verifiers.
    default_work_factor: u8,
    /// Salt length for new verifiers.
    salt_bytes: usize,
}

impl VerifierCodec {
    /// Creates a codec, failing fast on an unusable configuration.
    pub fn new(config: &HashingConfig) -> Result<Self, AppError> {
        let engine = CryptL7::from_config(config)?;
        let algorithm = DigestAlgorithm::from_name(&config.message_digest_algorithm)?;

        let codec = Self {
            engine,
            algorithm,
            default_work_factor: config.default_work_factor,
            salt_bytes: config.salt_bytes,
        };
        if codec.salt_bytes == 0 {
            return Err(AppError::configuration("Salt length must be at least 1 byte"));
        }
        codec
            .engine
            .check_parameters(codec.default_work_factor, algorithm.new_hasher().as_ref())?;
        Ok(codec)
    }

    /// The prefix shared by every verifier this codec produces.
    pub fn prefix(&self) -> &'static str {
        PREFIX
    }

    /// The configured digest.
    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    /// Work factor applied to new verifiers.
    pub fn default_work_factor(&self) -> u8 {
        self.default_work_factor
    }

    /// Hashes `password` into a new verifier using the operating system RNG.
    pub fn hash_password(&self, password: &[u8]) -> Result<String, AppError> {
        self.hash_password_with_rng(&mut OsRng, password)
    }

    /// Hashes `password` into a new verifier, drawing the salt from `rng`.
    pub fn hash_password_with_rng<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        password: &[u8],
    ) -> Result<String, AppError> {
        let mut salt = vec![0u8; self.salt_bytes];
        rng.fill_bytes(&mut salt);

        let mut hasher = self.algorithm.new_hasher();
        let hash =
            self.engine
                .compute_hash(password, &salt, self.default_work_factor, hasher.as_mut())?;

        debug!(
            algorithm = %self.algorithm,
            work_factor = self.default_work_factor,
            "Created CryptL7 verifier"
        );
        Ok(encode(self.default_work_factor, &salt, &hash))
    }

    /// Checks `password` against a stored verifier.
    ///
    /// A malformed verifier or out-of-range work factor is reported as a
    /// hashing error; any mismatch yields the opaque incorrect-password
    /// error.
    pub fn verify_password(&self, password: &[u8], verifier: &str) -> Result<(), AppError> {
        let decoded = decode(verifier).inspect_err(|e| {
            warn!(reason = %e.message, "Rejected unparseable CryptL7 verifier");
        })?;

        let mut hasher = self.algorithm.new_hasher();
        let computed = self.engine.compute_hash(
            password,
            &decoded.salt,
            decoded.work_factor,
            hasher.as_mut(),
        )?;

        if constant_time_eq(&computed, &decoded.hash) {
            Ok(())
        } else {
            Err(AppError::incorrect_password())
        }
    }

    /// Returns whether `verifier` parses as a CryptL7 verifier.
    pub fn is_verifier_recognized(&self, verifier: &str) -> bool {
        decode(verifier).is_ok()
    }

    /// Returns whether a stored verifier should be replaced on next login:
    /// it does not parse, or was produced with another work factor or a
    /// differently sized digest.
    pub fn needs_rehash(&self, verifier: &str) -> bool {
        match decode(verifier) {
            Ok(decoded) => {
                decoded.work_factor != self.default_work_factor
                    || decoded.hash.len() != self.algorithm.output_size()
            }
            Err(_) => true,
        }
    }
}
