//! CryptL7 adaptive password hashing.
//!
//! Each work round derives one output byte per digest byte: the byte of the
//! running hash `hn` selects an operator (top two bits) and two operands
//! from the 16-row history (next three bits pick one of the older eight
//! rows, low three bits one of the newer eight). The outputs followed by
//! `hn` are digested to form the next `hn`. Rounds grow as
//! `2^(2 * (work_factor + 1))`.
//!
//! The construction must stay bit-for-bit stable: stored verifiers depend
//! on it.
//!
//! A computation is synchronous and runs to completion once started; there
//! is no cancellation point inside the round loop.

use tracing::debug;

use credential_core::config::HashingConfig;
use credential_core::config::hashing::{MIN_HASH_OUTPUT_SIZE, WORK_FACTOR_CEILING};
use credential_core::error::AppError;

use crate::digest::Hasher;
use crate::history::{HISTORY_ROWS, HashHistory};

/// Number of mixing rounds for `work_factor`.
pub fn rounds(work_factor: u8) -> u64 {
    1u64 << (2 * (u32::from(work_factor) + 1))
}

/// The CryptL7 engine with its accepted parameter bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CryptL7 {
    /// Lowest accepted work factor.
    min_work_factor: u8,
    /// Highest accepted work factor.
    max_work_factor: u8,
    /// Smallest accepted digest output size in bytes.
    min_hash_output_size: usize,
}

impl CryptL7 {
    /// Creates an engine, failing if the bounds themselves are unusable.
    pub fn new(
        min_work_factor: u8,
        max_work_factor: u8,
        min_hash_output_size: usize,
    ) -> Result<Self, AppError> {
        if min_work_factor > max_work_factor || max_work_factor > WORK_FACTOR_CEILING {
            return Err(AppError::configuration(format!(
                "Invalid work factor bounds [{min_work_factor}, {max_work_factor}]"
            )));
        }
        if min_hash_output_size < MIN_HASH_OUTPUT_SIZE {
            return Err(AppError::configuration(format!(
                "Minimum hash output size must be at least {MIN_HASH_OUTPUT_SIZE} bytes"
            )));
        }
        Ok(Self {
            min_work_factor,
            max_work_factor,
            min_hash_output_size,
        })
    }

    /// Creates an engine from the hashing configuration section.
    pub fn from_config(config: &HashingConfig) -> Result<Self, AppError> {
        Self::new(
            config.min_work_factor,
            config.max_work_factor,
            config.min_hash_output_size,
        )
    }

    /// Lowest accepted work factor.
    pub fn min_work_factor(&self) -> u8 {
        self.min_work_factor
    }

    /// Highest accepted work factor.
    pub fn max_work_factor(&self) -> u8 {
        self.max_work_factor
    }

    /// Checks the work factor and digest against the engine bounds.
    pub fn check_parameters<H: Hasher + ?Sized>(
        &self,
        work_factor: u8,
        hasher: &H,
    ) -> Result<(), AppError> {
        if work_factor < self.min_work_factor || work_factor > self.max_work_factor {
            return Err(AppError::configuration(format!(
                "Work factor {work_factor} is outside [{}, {}]",
                self.min_work_factor, self.max_work_factor
            )));
        }
        if hasher.output_size() < self.min_hash_output_size {
            return Err(AppError::configuration(format!(
                "Digest {} produces {} bytes; at least {} are required",
                hasher.algorithm(),
                hasher.output_size(),
                self.min_hash_output_size
            )));
        }
        Ok(())
    }

    /// Computes the CryptL7 hash of `password` with `salt`.
    ///
    /// The result has the hasher's output size. Fails with a configuration
    /// error when the parameters are out of bounds; never for a password.
    pub fn compute_hash<H: Hasher + ?Sized>(
        &self,
        password: &[u8],
        salt: &[u8],
        work_factor: u8,
        hasher: &mut H,
    ) -> Result<Vec<u8>, AppError> {
        self.check_parameters(work_factor, hasher)?;

        let total_rounds = rounds(work_factor);
        let size = hasher.output_size();
        debug!(
            algorithm = hasher.algorithm(),
            work_factor,
            rounds = total_rounds,
            "Computing CryptL7 hash"
        );

        let salt_hash = hasher.digest(salt);

        hasher.update(password);
        hasher.update(salt);
        let first = hasher.finalize_reset();
        let mut history = HashHistory::seed(hasher, first);

        let mut hn = hasher.digest(history.newest());
        let mut mixed = vec![0u8; size];

        for _ in 0..total_rounds {
            for (i, out) in mixed.iter_mut().enumerate() {
                *out = mix_byte(&history, &salt_hash, &hn, i);
            }

            hasher.update(&mixed);
            hasher.update(&hn);
            let next = hasher.finalize_reset();

            history.push(hn);
            hn = next;
        }

        Ok(hn)
    }
}

impl Default for CryptL7 {
    fn default() -> Self {
        let config = HashingConfig::default();
        Self {
            min_work_factor: config.min_work_factor,
            max_work_factor: config.max_work_factor,
            min_hash_output_size: config.min_hash_output_size,
        }
    }
}

/// Produces output byte `i` of a work round.
///
/// `hn[i]` reads as `oo aaa bbb`: operator, then an index into the eight
/// oldest rows, then an index into the eight newest rows.
fn mix_byte(history: &HashHistory, salt_hash: &[u8], hn: &[u8], i: usize) -> u8 {
    let selector = hn[i];
    let arg_a = history.row(usize::from((selector >> 3) & 0x07))[i];
    let arg_b = history.row(HISTORY_ROWS / 2 + usize::from(selector & 0x07))[i];

    match selector >> 6 {
        0b00 => arg_a ^ salt_hash[i],
        0b01 => arg_a ^ arg_b,
        0b10 => arg_a.wrapping_add(arg_b),
        _ => arg_b ^ hn[i],
    }
}
