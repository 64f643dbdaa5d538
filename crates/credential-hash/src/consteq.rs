//! Constant-time comparison for verification.

use subtle::{Choice, ConstantTimeEq};

/// Compares `expected` with `actual` without an early exit.
///
/// Every byte of `expected` is visited. When the lengths differ, `expected`
/// is compared against itself so the work done does not depend on the
/// length of `actual`; the length mismatch still forces `false`.
pub fn constant_time_eq(expected: &[u8], actual: &[u8]) -> bool {
    let same_length = expected.len() == actual.len();
    let other = if same_length { actual } else { expected };

    bool::from(expected.ct_eq(other) & Choice::from(u8::from(same_length)))
}
