//! Rolling ring of intermediate CryptL7 hashes.

use crate::digest::Hasher;

/// Number of intermediate hashes kept by the mixing loop.
pub const HISTORY_ROWS: usize = 16;

/// Fixed-size ring of byte rows.
///
/// Invariant: holds the 16 most recently produced intermediate hashes,
/// oldest first. `row(0)` is the oldest, `row(15)` the newest. Every row is
/// separately owned, so pushing a row never aliases another.
#[derive(Clone)]
pub struct HashHistory {
    /// Physical storage; logical row `k` lives at `(oldest + k) % 16`.
    rows: [Vec<u8>; HISTORY_ROWS],
    /// Physical index of the oldest row.
    oldest: usize,
}

impl HashHistory {
    /// Seeds the ring with `first` followed by 15 successive digests of it.
    pub fn seed<H: Hasher + ?Sized>(hasher: &mut H, first: Vec<u8>) -> Self {
        let mut previous = first;
        let rows = std::array::from_fn(|i| {
            if i > 0 {
                previous = hasher.digest(&previous);
            }
            previous.clone()
        });
        Self { rows, oldest: 0 }
    }

    /// Returns logical row `age`, where 0 is the oldest.
    pub fn row(&self, age: usize) -> &[u8] {
        &self.rows[(self.oldest + age) % HISTORY_ROWS]
    }

    /// Returns the most recently pushed row.
    pub fn newest(&self) -> &[u8] {
        self.row(HISTORY_ROWS - 1)
    }

    /// Drops the oldest row and appends `row` as the newest.
    pub fn push(&mut self, row: Vec<u8>) {
        self.rows[self.oldest] = row;
        self.oldest = (self.oldest + 1) % HISTORY_ROWS;
    }
}
