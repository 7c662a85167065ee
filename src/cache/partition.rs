//! Hash Partitioning Module
//!
//! Maps a signed 32-bit hash onto one of `N` sets by splitting the range
//! `[i32::MIN, i32::MAX]` at fixed boundaries.
//!
//! For `N > 1` the boundaries are `boundary(i) = (i + 1) * (i32::MAX / N)` for
//! `i` in `0..N-1`, and a hash belongs to the smallest `i` with
//! `hash <= boundary(i)`. Two consequences are intentional:
//! - every negative hash (and zero) lands in set 0, so set 0 covers the whole
//!   negative half of the range;
//! - the last set takes everything above `boundary(N-2)`, including the
//!   rounding remainder of `i32::MAX / N`, so it can be wider than the others.

// == Partitioner ==
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partitioner {
    set_count: usize,
    /// `i32::MAX / set_count`, the distance between consecutive boundaries
    width: i64,
}

impl Partitioner {
    /// Creates a partitioner over `set_count` sets.
    ///
    /// `set_count` must be at least 1 and is expected to stay below
    /// `i32::MAX`, which `MAX_CAPACITY` guarantees for validated configs.
    pub fn new(set_count: usize) -> Self {
        let set_count = set_count.max(1);
        let width = (i32::MAX as i64 / set_count as i64).max(1);
        Self { set_count, width }
    }

    pub fn set_count(&self) -> usize {
        self.set_count
    }

    // == Boundary ==
    /// Upper (inclusive) hash bound of set `index`; the last set ends at `i32::MAX`.
    pub fn boundary(&self, index: usize) -> i32 {
        if index + 1 >= self.set_count {
            return i32::MAX;
        }
        ((index as i64 + 1) * self.width).min(i32::MAX as i64) as i32
    }

    // == Set Index ==
    /// Returns the set owning `hash`.
    ///
    /// Equivalent to scanning the boundaries in order, computed directly:
    /// for a positive hash the smallest `i` with `hash <= (i + 1) * width`
    /// is `(hash - 1) / width`.
    pub fn set_index(&self, hash: i32) -> usize {
        if self.set_count == 1 || hash <= 0 {
            return 0;
        }
        let index = ((hash as i64 - 1) / self.width) as usize;
        index.min(self.set_count - 1)
    }
}
