// bitset.rs - Fixed-width presence set
//
// Backs both the per-entity component-presence set and the group
// membership set. Width is fixed at compile time; indices past the width
// are a programming error.

use std::fmt;

/// A 32-bit set of small indices.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Bitset(u32);

impl Bitset {
    /// Number of distinct indices the set can hold.
    pub const CAPACITY: usize = u32::BITS as usize;

    /// An empty set.
    pub const fn new() -> Self {
        Self(0)
    }

    #[inline]
    fn mask(index: usize) -> u32 {
        assert!(
            index < Self::CAPACITY,
            "bit index {index} out of range (capacity {})",
            Self::CAPACITY
        );
        1 << index
    }

    /// Returns `true` if `index` is in the set.
    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        index < Self::CAPACITY && self.0 & (1 << index) != 0
    }

    /// Adds `index`. Returns `true` if it was not already present.
    #[inline]
    pub fn insert(&mut self, index: usize) -> bool {
        let mask = Self::mask(index);
        let added = self.0 & mask == 0;
        self.0 |= mask;
        added
    }

    /// Removes `index`. Returns `true` if it was present.
    #[inline]
    pub fn remove(&mut self, index: usize) -> bool {
        let mask = Self::mask(index);
        let removed = self.0 & mask != 0;
        self.0 &= !mask;
        removed
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Iterate set indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        let bits = self.0;
        (0..Self::CAPACITY).filter(move |&i| bits & (1 << i) != 0)
    }
}

impl fmt::Debug for Bitset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
