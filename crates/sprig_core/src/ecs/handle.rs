//! Entity handle with generational index
//!
//! Handles are lightweight (8 bytes) and non-owning. Components keep one to
//! refer back to their entity, and group buckets are lists of them.
//! Every dereference goes through the store, which checks the generation,
//! so a handle to a reclaimed entity resolves to nothing instead of dangling.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Entity handle (generation-indexed for safety)
///
/// Format: [32-bit index | 32-bit generation]
/// - Index: Slot in the store's entity table
/// - Generation: Incremented when the slot is reclaimed by `refresh`
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId {
    index: u32,
    generation: u32,
}

impl EntityId {
    pub(crate) const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Serialize to 64-bit integer (for logs/save files)
    pub fn to_bits(&self) -> u64 {
        ((self.generation as u64) << 32) | (self.index as u64)
    }

    /// Deserialize from 64-bit integer
    pub fn from_bits(bits: u64) -> Self {
        Self {
            index: bits as u32,
            generation: (bits >> 32) as u32,
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bits_round_trip() {
        let id = EntityId::new(7, 3);
        assert_eq!(id.to_bits(), (3u64 << 32) | 7);
        assert_eq!(EntityId::from_bits(id.to_bits()), id);
    }

    #[test]
    fn display_shows_index_and_generation() {
        assert_eq!(EntityId::new(12, 1).to_string(), "12v1");
    }
}
