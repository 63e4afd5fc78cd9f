//! Application-defined entity categories.
//!
//! A group is just a small integer tag. The host decides what each value
//! means, usually as a set of `const` items:
//!
//! ```ignore
//! pub const PLAYER_SHIP: Group = Group::new(0);
//! pub const ENEMY_SHIP: Group = Group::new(1);
//! ```

use crate::ecs::{Bitset, EcsError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of distinct groups an entity can belong to.
pub const MAX_GROUPS: usize = 32;

const _: () = assert!(MAX_GROUPS <= Bitset::CAPACITY);

/// Group tag in `0..MAX_GROUPS`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Group(u8);

impl Group {
    /// Build a group tag.
    ///
    /// # Panics
    /// Panics if `index >= MAX_GROUPS`. In a `const` item this is a compile error.
    pub const fn new(index: usize) -> Self {
        assert!(index < MAX_GROUPS, "group index out of range");
        Self(index as u8)
    }

    /// Fallible variant of [`Group::new`] for indices read at runtime.
    pub fn try_new(index: usize) -> Result<Self, EcsError> {
        if index < MAX_GROUPS {
            Ok(Self(index as u8))
        } else {
            Err(EcsError::GroupOutOfRange {
                group: index,
                max: MAX_GROUPS,
            })
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Every valid group, in ascending order.
    pub fn all() -> impl Iterator<Item = Group> {
        (0..MAX_GROUPS).map(|i| Group(i as u8))
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "group#{}", self.0)
    }
}
