//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  Agents, stations and items are
//! dense indices into their owning `Vec`; tasks and obstacles are handed out
//! from monotonically increasing counters and never reused, so a stale handle
//! can never alias a newer entry.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Index of an agent (elf or snowman) in the agent store.
    pub struct AgentId(u32);
}

typed_id! {
    /// Index of a station in the workshop's station list.
    pub struct StationId(u32);
}

typed_id! {
    /// Index of an item type in the `ItemCatalog`.
    /// `u16` keeps ingredient lists compact (max 65,535 item types).
    pub struct ItemId(u16);
}

typed_id! {
    /// Unique identity of a task.  Issued by the taskmaster, never reused.
    pub struct TaskId(u32);
}

typed_id! {
    /// Stable handle of an obstacle in the obstacle registry.
    pub struct ObstacleId(u32);
}
