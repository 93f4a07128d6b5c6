//! Strongly typed identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! without ceremony.  Robot and building IDs are dense (`0..n`) and index
//! straight into their owning `Vec`; order IDs are issued monotonically by the
//! scheduler and are never reused.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

typed_id! {
    /// Index of a robot in the simulation's robot list.
    pub struct RobotId(u32);
}

typed_id! {
    /// Monotonic order number, unique for the lifetime of a run.
    pub struct OrderId(u64);
}

typed_id! {
    /// Index of a placed building in `Campus::buildings`.
    pub struct BuildingId(u32);
}
