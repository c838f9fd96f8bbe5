//! Strongly typed identifier wrappers.
//!
//! Two kinds of identity flow through the engine:
//!
//! - [`OsmId`] — the opaque id a road-data provider assigns to a point.  It is
//!   only ever compared and echoed back to clients.
//! - [`NodeId`] — a dense, sequential index assigned by the network builder.
//!   Graph arrays are indexed by it directly via `.index()`.  [`EdgeId`]
//!   plays the same role for the CSR edge arrays.

use std::fmt;

/// Generate a dense index wrapper around an unsigned integer.
macro_rules! typed_index {
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

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
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

typed_index! {
    /// Index of a road-network node.  Max ~4.3 billion nodes per network.
    pub struct NodeId(u32);
}

typed_index! {
    /// Index of a directed road-network edge.
    pub struct EdgeId(u32);
}

/// Provider-assigned point identity (an OpenStreetMap node id in practice).
///
/// Serialises as a bare integer so it can be returned to clients unchanged.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct OsmId(pub i64);

impl fmt::Display for OsmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for OsmId {
    #[inline]
    fn from(id: i64) -> Self {
        OsmId(id)
    }
}
