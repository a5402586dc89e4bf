//! External slices and the per-slice hit index sets built from them.

use crate::hit::HitRef;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Slice id assigned when no external slices are supplied.
pub const SYNTHETIC_SLICE_ID: u32 = 1;

/// An externally defined slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Slice {
    /// Slice identifier assigned by the producer of the slice.
    pub id: u32,
}

/// An external slice together with the hits it owns.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SliceHits {
    /// The slice.
    pub slice: Slice,
    /// Member hits.
    pub hits: Vec<HitRef>,
}

impl SliceHits {
    /// Creates a slice association entry.
    #[must_use]
    pub fn new(id: u32, hits: Vec<HitRef>) -> Self {
        Self {
            slice: Slice { id },
            hits,
        }
    }

    /// Returns true if the slice owns `hit`.
    #[must_use]
    pub fn contains(&self, hit: HitRef) -> bool {
        self.hits.contains(&hit)
    }
}

/// Global input-hit indices processed together as one reconstruction unit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SliceHitSet {
    /// Id of the slice this set came from.
    pub slice_id: u32,
    /// Position of the originating external slice, if external slices exist.
    pub slice_index: Option<usize>,
    /// Indices into the input hit collection.
    pub hits: Vec<usize>,
}

impl SliceHitSet {
    /// Creates a hit set.
    #[must_use]
    pub fn new(slice_id: u32, slice_index: Option<usize>, hits: Vec<usize>) -> Self {
        Self {
            slice_id,
            slice_index,
            hits,
        }
    }

    /// Returns the number of hits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    /// Returns true if the set has no hits.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}
