//! Canonical hit ordering.
//!
//! The clustering algorithm walks hits assuming they are laid out by plane,
//! then wire, then start tick. Hits fitted together in one pulse train share
//! a start tick; for those the algorithm assumes a larger local index means
//! a later time. Nothing downstream checks this, so the order defined here
//! is the only place it is enforced.

use trajcluster_core::geometry::CtpCode;
use trajcluster_core::hit::Hit;
use trajcluster_core::slice::SliceHitSet;

/// Sort key of one hit. Field order is comparison order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SortKey {
    /// Encoded cryostat, TPC and plane.
    pub ctp: CtpCode,
    /// Wire number.
    pub wire: u32,
    /// Start tick.
    pub tick: i32,
    /// Index within the pulse train.
    pub local_index: i16,
}

impl SortKey {
    /// Builds the key of a hit.
    #[inline]
    #[must_use]
    pub fn of(hit: &Hit) -> Self {
        Self {
            ctp: hit.wire_id.ctp(),
            wire: hit.wire_id.wire,
            tick: hit.start_tick,
            local_index: hit.local_index,
        }
    }
}

/// Returns `indices` reordered by [`SortKey`].
///
/// The sort is stable, so indices with equal keys keep their relative order
/// and sorting an already sorted list returns it unchanged. Indices outside
/// `hits` have no key and sort first.
#[must_use]
pub fn sort_hit_indices(hits: &[Hit], indices: &[usize]) -> Vec<usize> {
    let mut keyed: Vec<(Option<SortKey>, usize)> = indices
        .iter()
        .map(|&index| (hits.get(index).map(SortKey::of), index))
        .collect();
    keyed.sort_by_key(|&(key, _)| key);
    keyed.into_iter().map(|(_, index)| index).collect()
}

/// Sorts the hits of a slice in place.
pub fn sort_slice(hits: &[Hit], slice: &mut SliceHitSet) {
    slice.hits = sort_hit_indices(hits, &slice.hits);
}
