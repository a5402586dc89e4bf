//! Slice partitioning.
//!
//! Hits are grouped into independent reconstruction units. With no external
//! slice association every hit goes into one synthetic slice. With one,
//! each external slice becomes a unit unless it is too small to reconstruct.
//! On multi-TPC detectors every unit is then split by TPC, each piece
//! keeping the id and position of its parent slice.

use log::{debug, warn};
use trajcluster_core::error::{Error, Result};
use trajcluster_core::geometry::Geometry;
use trajcluster_core::hit::HitCollection;
use trajcluster_core::slice::{SliceHitSet, SliceHits, SYNTHETIC_SLICE_ID};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Partitioning thresholds.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PartitionConfig {
    /// External slices with fewer hits are dropped without error.
    pub min_slice_hits: usize,
    /// Slices with fewer hits are skipped when splitting by TPC.
    pub min_tpc_split_hits: usize,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            min_slice_hits: 3,
            min_tpc_split_hits: 2,
        }
    }
}

impl PartitionConfig {
    /// Sets the minimum external slice size.
    #[must_use]
    pub fn with_min_slice_hits(mut self, hits: usize) -> Self {
        self.min_slice_hits = hits;
        self
    }

    /// Sets the minimum slice size for the TPC split.
    #[must_use]
    pub fn with_min_tpc_split_hits(mut self, hits: usize) -> Self {
        self.min_tpc_split_hits = hits;
        self
    }
}

/// Output of [`partition_hits`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    /// Hit sets to reconstruct, in external slice order.
    pub sets: Vec<SliceHitSet>,
    /// Ids of external slices dropped for being too small.
    pub dropped: Vec<u32>,
}

/// Splits the input hits into per-slice, single-TPC index sets.
///
/// # Errors
/// Returns [`Error::HitCollectionMismatch`] if a slice references hits of
/// another collection, or [`Error::InvalidSliceHitIndex`] if a slice
/// references a hit outside `hits`. Either aborts the whole partition.
pub fn partition_hits<G: Geometry + ?Sized>(
    hits: &HitCollection,
    slices: Option<&[SliceHits]>,
    geometry: &G,
    config: &PartitionConfig,
) -> Result<Partition> {
    let mut partition = Partition::default();

    match slices {
        None => {
            partition.sets.push(SliceHitSet::new(
                SYNTHETIC_SLICE_ID,
                None,
                (0..hits.len()).collect(),
            ));
        }
        Some(slices) => {
            for (slice_index, slice) in slices.iter().enumerate() {
                if slice.hits.len() < config.min_slice_hits {
                    debug!(
                        "Dropping slice {} with {} hits",
                        slice.slice.id,
                        slice.hits.len()
                    );
                    partition.dropped.push(slice.slice.id);
                    continue;
                }
                let mut indices = Vec::with_capacity(slice.hits.len());
                for hit in &slice.hits {
                    if hit.product != hits.product {
                        return Err(Error::HitCollectionMismatch {
                            expected: hits.product,
                            found: hit.product,
                            slice_id: slice.slice.id,
                        });
                    }
                    if hit.key >= hits.len() {
                        return Err(Error::InvalidSliceHitIndex {
                            index: hit.key,
                            len: hits.len(),
                        });
                    }
                    indices.push(hit.key);
                }
                partition
                    .sets
                    .push(SliceHitSet::new(slice.slice.id, Some(slice_index), indices));
            }
        }
    }

    if geometry.tpc_count() > 1 {
        partition.sets = split_by_tpc(hits, partition.sets, config.min_tpc_split_hits);
    }

    Ok(partition)
}

/// Splits each set into one set per TPC, in order of first appearance.
///
/// Hit order within each piece follows the parent set. Sets with fewer
/// than `min_hits` hits are skipped.
#[must_use]
pub fn split_by_tpc(
    hits: &HitCollection,
    sets: Vec<SliceHitSet>,
    min_hits: usize,
) -> Vec<SliceHitSet> {
    let mut split = Vec::with_capacity(sets.len());
    for set in sets {
        if set.len() < min_hits {
            debug!("Skipping slice {} with {} hits", set.slice_id, set.len());
            continue;
        }
        let mut tpcs: Vec<(u32, u32)> = Vec::new();
        let mut pieces: Vec<Vec<usize>> = Vec::new();
        for &index in &set.hits {
            let Some(hit) = hits.get(index) else {
                warn!("Slice {} references missing hit {index}", set.slice_id);
                continue;
            };
            let tpc = (hit.wire_id.cryostat, hit.wire_id.tpc);
            let piece = if let Some(pos) = tpcs.iter().position(|&t| t == tpc) {
                pos
            } else {
                tpcs.push(tpc);
                pieces.push(Vec::new());
                pieces.len() - 1
            };
            pieces[piece].push(index);
        }
        split.extend(
            pieces
                .into_iter()
                .map(|piece| SliceHitSet::new(set.slice_id, set.slice_index, piece)),
        );
    }
    split
}
