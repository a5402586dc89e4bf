//! Copying of input hits no cluster used.

use crate::remap::RemapTable;
use log::trace;
use trajcluster_core::error::Result;
use trajcluster_core::hit::{HitCollection, HitRef};
use trajcluster_core::products::ProductBatch;
use trajcluster_core::slice::SliceHits;

/// Copies every unclaimed input hit to the end of `batch.hits`.
///
/// Hits are copied in input index order and claimed as they go. A copied
/// hit is linked to the first external slice that owns it, if any.
/// Returns the number of hits copied.
///
/// # Errors
/// Returns an error if a slice to hit association cannot be recorded.
pub fn reconcile_leftovers(
    input: &HitCollection,
    slices: Option<&[SliceHits]>,
    remap: &mut RemapTable,
    batch: &mut ProductBatch,
) -> Result<usize> {
    let unclaimed: Vec<usize> = remap.unclaimed().collect();
    let n_slices = slices.map_or(0, <[SliceHits]>::len);

    for &index in &unclaimed {
        let Some(hit) = input.get(index) else {
            continue;
        };
        let output = batch.hits.len();
        batch.hits.push(hit.clone());
        // Cannot fail: the index came from the unclaimed list.
        if remap.claim(index, output).is_err() {
            continue;
        }

        let owner = slices.and_then(|slices| {
            let key = HitRef::new(input.product, index);
            slices.iter().position(|slice| slice.contains(key))
        });
        if let Some(slice) = owner {
            trace!("Leftover hit {index} -> {output} in slice {slice}");
            let n_hits = batch.hits.len();
            batch
                .slice_hits
                .link("slice-hit", (slice, n_slices), (output, n_hits), ())?;
        }
    }

    Ok(unclaimed.len())
}
