//! Capability interface of the external trajectory-clustering algorithm.

use crate::error::Result;
use crate::hit::Hit;
use crate::results::SliceResult;

/// Trait for trajectory-clustering algorithms driven slice by slice.
///
/// The algorithm keeps one [`SliceResult`] per call to [`run`](Self::run),
/// in call order, until [`clear_results`](Self::clear_results) is called.
/// Hit indices passed in and out are indices into the collection given to
/// [`set_input_hits`](Self::set_input_hits).
pub trait TrajClusterAlgorithm {
    /// Returns the name of the algorithm.
    fn name(&self) -> &'static str;

    /// Hands the full input hit collection to the algorithm.
    ///
    /// # Errors
    /// Returns [`crate::Error::InputRejected`] if the algorithm cannot use the hits.
    fn set_input_hits(&mut self, hits: &[Hit]) -> Result<()>;

    /// Reconstructs one slice. `slice_hits` is sorted by the canonical hit order.
    fn run(&mut self, slice_hits: &[usize]);

    /// Number of slice results currently held.
    fn slice_count(&self) -> usize;

    /// Result of the `index`-th call to [`run`](Self::run).
    fn slice(&self, index: usize) -> Option<&SliceResult>;

    /// Builds one output hit from the given input hits.
    ///
    /// Returns `None` if the hits cannot be represented by one hit.
    fn merge_hits(&self, hits: &[usize]) -> Option<Hit>;

    /// Drops every held slice result.
    fn clear_results(&mut self);
}
