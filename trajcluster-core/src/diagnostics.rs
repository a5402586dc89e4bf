//! Recoverable problems reported alongside a product batch.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Why emission of a slice stopped early.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SliceFailure {
    /// A trajectory point references a slice-local hit that does not exist.
    BadSliceHitIndex {
        /// Trajectory unique id.
        trajectory: i32,
        /// Offending slice-local index.
        local: usize,
        /// Number of hits in the slice.
        len: usize,
    },
    /// A slice-local hit resolves outside the input hit collection.
    BadInputHitIndex {
        /// Trajectory unique id.
        trajectory: i32,
        /// Offending input index.
        index: usize,
        /// Size of the input hit collection.
        len: usize,
    },
    /// An input hit was already consumed by another output hit.
    DuplicateClaim {
        /// Trajectory unique id.
        trajectory: i32,
        /// Input hit index.
        index: usize,
        /// Output hit that already owns it.
        owner: usize,
    },
    /// The algorithm could not merge the hits of one trajectory point.
    MergeFailed {
        /// Trajectory unique id.
        trajectory: i32,
        /// Input hit indices given to the merge.
        hits: Vec<usize>,
    },
    /// A trajectory end point does not index one of its points.
    BadEndPoint {
        /// Trajectory unique id.
        trajectory: i32,
        /// Offending point index.
        point: usize,
    },
}

impl std::fmt::Display for SliceFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadSliceHitIndex {
                trajectory,
                local,
                len,
            } => write!(
                f,
                "trajectory {trajectory} uses slice hit {local} of a slice with {len} hits"
            ),
            Self::BadInputHitIndex {
                trajectory,
                index,
                len,
            } => write!(
                f,
                "trajectory {trajectory} uses input hit {index} of a collection with {len} hits"
            ),
            Self::DuplicateClaim {
                trajectory,
                index,
                owner,
            } => write!(
                f,
                "trajectory {trajectory} uses input hit {index} already owned by output hit {owner}"
            ),
            Self::MergeFailed { trajectory, hits } => {
                write!(f, "trajectory {trajectory} failed merging hits {hits:?}")
            }
            Self::BadEndPoint { trajectory, point } => {
                write!(f, "trajectory {trajectory} has invalid end point {point}")
            }
        }
    }
}

/// A slice failure together with the slice it happened in.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SliceFailureReport {
    /// Position of the slice result in the algorithm's result list.
    pub result_index: usize,
    /// Id of the originating slice.
    pub slice_id: u32,
    /// What went wrong.
    pub failure: SliceFailure,
}

/// A PFParticle link that could not be resolved and was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LookupMiss {
    /// Owned trajectory id not present in the slice.
    Trajectory { pfparticle: usize, trajectory_id: i32 },
    /// No cluster carries the trajectory's unique id.
    Cluster { pfparticle: usize, trajectory_uid: i32 },
    /// Start vertex was not emitted.
    Vertex { pfparticle: usize, vertex_id: i32 },
    /// No emitted shower points back to the particle.
    Shower { pfparticle: usize },
    /// Parent id does not name an emitted particle of the slice.
    Parent { pfparticle: usize, parent_id: i32 },
    /// Daughter id does not name an emitted particle of the slice.
    Daughter { pfparticle: usize, daughter_id: i32 },
}

/// Everything recovered from while assembling one batch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AssemblyDiagnostics {
    /// External slices dropped for having too few hits, by id.
    pub dropped_slices: Vec<u32>,
    /// Slices whose emission was truncated.
    pub slice_failures: Vec<SliceFailureReport>,
    /// Slice results skipped because the algorithm marked them invalid.
    pub invalid_slices: Vec<usize>,
    /// Skipped PFParticle links.
    pub lookup_misses: Vec<LookupMiss>,
}

impl AssemblyDiagnostics {
    /// Returns true if every slice was emitted completely.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.slice_failures.is_empty() && self.invalid_slices.is_empty()
    }
}
