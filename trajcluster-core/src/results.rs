//! Per-slice results returned by the trajectory-clustering algorithm.
//!
//! Identifiers follow the algorithm's conventions: `id` is 1-based and
//! scoped to one slice (zero or negative means the object was discarded),
//! `uid` is unique across all slices of one processing call. Hit indices
//! inside a [`TrajPoint`] are slice-local and resolve through
//! [`SliceResult::slice_hits`]; hit indices inside a [`Shower3d`] are global.

use crate::geometry::CtpCode;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Modification flags set by the algorithm on a trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TrajFlags {
    /// Trajectory was discarded.
    pub killed: bool,
    /// Trajectory is part of a shower.
    pub shower_like: bool,
}

/// One point along a trajectory.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TrajPoint {
    /// Position as (wire, tick).
    pub pos: [f32; 2],
    /// Direction angle.
    pub ang: f32,
    /// Average charge near this point.
    pub ave_chg: f32,
    /// Charge of the used hits. Points with no charge were not retained.
    pub chg: f32,
    /// Slice-local indices of candidate hits.
    pub hits: Vec<usize>,
    /// Whether each candidate hit is used, parallel to `hits`.
    pub use_hit: Vec<bool>,
}

impl TrajPoint {
    /// Returns true if the point contributes hits to the output.
    #[inline]
    #[must_use]
    pub fn is_retained(&self) -> bool {
        self.chg > 0.0
    }

    /// Slice-local indices of the hits this point uses.
    pub fn used_hits(&self) -> impl Iterator<Item = usize> + '_ {
        self.hits
            .iter()
            .zip(&self.use_hit)
            .filter_map(|(&hit, &used)| used.then_some(hit))
    }
}

/// A 2D trajectory found in one plane of a slice.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Trajectory {
    /// Slice-local id.
    pub id: i32,
    /// Unique id.
    pub uid: i32,
    /// Encoded plane.
    pub ctp: CtpCode,
    /// Points, ordered along the trajectory.
    pub pts: Vec<TrajPoint>,
    /// Indices into `pts` of the first and last retained points.
    pub end_pt: [usize; 2],
    /// Slice-local 2D vertex id attached at each end (0 = none).
    pub vtx_id: [i32; 2],
    /// Modification flags.
    pub flags: TrajFlags,
}

/// A 2D vertex.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Vertex2d {
    /// Slice-local id.
    pub id: i32,
    /// Unique id.
    pub uid: i32,
    /// Encoded plane.
    pub ctp: CtpCode,
    /// Position as (wire, tick).
    pub pos: [f32; 2],
    /// Vertex quality score.
    pub score: f32,
    /// Slice-local id of the 3D vertex this vertex belongs to (0 = none).
    pub vx3_id: i32,
}

/// A 3D vertex.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Vertex3d {
    /// Slice-local id.
    pub id: i32,
    /// Unique id.
    pub uid: i32,
    /// Cartesian position.
    pub x: f32,
    /// Cartesian position.
    pub y: f32,
    /// Cartesian position.
    pub z: f32,
    /// Wire of a missing 2D vertex, or negative when the vertex is complete.
    pub wire: i32,
}

impl Default for Vertex3d {
    fn default() -> Self {
        Self {
            id: 0,
            uid: 0,
            x: 0.0,
            y: 0.0,
            z: 0.0,
            wire: -1,
        }
    }
}

impl Vertex3d {
    /// Returns true if the vertex has a matched 2D vertex in every plane.
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.wire < 0
    }
}

/// A 3D shower aggregate.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Shower3d {
    /// Slice-local id.
    pub id: i32,
    /// Unique id.
    pub uid: i32,
    /// Energy per plane.
    pub energy: Vec<f64>,
    /// Energy error per plane.
    pub energy_err: Vec<f64>,
    /// MIP energy per plane.
    pub mip_energy: Vec<f64>,
    /// MIP energy error per plane.
    pub mip_energy_err: Vec<f64>,
    /// Plane with the best energy measurement.
    pub best_plane: i32,
    /// Direction cosines.
    pub dir: [f64; 3],
    /// Direction error.
    pub dir_err: [f64; 3],
    /// Start position.
    pub start: [f64; 3],
    /// Start position error.
    pub start_err: [f64; 3],
    /// dE/dx per plane.
    pub dedx: Vec<f64>,
    /// dE/dx error per plane.
    pub dedx_err: Vec<f64>,
    /// Shower length.
    pub len: f64,
    /// Opening angle.
    pub open_angle: f64,
    /// Global input-hit indices of the constituent hits.
    pub hits: Vec<usize>,
    /// Slice-local position of the PFParticle describing this shower.
    pub pfp_index: usize,
}

/// A particle-flow node.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PfpResult {
    /// Slice-local 1-based id.
    pub id: i32,
    /// Unique id.
    pub uid: i32,
    /// Particle type code.
    pub pdg_code: i32,
    /// Slice-local id of the parent (0 = primary).
    pub parent_id: i32,
    /// Slice-local ids of the daughters.
    pub dtr_ids: Vec<i32>,
    /// Slice-local ids of the trajectories owned by this particle.
    pub tj_ids: Vec<i32>,
    /// Slice-local 3D vertex id at the start and end (0 = none).
    pub vx3_id: [i32; 2],
    /// Cosmic-ray likelihood.
    pub cosmic_score: f32,
}

/// Everything the algorithm produced for one slice.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SliceResult {
    /// False if reconstruction of the slice failed outright.
    pub is_valid: bool,
    /// Global input-hit index of each slice-local hit.
    pub slice_hits: Vec<usize>,
    /// Trajectories.
    pub trajectories: Vec<Trajectory>,
    /// 2D vertices.
    pub vertices_2d: Vec<Vertex2d>,
    /// 3D vertices.
    pub vertices_3d: Vec<Vertex3d>,
    /// 3D showers.
    pub showers: Vec<Shower3d>,
    /// Particle-flow nodes.
    pub pfparticles: Vec<PfpResult>,
}

impl Default for SliceResult {
    fn default() -> Self {
        Self {
            is_valid: true,
            slice_hits: Vec::new(),
            trajectories: Vec::new(),
            vertices_2d: Vec::new(),
            vertices_3d: Vec::new(),
            showers: Vec::new(),
            pfparticles: Vec::new(),
        }
    }
}
