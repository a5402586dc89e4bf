//! Output data products and the batch they are published in.

use crate::assns::Assns;
use crate::geometry::{PlaneId, View, WireId};
use crate::hit::Hit;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A 2D cluster built from one trajectory.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cluster {
    /// Wire of the first point.
    pub start_wire: f32,
    /// Time of the first point.
    pub start_tick: f32,
    /// Average charge at the first point.
    pub start_charge: f32,
    /// Direction angle at the first point.
    pub start_angle: f32,
    /// Wire of the last point.
    pub end_wire: f32,
    /// Time of the last point.
    pub end_tick: f32,
    /// Average charge at the last point.
    pub end_charge: f32,
    /// Direction angle at the last point.
    pub end_angle: f32,
    /// Sum of the fitted charge of the cluster hits.
    pub integral: f32,
    /// Sum of the ADC counts of the cluster hits.
    pub summed_adc: f32,
    /// Hit count.
    pub n_hits: u32,
    /// Trajectory unique id, negated for shower-like trajectories.
    pub id: i32,
    /// Wire orientation.
    pub view: View,
    /// Plane.
    pub plane: PlaneId,
}

/// A 2D vertex in one plane.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EndPoint2D {
    /// Drift time.
    pub drift_time: f64,
    /// Nearest wire.
    pub wire_id: WireId,
    /// Vertex score.
    pub strength: f64,
    /// Unique id.
    pub id: i32,
    /// Wire orientation.
    pub view: View,
    /// Total charge (not filled).
    pub total_charge: f64,
}

/// A 3D vertex.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vertex {
    /// Cartesian position.
    pub xyz: [f64; 3],
    /// Unique id.
    pub id: i32,
}

/// A 3D shower.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Shower {
    /// Unique id.
    pub id: i32,
    /// Energy per plane.
    pub total_energy: Vec<f64>,
    /// Energy error per plane.
    pub total_energy_err: Vec<f64>,
    /// MIP energy per plane.
    pub total_mip_energy: Vec<f64>,
    /// MIP energy error per plane.
    pub total_mip_energy_err: Vec<f64>,
    /// Plane with the best energy measurement.
    pub best_plane: i32,
    /// Direction cosines.
    pub direction: [f64; 3],
    /// Direction error.
    pub direction_err: [f64; 3],
    /// Start position.
    pub start_point: [f64; 3],
    /// Start position error.
    pub start_point_err: [f64; 3],
    /// dE/dx per plane.
    pub dedx: Vec<f64>,
    /// dE/dx error per plane.
    pub dedx_err: Vec<f64>,
    /// Length.
    pub length: f64,
    /// Opening angle.
    pub open_angle: f64,
}

/// A particle-flow node with its hierarchy expressed as collection indices.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PFParticle {
    /// Particle type code.
    pub pdg_code: i32,
    /// Index of this particle in the output collection.
    pub self_index: usize,
    /// Index of the parent, `None` for a primary.
    pub parent: Option<usize>,
    /// Indices of the daughters.
    pub daughters: Vec<usize>,
}

impl PFParticle {
    /// Returns true if the particle has no parent.
    #[must_use]
    pub fn is_primary(&self) -> bool {
        self.parent.is_none()
    }
}

/// Cosmic-ray tag classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CosmicTagId {
    /// Evaluated and not tagged.
    #[default]
    NotTagged,
}

/// Cosmic-ray tag attached to a PFParticle.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CosmicTag {
    /// First end point.
    pub end_point1: [f32; 3],
    /// Second end point.
    pub end_point2: [f32; 3],
    /// Cosmic-ray likelihood.
    pub score: f32,
    /// Classification.
    pub tag: CosmicTagId,
}

impl CosmicTag {
    /// Placeholder tag carrying only a score.
    #[must_use]
    pub fn untagged(score: f32) -> Self {
        Self {
            end_point1: [-999.0; 3],
            end_point2: [-999.0; 3],
            score,
            tag: CosmicTagId::NotTagged,
        }
    }
}

/// Every collection and association produced by one processing call.
///
/// Associations index the collections of the same batch, except that
/// slice indices refer to the external slice list of the input.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProductBatch {
    /// Output hits.
    pub hits: Vec<Hit>,
    /// Clusters.
    pub clusters: Vec<Cluster>,
    /// 3D vertices.
    pub vertices: Vec<Vertex>,
    /// 2D vertices.
    pub end_points: Vec<EndPoint2D>,
    /// Showers.
    pub showers: Vec<Shower>,
    /// Particle-flow nodes.
    pub pfparticles: Vec<PFParticle>,
    /// Cosmic tags.
    pub cosmic_tags: Vec<CosmicTag>,
    /// Cluster to hit.
    pub cluster_hits: Assns,
    /// Cluster to 2D vertex, with the trajectory end as data.
    pub cluster_end_points: Assns<u16>,
    /// Cluster to 3D vertex, with the trajectory end as data.
    pub cluster_vertices: Assns<u16>,
    /// Shower to hit.
    pub shower_hits: Assns,
    /// PFParticle to cluster.
    pub pfp_clusters: Assns,
    /// PFParticle to shower.
    pub pfp_showers: Assns,
    /// PFParticle to 3D vertex.
    pub pfp_vertices: Assns,
    /// PFParticle to cosmic tag.
    pub pfp_cosmic_tags: Assns,
    /// External slice to PFParticle.
    pub slice_pfparticles: Assns,
    /// External slice to hit.
    pub slice_hits: Assns,
}
