//! Detector location keys and the geometry capability.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Multiplier applied to the TPC number in an encoded [`CtpCode`].
pub const TPC_PAD: u32 = 10;
/// Multiplier applied to the cryostat number in an encoded [`CtpCode`].
pub const CRYOSTAT_PAD: u32 = 10_000;

/// Wire plane orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum View {
    /// First induction plane.
    U,
    /// Second induction plane.
    V,
    /// Collection plane.
    Z,
    /// Orientation not known to the geometry.
    #[default]
    Unknown,
}

/// Identifies one wire plane: cryostat, TPC and plane number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlaneId {
    /// Cryostat number.
    pub cryostat: u32,
    /// TPC number within the cryostat.
    pub tpc: u32,
    /// Plane number within the TPC.
    pub plane: u32,
}

impl PlaneId {
    /// Creates a new plane id.
    #[inline]
    #[must_use]
    pub fn new(cryostat: u32, tpc: u32, plane: u32) -> Self {
        Self {
            cryostat,
            tpc,
            plane,
        }
    }

    /// Encodes the plane into a single integer.
    #[inline]
    #[must_use]
    pub fn encode(&self) -> CtpCode {
        CtpCode(self.cryostat * CRYOSTAT_PAD + self.tpc * TPC_PAD + self.plane)
    }
}

/// Cryostat, TPC and plane packed into one integer.
///
/// Codes order the same way as the `(cryostat, tpc, plane)` tuple as long as
/// plane < [`TPC_PAD`] and tpc < `CRYOSTAT_PAD / TPC_PAD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CtpCode(pub u32);

impl CtpCode {
    /// Decodes into the plane it names.
    #[inline]
    #[must_use]
    pub fn decode(self) -> PlaneId {
        let cryostat = self.0 / CRYOSTAT_PAD;
        let rest = self.0 - cryostat * CRYOSTAT_PAD;
        PlaneId {
            cryostat,
            tpc: rest / TPC_PAD,
            plane: rest % TPC_PAD,
        }
    }
}

/// Identifies one wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WireId {
    /// Cryostat number.
    pub cryostat: u32,
    /// TPC number within the cryostat.
    pub tpc: u32,
    /// Plane number within the TPC.
    pub plane: u32,
    /// Wire number within the plane.
    pub wire: u32,
}

impl WireId {
    /// Creates a new wire id.
    #[inline]
    #[must_use]
    pub fn new(cryostat: u32, tpc: u32, plane: u32, wire: u32) -> Self {
        Self {
            cryostat,
            tpc,
            plane,
            wire,
        }
    }

    /// Creates a wire id on the given plane.
    #[inline]
    #[must_use]
    pub fn on_plane(plane: PlaneId, wire: u32) -> Self {
        Self::new(plane.cryostat, plane.tpc, plane.plane, wire)
    }

    /// Returns the plane this wire belongs to.
    #[inline]
    #[must_use]
    pub fn plane_id(&self) -> PlaneId {
        PlaneId::new(self.cryostat, self.tpc, self.plane)
    }

    /// Returns the encoded plane of this wire.
    #[inline]
    #[must_use]
    pub fn ctp(&self) -> CtpCode {
        self.plane_id().encode()
    }
}

/// Geometry lookups needed while partitioning and assembling.
pub trait Geometry {
    /// Number of TPCs in the detector.
    fn tpc_count(&self) -> usize;

    /// Wire orientation of a plane.
    fn view(&self, plane: PlaneId) -> View;
}

/// Table-driven detector geometry.
///
/// Every TPC shares the same plane layout; plane `p` has view
/// `plane_views[p]`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DetectorGeometry {
    /// Number of TPCs.
    pub tpc_count: usize,
    /// View of each plane, indexed by plane number.
    pub plane_views: Vec<View>,
}

impl Default for DetectorGeometry {
    fn default() -> Self {
        Self {
            tpc_count: 1,
            plane_views: vec![View::U, View::V, View::Z],
        }
    }
}

impl DetectorGeometry {
    /// Creates a geometry with `tpc_count` TPCs and the default U/V/Z planes.
    #[must_use]
    pub fn with_tpc_count(tpc_count: usize) -> Self {
        Self {
            tpc_count,
            ..Self::default()
        }
    }
}

impl Geometry for DetectorGeometry {
    fn tpc_count(&self) -> usize {
        self.tpc_count
    }

    fn view(&self, plane: PlaneId) -> View {
        self.plane_views
            .get(plane.plane as usize)
            .copied()
            .unwrap_or_default()
    }
}
