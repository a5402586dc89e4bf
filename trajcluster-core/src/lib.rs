//! trajcluster-core: Core traits and types for slice-based cluster assembly.
//!
//! This crate provides the foundational abstractions shared by the slicing
//! and assembly stages: input hits and their location keys, the detector
//! geometry capability, the per-slice results returned by the external
//! trajectory-clustering algorithm, the output data products and the
//! association tables that link them.
//!

pub mod algorithm;
pub mod assns;
pub mod diagnostics;
pub mod error;
pub mod geometry;
pub mod hit;
pub mod products;
pub mod results;
pub mod slice;

pub use algorithm::TrajClusterAlgorithm;
pub use assns::{AssnPair, Assns};
pub use diagnostics::{AssemblyDiagnostics, LookupMiss, SliceFailure, SliceFailureReport};
pub use error::{Error, Result};
pub use geometry::{CtpCode, DetectorGeometry, Geometry, PlaneId, View, WireId};
pub use hit::{merge_hits, Hit, HitCollection, HitRef, ProductId, INVALID_CHANNEL};
pub use products::{
    Cluster, CosmicTag, CosmicTagId, EndPoint2D, PFParticle, ProductBatch, Shower, Vertex,
};
pub use results::{PfpResult, Shower3d, SliceResult, TrajFlags, TrajPoint, Trajectory, Vertex2d, Vertex3d};
pub use slice::{Slice, SliceHitSet, SliceHits};
