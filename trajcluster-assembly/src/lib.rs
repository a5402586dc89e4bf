//! trajcluster-assembly: Output assembly for sliced trajectory clustering.
//!
//! This crate turns the per-slice results of a trajectory-clustering
//! algorithm into one globally consistent product batch:
//! - **Assembler** - merges and claims hits, synthesizes clusters, vertices,
//!   showers and PFParticles, and rewrites slice-local references
//! - **Leftovers** - copies every input hit no cluster used
//! - **Producer** - drives partition, sort, run, assembly and reset per event
//! - **Replay** - an algorithm that plays back recorded slice results
//!

mod assembler;
mod config;
mod leftover;
mod producer;
mod remap;
mod replay;

pub use assembler::{Assembler, AssemblyOutput};
pub use config::{ProducerConfig, SHOWER_PDG_CODE};
pub use leftover::reconcile_leftovers;
pub use producer::TrajClusterProducer;
pub use remap::{ClaimError, RemapTable};
pub use replay::ReplayAlgorithm;
