//! trajcluster-slicing: Slice partitioning and canonical hit ordering.
//!
//! This crate prepares the per-slice hit index sets handed to the
//! trajectory-clustering algorithm:
//! - **Partitioning** - one set per external slice (or one for all hits),
//!   split so that every set lies in a single TPC
//! - **Ordering** - the total order (plane, wire, tick, local index) the
//!   algorithm relies on
//!
#![warn(missing_docs)]

mod ordering;
mod partition;

pub use ordering::{sort_hit_indices, sort_slice, SortKey};
pub use partition::{partition_hits, split_by_tpc, Partition, PartitionConfig};
