//! Per-event driver: partition, sort, run, assemble, reconcile, reset.

use crate::assembler::{Assembler, AssemblyOutput};
use crate::config::ProducerConfig;
use log::{debug, info};
use trajcluster_core::algorithm::TrajClusterAlgorithm;
use trajcluster_core::error::Result;
use trajcluster_core::geometry::{DetectorGeometry, Geometry};
use trajcluster_core::hit::HitCollection;
use trajcluster_core::slice::SliceHits;
use trajcluster_slicing::{partition_hits, sort_slice};

/// Drives one trajectory-clustering algorithm over whole events.
///
/// Each call to [`produce`](Self::produce) handles exactly one event from
/// start to finish. No state survives between calls: the algorithm's
/// result buffers are cleared at the end of every call, also when it fails.
pub struct TrajClusterProducer<A, G = DetectorGeometry> {
    config: ProducerConfig,
    geometry: G,
    algorithm: A,
}

impl<A: TrajClusterAlgorithm> TrajClusterProducer<A> {
    /// Creates a producer using the geometry described by `config`.
    pub fn new(config: ProducerConfig, algorithm: A) -> Self {
        let geometry = config.geometry.clone();
        Self {
            config,
            geometry,
            algorithm,
        }
    }
}

impl<A: TrajClusterAlgorithm, G: Geometry> TrajClusterProducer<A, G> {
    /// Replaces the geometry collaborator.
    pub fn with_geometry<H: Geometry>(self, geometry: H) -> TrajClusterProducer<A, H> {
        TrajClusterProducer {
            config: self.config,
            geometry,
            algorithm: self.algorithm,
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ProducerConfig {
        &self.config
    }

    /// Returns the algorithm.
    pub fn algorithm(&self) -> &A {
        &self.algorithm
    }

    /// Returns the algorithm mutably, e.g. to load the next event's recording.
    pub fn algorithm_mut(&mut self) -> &mut A {
        &mut self.algorithm
    }

    /// Processes one event.
    ///
    /// `slices` is the optional external hit to slice association.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid, the algorithm
    /// rejects the hits, the slice association is inconsistent with `hits`,
    /// or an association link cannot be recorded. Nothing is returned for
    /// publication in that case.
    pub fn produce(
        &mut self,
        hits: &HitCollection,
        slices: Option<&[SliceHits]>,
    ) -> Result<AssemblyOutput> {
        let output = self.reconstruct(hits, slices);
        self.algorithm.clear_results();
        output
    }

    fn reconstruct(
        &mut self,
        hits: &HitCollection,
        slices: Option<&[SliceHits]>,
    ) -> Result<AssemblyOutput> {
        self.config.validate()?;
        self.algorithm.set_input_hits(hits.as_slice())?;

        let mut partition = partition_hits(hits, slices, &self.geometry, &self.config.partition)?;
        debug!(
            "{}: {} slice hit sets, {} slices dropped",
            self.algorithm.name(),
            partition.sets.len(),
            partition.dropped.len()
        );
        for set in &mut partition.sets {
            sort_slice(hits.as_slice(), set);
            self.algorithm.run(&set.hits);
        }

        let mut assembler = Assembler::new(hits, slices, &self.geometry, &self.config);
        assembler.record_dropped(partition.dropped.iter().copied());
        for index in 0..self.algorithm.slice_count() {
            let Some(result) = self.algorithm.slice(index) else {
                continue;
            };
            assembler.assemble_slice(index, partition.sets.get(index), result, &self.algorithm)?;
        }
        let output = assembler.finish()?;

        info!(
            "{} input hits -> {} hits, {} clusters, {} showers, {} pfparticles ({} slice failures)",
            hits.len(),
            output.batch.hits.len(),
            output.batch.clusters.len(),
            output.batch.showers.len(),
            output.batch.pfparticles.len(),
            output.diagnostics.slice_failures.len()
        );
        Ok(output)
    }
}
