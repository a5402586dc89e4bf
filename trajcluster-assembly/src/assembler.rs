//! Output assembly and index remapping.
//!
//! Turns the per-slice results of the clustering algorithm into one set of
//! output collections. Four numbering spaces meet here:
//! - input hit index (the [`RemapTable`] key)
//! - slice-local hit index ([`SliceResult::slice_hits`] position)
//! - slice-local object id (1-based `id` of trajectories, vertices, PFParticles)
//! - output collection index (position in [`ProductBatch`])
//!
//! Slices are emitted in result order into shared, append-only collections.
//! Within a slice the order is 2D vertices, 3D vertices, clusters (with their
//! merged hits), showers, PFParticles. A [`SliceFailure`] stops the rest of
//! that slice; whatever it already appended stays.
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::module_name_repetitions
)]

use crate::config::ProducerConfig;
use crate::leftover::reconcile_leftovers;
use crate::remap::{ClaimError, RemapTable};
use log::{debug, warn};
use std::collections::HashMap;
use std::ops::Range;
use trajcluster_core::algorithm::TrajClusterAlgorithm;
use trajcluster_core::diagnostics::{
    AssemblyDiagnostics, LookupMiss, SliceFailure, SliceFailureReport,
};
use trajcluster_core::error::{Error, Result};
use trajcluster_core::geometry::{Geometry, WireId};
use trajcluster_core::hit::{Hit, HitCollection};
use trajcluster_core::products::{
    Cluster, CosmicTag, EndPoint2D, PFParticle, ProductBatch, Shower, Vertex,
};
use trajcluster_core::results::{SliceResult, TrajPoint, Trajectory};
use trajcluster_core::slice::{SliceHitSet, SliceHits, SYNTHETIC_SLICE_ID};

/// Product batch and diagnostics of one processing call.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AssemblyOutput {
    /// Collections and associations to publish.
    pub batch: ProductBatch,
    /// Recovered problems.
    pub diagnostics: AssemblyDiagnostics,
}

/// Why emission of a slice stopped.
enum Abort {
    Slice(SliceFailure),
    Fatal(Error),
}

impl From<SliceFailure> for Abort {
    fn from(failure: SliceFailure) -> Self {
        Self::Slice(failure)
    }
}

impl From<Error> for Abort {
    fn from(error: Error) -> Self {
        Self::Fatal(error)
    }
}

/// Slice-local id to output index lookups, rebuilt for every slice.
#[derive(Default)]
struct SliceTables {
    /// 2D vertex id -> (end point index, 3D vertex id it belongs to).
    end_points: HashMap<i32, (usize, i32)>,
    /// 3D vertex id -> vertex index.
    vertices: HashMap<i32, usize>,
    /// Slice-local PFParticle position -> shower index.
    showers: HashMap<usize, usize>,
    /// PFParticle id -> PFParticle index.
    pfparticles: HashMap<i32, usize>,
}

/// Accumulates output collections across slices.
///
/// Owns the [`RemapTable`] and every output collection for the duration of
/// one processing call. Slices must be fed in order through
/// [`assemble_slice`](Self::assemble_slice); later claims are checked
/// against all earlier ones.
pub struct Assembler<'a, G: Geometry + ?Sized> {
    input: &'a HitCollection,
    slices: Option<&'a [SliceHits]>,
    geometry: &'a G,
    config: &'a ProducerConfig,
    remap: RemapTable,
    batch: ProductBatch,
    diagnostics: AssemblyDiagnostics,
    /// |cluster id| -> first cluster carrying it.
    clusters_by_uid: HashMap<i64, usize>,
}

impl<'a, G: Geometry + ?Sized> Assembler<'a, G> {
    /// Creates an assembler for one processing call.
    pub fn new(
        input: &'a HitCollection,
        slices: Option<&'a [SliceHits]>,
        geometry: &'a G,
        config: &'a ProducerConfig,
    ) -> Self {
        Self {
            input,
            slices,
            geometry,
            config,
            remap: RemapTable::new(input.len()),
            batch: ProductBatch::default(),
            diagnostics: AssemblyDiagnostics::default(),
            clusters_by_uid: HashMap::new(),
        }
    }

    /// Current input to output hit mapping.
    #[must_use]
    pub fn remap(&self) -> &RemapTable {
        &self.remap
    }

    /// Collections assembled so far.
    #[must_use]
    pub fn batch(&self) -> &ProductBatch {
        &self.batch
    }

    /// Records external slices the partitioner dropped.
    pub fn record_dropped(&mut self, ids: impl IntoIterator<Item = u32>) {
        self.diagnostics.dropped_slices.extend(ids);
    }

    /// Emits the output records of one slice.
    ///
    /// `set` is the hit set the result was reconstructed from, if known.
    /// Slice failures are recorded in the diagnostics and return `Ok`.
    ///
    /// # Errors
    /// Returns an error if an association cannot be recorded or a shower
    /// references an unclaimed hit. The whole call must then be abandoned.
    pub fn assemble_slice<A: TrajClusterAlgorithm + ?Sized>(
        &mut self,
        result_index: usize,
        set: Option<&SliceHitSet>,
        result: &SliceResult,
        algorithm: &A,
    ) -> Result<()> {
        let slice_id = set.map_or(SYNTHETIC_SLICE_ID, |s| s.slice_id);
        let slice = set.and_then(|s| s.slice_index);

        if !result.is_valid {
            warn!("Skipping invalid result {result_index} of slice {slice_id}");
            self.diagnostics.invalid_slices.push(result_index);
            return Ok(());
        }

        let mut tables = SliceTables::default();
        self.emit_vertices(result, &mut tables);

        match self.emit_clusters(result, slice, &tables, algorithm) {
            Ok(()) => {}
            Err(Abort::Fatal(error)) => return Err(error),
            Err(Abort::Slice(failure)) => {
                warn!("Bad slice {slice_id} (result {result_index}): {failure}");
                self.diagnostics.slice_failures.push(SliceFailureReport {
                    result_index,
                    slice_id,
                    failure,
                });
                return Ok(());
            }
        }

        self.emit_showers(result, &mut tables)?;
        self.emit_pfparticles(result, slice, &mut tables)?;

        debug!(
            "Slice {slice_id} (result {result_index}): {} hits, {} clusters, {} pfparticles so far",
            self.batch.hits.len(),
            self.batch.clusters.len(),
            self.batch.pfparticles.len()
        );
        Ok(())
    }

    /// Copies unclaimed hits and returns the finished batch.
    ///
    /// # Errors
    /// Returns an error if a slice to hit association cannot be recorded.
    pub fn finish(mut self) -> Result<AssemblyOutput> {
        let copied = reconcile_leftovers(self.input, self.slices, &mut self.remap, &mut self.batch)?;
        debug!("Copied {copied} unused hits");
        Ok(AssemblyOutput {
            batch: self.batch,
            diagnostics: self.diagnostics,
        })
    }

    fn slice_count(&self) -> usize {
        self.slices.map_or(0, <[SliceHits]>::len)
    }

    fn emit_vertices(&mut self, result: &SliceResult, tables: &mut SliceTables) {
        let units_per_tick = f64::from(self.config.units_per_tick);
        for vx2 in result.vertices_2d.iter().filter(|v| v.id > 0) {
            let plane = vx2.ctp.decode();
            let wire = vx2.pos[0].round_ties_even().max(0.0) as u32;
            let index = self.batch.end_points.len();
            tables
                .end_points
                .entry(vx2.id)
                .or_insert((index, vx2.vx3_id));
            self.batch.end_points.push(EndPoint2D {
                drift_time: f64::from(vx2.pos[1]) / units_per_tick,
                wire_id: WireId::on_plane(plane, wire),
                strength: f64::from(vx2.score),
                id: vx2.uid,
                view: self.geometry.view(plane),
                total_charge: 0.0,
            });
        }

        for vx3 in result
            .vertices_3d
            .iter()
            .filter(|v| v.id > 0 && v.is_complete())
        {
            let index = self.batch.vertices.len();
            tables.vertices.entry(vx3.id).or_insert(index);
            self.batch.vertices.push(Vertex {
                xyz: [f64::from(vx3.x), f64::from(vx3.y), f64::from(vx3.z)],
                id: vx3.uid,
            });
        }
    }

    fn emit_clusters<A: TrajClusterAlgorithm + ?Sized>(
        &mut self,
        result: &SliceResult,
        slice: Option<usize>,
        tables: &SliceTables,
        algorithm: &A,
    ) -> std::result::Result<(), Abort> {
        for tj in result.trajectories.iter().filter(|tj| !tj.flags.killed) {
            let first = end_point(tj, 0)?;
            let last = end_point(tj, 1)?;

            let begin = self.batch.hits.len();
            let mut integral = 0.0_f32;
            let mut summed_adc = 0.0_f32;
            for tp in tj.pts.iter().filter(|tp| tp.is_retained()) {
                let tp_hits = self.resolve_point(tj.uid, tp, result)?;
                if tp_hits.is_empty() {
                    continue;
                }
                let hit = algorithm
                    .merge_hits(&tp_hits)
                    .filter(Hit::is_valid)
                    .ok_or_else(|| SliceFailure::MergeFailed {
                        trajectory: tj.uid,
                        hits: tp_hits.clone(),
                    })?;
                let output = self.batch.hits.len();
                for &index in &tp_hits {
                    self.remap
                        .claim(index, output)
                        .map_err(|e| claim_failure(tj.uid, e))?;
                }
                integral += hit.integral;
                summed_adc += hit.summed_adc;
                self.batch.hits.push(hit);
                if let Some(slice) = slice {
                    let (n_slices, n_hits) = (self.slice_count(), self.batch.hits.len());
                    self.batch
                        .slice_hits
                        .link("slice-hit", (slice, n_slices), (output, n_hits), ())?;
                }
            }

            let hits = begin..self.batch.hits.len();
            self.push_cluster(tj, first, last, hits, (integral, summed_adc), tables)?;
        }
        Ok(())
    }

    /// Resolves the hits a point uses to input indices, checking each is claimable.
    fn resolve_point(
        &self,
        trajectory: i32,
        tp: &TrajPoint,
        result: &SliceResult,
    ) -> std::result::Result<Vec<usize>, SliceFailure> {
        let mut hits = Vec::with_capacity(tp.hits.len());
        for local in tp.used_hits() {
            let &index = result
                .slice_hits
                .get(local)
                .ok_or(SliceFailure::BadSliceHitIndex {
                    trajectory,
                    local,
                    len: result.slice_hits.len(),
                })?;
            self.remap
                .check(index)
                .map_err(|e| claim_failure(trajectory, e))?;
            if hits.contains(&index) {
                return Err(SliceFailure::DuplicateClaim {
                    trajectory,
                    index,
                    owner: self.batch.hits.len(),
                });
            }
            hits.push(index);
        }
        Ok(hits)
    }

    fn push_cluster(
        &mut self,
        tj: &Trajectory,
        first: &TrajPoint,
        last: &TrajPoint,
        hits: Range<usize>,
        (integral, summed_adc): (f32, f32),
        tables: &SliceTables,
    ) -> Result<()> {
        let plane = tj.ctp.decode();
        let units_per_tick = self.config.units_per_tick;
        // Counts one more than the hits actually linked.
        let n_hits = u32::try_from(hits.len() + 1).unwrap_or(u32::MAX);
        let id = if tj.flags.shower_like {
            tj.uid.wrapping_neg()
        } else {
            tj.uid
        };

        let cluster = self.batch.clusters.len();
        self.batch.clusters.push(Cluster {
            start_wire: first.pos[0],
            start_tick: first.pos[1] / units_per_tick,
            start_charge: first.ave_chg,
            start_angle: first.ang,
            end_wire: last.pos[0],
            end_tick: last.pos[1] / units_per_tick,
            end_charge: last.ave_chg,
            end_angle: last.ang,
            integral,
            summed_adc,
            n_hits,
            id,
            view: self.geometry.view(plane),
            plane,
        });
        self.clusters_by_uid
            .entry(i64::from(id).abs())
            .or_insert(cluster);

        let n_clusters = self.batch.clusters.len();
        let n_hits = self.batch.hits.len();
        for hit in hits {
            self.batch
                .cluster_hits
                .link("cluster-hit", (cluster, n_clusters), (hit, n_hits), ())?;
        }

        for end in 0..2_u16 {
            let vtx_id = tj.vtx_id[usize::from(end)];
            if vtx_id <= 0 {
                continue;
            }
            let Some(&(end_point, vx3_id)) = tables.end_points.get(&vtx_id) else {
                continue;
            };
            let n_end_points = self.batch.end_points.len();
            self.batch.cluster_end_points.link(
                "cluster-endpoint",
                (cluster, n_clusters),
                (end_point, n_end_points),
                end,
            )?;
            if vx3_id <= 0 {
                continue;
            }
            if let Some(&vertex) = tables.vertices.get(&vx3_id) {
                let n_vertices = self.batch.vertices.len();
                self.batch.cluster_vertices.link(
                    "cluster-vertex",
                    (cluster, n_clusters),
                    (vertex, n_vertices),
                    end,
                )?;
            }
        }
        Ok(())
    }

    fn emit_showers(&mut self, result: &SliceResult, tables: &mut SliceTables) -> Result<()> {
        for ss3 in result.showers.iter().filter(|s| s.id > 0) {
            let shower = self.batch.showers.len();
            tables.showers.entry(ss3.pfp_index).or_insert(shower);
            self.batch.showers.push(Shower {
                id: ss3.uid,
                total_energy: ss3.energy.clone(),
                total_energy_err: ss3.energy_err.clone(),
                total_mip_energy: ss3.mip_energy.clone(),
                total_mip_energy_err: ss3.mip_energy_err.clone(),
                best_plane: ss3.best_plane,
                direction: ss3.dir,
                direction_err: ss3.dir_err,
                start_point: ss3.start,
                start_point_err: ss3.start_err,
                dedx: ss3.dedx.clone(),
                dedx_err: ss3.dedx_err.clone(),
                length: ss3.len,
                open_angle: ss3.open_angle,
            });

            let n_showers = self.batch.showers.len();
            let n_hits = self.batch.hits.len();
            for &hit in &ss3.hits {
                let output = self
                    .remap
                    .owner(hit)
                    .ok_or(Error::UnclaimedShowerHit { shower, hit })?;
                self.batch
                    .shower_hits
                    .link("shower-hit", (shower, n_showers), (output, n_hits), ())?;
            }
        }
        Ok(())
    }

    fn emit_pfparticles(
        &mut self,
        result: &SliceResult,
        slice: Option<usize>,
        tables: &mut SliceTables,
    ) -> Result<()> {
        // Pass 1: allocate records in emission order.
        let mut emitted = Vec::with_capacity(result.pfparticles.len());
        for (position, pfp) in result.pfparticles.iter().enumerate() {
            if pfp.id <= 0 {
                continue;
            }
            let index = self.batch.pfparticles.len();
            tables.pfparticles.entry(pfp.id).or_insert(index);
            self.batch.pfparticles.push(PFParticle {
                pdg_code: pfp.pdg_code,
                self_index: index,
                parent: None,
                daughters: Vec::new(),
            });
            emitted.push((position, index));
        }

        let mut trajectory_uids: HashMap<i32, i32> = HashMap::new();
        for tj in &result.trajectories {
            trajectory_uids.entry(tj.id).or_insert(tj.uid);
        }

        // Pass 2: resolve references and build associations.
        for (position, index) in emitted {
            let pfp = &result.pfparticles[position];

            if pfp.parent_id > 0 {
                match tables.pfparticles.get(&pfp.parent_id) {
                    Some(&parent) => self.batch.pfparticles[index].parent = Some(parent),
                    None => self.miss(LookupMiss::Parent {
                        pfparticle: index,
                        parent_id: pfp.parent_id,
                    }),
                }
            }
            let mut daughters = Vec::with_capacity(pfp.dtr_ids.len());
            for &daughter_id in pfp.dtr_ids.iter().filter(|&&id| id != 0) {
                match tables.pfparticles.get(&daughter_id) {
                    Some(&daughter) => daughters.push(daughter),
                    None => self.miss(LookupMiss::Daughter {
                        pfparticle: index,
                        daughter_id,
                    }),
                }
            }
            self.batch.pfparticles[index].daughters = daughters;

            let n_pfps = self.batch.pfparticles.len();
            for &trajectory_id in &pfp.tj_ids {
                let Some(&uid) = trajectory_uids.get(&trajectory_id) else {
                    self.miss(LookupMiss::Trajectory {
                        pfparticle: index,
                        trajectory_id,
                    });
                    continue;
                };
                let Some(&cluster) = self.clusters_by_uid.get(&i64::from(uid).abs()) else {
                    self.miss(LookupMiss::Cluster {
                        pfparticle: index,
                        trajectory_uid: uid,
                    });
                    continue;
                };
                let n_clusters = self.batch.clusters.len();
                self.batch
                    .pfp_clusters
                    .link("pfparticle-cluster", (index, n_pfps), (cluster, n_clusters), ())?;
            }

            let vertex_id = pfp.vx3_id[0];
            if vertex_id > 0 {
                if let Some(&vertex) = tables.vertices.get(&vertex_id) {
                    let n_vertices = self.batch.vertices.len();
                    self.batch
                        .pfp_vertices
                        .link("pfparticle-vertex", (index, n_pfps), (vertex, n_vertices), ())?;
                } else {
                    self.miss(LookupMiss::Vertex {
                        pfparticle: index,
                        vertex_id,
                    });
                }
            }

            if let Some(slice) = slice {
                let n_slices = self.slice_count();
                self.batch
                    .slice_pfparticles
                    .link("slice-pfparticle", (slice, n_slices), (index, n_pfps), ())?;
            }

            if pfp.pdg_code == self.config.shower_pdg_code {
                if let Some(&shower) = tables.showers.get(&position) {
                    let n_showers = self.batch.showers.len();
                    self.batch
                        .pfp_showers
                        .link("pfparticle-shower", (index, n_pfps), (shower, n_showers), ())?;
                } else {
                    self.miss(LookupMiss::Shower { pfparticle: index });
                }
            }

            if self.config.tag_cosmics {
                let tag = self.batch.cosmic_tags.len();
                self.batch.cosmic_tags.push(CosmicTag::untagged(pfp.cosmic_score));
                let n_tags = self.batch.cosmic_tags.len();
                self.batch
                    .pfp_cosmic_tags
                    .link("pfparticle-cosmictag", (index, n_pfps), (tag, n_tags), ())?;
            }
        }
        Ok(())
    }

    fn miss(&mut self, miss: LookupMiss) {
        warn!("Skipping unresolved link: {miss:?}");
        self.diagnostics.lookup_misses.push(miss);
    }
}

fn end_point(tj: &Trajectory, end: usize) -> std::result::Result<&TrajPoint, SliceFailure> {
    let point = tj.end_pt[end];
    tj.pts.get(point).ok_or(SliceFailure::BadEndPoint {
        trajectory: tj.uid,
        point,
    })
}

fn claim_failure(trajectory: i32, error: ClaimError) -> SliceFailure {
    match error {
        ClaimError::OutOfRange { index, len } => SliceFailure::BadInputHitIndex {
            trajectory,
            index,
            len,
        },
        ClaimError::AlreadyClaimed { index, owner } => SliceFailure::DuplicateClaim {
            trajectory,
            index,
            owner,
        },
    }
}
