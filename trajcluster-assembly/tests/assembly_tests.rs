#![allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
use approx::assert_relative_eq;
use trajcluster_assembly::{Assembler, ProducerConfig, ReplayAlgorithm, TrajClusterProducer};
use trajcluster_core::algorithm::TrajClusterAlgorithm;
use trajcluster_core::diagnostics::{LookupMiss, SliceFailure};
use trajcluster_core::error::Error;
use trajcluster_core::geometry::{DetectorGeometry, PlaneId, WireId};
use trajcluster_core::hit::{Hit, HitCollection, HitRef, ProductId};
use trajcluster_core::results::{
    PfpResult, Shower3d, SliceResult, TrajFlags, TrajPoint, Trajectory, Vertex2d, Vertex3d,
};
use trajcluster_core::slice::SliceHits;

const PRODUCT: ProductId = ProductId(1);

// One hit per wire on the collection plane of TPC 0.
fn make_hits(n: u32) -> HitCollection {
    let hits = (0..n)
        .map(|i| {
            Hit::new(i, WireId::new(0, 0, 2, i), 100 + i as i32, 110 + i as i32)
                .with_charge(10.0 + i as f32, 20.0 + i as f32)
        })
        .collect();
    HitCollection::new(PRODUCT, hits)
}

fn slice(id: u32, keys: &[usize]) -> SliceHits {
    SliceHits::new(id, keys.iter().map(|&k| HitRef::new(PRODUCT, k)).collect())
}

fn point(local: &[usize]) -> TrajPoint {
    TrajPoint {
        pos: [local[0] as f32, 50.0],
        ang: 0.25,
        ave_chg: 12.0,
        chg: 12.0,
        hits: local.to_vec(),
        use_hit: vec![true; local.len()],
    }
}

// A trajectory with one point per entry of `points`.
fn trajectory(id: i32, uid: i32, points: &[&[usize]]) -> Trajectory {
    Trajectory {
        id,
        uid,
        ctp: PlaneId::new(0, 0, 2).encode(),
        pts: points.iter().map(|p| point(p)).collect(),
        end_pt: [0, points.len() - 1],
        ..Trajectory::default()
    }
}

fn producer(recorded: Vec<SliceResult>) -> TrajClusterProducer<ReplayAlgorithm> {
    TrajClusterProducer::new(ProducerConfig::default(), ReplayAlgorithm::new(recorded))
}

#[test]
fn test_unused_hits_appended_after_cluster() {
    let hits = make_hits(5);
    let result = SliceResult {
        trajectories: vec![trajectory(1, 1, &[&[0], &[1], &[2]])],
        ..SliceResult::default()
    };
    let mut producer = producer(vec![result]);
    let output = producer.produce(&hits, None).unwrap();
    let batch = &output.batch;

    assert_eq!(batch.hits.len(), 5);
    assert_eq!(batch.clusters.len(), 1);
    assert_eq!(batch.cluster_hits.rights_of(0).collect::<Vec<_>>(), vec![0, 1, 2]);
    assert_eq!(batch.hits[3], hits.hits[3]);
    assert_eq!(batch.hits[4], hits.hits[4]);
    assert!(batch.slice_hits.is_empty());

    let cluster = &batch.clusters[0];
    assert_eq!(cluster.id, 1);
    assert_eq!(cluster.n_hits, 4);
    assert_relative_eq!(cluster.integral, 10.0 + 11.0 + 12.0);
    assert_relative_eq!(cluster.summed_adc, 20.0 + 21.0 + 22.0);
    assert_relative_eq!(cluster.start_wire, 0.0);
    assert_relative_eq!(cluster.end_wire, 2.0);
    assert_eq!(cluster.plane, PlaneId::new(0, 0, 2));
    assert!(output.diagnostics.is_complete());
}

#[test]
fn test_small_slices_dropped_and_copied() {
    let hits = make_hits(4);
    let slices = vec![slice(7, &[0, 1]), slice(8, &[2, 3])];
    let mut producer = producer(vec![]);
    let output = producer.produce(&hits, Some(&slices)).unwrap();

    assert_eq!(output.diagnostics.dropped_slices, vec![7, 8]);
    assert_eq!(output.batch.hits, hits.hits);
    assert!(output.batch.clusters.is_empty());
    assert_eq!(
        output
            .batch
            .slice_hits
            .iter()
            .map(|p| (p.left, p.right))
            .collect::<Vec<_>>(),
        vec![(0, 0), (0, 1), (1, 2), (1, 3)]
    );
}

#[test]
fn test_duplicate_claim_fails_later_slice() {
    let hits = make_hits(10);
    let slices = vec![slice(11, &[0, 1, 2, 3, 7]), slice(12, &[7, 8, 9])];
    let first = SliceResult {
        trajectories: vec![trajectory(1, 1, &[&[3], &[4]])],
        ..SliceResult::default()
    };
    let second = SliceResult {
        trajectories: vec![trajectory(1, 2, &[&[0], &[1]])],
        ..SliceResult::default()
    };
    let mut producer = producer(vec![first, second]);
    let output = producer.produce(&hits, Some(&slices)).unwrap();

    assert_eq!(output.batch.clusters.len(), 1);
    assert_eq!(output.batch.clusters[0].id, 1);
    let failures = &output.diagnostics.slice_failures;
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].result_index, 1);
    assert_eq!(failures[0].slice_id, 12);
    assert_eq!(
        failures[0].failure,
        SliceFailure::DuplicateClaim {
            trajectory: 2,
            index: 7,
            owner: 1
        }
    );
    // Hit 8 was never claimed by the failed point.
    assert_eq!(output.batch.hits.len(), 10);
    assert!(!output.diagnostics.is_complete());
}

#[test]
fn test_shower_like_cluster_id_negated() {
    let hits = make_hits(6);
    let mut shower_like = trajectory(1, 5, &[&[0], &[1]]);
    shower_like.flags = TrajFlags {
        shower_like: true,
        ..TrajFlags::default()
    };
    let mut killed = trajectory(3, 7, &[&[4], &[5]]);
    killed.flags.killed = true;
    let result = SliceResult {
        trajectories: vec![shower_like, trajectory(2, 6, &[&[2], &[3]]), killed],
        ..SliceResult::default()
    };
    let output = producer(vec![result]).produce(&hits, None).unwrap();

    let ids: Vec<i32> = output.batch.clusters.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![-5, 6]);
    // Hits of the killed trajectory come back as leftovers.
    assert_eq!(output.batch.hits[4], hits.hits[4]);
    assert_eq!(output.batch.hits[5], hits.hits[5]);
}

#[test]
fn test_merged_point_claims_every_hit() {
    let mut hits = make_hits(4);
    hits.hits[1].wire_id = hits.hits[0].wire_id;
    hits.hits[1].channel = hits.hits[0].channel;
    let result = SliceResult {
        slice_hits: vec![0, 1, 2, 3],
        trajectories: vec![trajectory(1, 1, &[&[0, 1], &[2]])],
        ..SliceResult::default()
    };
    let output = producer(vec![result]).produce(&hits, None).unwrap();

    // Two output hits for three claimed inputs, plus one leftover.
    assert_eq!(output.batch.hits.len(), 3);
    assert_relative_eq!(output.batch.hits[0].integral, 10.0 + 11.0);
    assert_eq!(output.batch.hits[2], hits.hits[3]);
}

#[test]
fn test_merge_failure_fails_slice() {
    let hits = make_hits(4);
    let result = SliceResult {
        slice_hits: vec![0, 1, 2, 3],
        trajectories: vec![
            trajectory(1, 1, &[&[2], &[3]]),
            trajectory(2, 2, &[&[0, 1]]),
        ],
        ..SliceResult::default()
    };
    let output = producer(vec![result]).produce(&hits, None).unwrap();

    assert_eq!(output.batch.clusters.len(), 1);
    assert_eq!(
        output.diagnostics.slice_failures[0].failure,
        SliceFailure::MergeFailed {
            trajectory: 2,
            hits: vec![0, 1]
        }
    );
    assert_eq!(output.batch.hits.len(), 4);
}

#[test]
fn test_bad_local_index_fails_slice() {
    let hits = make_hits(3);
    let result = SliceResult {
        trajectories: vec![trajectory(1, 1, &[&[0], &[9]])],
        ..SliceResult::default()
    };
    let output = producer(vec![result]).produce(&hits, None).unwrap();

    assert!(output.batch.clusters.is_empty());
    assert_eq!(
        output.diagnostics.slice_failures[0].failure,
        SliceFailure::BadSliceHitIndex {
            trajectory: 1,
            local: 9,
            len: 3
        }
    );
    assert_eq!(output.batch.hits, hits.hits);
}

#[test]
fn test_input_index_out_of_range_fails_slice() {
    let hits = make_hits(6);
    let slices = vec![slice(1, &[0, 1, 2]), slice(2, &[3, 4, 5])];
    let first = SliceResult {
        trajectories: vec![trajectory(1, 1, &[&[0], &[1]])],
        ..SliceResult::default()
    };
    let second = SliceResult {
        slice_hits: vec![3, 99, 5],
        trajectories: vec![trajectory(1, 2, &[&[1], &[2]])],
        ..SliceResult::default()
    };
    let output = producer(vec![first, second])
        .produce(&hits, Some(&slices))
        .unwrap();

    assert_eq!(output.batch.clusters.len(), 1);
    assert_eq!(output.batch.clusters[0].id, 1);
    let failures = &output.diagnostics.slice_failures;
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].result_index, 1);
    assert_eq!(failures[0].slice_id, 2);
    assert_eq!(
        failures[0].failure,
        SliceFailure::BadInputHitIndex {
            trajectory: 2,
            index: 99,
            len: 6
        }
    );
    assert_eq!(output.batch.hits.len(), 6);
}

#[test]
fn test_bad_end_point_fails_slice() {
    let hits = make_hits(3);
    let mut tj = trajectory(1, 8, &[&[0], &[1]]);
    tj.end_pt = [0, 5];
    let result = SliceResult {
        trajectories: vec![tj],
        ..SliceResult::default()
    };
    let output = producer(vec![result]).produce(&hits, None).unwrap();

    assert!(output.batch.clusters.is_empty());
    assert_eq!(
        output.diagnostics.slice_failures[0].failure,
        SliceFailure::BadEndPoint {
            trajectory: 8,
            point: 5
        }
    );
    // Nothing was claimed before the end points were checked.
    assert_eq!(output.batch.hits, hits.hits);
}

#[test]
fn test_tpc_pieces_link_to_parent_slice() {
    let hits = (0..6_u32)
        .map(|i| {
            let tpc = u32::from(i >= 3);
            Hit::new(i, WireId::new(0, tpc, 2, i), 100, 110).with_charge(5.0, 6.0)
        })
        .collect();
    let hits = HitCollection::new(PRODUCT, hits);
    let slices = vec![slice(4, &[0, 1]), slice(9, &[3, 0, 4, 1, 5, 2])];
    let recorded = vec![
        SliceResult {
            trajectories: vec![trajectory(1, 1, &[&[0], &[1], &[2]])],
            ..SliceResult::default()
        },
        SliceResult {
            trajectories: vec![trajectory(1, 2, &[&[0], &[1], &[2]])],
            ..SliceResult::default()
        },
    ];
    let config = ProducerConfig::default().with_geometry(DetectorGeometry::with_tpc_count(2));
    let mut producer = TrajClusterProducer::new(config, ReplayAlgorithm::new(recorded));
    let output = producer.produce(&hits, Some(&slices)).unwrap();

    assert_eq!(output.diagnostics.dropped_slices, vec![4]);
    assert_eq!(output.batch.clusters.len(), 2);
    assert_eq!(output.batch.hits.len(), 6);
    assert_eq!(output.batch.slice_hits.len(), 6);
    assert!(output.batch.slice_hits.iter().all(|p| p.left == 1));
    // First-seen TPC order: the TPC 1 piece runs first.
    assert_eq!(output.batch.hits[0].channel, 3);
}

#[test]
fn test_vertices_and_cluster_links() {
    let hits = make_hits(4);
    let mut tj = trajectory(1, 1, &[&[0], &[1], &[2]]);
    tj.vtx_id = [1, 0];
    let result = SliceResult {
        trajectories: vec![tj],
        vertices_2d: vec![
            Vertex2d {
                id: 1,
                uid: 21,
                ctp: PlaneId::new(0, 0, 2).encode(),
                pos: [3.6, 80.0],
                score: 0.5,
                vx3_id: 1,
            },
            Vertex2d::default(),
        ],
        vertices_3d: vec![
            Vertex3d {
                id: 1,
                uid: 31,
                x: 1.0,
                y: 2.0,
                z: 3.0,
                wire: -1,
            },
            Vertex3d {
                id: 2,
                uid: 32,
                wire: 5,
                ..Vertex3d::default()
            },
        ],
        ..SliceResult::default()
    };
    let config = ProducerConfig::default().with_units_per_tick(2.0);
    let mut producer = TrajClusterProducer::new(config, ReplayAlgorithm::new(vec![result]));
    let batch = producer.produce(&hits, None).unwrap().batch;

    assert_eq!(batch.end_points.len(), 1);
    let end_point = &batch.end_points[0];
    assert_eq!(end_point.id, 21);
    assert_eq!(end_point.wire_id.wire, 4);
    assert_relative_eq!(end_point.drift_time, 40.0);
    assert_eq!(batch.vertices.len(), 1);
    assert_eq!(batch.vertices[0].id, 31);

    let end_links: Vec<_> = batch
        .cluster_end_points
        .iter()
        .map(|p| (p.left, p.right, p.data))
        .collect();
    assert_eq!(end_links, vec![(0, 0, 0)]);
    let vertex_links: Vec<_> = batch
        .cluster_vertices
        .iter()
        .map(|p| (p.left, p.right, p.data))
        .collect();
    assert_eq!(vertex_links, vec![(0, 0, 0)]);
    assert_relative_eq!(batch.clusters[0].start_tick, 25.0);
}

fn hierarchy_result() -> SliceResult {
    SliceResult {
        trajectories: vec![trajectory(1, 0, &[&[0]]), trajectory(2, 0, &[&[1], &[2]])],
        vertices_3d: vec![Vertex3d {
            id: 1,
            ..Vertex3d::default()
        }],
        pfparticles: vec![
            PfpResult {
                id: 1,
                pdg_code: 13,
                dtr_ids: vec![2],
                tj_ids: vec![1],
                vx3_id: [1, 0],
                ..PfpResult::default()
            },
            PfpResult {
                id: 2,
                pdg_code: 11,
                parent_id: 1,
                tj_ids: vec![2, 4],
                ..PfpResult::default()
            },
        ],
        ..SliceResult::default()
    }
}

#[test]
fn test_pfparticle_references_are_global() {
    let hits = make_hits(6);
    let slices = vec![slice(1, &[0, 1, 2]), slice(2, &[3, 4, 5])];
    let mut first = hierarchy_result();
    first.trajectories[0].uid = 1;
    first.trajectories[1].uid = 2;
    let mut second = hierarchy_result();
    second.trajectories[0].uid = 3;
    second.trajectories[1].uid = 4;
    let mut producer = producer(vec![first, second]);
    let output = producer.produce(&hits, Some(&slices)).unwrap();
    let batch = &output.batch;

    assert_eq!(batch.pfparticles.len(), 4);
    for (index, pfp) in batch.pfparticles.iter().enumerate() {
        assert_eq!(pfp.self_index, index);
        if let Some(parent) = pfp.parent {
            assert!(parent < batch.pfparticles.len());
        }
        assert!(pfp.daughters.iter().all(|&d| d < batch.pfparticles.len()));
    }
    assert_eq!(batch.pfparticles[2].daughters, vec![3]);
    assert_eq!(batch.pfparticles[3].parent, Some(2));
    assert!(batch.pfparticles[2].is_primary());

    assert_eq!(batch.pfp_clusters.rights_of(3).collect::<Vec<_>>(), vec![3]);
    assert_eq!(batch.pfp_vertices.rights_of(2).collect::<Vec<_>>(), vec![1]);
    assert_eq!(
        batch.slice_pfparticles.lefts_of(3).collect::<Vec<_>>(),
        vec![1]
    );
    // Trajectory 4 does not exist in either slice.
    assert_eq!(
        output
            .diagnostics
            .lookup_misses
            .iter()
            .filter(|m| matches!(m, LookupMiss::Trajectory { trajectory_id: 4, .. }))
            .count(),
        2
    );
    assert!(output.diagnostics.is_complete());
}

#[test]
fn test_unknown_parent_reported() {
    let hits = make_hits(3);
    let result = SliceResult {
        pfparticles: vec![PfpResult {
            id: 1,
            parent_id: 9,
            ..PfpResult::default()
        }],
        ..SliceResult::default()
    };
    let output = producer(vec![result]).produce(&hits, None).unwrap();

    assert_eq!(output.batch.pfparticles[0].parent, None);
    assert_eq!(
        output.diagnostics.lookup_misses,
        vec![LookupMiss::Parent {
            pfparticle: 0,
            parent_id: 9
        }]
    );
}

#[test]
fn test_shower_links_and_cosmic_tags() {
    let hits = make_hits(4);
    let result = SliceResult {
        trajectories: vec![trajectory(1, 1, &[&[0], &[1]])],
        showers: vec![Shower3d {
            id: 1,
            uid: 41,
            energy: vec![1.0, 2.0, 3.0],
            hits: vec![1, 0],
            pfp_index: 1,
            ..Shower3d::default()
        }],
        pfparticles: vec![
            PfpResult {
                id: 1,
                pdg_code: 13,
                cosmic_score: 0.25,
                ..PfpResult::default()
            },
            PfpResult {
                id: 2,
                pdg_code: 1111,
                tj_ids: vec![1],
                ..PfpResult::default()
            },
        ],
        ..SliceResult::default()
    };
    let config = ProducerConfig::default().with_tag_cosmics(true);
    let mut producer = TrajClusterProducer::new(config, ReplayAlgorithm::new(vec![result]));
    let batch = producer.produce(&hits, None).unwrap().batch;

    assert_eq!(batch.showers.len(), 1);
    assert_eq!(batch.showers[0].id, 41);
    assert_eq!(batch.showers[0].total_energy, vec![1.0, 2.0, 3.0]);
    assert_eq!(batch.shower_hits.rights_of(0).collect::<Vec<_>>(), vec![1, 0]);
    assert_eq!(batch.pfp_showers.rights_of(1).collect::<Vec<_>>(), vec![0]);
    assert_eq!(batch.pfp_showers.rights_of(0).count(), 0);

    assert_eq!(batch.cosmic_tags.len(), 2);
    assert_relative_eq!(batch.cosmic_tags[0].score, 0.25);
    assert_relative_eq!(batch.cosmic_tags[0].end_point1[0], -999.0);
    assert_eq!(batch.pfp_cosmic_tags.len(), 2);
}

#[test]
fn test_unclaimed_shower_hit_is_fatal() {
    let hits = make_hits(4);
    let result = SliceResult {
        showers: vec![Shower3d {
            id: 1,
            hits: vec![3],
            ..Shower3d::default()
        }],
        ..SliceResult::default()
    };
    let mut producer = producer(vec![result]);
    let error = producer.produce(&hits, None).unwrap_err();

    assert_eq!(error, Error::UnclaimedShowerHit { shower: 0, hit: 3 });
    assert_eq!(producer.algorithm().slice_count(), 0);
}

#[test]
fn test_invalid_slice_skipped() {
    let hits = make_hits(3);
    let result = SliceResult {
        is_valid: false,
        trajectories: vec![trajectory(1, 1, &[&[0], &[1]])],
        ..SliceResult::default()
    };
    let output = producer(vec![result]).produce(&hits, None).unwrap();

    assert!(output.batch.clusters.is_empty());
    assert_eq!(output.diagnostics.invalid_slices, vec![0]);
    assert_eq!(output.batch.hits, hits.hits);
}

#[test]
fn test_foreign_slice_hits_rejected() {
    let hits = make_hits(4);
    let slices = vec![SliceHits::new(
        3,
        (0..3).map(|k| HitRef::new(ProductId(2), k)).collect(),
    )];
    let mut producer = producer(vec![SliceResult::default()]);
    let error = producer.produce(&hits, Some(&slices)).unwrap_err();

    assert!(matches!(error, Error::HitCollectionMismatch { slice_id: 3, .. }));
    assert_eq!(producer.algorithm().slice_count(), 0);
}

#[test]
fn test_every_input_hit_emitted_once() {
    let hits = make_hits(12);
    let slices = vec![slice(1, &[0, 2, 4, 6, 8]), slice(2, &[1, 3, 5]), slice(3, &[9, 10])];
    let first = SliceResult {
        trajectories: vec![trajectory(1, 1, &[&[0], &[2]]), trajectory(2, 2, &[&[4]])],
        ..SliceResult::default()
    };
    let second = SliceResult {
        trajectories: vec![trajectory(1, 3, &[&[1], &[2]])],
        ..SliceResult::default()
    };
    let output = producer(vec![first, second])
        .produce(&hits, Some(&slices))
        .unwrap();

    let mut channels: Vec<u32> = output.batch.hits.iter().map(|h| h.channel).collect();
    channels.sort_unstable();
    assert_eq!(channels, (0..12).collect::<Vec<_>>());

    // Every hit of a kept slice is linked to it exactly once.
    let mut linked: Vec<usize> = output.batch.slice_hits.iter().map(|p| p.right).collect();
    linked.sort_unstable();
    linked.dedup();
    assert_eq!(linked.len(), output.batch.slice_hits.len());
}

#[test]
fn test_identical_results_identical_output() {
    let hits = make_hits(6);
    let slices = vec![slice(1, &[0, 1, 2]), slice(2, &[3, 4, 5])];
    let recorded = {
        let mut first = hierarchy_result();
        first.trajectories[0].uid = 1;
        first.trajectories[1].uid = 2;
        vec![first, hierarchy_result()]
    };

    let a = producer(recorded.clone()).produce(&hits, Some(&slices)).unwrap();
    let b = producer(recorded).produce(&hits, Some(&slices)).unwrap();
    assert_eq!(a, b);
    assert_eq!(
        serde_json::to_string(&a.batch).unwrap(),
        serde_json::to_string(&b.batch).unwrap()
    );
}

#[test]
fn test_pfparticle_order_follows_emission() {
    let hits = make_hits(3);
    let result = SliceResult {
        pfparticles: vec![
            PfpResult::default(),
            PfpResult {
                id: 3,
                parent_id: 2,
                ..PfpResult::default()
            },
            PfpResult {
                id: 2,
                dtr_ids: vec![3],
                ..PfpResult::default()
            },
        ],
        ..SliceResult::default()
    };
    let output = producer(vec![result]).produce(&hits, None).unwrap();
    let pfparticles = &output.batch.pfparticles;

    assert_eq!(pfparticles.len(), 2);
    assert_eq!(pfparticles[0].self_index, 0);
    assert_eq!(pfparticles[0].parent, Some(1));
    assert!(pfparticles[0].daughters.is_empty());
    assert_eq!(pfparticles[1].self_index, 1);
    assert_eq!(pfparticles[1].parent, None);
    assert_eq!(pfparticles[1].daughters, vec![0]);
    assert!(output.diagnostics.lookup_misses.is_empty());
}

#[test]
fn test_end_point_wire_rounds_half_to_even() {
    let hits = make_hits(3);
    let vertex = |id: i32, wire: f32| Vertex2d {
        id,
        uid: id,
        ctp: PlaneId::new(0, 0, 2).encode(),
        pos: [wire, 0.0],
        ..Vertex2d::default()
    };
    let result = SliceResult {
        vertices_2d: vec![vertex(1, 2.5), vertex(2, 3.5), vertex(3, 4.4)],
        ..SliceResult::default()
    };
    let batch = producer(vec![result]).produce(&hits, None).unwrap().batch;

    let wires: Vec<u32> = batch.end_points.iter().map(|e| e.wire_id.wire).collect();
    assert_eq!(wires, vec![2, 4, 4]);
}

#[test]
fn test_extreme_shower_like_uid() {
    let hits = make_hits(2);
    let mut tj = trajectory(1, i32::MIN, &[&[0], &[1]]);
    tj.flags.shower_like = true;
    let result = SliceResult {
        trajectories: vec![tj],
        pfparticles: vec![PfpResult {
            id: 1,
            tj_ids: vec![1],
            ..PfpResult::default()
        }],
        ..SliceResult::default()
    };
    let output = producer(vec![result]).produce(&hits, None).unwrap();

    assert_eq!(output.batch.clusters[0].id, i32::MIN);
    assert_eq!(output.batch.pfp_clusters.rights_of(0).collect::<Vec<_>>(), vec![0]);
    assert!(output.diagnostics.lookup_misses.is_empty());
}

#[test]
fn test_assembler_state_between_slices() {
    let hits = make_hits(4);
    let geometry = DetectorGeometry::default();
    let config = ProducerConfig::default();
    let mut algorithm = ReplayAlgorithm::default();
    algorithm.set_input_hits(hits.as_slice()).unwrap();
    let result = SliceResult {
        slice_hits: vec![0, 1, 2, 3],
        trajectories: vec![trajectory(1, 1, &[&[1], &[2]])],
        ..SliceResult::default()
    };

    let mut assembler = Assembler::new(&hits, None, &geometry, &config);
    assembler.assemble_slice(0, None, &result, &algorithm).unwrap();
    assert_eq!(assembler.batch().clusters.len(), 1);
    assert_eq!(assembler.batch().hits.len(), 2);
    assert_eq!(assembler.remap().owner(1), Some(0));
    assert_eq!(assembler.remap().owner(2), Some(1));
    assert_eq!(assembler.remap().unclaimed().collect::<Vec<_>>(), vec![0, 3]);

    let output = assembler.finish().unwrap();
    assert_eq!(output.batch.hits.len(), 4);
    assert_eq!(output.batch.hits[2], hits.hits[0]);
    assert_eq!(output.batch.hits[3], hits.hits[3]);
}
