//! An algorithm that plays back recorded slice results.

use log::debug;
use std::collections::VecDeque;
use trajcluster_core::algorithm::TrajClusterAlgorithm;
use trajcluster_core::error::{Error, Result};
use trajcluster_core::hit::{merge_hits, Hit};
use trajcluster_core::results::SliceResult;

/// Plays back pre-computed [`SliceResult`]s, one per call to `run`.
///
/// Used to drive the assembler from stored events and in tests. A recorded
/// result with no `slice_hits` receives the hits it was run on. Once the
/// recording is exhausted every further slice yields an empty result.
#[derive(Debug, Clone, Default)]
pub struct ReplayAlgorithm {
    recorded: VecDeque<SliceResult>,
    expected_hits: Option<usize>,
    input: Vec<Hit>,
    results: Vec<SliceResult>,
}

impl ReplayAlgorithm {
    /// Creates a replay of `recorded`, consumed front to back.
    #[must_use]
    pub fn new(recorded: Vec<SliceResult>) -> Self {
        Self {
            recorded: recorded.into(),
            ..Self::default()
        }
    }

    /// Rejects input collections whose size differs from `len`.
    #[must_use]
    pub fn with_expected_hits(mut self, len: usize) -> Self {
        self.expected_hits = Some(len);
        self
    }

    /// Recorded results not yet played.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.recorded.len()
    }
}

impl TrajClusterAlgorithm for ReplayAlgorithm {
    fn name(&self) -> &'static str {
        "Replay"
    }

    fn set_input_hits(&mut self, hits: &[Hit]) -> Result<()> {
        if let Some(expected) = self.expected_hits {
            if hits.len() != expected {
                return Err(Error::InputRejected(format!(
                    "recorded for {expected} hits, got {}",
                    hits.len()
                )));
            }
        }
        self.input = hits.to_vec();
        Ok(())
    }

    fn run(&mut self, slice_hits: &[usize]) {
        let mut result = self.recorded.pop_front().unwrap_or_default();
        if result.slice_hits.is_empty() {
            result.slice_hits = slice_hits.to_vec();
        }
        debug!(
            "Replaying slice {} ({} hits, {} trajectories)",
            self.results.len(),
            result.slice_hits.len(),
            result.trajectories.len()
        );
        self.results.push(result);
    }

    fn slice_count(&self) -> usize {
        self.results.len()
    }

    fn slice(&self, index: usize) -> Option<&SliceResult> {
        self.results.get(index)
    }

    fn merge_hits(&self, hits: &[usize]) -> Option<Hit> {
        merge_hits(&self.input, hits)
    }

    fn clear_results(&mut self) {
        self.results.clear();
        self.input.clear();
    }
}
