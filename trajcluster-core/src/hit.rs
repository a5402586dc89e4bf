//! Hit types for wire-chamber data.
#![allow(clippy::cast_precision_loss)]

use crate::geometry::{View, WireId};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Channel number carried by a hit that could not be produced.
pub const INVALID_CHANNEL: u32 = u32::MAX;

/// Identity of a hit collection.
///
/// Slice associations carry it so they can be checked against the
/// collection they index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProductId(pub u32);

/// Reference to one hit of a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HitRef {
    /// Collection the hit belongs to.
    pub product: ProductId,
    /// Index of the hit within its collection.
    pub key: usize,
}

impl HitRef {
    /// Creates a new hit reference.
    #[inline]
    #[must_use]
    pub fn new(product: ProductId, key: usize) -> Self {
        Self { product, key }
    }
}

/// A 2D wire/time charge measurement.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Hit {
    /// Readout channel.
    pub channel: u32,
    /// Wire plane orientation.
    pub view: View,
    /// Wire the hit was found on.
    pub wire_id: WireId,
    /// First tick of the hit region.
    pub start_tick: i32,
    /// Last tick of the hit region.
    pub end_tick: i32,
    /// Peak time in ticks.
    pub peak_time: f32,
    /// Width of the pulse in ticks.
    pub rms: f32,
    /// Pulse height.
    pub peak_amplitude: f32,
    /// Sum of ADC counts over the hit region.
    pub summed_adc: f32,
    /// Fitted charge.
    pub integral: f32,
    /// Number of hits fitted together in the same region.
    pub multiplicity: i16,
    /// Index of this hit among those fitted together in the same region.
    pub local_index: i16,
}

impl Hit {
    /// Creates a single-pulse hit with zero charge.
    #[must_use]
    pub fn new(channel: u32, wire_id: WireId, start_tick: i32, end_tick: i32) -> Self {
        let peak_time = (start_tick + end_tick) as f32 / 2.0;
        Self {
            channel,
            view: View::Unknown,
            wire_id,
            start_tick,
            end_tick,
            peak_time,
            rms: 0.0,
            peak_amplitude: 0.0,
            summed_adc: 0.0,
            integral: 0.0,
            multiplicity: 1,
            local_index: 0,
        }
    }

    /// Returns a placeholder hit that marks a failed merge.
    #[must_use]
    pub fn invalid() -> Self {
        Self::new(INVALID_CHANNEL, WireId::default(), 0, 0)
    }

    /// Sets the charge of the hit.
    #[must_use]
    pub fn with_charge(mut self, integral: f32, summed_adc: f32) -> Self {
        self.integral = integral;
        self.summed_adc = summed_adc;
        self
    }

    /// Sets the pulse index within its region.
    #[must_use]
    pub fn with_local_index(mut self, local_index: i16, multiplicity: i16) -> Self {
        self.local_index = local_index;
        self.multiplicity = multiplicity;
        self
    }

    /// Sets the wire orientation.
    #[must_use]
    pub fn with_view(mut self, view: View) -> Self {
        self.view = view;
        self
    }

    /// Returns false for the placeholder produced by a failed merge.
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.channel != INVALID_CHANNEL
    }
}

/// An indexed, immutable hit collection.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HitCollection {
    /// Identity of the collection.
    pub product: ProductId,
    /// Hits, indexed by position.
    pub hits: Vec<Hit>,
}

impl HitCollection {
    /// Creates a collection.
    #[must_use]
    pub fn new(product: ProductId, hits: Vec<Hit>) -> Self {
        Self { product, hits }
    }

    /// Returns the number of hits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    /// Returns true if the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Returns the hit at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Hit> {
        self.hits.get(index)
    }

    /// Returns the hits as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Hit] {
        &self.hits
    }
}

/// Merges hits from one channel into a single hit.
///
/// 1. Single hit: returned unchanged
/// 2. Multi-hit: charges summed, tick range widened, peak time and width
///    charge-weighted
/// 3. Empty selection, out-of-range index or mixed channels: `None`
#[must_use]
pub fn merge_hits(hits: &[Hit], indices: &[usize]) -> Option<Hit> {
    let (&first, rest) = indices.split_first()?;
    let mut merged = hits.get(first)?.clone();
    if rest.is_empty() {
        return Some(merged);
    }

    let selected = indices
        .iter()
        .map(|&index| hits.get(index))
        .collect::<Option<Vec<_>>>()?;
    if selected
        .iter()
        .any(|hit| hit.channel != merged.channel || hit.wire_id != merged.wire_id)
    {
        return None;
    }

    let mut charge = 0.0_f32;
    let mut weighted_time = 0.0_f32;
    for hit in &selected {
        let weight = hit.integral.max(f32::EPSILON);
        charge += weight;
        weighted_time += weight * hit.peak_time;
    }
    let peak_time = weighted_time / charge;

    let mut spread = 0.0_f32;
    for hit in &selected {
        let weight = hit.integral.max(f32::EPSILON);
        let dt = hit.peak_time - peak_time;
        spread += weight * (hit.rms * hit.rms + dt * dt);
    }

    merged.start_tick = selected.iter().map(|h| h.start_tick).min().unwrap_or(merged.start_tick);
    merged.end_tick = selected.iter().map(|h| h.end_tick).max().unwrap_or(merged.end_tick);
    merged.peak_time = peak_time;
    merged.rms = (spread / charge).sqrt();
    merged.peak_amplitude = selected
        .iter()
        .map(|h| h.peak_amplitude)
        .fold(0.0, f32::max);
    merged.integral = selected.iter().map(|h| h.integral).sum();
    merged.summed_adc = selected.iter().map(|h| h.summed_adc).sum();
    merged.multiplicity = 1;
    merged.local_index = 0;
    Some(merged)
}
