//! Producer configuration.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use trajcluster_core::error::{Error, Result};
use trajcluster_core::geometry::DetectorGeometry;
use trajcluster_slicing::PartitionConfig;

/// Particle type code the algorithm gives to shower PFParticles.
pub const SHOWER_PDG_CODE: i32 = 1111;

/// Configuration for one [`crate::TrajClusterProducer`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProducerConfig {
    /// Slice partitioning thresholds.
    pub partition: PartitionConfig,
    /// Algorithm position units per TDC tick.
    pub units_per_tick: f32,
    /// Emit a placeholder cosmic tag for every PFParticle.
    pub tag_cosmics: bool,
    /// Particle type code marking shower PFParticles.
    pub shower_pdg_code: i32,
    /// Detector geometry.
    pub geometry: DetectorGeometry,
}

impl Default for ProducerConfig {
    fn default() -> Self {
        Self {
            partition: PartitionConfig::default(),
            units_per_tick: 1.0,
            tag_cosmics: false,
            shower_pdg_code: SHOWER_PDG_CODE,
            geometry: DetectorGeometry::default(),
        }
    }
}

impl ProducerConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tick scale factor.
    #[must_use]
    pub fn with_units_per_tick(mut self, units_per_tick: f32) -> Self {
        self.units_per_tick = units_per_tick;
        self
    }

    /// Enables or disables placeholder cosmic tags.
    #[must_use]
    pub fn with_tag_cosmics(mut self, tag_cosmics: bool) -> Self {
        self.tag_cosmics = tag_cosmics;
        self
    }

    /// Sets the geometry.
    #[must_use]
    pub fn with_geometry(mut self, geometry: DetectorGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    /// Sets the partitioning thresholds.
    #[must_use]
    pub fn with_partition(mut self, partition: PartitionConfig) -> Self {
        self.partition = partition;
        self
    }

    /// Load configuration from a JSON file.
    ///
    /// # Errors
    /// Returns [`Error::ConfigError`] if the file cannot be read or parsed,
    /// or if the values are invalid.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| Error::ConfigError(format!("{}: {e}", path.display())))?;
        let config: Self = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| Error::ConfigError(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON string.
    ///
    /// # Errors
    /// Returns [`Error::ConfigError`] if the string cannot be parsed or the
    /// values are invalid.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| Error::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the values for consistency.
    ///
    /// # Errors
    /// Returns [`Error::ConfigError`] naming the first invalid value.
    pub fn validate(&self) -> Result<()> {
        if !(self.units_per_tick.is_finite() && self.units_per_tick > 0.0) {
            return Err(Error::ConfigError(format!(
                "units_per_tick must be positive, got {}",
                self.units_per_tick
            )));
        }
        if self.geometry.tpc_count == 0 {
            return Err(Error::ConfigError("geometry needs at least one TPC".into()));
        }
        Ok(())
    }
}
