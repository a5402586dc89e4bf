//! Event file reader.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use trajcluster_core::hit::HitCollection;
use trajcluster_core::results::SliceResult;
use trajcluster_core::slice::SliceHits;

/// Everything needed to process one event offline.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EventInput {
    /// Input hit collection.
    pub hits: HitCollection,
    /// Optional hit to slice association.
    #[serde(default)]
    pub slices: Option<Vec<SliceHits>>,
    /// Recorded algorithm results, one per reconstructed slice.
    #[serde(default)]
    pub results: Vec<SliceResult>,
}

impl EventInput {
    /// Returns the slice association, if any.
    #[must_use]
    pub fn slices(&self) -> Option<&[SliceHits]> {
        self.slices.as_deref()
    }

    /// Parses an event from a JSON string.
    ///
    /// # Errors
    /// Returns an error if the JSON does not describe an event.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Reader for JSON event files.
///
/// The file is read into memory on open and parsed on demand.
pub struct EventFileReader {
    data: Vec<u8>,
    path: PathBuf,
}

impl EventFileReader {
    /// Opens an event file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read(&path)?;
        Ok(Self {
            data,
            path: path.as_ref().to_path_buf(),
        })
    }

    /// Returns the file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the file size in bytes.
    #[must_use]
    pub fn file_size(&self) -> usize {
        self.data.len()
    }

    /// Parses the event.
    ///
    /// # Errors
    /// Returns an error if the contents are not a valid event document.
    pub fn read_event(&self) -> Result<EventInput> {
        Ok(serde_json::from_slice(&self.data)?)
    }
}
