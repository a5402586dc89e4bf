//! Product file writer.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use trajcluster_core::diagnostics::AssemblyDiagnostics;
use trajcluster_core::products::ProductBatch;

/// The published record of one event.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PublishedEvent {
    /// Output collections and associations.
    pub products: ProductBatch,
    /// Recovered problems met while assembling them.
    pub diagnostics: AssemblyDiagnostics,
}

/// Writer for JSON product files.
///
/// Each event is written as one JSON document per line.
pub struct ProductFileWriter {
    writer: BufWriter<File>,
    pretty: bool,
}

impl ProductFileWriter {
    /// Creates a new file writer.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
            pretty: false,
        })
    }

    /// Writes indented JSON instead of one line per event.
    #[must_use]
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Writes one event.
    ///
    /// # Errors
    /// Returns an error if serialization or the write fails.
    pub fn write_event(&mut self, event: &PublishedEvent) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, event)?;
        } else {
            serde_json::to_writer(&mut self.writer, event)?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    /// Flushes the writer.
    ///
    /// # Errors
    /// Returns an error if the flush fails.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
