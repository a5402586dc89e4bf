//! trajcluster-io: JSON event input and product output for trajcluster.
//!
//! An event file holds the input hit collection, the optional hit to slice
//! association and the recorded per-slice algorithm results. A product file
//! holds the published batch together with its assembly diagnostics.
//!

mod error;
mod reader;
mod writer;

pub use error::{Error, Result};
pub use reader::{EventFileReader, EventInput};
pub use writer::{ProductFileWriter, PublishedEvent};
