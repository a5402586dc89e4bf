//! trajcluster CLI: Command-line interface for trajcluster.
//!
//! Processes recorded events into published product files.
#![allow(clippy::uninlined_format_args, clippy::too_many_lines)]

use clap::{ArgAction, Parser, Subcommand};
use log::{info, LevelFilter};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;
use trajcluster_assembly::{ProducerConfig, ReplayAlgorithm, TrajClusterProducer};
use trajcluster_io::{EventFileReader, ProductFileWriter, PublishedEvent};
use trajcluster_slicing::{partition_hits, sort_slice};

/// Result type for CLI operations.
type Result<T> = std::result::Result<T, CliError>;

/// CLI error types.
#[derive(Error, Debug)]
enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("I/O error: {0}")]
    TrajclusterIo(#[from] trajcluster_io::Error),

    #[error("Core error: {0}")]
    Core(#[from] trajcluster_core::Error),
}

/// Slice-based trajectory cluster assembly.
#[derive(Parser)]
#[command(name = "trajcluster")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble the recorded results of an event into a product file
    Process {
        /// Input event file (JSON)
        input: PathBuf,

        /// Output product file
        #[arg(short, long)]
        output: PathBuf,

        /// Producer configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Number of TPCs (overrides the configuration)
        #[arg(long)]
        tpcs: Option<usize>,

        /// Emit a placeholder cosmic tag for every PFParticle
        #[arg(long)]
        tag_cosmics: bool,

        /// Write indented JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Show the slice hit sets an event is partitioned into
    Partition {
        /// Input event file (JSON)
        input: PathBuf,

        /// Producer configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Number of TPCs (overrides the configuration)
        #[arg(long)]
        tpcs: Option<usize>,
    },

    /// Show information about an event file
    Info {
        /// Input event file (JSON)
        input: PathBuf,
    },
}

fn load_config(path: Option<&Path>, tpcs: Option<usize>) -> Result<ProducerConfig> {
    let mut config = match path {
        Some(path) => ProducerConfig::from_file(path)?,
        None => ProducerConfig::default(),
    };
    if let Some(tpcs) = tpcs {
        config.geometry.tpc_count = tpcs;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match cli.command {
        Commands::Process {
            input,
            output,
            config,
            tpcs,
            tag_cosmics,
            pretty,
        } => {
            let start = Instant::now();
            let mut config = load_config(config.as_deref(), tpcs)?;
            if tag_cosmics {
                config = config.with_tag_cosmics(true);
            }

            info!("Reading: {}", input.display());
            let mut event = EventFileReader::open(&input)?.read_event()?;
            let recorded = std::mem::take(&mut event.results);
            let algorithm = ReplayAlgorithm::new(recorded).with_expected_hits(event.hits.len());
            let mut producer = TrajClusterProducer::new(config, algorithm);
            let assembled = producer.produce(&event.hits, event.slices())?;

            let diagnostics = &assembled.diagnostics;
            let complete = diagnostics.is_complete();
            println!("Input hits: {}", event.hits.len());
            println!("Output hits: {}", assembled.batch.hits.len());
            println!("Clusters: {}", assembled.batch.clusters.len());
            println!("Vertices: {}", assembled.batch.vertices.len());
            println!("Showers: {}", assembled.batch.showers.len());
            println!("PFParticles: {}", assembled.batch.pfparticles.len());
            println!("Dropped slices: {}", diagnostics.dropped_slices.len());
            println!("Slice failures: {}", diagnostics.slice_failures.len());
            println!("Lookup misses: {}", diagnostics.lookup_misses.len());
            for report in &diagnostics.slice_failures {
                eprintln!(
                    "  slice {} (result {}): {}",
                    report.slice_id, report.result_index, report.failure
                );
            }

            let mut writer = ProductFileWriter::create(&output)?.pretty(pretty);
            writer.write_event(&PublishedEvent {
                products: assembled.batch,
                diagnostics: assembled.diagnostics,
            })?;
            writer.flush()?;

            println!(
                "Wrote {} in {:.2}s{}",
                output.display(),
                start.elapsed().as_secs_f64(),
                if complete { "" } else { " (truncated slices)" }
            );
        }

        Commands::Partition {
            input,
            config,
            tpcs,
        } => {
            let config = load_config(config.as_deref(), tpcs)?;
            let event = EventFileReader::open(&input)?.read_event()?;
            let mut partition = partition_hits(
                &event.hits,
                event.slices(),
                &config.geometry,
                &config.partition,
            )?;

            println!(
                "{:<8} | {:<8} | {:<6} | {:<8}",
                "Set", "Slice", "TPC", "Hits"
            );
            println!("{:-<40}", "");
            for (index, set) in partition.sets.iter_mut().enumerate() {
                sort_slice(event.hits.as_slice(), set);
                let tpc = set
                    .hits
                    .first()
                    .and_then(|&hit| event.hits.get(hit))
                    .map_or_else(|| "-".to_string(), |hit| hit.wire_id.tpc.to_string());
                println!(
                    "{:<8} | {:<8} | {:<6} | {:<8}",
                    index,
                    set.slice_id,
                    tpc,
                    set.len()
                );
            }
            if !partition.dropped.is_empty() {
                println!("Dropped slices: {:?}", partition.dropped);
            }
        }

        Commands::Info { input } => {
            let reader = EventFileReader::open(&input)?;
            let event = reader.read_event()?;

            println!("File: {}", reader.path().display());
            println!("Size: {} bytes", reader.file_size());
            println!("Hit collection: {}", event.hits.product.0);
            println!("Hits: {}", event.hits.len());

            let planes: BTreeSet<_> = event.hits.hits.iter().map(|h| h.wire_id.plane_id()).collect();
            let tpcs: BTreeSet<_> = planes.iter().map(|p| (p.cryostat, p.tpc)).collect();
            println!("TPCs: {}", tpcs.len());
            println!("Planes: {}", planes.len());

            if let (Some(min), Some(max)) = (
                event.hits.hits.iter().map(|h| h.start_tick).min(),
                event.hits.hits.iter().map(|h| h.end_tick).max(),
            ) {
                println!("Tick range: {} - {}", min, max);
            }

            match event.slices() {
                Some(slices) => println!("Slices: {}", slices.len()),
                None => println!("Slices: none (all hits in one slice)"),
            }
            println!("Recorded slice results: {}", event.results.len());
        }
    }

    Ok(())
}
