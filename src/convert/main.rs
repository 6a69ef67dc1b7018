//! CSV to GeoJSON marker conversion.
//!
//! Reads a CSV with longitude/latitude columns, tags every row with the
//! region it falls in for each supplied boundary level, and writes the rows
//! as GeoJSON point markers.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use geomarker::config::JobConfig;
use geomarker::emit::emit_collection;
use geomarker::join::RecordJoiner;
use geomarker::table::Table;
use geomarker::BoundarySet;

#[derive(Parser, Debug)]
#[command(name = "csv2geojson")]
#[command(about = "Convert CSV rows to GeoJSON markers")]
#[command(after_help = "Example:\n  csv2geojson usa.csv usa.geojson --bounds ADM1.geojson,ADM2.geojson,ADM3.geojson")]
struct Args {
    /// Input CSV file with longitude, latitude columns
    input: Option<PathBuf>,

    /// Output file for GeoJSON markers
    output: Option<PathBuf>,

    /// Dump CSV with _geo_admin columns appended
    #[arg(long = "dump-csv", alias = "dumpCSV")]
    dump_csv: Option<PathBuf>,

    /// Comma-separated list of geoBoundaries ADM GeoJSON files, one per level
    #[arg(long, value_delimiter = ',')]
    bounds: Vec<PathBuf>,

    /// Name of the longitude column in the input CSV [default: longitude]
    #[arg(long = "long")]
    long_col: Option<String>,

    /// Name of the latitude column in the input CSV [default: latitude]
    #[arg(long = "lat")]
    lat_col: Option<String>,

    /// TOML job file; command-line flags take precedence
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Resolve rows across all cores
    #[arg(long)]
    parallel: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn into_job(self) -> Result<JobConfig> {
        let mut job = match &self.config {
            Some(path) => JobConfig::load_from_file(path)
                .with_context(|| format!("Failed to load job config {}", path.display()))?,
            None => JobConfig::default(),
        };

        if self.input.is_some() {
            job.input = self.input;
        }
        if self.output.is_some() {
            job.output = self.output;
        }
        if self.dump_csv.is_some() {
            job.dump_csv = self.dump_csv;
        }
        if !self.bounds.is_empty() {
            job.bounds = self.bounds;
        }
        if let Some(long_col) = self.long_col {
            job.long_col = long_col;
        }
        if let Some(lat_col) = self.lat_col {
            job.lat_col = lat_col;
        }
        job.parallel |= self.parallel;

        Ok(job)
    }
}

fn init_logging(verbose: bool) -> Result<()> {
    if std::env::var_os("RUST_LOG").is_some() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(if verbose { Level::DEBUG } else { Level::INFO })
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose)?;

    let job = args.into_job()?;
    let input = job
        .input
        .clone()
        .context("No input CSV given (positional INPUT or `input` in config)")?;
    let output = job
        .output
        .clone()
        .context("No output file given (positional OUTPUT or `output` in config)")?;

    info!("CSV2GeoJSON");
    info!("Input: {}", input.display());

    // Boundaries are fully loaded before any row is touched
    let boundaries = job
        .bounds
        .iter()
        .map(|path| {
            BoundarySet::from_path(path)
                .with_context(|| format!("Failed to load boundary file {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;

    let table = Table::from_path(&input)
        .with_context(|| format!("Failed to read CSV {}", input.display()))?;

    let joiner = RecordJoiner::new(&boundaries, &job.long_col, &job.lat_col);
    let joined = if job.parallel {
        joiner.join_parallel(table.records())?
    } else {
        joiner.join(table.records())?
    };

    let mut header = table.header().to_vec();
    for field in joiner.level_fields() {
        if !header.contains(&field) {
            header.push(field);
        }
    }
    let table = Table::new(header, joined)?;

    let markers = emit_collection(table.records(), &job.long_col, &job.lat_col)?;

    let file = File::create(&output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    let mut writer = BufWriter::new(file);
    markers
        .write_to(&mut writer)
        .context("Failed to write markers")?;
    writer.flush()?;
    info!(
        "Wrote {} markers to {}",
        markers.features.len(),
        output.display()
    );

    if let Some(dump_path) = &job.dump_csv {
        table
            .write_path(dump_path)
            .with_context(|| format!("Failed to write CSV {}", dump_path.display()))?;
    }

    Ok(())
}
