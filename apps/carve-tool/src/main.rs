//! CLI tool for recovering row records from raw file bytes.
//!
//! Provides commands for:
//! - Sweeping a file or disk image for every offset that parses as a record
//! - Parsing a single record at a known offset

mod cli;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use memmap2::Mmap;
use tracing_subscriber::EnvFilter;

use carve_core::{parse_descriptor, Record, RecordParser, ScanConfig, SweepReport};
use cli::{Cli, Commands, RecordArgs};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    match cli.command {
        Commands::Scan {
            file,
            record,
            start,
            end,
            limit,
            skip_recovered,
            parallel,
        } => {
            let mut config = scan_config(&record)?;
            config.start_offset = start;
            config.end_offset = end;
            config.max_records = limit;
            config.skip_recovered = skip_recovered;

            let image = map_file(&file)?;
            tracing::info!("Scanning {} ({} bytes)", file.display(), image.len());
            let report = run_scan(&image, &config, parallel, record.json, &mut out)?;
            log_report(&report);
        }
        Commands::Parse {
            file,
            offset,
            record,
        } => {
            let parser = record_parser(&record)?;
            let image = map_file(&file)?;
            tracing::info!(
                "Parsing {} at {:#x} ({} bytes)",
                file.display(),
                offset,
                image.len()
            );
            run_parse(&image, offset, &parser, record.json, &mut out)?;
        }
    }

    out.flush().context("Failed to flush output")?;
    Ok(())
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Memory maps a file read-only.
fn map_file(path: &Path) -> Result<Mmap> {
    let file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mmap = unsafe { Mmap::map(&file) }
        .with_context(|| format!("Failed to memory map {}", path.display()))?;
    Ok(mmap)
}

/// Builds the record checks from command-line flags.
fn scan_config(args: &RecordArgs) -> Result<ScanConfig> {
    let type_constraints = args
        .types
        .as_deref()
        .map(parse_descriptor)
        .transpose()
        .context("Invalid column type descriptor")?;

    Ok(ScanConfig {
        expected_column_count: args.columns,
        type_constraints,
        ..Default::default()
    })
}

/// Builds a single-record parser from command-line flags.
fn record_parser(args: &RecordArgs) -> Result<RecordParser> {
    let parser = RecordParser::from_config(&scan_config(args)?);
    match parser.expected_column_count() {
        Some(columns) => tracing::debug!("Requiring {} columns per record", columns),
        None => tracing::debug!("Accepting any column count"),
    }
    Ok(parser)
}

fn run_scan(
    image: &[u8],
    config: &ScanConfig,
    parallel: bool,
    json: bool,
    out: &mut impl Write,
) -> Result<SweepReport> {
    let report = if parallel {
        parallel_sweep(image, config)
    } else {
        carve_core::sweep(image, config)
    };

    for record in &report.records {
        write_record(out, record, json)?;
    }
    Ok(report)
}

#[cfg(feature = "parallel")]
fn parallel_sweep(image: &[u8], config: &ScanConfig) -> SweepReport {
    carve_core::par_sweep(image, config)
}

#[cfg(not(feature = "parallel"))]
fn parallel_sweep(image: &[u8], config: &ScanConfig) -> SweepReport {
    tracing::warn!("Built without the parallel feature, scanning sequentially");
    carve_core::sweep(image, config)
}

fn run_parse(
    image: &[u8],
    offset: usize,
    parser: &RecordParser,
    json: bool,
    out: &mut impl Write,
) -> Result<()> {
    match parser.parse(image, offset) {
        Ok(record) => write_record(out, &record, json),
        Err(err) => {
            tracing::info!("Offset {:#x} rejected ({})", offset, err.kind());
            writeln!(out, "{:#x}\tno record: {}", offset, err).context("Failed to write output")
        }
    }
}

fn write_record(out: &mut impl Write, record: &Record, json: bool) -> Result<()> {
    if json {
        serde_json::to_writer(&mut *out, record).context("Failed to serialize record")?;
        writeln!(out).context("Failed to write output")?;
        return Ok(());
    }

    let values: Vec<String> = record.values().map(ToString::to_string).collect();
    writeln!(
        out,
        "{:#x}\trow {}\t[{}]",
        record.offset,
        record.row_id,
        values.join(", ")
    )
    .context("Failed to write output")
}

fn log_report(report: &SweepReport) {
    tracing::info!(
        "Recovered {} records from {} candidates ({} offsets skipped)",
        report.records.len(),
        report.candidates,
        report.skipped
    );
    for (kind, count) in &report.rejections {
        tracing::info!("Rejected {}: {}", kind, count);
    }
}
