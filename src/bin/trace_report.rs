//! Trace analysis report generator.
//!
//! Run with: `cargo run --bin trace-report -- --trace access_log.csv`
//!
//! Loads a delimited access trace, derives canonical keys once, and runs the
//! three analyses — hotspot top-K, per-block working set, LRU capacity
//! sweep — printing operator tables to stdout and optionally writing the
//! versioned JSON artifact for plotting collaborators.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use tracekit::ds::KeyInterner;
use tracekit::hotspot::{HotspotCounter, HotspotEntry, HotspotTable, DEFAULT_TOP_K};
use tracekit::record::derive_key;
use tracekit::report::{render_hotspots, render_sweep, render_working_set, RunArtifact};
use tracekit::sim::{CapacityList, SweepRunner};
use tracekit::trace::read_trace;
use tracekit::working_set::WorkingSetCollector;

#[derive(Parser)]
#[command(
    name = "trace-report",
    version,
    about = "Hotspot, working-set, and LRU hit-rate analysis over a storage access trace"
)]
struct Cli {
    /// Trace file to analyze (CSV with BlockNum/Address, optional Type/SlotKey)
    #[arg(long)]
    trace: PathBuf,

    /// Number of hotspot entries to report
    #[arg(long, default_value_t = DEFAULT_TOP_K)]
    top_k: usize,

    /// Comma-separated LRU capacities to sweep
    #[arg(long, value_parser = CapacityList::parse)]
    capacities: Option<CapacityList>,

    /// Stop after this many accesses (replay any prefix of the trace)
    #[arg(long)]
    max_accesses: Option<u64>,

    /// Write the JSON run artifact to this path
    #[arg(long)]
    json: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let capacities = cli.capacities.unwrap_or_default();

    let trace = read_trace(&cli.trace)
        .with_context(|| format!("failed to load trace {}", cli.trace.display()))?;
    eprintln!(
        "loaded {} records from {} (key schema: {})",
        trace.len(),
        cli.trace.display(),
        trace.schema
    );

    // One derivation pass; every analysis consumes interned u64 handles.
    let mut interner = KeyInterner::new();
    let mut hotspots = HotspotCounter::new();
    let mut working_set = WorkingSetCollector::new();
    let mut sweep_runner = SweepRunner::new(capacities.as_slice());

    for record in &trace.records {
        if let Some(cap) = cli.max_accesses {
            if sweep_runner.processed() >= cap {
                break;
            }
        }
        let key = derive_key(record, trace.schema)
            .with_context(|| format!("record in block {}", record.block_number))?;
        let handle = interner.intern_owned(key);
        hotspots.observe(handle);
        working_set.observe(record.block_number, handle);
        sweep_runner.record(handle);
    }

    let processed = sweep_runner.processed();
    let hotspot_table = resolve_keys(hotspots.into_table(cli.top_k), &interner);
    let series = working_set.into_series();
    let sweep = sweep_runner.finish();

    println!("{}", render_hotspots(&hotspot_table));
    println!("{}", render_working_set(&series.summarize()));
    println!("{}", render_sweep(&sweep));

    if let Some(path) = &cli.json {
        let artifact = RunArtifact::new(
            cli.trace.display().to_string(),
            processed,
            trace.schema,
            &hotspot_table,
            &series,
            &sweep,
        );
        artifact
            .write_json(path)
            .with_context(|| format!("failed to write artifact {}", path.display()))?;
        eprintln!("wrote artifact to {}", path.display());
    }

    Ok(())
}

/// Maps a handle-keyed hotspot table back to the canonical key strings.
fn resolve_keys(table: HotspotTable<u64>, interner: &KeyInterner<String>) -> HotspotTable<String> {
    let entries = table
        .entries
        .into_iter()
        .map(|entry| HotspotEntry {
            // Handles come from this interner, so resolution cannot fail.
            key: interner
                .resolve(entry.key)
                .cloned()
                .unwrap_or_default(),
            count: entry.count,
        })
        .collect();
    HotspotTable {
        entries,
        total_accesses: table.total_accesses,
        distinct_keys: table.distinct_keys,
    }
}
