//! Report rendering: operator tables and the JSON run artifact.
//!
//! Two consumers, two formats. Humans get fixed-width text tables on stdout;
//! downstream tooling (plotting, regression tracking) gets a versioned JSON
//! artifact with the full working-set series. The artifact carries a schema
//! version so consumers can detect shape changes, and an RFC 3339 UTC
//! timestamp identifying the run.

use std::io;
use std::path::Path;

use serde::Serialize;

use crate::hotspot::HotspotTable;
use crate::record::KeySchema;
use crate::sim::CapacitySweep;
use crate::stats::DistributionSummary;
use crate::working_set::WorkingSetSeries;

/// Bump when the JSON artifact shape changes.
pub const ARTIFACT_SCHEMA_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Text tables
// ---------------------------------------------------------------------------

/// Renders the hotspot table.
pub fn render_hotspots(table: &HotspotTable<String>) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Top {} hotspots ({} accesses, {} distinct keys)\n",
        table.len(),
        table.total_accesses,
        table.distinct_keys
    ));
    if table.is_empty() {
        out.push_str("  (no accesses)\n");
        return out;
    }

    out.push_str(&format!(
        "{:<6} {:<44} {:>12} {:>10}\n",
        "Rank", "Key", "Count", "Share"
    ));
    out.push_str(&format!("{}\n", "-".repeat(75)));
    for (idx, entry) in table.entries.iter().enumerate() {
        out.push_str(&format!(
            "{:<6} {:<44} {:>12} {:>9.2}%\n",
            idx + 1,
            entry.key,
            entry.count,
            table.share_of_total(entry.count)
        ));
    }
    out
}

/// Renders the per-block working-set summary.
pub fn render_working_set(summary: &DistributionSummary) -> String {
    let mut out = String::new();
    out.push_str("Working set per block (distinct keys)\n");
    if summary.is_empty() {
        out.push_str("  (no blocks)\n");
        return out;
    }

    out.push_str(&format!("  blocks analyzed: {}\n", summary.count));
    out.push_str(&format!("  mean: {:.2}    std: {:.2}\n", summary.mean, summary.std));
    out.push_str(&format!(
        "  min: {:.0}    p50: {:.2}    p90: {:.2}    p95: {:.2}    p99: {:.2}    max: {:.0}\n",
        summary.min, summary.p50, summary.p90, summary.p95, summary.p99, summary.max
    ));
    out
}

/// Renders the capacity sweep table.
pub fn render_sweep(sweep: &CapacitySweep) -> String {
    let mut out = String::new();
    out.push_str("LRU hit rate by cache capacity\n");
    if sweep.is_empty() {
        out.push_str("  (no capacities tested)\n");
        return out;
    }

    out.push_str(&format!(
        "{:<12} {:>14} {:>14} {:>10}\n",
        "Capacity", "Hits", "Misses", "Hit Rate"
    ));
    out.push_str(&format!("{}\n", "-".repeat(53)));
    for row in &sweep.rows {
        out.push_str(&format!(
            "{:<12} {:>14} {:>14} {:>9.2}%\n",
            row.capacity, row.hits, row.misses, row.hit_rate
        ));
    }
    out
}

// ---------------------------------------------------------------------------
// JSON artifact
// ---------------------------------------------------------------------------

/// Trace-level metadata recorded in the artifact.
#[derive(Debug, Clone, Serialize)]
pub struct TraceMeta {
    /// Where the trace came from (path or a caller-chosen label).
    pub source: String,
    /// Records analyzed (after any processing cap).
    pub records: u64,
    /// Key schema the trace selected.
    pub key_schema: KeySchema,
}

/// One hotspot row with its rank and share percentage.
#[derive(Debug, Clone, Serialize)]
pub struct HotspotRow {
    /// 1-based rank.
    pub rank: usize,
    /// Canonical key.
    pub key: String,
    /// Accesses to this key.
    pub count: u64,
    /// Share of all accesses, percent.
    pub share: f64,
}

/// One working-set series point.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SeriesPoint {
    /// Block number.
    pub block: u64,
    /// Distinct canonical keys touched in the block.
    pub distinct_keys: u64,
}

/// Working-set results: the summary plus the full per-block series.
#[derive(Debug, Clone, Serialize)]
pub struct WorkingSetArtifact {
    /// Summary statistics over per-block distinct counts.
    pub summary: DistributionSummary,
    /// Per-block series, block-ordered, for plotting collaborators.
    pub series: Vec<SeriesPoint>,
}

/// Versioned, self-describing record of one analysis run.
#[derive(Debug, Clone, Serialize)]
pub struct RunArtifact {
    /// Artifact shape version ([`ARTIFACT_SCHEMA_VERSION`]).
    pub schema_version: u32,
    /// RFC 3339 UTC timestamp of the run.
    pub generated_at: String,
    /// Trace metadata.
    pub trace: TraceMeta,
    /// Hotspot rows, rank order.
    pub hotspots: Vec<HotspotRow>,
    /// Working-set summary and series.
    pub working_set: WorkingSetArtifact,
    /// Capacity sweep rows.
    pub sweep: CapacitySweep,
}

impl RunArtifact {
    /// Assembles the artifact from the run's computed results.
    pub fn new(
        source: impl Into<String>,
        records: u64,
        key_schema: KeySchema,
        hotspots: &HotspotTable<String>,
        series: &WorkingSetSeries,
        sweep: &CapacitySweep,
    ) -> Self {
        let hotspot_rows = hotspots
            .entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| HotspotRow {
                rank: idx + 1,
                key: entry.key.clone(),
                count: entry.count,
                share: hotspots.share_of_total(entry.count),
            })
            .collect();
        let series_points = series
            .iter()
            .map(|(block, distinct_keys)| SeriesPoint {
                block,
                distinct_keys,
            })
            .collect();

        Self {
            schema_version: ARTIFACT_SCHEMA_VERSION,
            generated_at: chrono::Utc::now().to_rfc3339(),
            trace: TraceMeta {
                source: source.into(),
                records,
                key_schema,
            },
            hotspots: hotspot_rows,
            working_set: WorkingSetArtifact {
                summary: series.summarize(),
                series: series_points,
            },
            sweep: sweep.clone(),
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Writes the pretty-printed artifact to `path`.
    pub fn write_json(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let json = self.to_json().map_err(io::Error::other)?;
        std::fs::write(path, json)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
