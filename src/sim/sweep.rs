//! Capacity sweep: one trace replayed against several LRU capacities.
//!
//! Every tested capacity gets its own fresh [`LruSimulator`]; nothing is
//! shared between them. The runner advances all simulators in lockstep over a
//! single pass of the key stream, so the input can be a true one-shot
//! iterator while each capacity still observes the complete sequence in
//! order — the work is O(capacities × trace length) either way, the input is
//! just not traversed repeatedly. Stopping early at any point (a prefix
//! replay) leaves every simulator's counters valid.

use std::hash::Hash;

use serde::Serialize;

use crate::ds::KeyInterner;
use crate::error::ConfigError;
use crate::sim::lru::LruSimulator;

/// Capacities tested when none are configured.
pub const DEFAULT_CAPACITIES: [usize; 5] = [1000, 5000, 10_000, 50_000, 100_000];

// ---------------------------------------------------------------------------
// CapacityList
// ---------------------------------------------------------------------------

/// Validated, ordered list of capacities to test.
///
/// Order is preserved into the sweep output. Zero is a legal capacity;
/// negative or malformed values are rejected at parse time, which is the only
/// place untrusted capacity text enters the system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapacityList(Vec<usize>);

impl CapacityList {
    /// Wraps an explicit capacity list; rejects an empty one.
    pub fn new(capacities: Vec<usize>) -> Result<Self, ConfigError> {
        if capacities.is_empty() {
            return Err(ConfigError::new("capacity list must not be empty"));
        }
        Ok(Self(capacities))
    }

    /// Parses a comma-separated capacity list, e.g. `"1000,5000,10000"`.
    ///
    /// Whitespace around entries is ignored and empty entries (stray commas)
    /// are skipped; anything else that does not parse as a non-negative
    /// integer is a [`ConfigError`].
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let mut capacities = Vec::new();
        for part in text.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let value: usize = part.parse().map_err(|_| {
                ConfigError::new(format!(
                    "invalid capacity `{part}`: expected a non-negative integer"
                ))
            })?;
            capacities.push(value);
        }
        Self::new(capacities)
    }

    /// The capacities, in configured order.
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Number of capacities.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the list is empty (constructors prevent this).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for CapacityList {
    /// The standard sweep: [`DEFAULT_CAPACITIES`].
    fn default() -> Self {
        Self(DEFAULT_CAPACITIES.to_vec())
    }
}

// ---------------------------------------------------------------------------
// SweepRunner
// ---------------------------------------------------------------------------

/// Drives independent per-capacity simulators in lockstep.
///
/// Feed keys with [`record`](Self::record); stop whenever the input ends or a
/// processing cap is reached, then [`finish`](Self::finish). The incremental
/// surface exists so long replays can be bounded cooperatively.
#[derive(Debug)]
pub struct SweepRunner<K>
where
    K: Copy + Eq + Hash,
{
    sims: Vec<LruSimulator<K>>,
    processed: u64,
}

impl<K> SweepRunner<K>
where
    K: Copy + Eq + Hash,
{
    /// Creates one fresh simulator per capacity.
    pub fn new(capacities: &[usize]) -> Self {
        Self {
            sims: capacities.iter().map(|&c| LruSimulator::new(c)).collect(),
            processed: 0,
        }
    }

    /// Replays one access against every capacity.
    pub fn record(&mut self, key: K) {
        self.processed += 1;
        for sim in &mut self.sims {
            sim.access(key);
        }
    }

    /// Accesses replayed so far.
    pub fn processed(&self) -> u64 {
        self.processed
    }

    /// Finishes the sweep and reads out one row per capacity.
    pub fn finish(self) -> CapacitySweep {
        let rows = self
            .sims
            .iter()
            .map(|sim| CapacityRow {
                capacity: sim.capacity(),
                hits: sim.hits(),
                misses: sim.misses(),
                hit_rate: sim.hit_rate(),
            })
            .collect();
        CapacitySweep { rows }
    }
}

// ---------------------------------------------------------------------------
// CapacitySweep
// ---------------------------------------------------------------------------

/// One sweep row: the replay outcome at a single capacity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapacityRow {
    /// Tested capacity.
    pub capacity: usize,
    /// Hits over the replayed stream.
    pub hits: u64,
    /// Misses over the replayed stream.
    pub misses: u64,
    /// Hit rate percentage; 0.0 for an empty stream.
    pub hit_rate: f64,
}

/// Sweep results, one row per tested capacity in configured order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapacitySweep {
    /// Rows in capacity-list order.
    pub rows: Vec<CapacityRow>,
}

impl CapacitySweep {
    /// Hit rate at `capacity`, if it was part of the sweep.
    pub fn hit_rate(&self, capacity: usize) -> Option<f64> {
        self.rows
            .iter()
            .find(|row| row.capacity == capacity)
            .map(|row| row.hit_rate)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the sweep tested no capacities.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Batch entry points
// ---------------------------------------------------------------------------

/// Replays `keys` once against every capacity and reports per-capacity rows.
///
/// An empty key stream produces all-zero rows (hit rate 0.0 by sentinel); an
/// empty capacity slice produces an empty sweep. Neither is an error.
pub fn simulate_capacities<I>(keys: I, capacities: &[usize]) -> CapacitySweep
where
    I: IntoIterator,
    I::Item: Copy + Eq + Hash,
{
    let mut runner = SweepRunner::new(capacities);
    for key in keys {
        runner.record(key);
    }
    runner.finish()
}

/// [`simulate_capacities`] for owned string keys.
///
/// Interns each key to a dense `u64` handle and replays the handle stream,
/// so strings are hashed once per access and never cloned into the
/// simulators.
pub fn simulate_capacities_interned<I>(keys: I, capacities: &[usize]) -> CapacitySweep
where
    I: IntoIterator<Item = String>,
{
    let mut interner = KeyInterner::new();
    let mut runner = SweepRunner::new(capacities);
    for key in keys {
        let handle = interner.intern_owned(key);
        runner.record(handle);
    }
    runner.finish()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
