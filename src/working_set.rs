//! Per-block working-set analysis.
//!
//! ## Key Components
//!
//! - [`WorkingSetCollector`]: Groups (block, key) observations and counts
//!   *distinct* keys per block. Accepts rows in any order; grouping uses only
//!   the block number, so an interleaved trace regroups identically to a
//!   block-sorted one.
//! - [`WorkingSetSeries`]: The finished block → distinct-key-count mapping,
//!   ordered by block, read-only after construction.
//! - [`compute_working_set`] / [`summarize`]: Batch entry points.
//!
//! A block with no records is absent from the series — never synthesized as
//! zero. That is a policy, not an oversight: absent blocks carry no signal
//! about working-set size, and zero rows would drag every percentile down.

use std::collections::BTreeMap;
use std::hash::Hash;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::ds::KeyInterner;
use crate::error::MissingFieldError;
use crate::record::{derive_key, AccessRecord, KeySchema};
use crate::stats::DistributionSummary;

// ---------------------------------------------------------------------------
// WorkingSetCollector
// ---------------------------------------------------------------------------

/// Streaming collector of per-block distinct keys.
///
/// Generic over the key so the pipeline can feed interned `u64` handles; the
/// per-block sets then hold 8-byte handles instead of cloned strings.
#[derive(Debug)]
pub struct WorkingSetCollector<K> {
    blocks: FxHashMap<u64, FxHashSet<K>>,
}

impl<K: Eq + Hash> WorkingSetCollector<K> {
    /// Creates an empty collector.
    pub fn new() -> Self {
        Self {
            blocks: FxHashMap::default(),
        }
    }

    /// Records one access to `key` within `block_number`.
    ///
    /// Duplicate keys within a block are absorbed; only distinctness counts.
    pub fn observe(&mut self, block_number: u64, key: K) {
        self.blocks.entry(block_number).or_default().insert(key);
    }

    /// Number of blocks observed so far.
    pub fn blocks_seen(&self) -> usize {
        self.blocks.len()
    }

    /// Finishes grouping and produces the block-ordered series.
    pub fn into_series(self) -> WorkingSetSeries {
        let per_block: BTreeMap<u64, u64> = self
            .blocks
            .into_iter()
            .map(|(block, keys)| (block, keys.len() as u64))
            .collect();
        WorkingSetSeries { per_block }
    }
}

impl<K: Eq + Hash> Default for WorkingSetCollector<K> {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// WorkingSetSeries
// ---------------------------------------------------------------------------

/// Block number → distinct canonical keys touched in that block.
///
/// Ordered by block number; read-only once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingSetSeries {
    per_block: BTreeMap<u64, u64>,
}

impl WorkingSetSeries {
    /// Distinct-key count for `block`, if the block had any records.
    pub fn distinct_keys(&self, block: u64) -> Option<u64> {
        self.per_block.get(&block).copied()
    }

    /// Number of blocks in the series.
    pub fn len(&self) -> usize {
        self.per_block.len()
    }

    /// Returns `true` if no blocks were observed.
    pub fn is_empty(&self) -> bool {
        self.per_block.is_empty()
    }

    /// Iterates (block, distinct-key count) in block order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, u64)> + '_ {
        self.per_block.iter().map(|(&block, &count)| (block, count))
    }

    /// Summary statistics over the per-block distinct counts.
    ///
    /// An empty series yields the all-zero no-data summary.
    pub fn summarize(&self) -> DistributionSummary {
        let counts: Vec<u64> = self.per_block.values().copied().collect();
        DistributionSummary::from_samples(&counts)
    }
}

// ---------------------------------------------------------------------------
// Batch entry points
// ---------------------------------------------------------------------------

/// Groups `records` by block and counts distinct canonical keys per block.
///
/// Keys are derived per `schema`; the first record missing a required field
/// aborts with [`MissingFieldError`] and no partial series is returned.
pub fn compute_working_set(
    records: &[AccessRecord],
    schema: KeySchema,
) -> Result<WorkingSetSeries, MissingFieldError> {
    let mut interner = KeyInterner::new();
    let mut collector = WorkingSetCollector::new();
    for record in records {
        let key = derive_key(record, schema)?;
        let handle = interner.intern_owned(key);
        collector.observe(record.block_number, handle);
    }
    Ok(collector.into_series())
}

/// Summary statistics over a working-set series.
pub fn summarize(series: &WorkingSetSeries) -> DistributionSummary {
    series.summarize()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
