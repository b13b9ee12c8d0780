//! Hotspot aggregation: per-key access frequency and top-K extraction.
//!
//! ## Key Components
//!
//! - [`HotspotCounter`]: Streaming frequency counter; feed it every canonical
//!   key of the trace in order, one pass, no look-ahead.
//! - [`HotspotTable`]: The extracted top-K entries plus whole-trace totals.
//! - [`aggregate_hotspots`]: Batch entry point over any key iterator.
//!
//! Shares are normalized by the *total access count*, not the distinct-key
//! count: an entry's share answers "what fraction of all accesses hit this
//! key", so the shares of the top-K rows do not generally sum to 100%.

use std::cmp::Ordering;
use std::hash::Hash;

use rustc_hash::FxHashMap;
use serde::Serialize;

/// Default number of entries kept in the hotspot table.
pub const DEFAULT_TOP_K: usize = 10;

// ---------------------------------------------------------------------------
// HotspotCounter
// ---------------------------------------------------------------------------

/// Per-key running count; tracks the observation index of each key's first
/// appearance so equal counts rank in first-seen order.
#[derive(Debug, Clone, Copy)]
struct KeyCount {
    count: u64,
    first_seen: u64,
}

/// Streaming frequency counter over canonical keys.
#[derive(Debug)]
pub struct HotspotCounter<K> {
    counts: FxHashMap<K, KeyCount>,
    total: u64,
}

impl<K: Eq + Hash> HotspotCounter<K> {
    /// Creates an empty counter.
    pub fn new() -> Self {
        Self {
            counts: FxHashMap::default(),
            total: 0,
        }
    }

    /// Records one access to `key`.
    pub fn observe(&mut self, key: K) {
        let first_seen = self.total;
        self.total += 1;
        self.counts
            .entry(key)
            .or_insert(KeyCount {
                count: 0,
                first_seen,
            })
            .count += 1;
    }

    /// Total accesses observed so far (the full input length).
    pub fn total_accesses(&self) -> u64 {
        self.total
    }

    /// Number of distinct keys observed so far.
    pub fn distinct_keys(&self) -> usize {
        self.counts.len()
    }

    /// Extracts the top-`top_k` table, consuming the counter.
    ///
    /// `top_k` larger than the distinct-key count returns every key. Entries
    /// are ordered by count descending, ties by first appearance. Selection
    /// hoists the kept slice before sorting, so the cost is O(distinct) plus
    /// O(top_k log top_k) rather than a full sort.
    pub fn into_table(self, top_k: usize) -> HotspotTable<K> {
        let total_accesses = self.total;
        let distinct_keys = self.counts.len();
        let mut ranked: Vec<(K, KeyCount)> = self.counts.into_iter().collect();

        let keep = top_k.min(ranked.len());
        if keep == 0 {
            return HotspotTable {
                entries: Vec::new(),
                total_accesses,
                distinct_keys,
            };
        }
        if ranked.len() > keep {
            ranked.select_nth_unstable_by(keep - 1, |a, b| rank_order(&a.1, &b.1));
            ranked.truncate(keep);
        }
        ranked.sort_unstable_by(|a, b| rank_order(&a.1, &b.1));

        let entries = ranked
            .into_iter()
            .map(|(key, kc)| HotspotEntry {
                key,
                count: kc.count,
            })
            .collect();
        HotspotTable {
            entries,
            total_accesses,
            distinct_keys,
        }
    }
}

impl<K: Eq + Hash> Default for HotspotCounter<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Count descending, then first appearance ascending.
fn rank_order(a: &KeyCount, b: &KeyCount) -> Ordering {
    b.count.cmp(&a.count).then(a.first_seen.cmp(&b.first_seen))
}

// ---------------------------------------------------------------------------
// HotspotTable
// ---------------------------------------------------------------------------

/// One row of the hotspot table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HotspotEntry<K> {
    /// Canonical key.
    pub key: K,
    /// Accesses to this key over the whole trace.
    pub count: u64,
}

/// Top-K hotspot entries plus whole-trace totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HotspotTable<K> {
    /// Entries ordered by count descending, ties by first appearance.
    pub entries: Vec<HotspotEntry<K>>,
    /// Length of the full input sequence (share denominator).
    pub total_accesses: u64,
    /// Distinct keys in the full frequency table, before truncation.
    pub distinct_keys: usize,
}

impl<K> HotspotTable<K> {
    /// Number of entries kept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no entries were kept.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Share of all accesses for a given count, as a percentage.
    ///
    /// 0.0 when the trace was empty; never divides by zero.
    pub fn share_of_total(&self, count: u64) -> f64 {
        if self.total_accesses == 0 {
            0.0
        } else {
            count as f64 / self.total_accesses as f64 * 100.0
        }
    }
}

// ---------------------------------------------------------------------------
// Batch entry point
// ---------------------------------------------------------------------------

/// Counts every key in `keys` once and extracts the top-`top_k` table.
pub fn aggregate_hotspots<I>(keys: I, top_k: usize) -> HotspotTable<I::Item>
where
    I: IntoIterator,
    I::Item: Eq + Hash,
{
    let mut counter = HotspotCounter::new();
    for key in keys {
        counter.observe(key);
    }
    counter.into_table(top_k)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn table_of(keys: &[&'static str], top_k: usize) -> HotspotTable<&'static str> {
        aggregate_hotspots(keys.iter().copied(), top_k)
    }

    #[test]
    fn orders_by_count_descending() {
        let table = table_of(&["a", "b", "a", "c", "a", "b"], 10);
        assert_eq!(table.entries[0].key, "a");
        assert_eq!(table.entries[0].count, 3);
        assert_eq!(table.entries[1].key, "b");
        assert_eq!(table.entries[1].count, 2);
        assert_eq!(table.entries[2].key, "c");
        assert_eq!(table.entries[2].count, 1);
    }

    #[test]
    fn truncates_to_top_k() {
        let table = table_of(&["a", "b", "a", "c", "a", "b"], 2);
        assert_eq!(table.len(), 2);
        assert_eq!(table.entries[0].key, "a");
        assert_eq!(table.entries[1].key, "b");
        // Totals still describe the full trace.
        assert_eq!(table.total_accesses, 6);
        assert_eq!(table.distinct_keys, 3);
    }

    #[test]
    fn top_k_beyond_distinct_returns_all() {
        let table = table_of(&["a", "b", "a"], 100);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn top_k_zero_keeps_totals() {
        let table = table_of(&["a", "b", "a"], 0);
        assert!(table.is_empty());
        assert_eq!(table.total_accesses, 3);
        assert_eq!(table.distinct_keys, 2);
    }

    #[test]
    fn share_normalizes_by_total_accesses() {
        let table = table_of(&["a", "a", "a", "b"], 1);
        assert_eq!(table.entries[0].count, 3);
        let share = table.share_of_total(table.entries[0].count);
        assert!((share - 75.0).abs() < 1e-9);
    }

    #[test]
    fn empty_input_is_well_defined() {
        let table = aggregate_hotspots(Vec::<String>::new(), 10);
        assert!(table.is_empty());
        assert_eq!(table.total_accesses, 0);
        assert_eq!(table.distinct_keys, 0);
        assert_eq!(table.share_of_total(0), 0.0);
    }

    #[test]
    fn full_table_mass_equals_total() {
        let keys = ["a", "b", "a", "c", "a", "b", "d", "d", "d", "d"];
        let table = table_of(&keys, usize::MAX);
        let mass: u64 = table.entries.iter().map(|e| e.count).sum();
        assert_eq!(mass, table.total_accesses);
        assert_eq!(mass, keys.len() as u64);
    }

    #[test]
    fn aggregation_is_idempotent() {
        let keys = ["a", "b", "a", "c", "b", "a"];
        let first = table_of(&keys, 10);
        let second = table_of(&keys, 10);
        assert_eq!(first, second);
    }

    #[test]
    fn ties_keep_the_same_multiset() {
        // b and c tie at 2; assert membership, not order.
        let table = table_of(&["b", "c", "b", "c", "a"], 10);
        let mut pairs: Vec<(&str, u64)> =
            table.entries.iter().map(|e| (e.key, e.count)).collect();
        pairs.sort_unstable();
        assert_eq!(pairs, vec![("a", 1), ("b", 2), ("c", 2)]);
    }

    #[test]
    fn streaming_counter_matches_batch() {
        let keys = ["a", "b", "a", "c", "a"];
        let mut counter = HotspotCounter::new();
        for k in keys {
            counter.observe(k);
        }
        assert_eq!(counter.total_accesses(), 5);
        assert_eq!(counter.distinct_keys(), 3);
        let streamed = counter.into_table(2);
        let batched = aggregate_hotspots(keys, 2);
        assert_eq!(streamed, batched);
    }
}
