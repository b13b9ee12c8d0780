//! LRU replay simulator: HashMap + raw pointer recency list.
//!
//! ## Structure
//!
//! ```text
//!                 map: FxHashMap<K, NonNull<Node<K>>>
//!                 ┌─────┬─────┬─────┬─────┐
//!                 │ K=a │ K=c │ K=f │ ... │
//!                 └──┬──┴──┬──┴──┬──┴─────┘
//!                    │     │     │
//!                    ▼     ▼     ▼
//!   head (MRU) ──▶ [ a ] ⇄ [ c ] ⇄ [ f ] ◀── tail (LRU)
//! ```
//!
//! Each resident key owns one heap node threaded into a doubly linked
//! recency list. The index maps keys to their nodes, so every operation is
//! one hash lookup plus O(1) pointer splicing:
//!
//! - *hit*: detach the node, re-attach at head.
//! - *miss*: allocate a node at head; if the resident count would exceed
//!   capacity, pop the tail first — exactly one eviction per over-capacity
//!   insert.
//!
//! ## Replay Semantics
//!
//! [`LruSimulator`] is a counting state machine, not a store: there are no
//! values, only key residency plus monotonically increasing `hits`,
//! `misses`, and `evictions` counters. A capacity of 0 is legal and retains
//! nothing — every access is a counted miss with no allocation. O(1) per
//! access is a requirement, not an optimization: traces run to 10^8 records
//! and a scan-based recency update would turn replay quadratic.
//!
//! ## Thread Safety
//!
//! Single-threaded. The raw pointers reference heap memory owned by the
//! simulator, so `Send`/`Sync` follow the key type's bounds; there is no
//! interior mutability and no lock.
//!
//! ## Keys
//!
//! Keys are `Copy` — the index and the node each own one. Replay pipelines
//! intern canonical key strings to `u64` handles
//! ([`KeyInterner`](crate::ds::KeyInterner)) rather than cloning strings
//! through the hot path.

use std::fmt;
use std::hash::Hash;
use std::ptr::NonNull;

use rustc_hash::FxHashMap;

use crate::error::InvariantError;

/// Outcome of one access against the simulated cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessOutcome {
    /// Key was resident; moved to the MRU position.
    Hit,
    /// Key was absent; inserted at MRU, possibly evicting the LRU key.
    Miss,
}

impl AccessOutcome {
    /// Returns `true` for [`AccessOutcome::Hit`].
    pub const fn is_hit(&self) -> bool {
        matches!(self, AccessOutcome::Hit)
    }

    /// Returns `true` for [`AccessOutcome::Miss`].
    pub const fn is_miss(&self) -> bool {
        matches!(self, AccessOutcome::Miss)
    }
}

/// Node in the recency list.
///
/// Pointers first for locality; the key is needed for index removal during
/// eviction.
#[repr(C)]
struct Node<K> {
    prev: Option<NonNull<Node<K>>>,
    next: Option<NonNull<Node<K>>>,
    key: K,
}

/// Fixed-capacity LRU replay state: residency index, recency list, counters.
///
/// Created once per tested capacity, fed every access of the trace in order,
/// then read out. Any prefix of a trace leaves the counters valid, so a
/// replay can stop early without corrupting results.
pub struct LruSimulator<K>
where
    K: Copy + Eq + Hash,
{
    map: FxHashMap<K, NonNull<Node<K>>>,
    head: Option<NonNull<Node<K>>>,
    tail: Option<NonNull<Node<K>>>,
    capacity: usize,
    hits: u64,
    misses: u64,
    evictions: u64,
}

// SAFETY: LruSimulator can be sent between threads if K is Send. The raw
// pointers only reference heap memory owned by the struct.
unsafe impl<K> Send for LruSimulator<K> where K: Copy + Eq + Hash + Send {}

// SAFETY: Shared references expose no interior mutability; the list is only
// mutated through `&mut self`.
unsafe impl<K> Sync for LruSimulator<K> where K: Copy + Eq + Hash + Sync {}

impl<K> LruSimulator<K>
where
    K: Copy + Eq + Hash,
{
    /// Creates a simulator with the given capacity.
    ///
    /// A capacity of 0 is legal: nothing is ever retained and every access
    /// is a miss.
    pub fn new(capacity: usize) -> Self {
        LruSimulator {
            map: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            head: None,
            tail: None,
            capacity,
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    /// Replays one access.
    ///
    /// Resident key: counted as a hit and moved to the MRU position. Absent
    /// key: counted as a miss, inserted at MRU, and if the resident count
    /// would exceed capacity the LRU key is evicted first.
    pub fn access(&mut self, key: K) -> AccessOutcome {
        if let Some(&node_ptr) = self.map.get(&key) {
            self.hits += 1;
            self.detach(node_ptr);
            self.attach_front(node_ptr);
            self.validate_invariants();
            return AccessOutcome::Hit;
        }

        self.misses += 1;

        // Zero capacity retains nothing; the miss is still counted.
        if self.capacity == 0 {
            return AccessOutcome::Miss;
        }

        if self.map.len() >= self.capacity {
            if let Some(evicted) = self.pop_tail() {
                self.map.remove(&evicted.key);
                self.evictions += 1;
            }
        }

        let node_ptr = NonNull::from(Box::leak(Box::new(Node {
            prev: None,
            next: None,
            key,
        })));
        self.map.insert(key, node_ptr);
        self.attach_front(node_ptr);

        self.validate_invariants();
        AccessOutcome::Miss
    }

    /// Returns `true` if `key` is resident. Does not affect recency.
    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Number of resident keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if nothing is resident.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Configured capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Accesses that found their key resident.
    #[inline]
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Accesses that did not find their key resident.
    #[inline]
    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Keys evicted to make room for over-capacity inserts.
    #[inline]
    pub fn evictions(&self) -> u64 {
        self.evictions
    }

    /// Total accesses replayed so far.
    #[inline]
    pub fn accesses(&self) -> u64 {
        self.hits + self.misses
    }

    /// Hit rate as a percentage; 0.0 before any access (never divides by
    /// zero).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64 * 100.0
        }
    }

    /// The least-recently-used resident key (next eviction victim).
    pub fn lru_key(&self) -> Option<K> {
        self.tail.map(|ptr| unsafe { ptr.as_ref().key })
    }

    /// The most-recently-used resident key.
    pub fn mru_key(&self) -> Option<K> {
        self.head.map(|ptr| unsafe { ptr.as_ref().key })
    }

    /// Position of `key` in the recency order: 0 is MRU.
    ///
    /// O(resident keys) — a diagnostic for tests, not a replay operation.
    pub fn recency_rank(&self, key: &K) -> Option<usize> {
        let &target_ptr = self.map.get(key)?;
        let mut rank = 0usize;
        let mut current = self.head;
        while let Some(ptr) = current {
            if ptr == target_ptr {
                return Some(rank);
            }
            rank += 1;
            current = unsafe { ptr.as_ref().next };
        }
        None
    }

    /// Drops all residency and zeroes the counters, keeping the capacity.
    pub fn reset(&mut self) {
        while self.pop_tail().is_some() {}
        self.map.clear();
        self.hits = 0;
        self.misses = 0;
        self.evictions = 0;
        self.validate_invariants();
    }

    /// Verifies structural and counter invariants, for tests and fuzzing.
    ///
    /// Walks the recency list once: index and list must agree on membership
    /// and length, the list must be properly doubly linked and acyclic, the
    /// resident count must respect capacity, and (for non-zero capacity)
    /// every miss must be accounted for as a resident key or an eviction.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.capacity == 0 && !self.map.is_empty() {
            return Err(InvariantError::new(
                "zero-capacity simulator holds resident keys",
            ));
        }
        if self.map.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "resident count {} exceeds capacity {}",
                self.map.len(),
                self.capacity
            )));
        }

        let mut count = 0usize;
        let mut prev: Option<NonNull<Node<K>>> = None;
        let mut current = self.head;
        while let Some(ptr) = current {
            let node = unsafe { ptr.as_ref() };
            if node.prev != prev {
                return Err(InvariantError::new("recency list prev link mismatch"));
            }
            match self.map.get(&node.key) {
                Some(&mapped) if mapped == ptr => {}
                _ => {
                    return Err(InvariantError::new(
                        "recency list node missing from residency index",
                    ))
                }
            }
            count += 1;
            if count > self.map.len() {
                return Err(InvariantError::new("cycle detected in recency list"));
            }
            prev = current;
            current = node.next;
        }
        if count != self.map.len() {
            return Err(InvariantError::new(format!(
                "recency list length {} does not match index length {}",
                count,
                self.map.len()
            )));
        }
        if self.tail != prev {
            return Err(InvariantError::new(
                "tail does not terminate the recency list",
            ));
        }
        if self.capacity > 0 && self.misses != self.evictions + self.map.len() as u64 {
            return Err(InvariantError::new(format!(
                "counter drift: {} misses vs {} evictions + {} resident",
                self.misses,
                self.evictions,
                self.map.len()
            )));
        }
        Ok(())
    }

    /// Detach a node from the recency list without touching the index.
    #[inline(always)]
    fn detach(&mut self, node_ptr: NonNull<Node<K>>) {
        unsafe {
            let node = node_ptr.as_ref();
            let prev = node.prev;
            let next = node.next;

            match prev {
                Some(mut p) => p.as_mut().next = next,
                None => self.head = next,
            }

            match next {
                Some(mut n) => n.as_mut().prev = prev,
                None => self.tail = prev,
            }
        }
    }

    /// Attach a node at the front (MRU position).
    #[inline(always)]
    fn attach_front(&mut self, mut node_ptr: NonNull<Node<K>>) {
        unsafe {
            let node = node_ptr.as_mut();
            node.prev = None;
            node.next = self.head;

            match self.head {
                Some(mut h) => h.as_mut().prev = Some(node_ptr),
                None => self.tail = Some(node_ptr),
            }

            self.head = Some(node_ptr);
        }
    }

    /// Pop the tail node (LRU) and return it, reclaiming the allocation.
    #[inline(always)]
    fn pop_tail(&mut self) -> Option<Box<Node<K>>> {
        self.tail.map(|tail_ptr| unsafe {
            let node = Box::from_raw(tail_ptr.as_ptr());

            self.tail = node.prev;
            match self.tail {
                Some(mut t) => t.as_mut().next = None,
                None => self.head = None,
            }

            node
        })
    }

    /// Debug-build invariant check after every mutation.
    fn validate_invariants(&self) {
        #[cfg(debug_assertions)]
        if let Err(err) = self.check_invariants() {
            panic!("lru simulator invariant violated: {err}");
        }
    }
}

// Free all heap-allocated nodes when the simulator is dropped.
impl<K> Drop for LruSimulator<K>
where
    K: Copy + Eq + Hash,
{
    fn drop(&mut self) {
        while self.pop_tail().is_some() {}
    }
}

impl<K> fmt::Debug for LruSimulator<K>
where
    K: Copy + Eq + Hash + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruSimulator")
            .field("capacity", &self.capacity)
            .field("resident", &self.map.len())
            .field("hits", &self.hits)
            .field("misses", &self.misses)
            .field("evictions", &self.evictions)
            .finish_non_exhaustive()
    }
}
