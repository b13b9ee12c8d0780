#![no_main]

use libfuzzer_sys::fuzz_target;
use tracekit::sim::LruSimulator;

// Fuzz model check for LruSimulator
//
// Replays an arbitrary byte-driven access sequence against both the O(1)
// simulator and a naive ordered-Vec LRU model, asserting at every step:
// - Identical hit/miss outcomes
// - Identical resident key sets and recency order (MRU/LRU ends)
// - Counter conservation (hits + misses == accesses)
// - Structural invariants of the pointer-based recency list
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    // First byte picks the capacity (0 is legal and heavily exercised).
    let capacity = (data[0] % 17) as usize;
    let mut sim: LruSimulator<u64> = LruSimulator::new(capacity);
    let mut model = VecModel::new(capacity);

    for (step, &byte) in data[1..].iter().enumerate() {
        let key = u64::from(byte % 32);

        let outcome = sim.access(key);
        let model_hit = model.access(key);
        assert_eq!(
            outcome.is_hit(),
            model_hit,
            "step {step}: outcome diverged for key {key} at capacity {capacity}"
        );
        assert_eq!(outcome.is_miss(), !model_hit);

        assert_eq!(sim.len(), model.order.len());
        assert_eq!(sim.mru_key(), model.order.first().copied());
        assert_eq!(sim.lru_key(), model.order.last().copied());
        for &resident in &model.order {
            assert!(sim.contains(&resident));
        }

        assert_eq!(sim.hits() + sim.misses(), (step + 1) as u64);
        sim.check_invariants().unwrap_or_else(|err| {
            panic!("step {step}: invariant violated: {err}");
        });
    }
});

// Naive reference model: Vec ordered MRU-first, O(n) per access.
struct VecModel {
    capacity: usize,
    order: Vec<u64>,
}

impl VecModel {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            order: Vec::new(),
        }
    }

    fn access(&mut self, key: u64) -> bool {
        if let Some(pos) = self.order.iter().position(|&k| k == key) {
            self.order.remove(pos);
            self.order.insert(0, key);
            return true;
        }
        if self.capacity > 0 {
            if self.order.len() == self.capacity {
                self.order.pop();
            }
            self.order.insert(0, key);
        }
        false
    }
}
