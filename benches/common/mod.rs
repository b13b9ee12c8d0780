//! Synthetic trace generators for replay benchmarks.
//!
//! Provides deterministic access streams without pulling in external RNG
//! crates. Keys follow a Zipfian distribution over a bounded object universe,
//! which matches the skew real storage traces show: a small hot set absorbs
//! most accesses.

use tracekit::record::AccessRecord;

#[derive(Debug, Clone, Copy)]
pub struct TraceSpec {
    /// Distinct objects in the trace.
    pub universe: u64,
    /// Zipfian skew; 0.99 is the YCSB default.
    pub theta: f64,
    /// Accesses per block before the block number advances.
    pub accesses_per_block: u64,
    pub seed: u64,
}

impl TraceSpec {
    pub fn generator(self) -> TraceGenerator {
        TraceGenerator::new(self)
    }

    /// Materializes `count` Zipfian key handles.
    pub fn keys(self, count: usize) -> Vec<u64> {
        let mut generator = self.generator();
        (0..count).map(|_| generator.next_key()).collect()
    }

    /// Materializes `count` full access records with advancing blocks.
    pub fn records(self, count: usize) -> Vec<AccessRecord> {
        let mut generator = self.generator();
        (0..count).map(|_| generator.next_record()).collect()
    }
}

#[derive(Debug, Clone)]
pub struct TraceGenerator {
    spec: TraceSpec,
    rng: XorShift64,
    zipfian: ZipfianState,
    position: u64,
}

impl TraceGenerator {
    pub fn new(spec: TraceSpec) -> Self {
        let universe = spec.universe.max(1);
        Self {
            spec,
            rng: XorShift64::new(spec.seed),
            zipfian: ZipfianState::new(universe, spec.theta),
            position: 0,
        }
    }

    pub fn next_key(&mut self) -> u64 {
        self.zipfian.sample(self.rng.next_f64())
    }

    pub fn next_record(&mut self) -> AccessRecord {
        let key = self.next_key();
        let block = 18_000_000 + self.position / self.spec.accesses_per_block.max(1);
        self.position += 1;
        AccessRecord::new(block, format!("0x{:040x}", key / 8))
            .with_slot(format!("0x{:02x}", key % 8))
    }
}

/// Zipfian distribution state for inverse CDF sampling.
///
/// Uses the algorithm from YCSB (Yahoo Cloud Serving Benchmark).
/// Pre-computes zeta values for efficient sampling.
#[derive(Debug, Clone)]
struct ZipfianState {
    n: u64,
    theta: f64,
    zeta_n: f64,
    alpha: f64,
    eta: f64,
}

impl ZipfianState {
    fn new(n: u64, theta: f64) -> Self {
        let theta = theta.clamp(0.0, 0.9999); // Avoid division issues at theta=1
        let zeta_2 = Self::zeta(2, theta);
        let zeta_n = Self::zeta(n, theta);
        let alpha = 1.0 / (1.0 - theta);
        let eta = (1.0 - (2.0 / n as f64).powf(1.0 - theta)) / (1.0 - zeta_2 / zeta_n);

        Self {
            n,
            theta,
            zeta_n,
            alpha,
            eta,
        }
    }

    /// Compute zeta(n, theta) = sum(1/i^theta for i in 1..=n)
    fn zeta(n: u64, theta: f64) -> f64 {
        let mut sum = 0.0;
        for i in 1..=n {
            sum += 1.0 / (i as f64).powf(theta);
        }
        sum
    }

    /// Sample from Zipfian distribution given uniform random u in [0, 1).
    fn sample(&self, u: f64) -> u64 {
        let uz = u * self.zeta_n;

        if uz < 1.0 {
            return 0;
        }

        if uz < 1.0 + 0.5_f64.powf(self.theta) {
            return 1;
        }

        let spread = (self.n as f64) * (self.eta * u - self.eta + 1.0).powf(self.alpha);
        (spread as u64).min(self.n - 1)
    }
}

#[derive(Debug, Clone, Copy)]
struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    fn next_f64(&mut self) -> f64 {
        const SCALE: f64 = 1.0 / (u64::MAX as f64);
        (self.next_u64() as f64) * SCALE
    }
}
