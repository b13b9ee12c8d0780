//! LRU cache simulation over replayed access traces.

pub mod lru;
pub mod sweep;

pub use lru::{AccessOutcome, LruSimulator};
pub use sweep::{
    simulate_capacities, simulate_capacities_interned, CapacityList, CapacityRow, CapacitySweep,
    SweepRunner, DEFAULT_CAPACITIES,
};
