//! Common imports for driving an analysis run.

pub use crate::ds::KeyInterner;
pub use crate::error::{ConfigError, InvariantError, MissingFieldError, TraceParseError};
pub use crate::hotspot::{aggregate_hotspots, HotspotCounter, HotspotEntry, HotspotTable};
pub use crate::record::{derive_key, AccessRecord, KeySchema};
pub use crate::report::{render_hotspots, render_sweep, render_working_set, RunArtifact};
pub use crate::sim::{
    simulate_capacities, simulate_capacities_interned, AccessOutcome, CapacityList, CapacityRow,
    CapacitySweep, LruSimulator, SweepRunner, DEFAULT_CAPACITIES,
};
pub use crate::stats::DistributionSummary;
pub use crate::trace::{read_trace, read_trace_from, Trace};
pub use crate::working_set::{
    compute_working_set, summarize, WorkingSetCollector, WorkingSetSeries,
};
