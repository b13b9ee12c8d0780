//! tracekit: trace-driven LRU cache simulation and working-set analysis.
//!
//! Replays a storage-access trace to answer three questions: which objects
//! are hottest, how many distinct objects each block touches, and how an LRU
//! cache would have performed against the exact access sequence at a given
//! capacity.
//!
//! See `DESIGN.md` for internal architecture and invariants.

pub mod ds;
pub mod error;
pub mod hotspot;
pub mod record;
pub mod report;
pub mod sim;
pub mod stats;
pub mod trace;
pub mod working_set;

pub mod prelude;
