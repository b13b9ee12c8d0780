//! Support data structures for the analysis pipeline.

pub mod interner;

pub use interner::KeyInterner;
