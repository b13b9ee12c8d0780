//! Error types for the tracekit library.
//!
//! ## Key Components
//!
//! - [`MissingFieldError`]: Returned when a record lacks a field its key
//!   schema requires (the deriver never substitutes a default).
//! - [`ConfigError`]: Returned when analysis configuration is invalid
//!   (e.g. a malformed or negative capacity in a capacity list).
//! - [`TraceParseError`]: Returned when a trace file cannot be parsed;
//!   carries the 1-based line number of the offending row.
//! - [`InvariantError`]: Returned when internal simulator invariants are
//!   violated (`check_invariants` methods, used by tests and fuzzing).
//!
//! ## Example Usage
//!
//! ```
//! use tracekit::error::ConfigError;
//! use tracekit::sim::CapacityList;
//!
//! // Fallible parse for user-supplied capacity sets
//! let caps: Result<CapacityList, ConfigError> = CapacityList::parse("1000,5000");
//! assert!(caps.is_ok());
//!
//! // A negative capacity is caught without panicking
//! let bad = CapacityList::parse("1000,-5");
//! assert!(bad.is_err());
//! ```

use std::fmt;

use crate::record::KeySchema;

// ---------------------------------------------------------------------------
// MissingFieldError
// ---------------------------------------------------------------------------

/// Error returned when a record lacks a field required by its key schema.
///
/// Produced by [`derive_key`](crate::record::derive_key) and the analyzers
/// that derive keys internally. The schema is selected once per trace, so a
/// missing field means the record disagrees with the trace-wide schema; the
/// deriver refuses to emit a partial key.
///
/// # Example
///
/// ```
/// use tracekit::record::{derive_key, AccessRecord, KeySchema};
///
/// let record = AccessRecord::new(7, "0xAB");
/// let err = derive_key(&record, KeySchema::AddressSlot).unwrap_err();
/// assert_eq!(err.field(), "slot_key");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingFieldError {
    field: &'static str,
    schema: KeySchema,
}

impl MissingFieldError {
    /// Creates a new `MissingFieldError` for the given record field and schema.
    #[inline]
    pub fn new(field: &'static str, schema: KeySchema) -> Self {
        Self { field, schema }
    }

    /// Returns the name of the missing record field.
    #[inline]
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Returns the key schema that required the field.
    #[inline]
    pub fn schema(&self) -> KeySchema {
        self.schema
    }
}

impl fmt::Display for MissingFieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "record is missing `{}` required by key schema {}",
            self.field, self.schema
        )
    }
}

impl std::error::Error for MissingFieldError {}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when analysis configuration parameters are invalid.
///
/// Produced by fallible constructors such as
/// [`CapacityList::parse`](crate::sim::CapacityList::parse). Carries a
/// human-readable description of which parameter failed validation.
///
/// # Example
///
/// ```
/// use tracekit::sim::CapacityList;
///
/// let err = CapacityList::parse("1000,abc").unwrap_err();
/// assert!(err.to_string().contains("capacity"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// TraceParseError
// ---------------------------------------------------------------------------

/// Error returned when a trace file cannot be parsed.
///
/// Produced by [`read_trace`](crate::trace::read_trace) and
/// [`read_trace_from`](crate::trace::read_trace_from). `line` is 1-based and
/// counts every line of the input including the header, so it matches what an
/// editor shows; line 0 marks a whole-file failure (unopenable or empty
/// input) and is omitted from the display. Ingestion stops at the first
/// malformed row; recovery policy beyond that belongs to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceParseError {
    line: u64,
    message: String,
}

impl TraceParseError {
    /// Creates a new `TraceParseError` at the given 1-based line.
    #[inline]
    pub fn new(line: u64, msg: impl Into<String>) -> Self {
        Self {
            line,
            message: msg.into(),
        }
    }

    /// Returns the 1-based line number of the offending row.
    #[inline]
    pub fn line(&self) -> u64 {
        self.line
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for TraceParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line == 0 {
            f.write_str(&self.message)
        } else {
            write!(f, "line {}: {}", self.line, self.message)
        }
    }
}

impl std::error::Error for TraceParseError {}

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal simulator invariants are violated.
///
/// Produced by [`LruSimulator::check_invariants`]
/// (crate::sim::LruSimulator::check_invariants). Carries a human-readable
/// description of which invariant failed. Ordinary operation never returns
/// this; it exists for tests and fuzz harnesses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
