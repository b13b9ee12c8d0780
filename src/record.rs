//! Access records and canonical key derivation.
//!
//! ## Key Components
//!
//! - [`AccessRecord`]: One storage access from a replayed execution trace.
//! - [`KeySchema`]: The trace-wide rule for turning a record into its
//!   canonical key, chosen once per trace from the columns present.
//! - [`derive_key`]: Derives the canonical key for a record under a schema.
//!
//! Every downstream statistic — hotspot counts, per-block working-set sizes,
//! LRU hit rates — compares accesses by canonical key, so all consumers must
//! derive keys through this module with the same schema.
//!
//! ## Example Usage
//!
//! ```
//! use tracekit::record::{derive_key, AccessRecord, KeySchema};
//!
//! let record = AccessRecord::new(18_500_000, "0xDEAD").with_slot("0x01");
//! let key = derive_key(&record, KeySchema::AddressSlot).unwrap();
//! assert_eq!(key, "0xdead_0x01");
//! ```

use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::MissingFieldError;

/// Separator between key components; matches the trace tooling's key format.
pub const KEY_SEPARATOR: char = '_';

// ---------------------------------------------------------------------------
// AccessRecord
// ---------------------------------------------------------------------------

/// One storage access from a replayed execution trace.
///
/// `block_number` is non-decreasing across a well-formed trace but not
/// necessarily contiguous; the analyzers do not rely on either property.
/// Optional fields are present only when the trace variant carries the
/// matching column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessRecord {
    /// Block in which the access occurred.
    pub block_number: u64,
    /// Contract or account identifier.
    pub address: String,
    /// Storage slot, present only in slot-level traces.
    pub slot_key: Option<String>,
    /// Access kind (e.g. read/write), present only in some trace variants.
    pub access_type: Option<String>,
}

impl AccessRecord {
    /// Creates a record with only the required fields.
    pub fn new(block_number: u64, address: impl Into<String>) -> Self {
        Self {
            block_number,
            address: address.into(),
            slot_key: None,
            access_type: None,
        }
    }

    /// Sets the storage slot.
    #[must_use]
    pub fn with_slot(mut self, slot_key: impl Into<String>) -> Self {
        self.slot_key = Some(slot_key.into());
        self
    }

    /// Sets the access kind.
    #[must_use]
    pub fn with_access_type(mut self, access_type: impl Into<String>) -> Self {
        self.access_type = Some(access_type.into());
        self
    }
}

// ---------------------------------------------------------------------------
// KeySchema
// ---------------------------------------------------------------------------

/// Trace-wide key derivation rule, selected once from the columns present.
///
/// Priority is richest-first: a trace with slot keys is keyed per slot, a
/// trace with access types (but no slots) per type, anything else per
/// address. Two traces analyzed under different schemas are not comparable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeySchema {
    /// Key on the address alone.
    AddressOnly,
    /// Key on address + access type.
    AddressType,
    /// Key on address + storage slot (finest granularity).
    AddressSlot,
}

impl KeySchema {
    /// Selects the schema for a trace given which optional columns it has.
    ///
    /// `slot_key` wins over `access_type`; both absent means address-only.
    pub fn detect(has_slot_key: bool, has_access_type: bool) -> Self {
        if has_slot_key {
            KeySchema::AddressSlot
        } else if has_access_type {
            KeySchema::AddressType
        } else {
            KeySchema::AddressOnly
        }
    }

    /// Human-readable schema name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            KeySchema::AddressOnly => "address-only",
            KeySchema::AddressType => "address+type",
            KeySchema::AddressSlot => "address+slot",
        }
    }

    /// The optional record field this schema requires, if any.
    pub const fn required_field(&self) -> Option<&'static str> {
        match self {
            KeySchema::AddressOnly => None,
            KeySchema::AddressType => Some("access_type"),
            KeySchema::AddressSlot => Some("slot_key"),
        }
    }
}

impl fmt::Display for KeySchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for KeySchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Key derivation
// ---------------------------------------------------------------------------

/// Derives the canonical key for `record` under `schema`.
///
/// Pure: the same record and schema always produce the same key. Components
/// are lowercased and joined with [`KEY_SEPARATOR`]. A record lacking a field
/// its schema requires is a [`MissingFieldError`]; no partial or defaulted
/// key is ever produced.
pub fn derive_key(record: &AccessRecord, schema: KeySchema) -> Result<String, MissingFieldError> {
    let suffix = match schema {
        KeySchema::AddressOnly => None,
        KeySchema::AddressType => Some(
            record
                .access_type
                .as_deref()
                .ok_or_else(|| MissingFieldError::new("access_type", schema))?,
        ),
        KeySchema::AddressSlot => Some(
            record
                .slot_key
                .as_deref()
                .ok_or_else(|| MissingFieldError::new("slot_key", schema))?,
        ),
    };

    let mut key =
        String::with_capacity(record.address.len() + suffix.map_or(0, |s| s.len() + 1));
    push_lower(&mut key, &record.address);
    if let Some(suffix) = suffix {
        key.push(KEY_SEPARATOR);
        push_lower(&mut key, suffix);
    }
    Ok(key)
}

/// Appends `src` to `dst`, lowercased, without an intermediate allocation.
fn push_lower(dst: &mut String, src: &str) {
    dst.extend(src.chars().flat_map(|c| c.to_lowercase()));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
