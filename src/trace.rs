//! Trace ingestion: delimited access logs with header-based schema detection.
//!
//! A trace is comma-delimited text with a header row. Recognized columns, by
//! exact name: `BlockNum` and `Address` (required), `Type` and `SlotKey`
//! (optional); column order is free and unrecognized columns are ignored.
//! The columns present select the trace's [`KeySchema`] once, with the same
//! priority the deriver uses: `SlotKey` beats `Type` beats address-only.
//!
//! Parsing is strict: the first malformed row aborts with a line-numbered
//! [`TraceParseError`]. Values are trimmed but otherwise preserved verbatim —
//! normalization (lowercasing) happens at key derivation, not here.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::TraceParseError;
use crate::record::{AccessRecord, KeySchema};

/// Required column: block number.
pub const COLUMN_BLOCK: &str = "BlockNum";
/// Required column: accessed address.
pub const COLUMN_ADDRESS: &str = "Address";
/// Optional column: access kind.
pub const COLUMN_TYPE: &str = "Type";
/// Optional column: storage slot.
pub const COLUMN_SLOT: &str = "SlotKey";

// ---------------------------------------------------------------------------
// Trace
// ---------------------------------------------------------------------------

/// A fully ingested trace: its records and the schema its columns selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trace {
    /// Records in file order.
    pub records: Vec<AccessRecord>,
    /// Key schema detected from the header.
    pub schema: KeySchema,
}

impl Trace {
    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` for a header-only trace.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Header layout
// ---------------------------------------------------------------------------

/// Column positions discovered from the header row.
#[derive(Debug, Clone, Copy)]
struct ColumnLayout {
    block: usize,
    address: usize,
    access_type: Option<usize>,
    slot_key: Option<usize>,
    width: usize,
}

impl ColumnLayout {
    fn from_header(line: &str) -> Result<Self, TraceParseError> {
        let mut block = None;
        let mut address = None;
        let mut access_type = None;
        let mut slot_key = None;
        let mut width = 0usize;

        for (idx, raw) in line.split(',').enumerate() {
            // A UTF-8 BOM can precede the first header cell.
            let name = raw.trim().trim_start_matches('\u{feff}');
            match name {
                COLUMN_BLOCK => block = Some(idx),
                COLUMN_ADDRESS => address = Some(idx),
                COLUMN_TYPE => access_type = Some(idx),
                COLUMN_SLOT => slot_key = Some(idx),
                _ => {}
            }
            width = idx + 1;
        }

        let block = block.ok_or_else(|| {
            TraceParseError::new(1, format!("missing required column `{COLUMN_BLOCK}`"))
        })?;
        let address = address.ok_or_else(|| {
            TraceParseError::new(1, format!("missing required column `{COLUMN_ADDRESS}`"))
        })?;

        Ok(Self {
            block,
            address,
            access_type,
            slot_key,
            width,
        })
    }

    fn schema(&self) -> KeySchema {
        KeySchema::detect(self.slot_key.is_some(), self.access_type.is_some())
    }
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// Reads a trace file from disk.
pub fn read_trace(path: impl AsRef<Path>) -> Result<Trace, TraceParseError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        TraceParseError::new(0, format!("cannot open trace `{}`: {e}", path.display()))
    })?;
    read_trace_from(BufReader::new(file))
}

/// Reads a trace from any buffered reader.
///
/// The first line must be the header; blank lines are skipped; CRLF line
/// endings are tolerated. A header-only input is an empty trace. Input with
/// no header row at all is an error, since no schema can be selected.
pub fn read_trace_from<R: BufRead>(mut reader: R) -> Result<Trace, TraceParseError> {
    let mut buf = String::new();
    let mut line_no = 0u64;

    let read_one = |reader: &mut R, buf: &mut String, line_no: u64| {
        buf.clear();
        reader
            .read_line(buf)
            .map_err(|e| TraceParseError::new(line_no + 1, format!("I/O error: {e}")))
    };

    if read_one(&mut reader, &mut buf, line_no)? == 0 {
        return Err(TraceParseError::new(0, "empty trace: missing header row"));
    }
    line_no += 1;
    let layout = ColumnLayout::from_header(buf.trim_end())?;
    let schema = layout.schema();

    let mut records = Vec::new();
    loop {
        if read_one(&mut reader, &mut buf, line_no)? == 0 {
            break;
        }
        line_no += 1;
        let line = buf.trim_end();
        if line.is_empty() {
            continue;
        }
        records.push(parse_row(line, &layout, line_no)?);
    }

    Ok(Trace { records, schema })
}

/// Parses one data row against the header layout.
fn parse_row(
    line: &str,
    layout: &ColumnLayout,
    line_no: u64,
) -> Result<AccessRecord, TraceParseError> {
    let mut block = None;
    let mut address = None;
    let mut access_type = None;
    let mut slot_key = None;
    let mut fields = 0usize;

    for (idx, raw) in line.split(',').enumerate() {
        let value = raw.trim();
        if idx == layout.block {
            block = Some(value);
        } else if idx == layout.address {
            address = Some(value);
        } else if Some(idx) == layout.access_type {
            access_type = Some(value);
        } else if Some(idx) == layout.slot_key {
            slot_key = Some(value);
        }
        fields = idx + 1;
    }

    if fields != layout.width {
        return Err(TraceParseError::new(
            line_no,
            format!("expected {} fields, found {fields}", layout.width),
        ));
    }

    let block = block.filter(|v| !v.is_empty()).ok_or_else(|| {
        TraceParseError::new(line_no, format!("missing `{COLUMN_BLOCK}` value"))
    })?;
    let block_number: u64 = block.parse().map_err(|_| {
        TraceParseError::new(line_no, format!("invalid block number `{block}`"))
    })?;
    let address = address.filter(|v| !v.is_empty()).ok_or_else(|| {
        TraceParseError::new(line_no, format!("missing `{COLUMN_ADDRESS}` value"))
    })?;

    Ok(AccessRecord {
        block_number,
        address: address.to_owned(),
        slot_key: slot_key.filter(|v| !v.is_empty()).map(str::to_owned),
        access_type: access_type.filter(|v| !v.is_empty()).map(str::to_owned),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Trace, TraceParseError> {
        read_trace_from(text.as_bytes())
    }

    #[test]
    fn detects_address_only_schema() {
        let trace = parse("BlockNum,Address\n1,0xAB\n").unwrap();
        assert_eq!(trace.schema, KeySchema::AddressOnly);
        assert_eq!(trace.len(), 1);
        assert_eq!(trace.records[0].block_number, 1);
        assert_eq!(trace.records[0].address, "0xAB");
        assert_eq!(trace.records[0].slot_key, None);
        assert_eq!(trace.records[0].access_type, None);
    }

    #[test]
    fn detects_address_type_schema() {
        let trace = parse("BlockNum,Address,Type\n1,0xAB,SLOAD\n").unwrap();
        assert_eq!(trace.schema, KeySchema::AddressType);
        assert_eq!(trace.records[0].access_type.as_deref(), Some("SLOAD"));
    }

    #[test]
    fn slot_column_outranks_type_column() {
        let trace = parse("BlockNum,Address,Type,SlotKey\n1,0xAB,SLOAD,0x01\n").unwrap();
        assert_eq!(trace.schema, KeySchema::AddressSlot);
        assert_eq!(trace.records[0].slot_key.as_deref(), Some("0x01"));
        assert_eq!(trace.records[0].access_type.as_deref(), Some("SLOAD"));
    }

    #[test]
    fn column_order_is_free_and_extras_are_ignored() {
        let trace = parse("TxHash,Address,BlockNum\n0xfeed,0xAB,42\n").unwrap();
        assert_eq!(trace.schema, KeySchema::AddressOnly);
        assert_eq!(trace.records[0].block_number, 42);
        assert_eq!(trace.records[0].address, "0xAB");
    }

    #[test]
    fn values_are_trimmed_but_not_normalized() {
        let trace = parse("BlockNum,Address\n 7 , 0xAbCd \n").unwrap();
        // Case is preserved; lowercasing belongs to key derivation.
        assert_eq!(trace.records[0].address, "0xAbCd");
        assert_eq!(trace.records[0].block_number, 7);
    }

    #[test]
    fn empty_optional_value_becomes_none() {
        let trace = parse("BlockNum,Address,SlotKey\n1,0xAB,\n2,0xCD,0x01\n").unwrap();
        assert_eq!(trace.records[0].slot_key, None);
        assert_eq!(trace.records[1].slot_key.as_deref(), Some("0x01"));
    }

    #[test]
    fn tolerates_crlf_and_blank_lines() {
        let trace = parse("BlockNum,Address\r\n1,0xAB\r\n\r\n2,0xCD\r\n").unwrap();
        assert_eq!(trace.len(), 2);
        assert_eq!(trace.records[1].address, "0xCD");
    }

    #[test]
    fn strips_leading_bom() {
        let trace = parse("\u{feff}BlockNum,Address\n1,0xAB\n").unwrap();
        assert_eq!(trace.len(), 1);
    }

    #[test]
    fn header_only_is_an_empty_trace() {
        let trace = parse("BlockNum,Address,SlotKey\n").unwrap();
        assert!(trace.is_empty());
        assert_eq!(trace.schema, KeySchema::AddressSlot);
    }

    #[test]
    fn missing_header_is_an_error() {
        let err = parse("").unwrap_err();
        assert_eq!(err.line(), 0);
        assert!(err.message().contains("header"));
    }

    #[test]
    fn missing_required_column_is_an_error() {
        let err = parse("BlockNum,SlotKey\n1,0x01\n").unwrap_err();
        assert_eq!(err.line(), 1);
        assert!(err.message().contains("Address"));

        let err = parse("Address,SlotKey\n0xAB,0x01\n").unwrap_err();
        assert!(err.message().contains("BlockNum"));
    }

    #[test]
    fn bad_block_number_reports_its_line() {
        let err = parse("BlockNum,Address\n1,0xAB\nxyz,0xCD\n").unwrap_err();
        assert_eq!(err.line(), 3);
        assert!(err.message().contains("xyz"));
    }

    #[test]
    fn negative_block_number_is_rejected() {
        let err = parse("BlockNum,Address\n-4,0xAB\n").unwrap_err();
        assert_eq!(err.line(), 2);
    }

    #[test]
    fn ragged_row_is_an_error() {
        let err = parse("BlockNum,Address,SlotKey\n1,0xAB\n").unwrap_err();
        assert_eq!(err.line(), 2);
        assert!(err.message().contains("expected 3 fields"));
    }

    #[test]
    fn missing_required_value_is_an_error() {
        let err = parse("BlockNum,Address\n1, \n").unwrap_err();
        assert_eq!(err.line(), 2);
        assert!(err.message().contains("Address"));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = read_trace("/nonexistent/trace.csv").unwrap_err();
        assert_eq!(err.line(), 0);
        assert!(err.message().contains("/nonexistent/trace.csv"));
    }
}
