//! Trace file parsing.
//!
//! One record per line: `<address> <op>`. The address is decimal or `0x`
//! hexadecimal; `op` is a read marker (`r`, `R`, `l`, `L`) or a write marker
//! (`w`, `W`, `s`, `S`). Blank lines and `#` comments are ignored. Malformed
//! records are logged and returned as errors; parsing continues with the
//! next line.

use std::fs;
use std::path::Path;

use tracing::warn;

use crate::common::{AccessType, SimError, SimResult, TraceParseError};

/// One parsed trace record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceOp {
    /// Byte address.
    pub address: u64,
    /// Read or write.
    pub op: AccessType,
}

/// A parsed trace with its rejected records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trace {
    /// Well-formed records, in file order.
    pub ops: Vec<TraceOp>,
    /// Skipped records.
    pub errors: Vec<TraceParseError>,
}

fn parse_address(text: &str) -> Option<u64> {
    match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => text.parse().ok(),
    }
}

/// Parses one line.
///
/// # Arguments
///
/// * `line_no` - 1-based line number, for error reporting.
/// * `text` - The raw line.
///
/// # Returns
///
/// `None` for blank and comment lines, otherwise the record or the reason it
/// was rejected.
pub fn parse_line(line_no: usize, text: &str) -> Option<Result<TraceOp, TraceParseError>> {
    let body = text.split('#').next().unwrap_or_default().trim();
    if body.is_empty() {
        return None;
    }
    let err = |reason: String| TraceParseError { line: line_no, reason };

    let mut fields = body.split_whitespace();
    let (Some(addr), Some(op)) = (fields.next(), fields.next()) else {
        return Some(Err(err(format!("expected '<address> <op>', got '{body}'"))));
    };
    if let Some(extra) = fields.next() {
        return Some(Err(err(format!("unexpected trailing field '{extra}'"))));
    }
    let Some(address) = parse_address(addr) else {
        return Some(Err(err(format!("invalid address '{addr}'"))));
    };
    Some(op.parse::<AccessType>().map(|op| TraceOp { address, op }).map_err(err))
}

/// Parses a whole trace, logging every skipped record.
pub fn parse_trace(text: &str) -> Trace {
    let mut trace = Trace::default();
    for (i, line) in text.lines().enumerate() {
        match parse_line(i + 1, line) {
            None => {}
            Some(Ok(op)) => trace.ops.push(op),
            Some(Err(e)) => {
                warn!(line = e.line, reason = %e.reason, "skipping malformed trace record");
                trace.errors.push(e);
            }
        }
    }
    trace
}

/// Reads and parses a trace file.
///
/// # Returns
///
/// The parsed trace, or [`SimError::FileRead`] if the file cannot be read.
pub fn load_trace(path: &Path) -> SimResult<Trace> {
    let text = fs::read_to_string(path).map_err(|e| SimError::FileRead(path.to_path_buf(), e))?;
    Ok(parse_trace(&text))
}
