//! Trace loading.
//!
//! This module turns trace text into requests. It performs:
//! 1. **Line parsing:** `r|w <hex address>` into a [`TraceEntry`], skipping blank lines.
//! 2. **Streaming:** [`TraceReader`] yields entries one line at a time from any `BufRead`.
//! 3. **File access:** [`open_trace`] opens a trace file on disk.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

use crate::common::{AccessType, SimError, TraceError};

/// One request of a trace.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraceEntry {
    /// Read or write.
    pub op: AccessType,
    /// Byte address.
    pub addr: u32,
}

impl TraceEntry {
    /// Read request for `addr`.
    pub const fn read(addr: u32) -> Self {
        Self {
            op: AccessType::Read,
            addr,
        }
    }

    /// Write request for `addr`.
    pub const fn write(addr: u32) -> Self {
        Self {
            op: AccessType::Write,
            addr,
        }
    }
}

/// Parses one trace line.
///
/// Returns `Ok(None)` for blank lines. The address is hexadecimal with an
/// optional `0x` prefix.
///
/// # Errors
///
/// Returns a [`TraceError`] if the operation is not `r`/`w` or the address is
/// missing or not a 32-bit hexadecimal number.
pub fn parse_line(line_no: usize, line: &str) -> Result<Option<TraceEntry>, TraceError> {
    let line = line.trim();
    let mut chars = line.chars();
    let Some(op_char) = chars.next() else {
        return Ok(None);
    };
    let op = AccessType::from_op(op_char).ok_or(TraceError::UnknownOperation {
        line: line_no,
        op: op_char,
    })?;

    let text = chars.as_str().split_whitespace().next().unwrap_or_default();
    if text.is_empty() {
        return Err(TraceError::MissingAddress { line: line_no });
    }
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    let addr = u32::from_str_radix(digits, 16).map_err(|_| TraceError::InvalidAddress {
        line: line_no,
        text: text.to_owned(),
    })?;
    Ok(Some(TraceEntry { op, addr }))
}

/// Streaming trace parser over any buffered reader.
///
/// The reader is fused after the first error: once a malformed line or an I/O
/// failure has been yielded, every later call returns `None`.
#[derive(Debug)]
pub struct TraceReader<R> {
    lines: Lines<R>,
    line_no: usize,
    path: PathBuf,
    failed: bool,
}

impl<R: BufRead> TraceReader<R> {
    /// Wraps `reader`; `path` is only used in error messages.
    pub fn new(reader: R, path: impl Into<PathBuf>) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
            path: path.into(),
            failed: false,
        }
    }

    /// Path reported in error messages.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = Result<TraceEntry, SimError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(source) => {
                    self.failed = true;
                    return Some(Err(SimError::Io {
                        path: self.path.clone(),
                        source,
                    }));
                }
            };
            self.line_no += 1;
            match parse_line(self.line_no, &line) {
                Ok(Some(entry)) => return Some(Ok(entry)),
                Ok(None) => {}
                Err(err) => {
                    self.failed = true;
                    return Some(Err(err.into()));
                }
            }
        }
    }
}

/// Opens the trace file at `path` for streaming.
///
/// # Errors
///
/// Returns [`SimError::Io`] if the file cannot be opened.
pub fn open_trace(path: &Path) -> Result<TraceReader<BufReader<File>>, SimError> {
    let file = File::open(path).map_err(|source| SimError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(TraceReader::new(BufReader::new(file), path))
}

/// Parses a whole in-memory trace.
///
/// # Errors
///
/// Returns the first [`TraceError`] encountered.
pub fn parse_trace(text: &str) -> Result<Vec<TraceEntry>, TraceError> {
    text.lines()
        .enumerate()
        .filter_map(|(i, line)| parse_line(i + 1, line).transpose())
        .collect()
}
