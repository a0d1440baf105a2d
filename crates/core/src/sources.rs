//! Input adapters: instruction-address sources and the text trace reader.
//!
//! The analysis engine consumes two external inputs: the binary's known
//! instruction addresses (normally produced by a disassembler integration)
//! and the recorded trace. This module defines the trait seam for the former
//! and simple text-file adapters for both, so the CLI and tests can drive the
//! engine without a disassembler attached.
//!
//! Both file formats are line-oriented: one hexadecimal address per line
//! (optional `0x` prefix), with blank lines and `#` comments ignored. An
//! address-list file carries the binary's instruction addresses in any order;
//! a trace file carries one executed IP per line, in execution order.

use std::fs;
use std::path::{Path, PathBuf};

use std::collections::HashMap;

use thiserror::Error;

use crate::model::{InstructionAddress, Trace, TraceSegment};

/// How many executed instructions a trace segment holds, mirroring a
/// recorder's paging granularity.
pub const DEFAULT_SEGMENT_CAPACITY: usize = 4096;

/// Error type for input adapters.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The input file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line did not parse as a hexadecimal address.
    #[error("{path}:{line}: invalid address {text:?}")]
    Parse { path: PathBuf, line: usize, text: String },

    /// The file contained no addresses at all.
    #[error("{path} contains no addresses")]
    Empty { path: PathBuf },
}

/// Convenience result type for source operations.
pub type SourceResult<T> = Result<T, SourceError>;

/// Anything that can supply the binary's known instruction addresses.
///
/// This is the seam toward the disassembler integration; the engine only
/// requires a non-empty address sequence.
pub trait InstructionAddressSource {
    fn instruction_addresses(&self) -> SourceResult<Vec<InstructionAddress>>;
}

/// Instruction addresses read from an address-list text file.
#[derive(Debug, Clone)]
pub struct FileAddressSource {
    path: PathBuf,
}

impl FileAddressSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl InstructionAddressSource for FileAddressSource {
    fn instruction_addresses(&self) -> SourceResult<Vec<InstructionAddress>> {
        load_address_list(&self.path)
    }
}

/// Parse one hexadecimal address, accepting an optional `0x`/`0X` prefix.
pub fn parse_address(text: &str) -> Option<InstructionAddress> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    InstructionAddress::from_str_radix(digits, 16).ok()
}

/// Read every address in an address-list file.
///
/// Blank lines and lines starting with `#` are skipped. Fails on the first
/// malformed line, or if the file yields no addresses.
pub fn load_address_list(path: &Path) -> SourceResult<Vec<InstructionAddress>> {
    let addresses = parse_address_lines(path)?;
    if addresses.is_empty() {
        return Err(SourceError::Empty { path: path.to_path_buf() });
    }
    Ok(addresses)
}

/// Read a trace file into a [`Trace`].
///
/// Executed addresses are interned into the compressed IP table in
/// first-seen order, and segments are cut every `segment_capacity` entries
/// the way a recorder pages its buffers. `segment_capacity` must be nonzero.
pub fn load_trace(path: &Path, segment_capacity: usize) -> SourceResult<Trace> {
    assert!(segment_capacity > 0, "segment capacity must be nonzero");

    let executed = parse_address_lines(path)?;
    if executed.is_empty() {
        return Err(SourceError::Empty { path: path.to_path_buf() });
    }

    let mut ip_addrs: Vec<InstructionAddress> = Vec::new();
    let mut interned: HashMap<InstructionAddress, u32> = HashMap::new();
    let mut segments: Vec<TraceSegment> = Vec::new();
    let mut current: Vec<u32> = Vec::with_capacity(segment_capacity);
    let mut base_idx = 0usize;

    for address in executed {
        let ip_ref = *interned.entry(address).or_insert_with(|| {
            ip_addrs.push(address);
            (ip_addrs.len() - 1) as u32
        });
        current.push(ip_ref);

        if current.len() == segment_capacity {
            let len = current.len();
            segments.push(TraceSegment::new(base_idx, std::mem::take(&mut current)));
            base_idx += len;
        }
    }

    if !current.is_empty() {
        segments.push(TraceSegment::new(base_idx, current));
    }

    Ok(Trace::new(ip_addrs, segments))
}

fn parse_address_lines(path: &Path) -> SourceResult<Vec<InstructionAddress>> {
    let contents = fs::read_to_string(path)
        .map_err(|source| SourceError::Io { path: path.to_path_buf(), source })?;

    let mut addresses = Vec::new();
    for (line_no, line) in contents.lines().enumerate() {
        let text = line.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }
        match parse_address(text) {
            Some(address) => addresses.push(address),
            None => {
                return Err(SourceError::Parse {
                    path: path.to_path_buf(),
                    line: line_no + 1,
                    text: text.to_string(),
                });
            }
        }
    }
    Ok(addresses)
}
