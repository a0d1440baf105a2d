//! Core data model for traces, segments, and remapped address regions.
//!
//! This module contains:
//! - Address primitives (`InstructionAddress`, `AddressRange`)
//! - The trace representation (`Trace`, `TraceSegment`) with layout validation
//! - `RemappedRegion`, the binary-space/trace-space interval pair produced by
//!   slide detection

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A byte address of an executed or disassembled instruction.
pub type InstructionAddress = u64;

/// Error describing a malformed trace segment layout.
///
/// Segments come from an external trace recorder; their `base_idx` values
/// must tile the global trace index space without gaps or overlap, and every
/// compressed IP reference must point into the trace's IP table. A violation
/// means the collaborator handed us a broken trace, so it is propagated, not
/// recovered.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SegmentLayoutError {
    /// A segment does not start where the previous segment ended.
    #[error("segment {segment} starts at index {found}, expected {expected}")]
    Discontiguous { segment: usize, expected: usize, found: usize },

    /// A compressed IP reference points past the end of the IP table.
    #[error("segment {segment} references IP table entry {ip_ref} but the table has {table_len} entries")]
    IpRefOutOfRange { segment: usize, ip_ref: u32, table_len: usize },
}

/// An inclusive address interval `[lo, hi]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressRange {
    pub lo: InstructionAddress,
    pub hi: InstructionAddress,
}

impl AddressRange {
    pub fn new(lo: InstructionAddress, hi: InstructionAddress) -> Self {
        Self { lo, hi }
    }

    /// Whether `address` falls inside this interval (inclusive on both ends).
    pub fn contains(&self, address: InstructionAddress) -> bool {
        self.lo <= address && address <= self.hi
    }

    /// Interval length in bytes (`hi - lo`).
    pub fn len(&self) -> u64 {
        self.hi - self.lo
    }

    pub fn is_empty(&self) -> bool {
        self.hi < self.lo
    }
}

/// A contiguous run of the trace sharing a base offset into the global trace
/// index space.
///
/// `ips` holds *compressed* instruction-pointer references: indices into the
/// owning trace's IP table rather than raw addresses. Segment boundaries
/// reflect the recorder's buffering granularity, not execution semantics;
/// consecutive segments are logically contiguous.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceSegment {
    /// Global trace index of this segment's first entry.
    pub base_idx: usize,
    /// Compressed IP references, one per executed instruction in the segment.
    pub ips: Vec<u32>,
}

impl TraceSegment {
    pub fn new(base_idx: usize, ips: Vec<u32>) -> Self {
        Self { base_idx, ips }
    }

    /// Number of executed instructions covered by this segment.
    pub fn len(&self) -> usize {
        self.ips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ips.is_empty()
    }
}

/// A recorded execution trace: the compressed IP table plus ordered segments.
///
/// `ip_addrs` is the compression table the recorder built while capturing:
/// every distinct executed address appears in it, and segments refer to
/// entries by index. The same address may legitimately occur more than once
/// if the recorder did not fully deduplicate; analysis tolerates repeats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trace {
    /// Compressed IP table; `TraceSegment::ips` values index into this.
    pub ip_addrs: Vec<InstructionAddress>,
    /// Ordered, contiguous segments tiling the global trace index space.
    pub segments: Vec<TraceSegment>,
}

impl Trace {
    pub fn new(ip_addrs: Vec<InstructionAddress>, segments: Vec<TraceSegment>) -> Self {
        Self { ip_addrs, segments }
    }

    /// Total number of executed instructions across all segments.
    pub fn instruction_count(&self) -> usize {
        self.segments.iter().map(|seg| seg.len()).sum()
    }

    /// Decode the instruction address executed at `global_idx`, if in range.
    pub fn ip_at(&self, global_idx: usize) -> Option<InstructionAddress> {
        for seg in &self.segments {
            if global_idx >= seg.base_idx && global_idx < seg.base_idx + seg.len() {
                let ip_ref = seg.ips[global_idx - seg.base_idx];
                return self.ip_addrs.get(ip_ref as usize).copied();
            }
        }
        None
    }

    /// Check that segments tile the global index space starting at 0 with no
    /// gaps or overlap, and that every compressed reference is in the table.
    pub fn validate_segments(&self) -> Result<(), SegmentLayoutError> {
        let mut expected = 0usize;
        for (i, seg) in self.segments.iter().enumerate() {
            if seg.base_idx != expected {
                return Err(SegmentLayoutError::Discontiguous {
                    segment: i,
                    expected,
                    found: seg.base_idx,
                });
            }
            for &ip_ref in &seg.ips {
                if ip_ref as usize >= self.ip_addrs.len() {
                    return Err(SegmentLayoutError::IpRefOutOfRange {
                        segment: i,
                        ip_ref,
                        table_len: self.ip_addrs.len(),
                    });
                }
            }
            expected += seg.len();
        }
        Ok(())
    }
}

/// The same code region viewed in two address spaces.
///
/// `binary` is the span of known instruction addresses in the static image;
/// `runtime` is that span shifted into the traced process's address space.
/// Both intervals have equal length. Built once by slide detection and never
/// mutated afterward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemappedRegion {
    pub binary: AddressRange,
    pub runtime: AddressRange,
}

impl RemappedRegion {
    /// Construct from the binary-space span and the detected slide.
    ///
    /// The two spaces differ by exactly `slide` (`runtime = binary - slide`),
    /// so the runtime interval is the binary interval shifted by `-slide`.
    pub fn from_binary_span(binary: AddressRange, slide: i64) -> Self {
        let runtime = AddressRange::new(
            binary.lo.wrapping_sub(slide as u64),
            binary.hi.wrapping_sub(slide as u64),
        );
        Self { binary, runtime }
    }

    /// Offset added to a binary-space address to obtain its runtime address.
    pub fn delta(&self) -> u64 {
        self.runtime.lo.wrapping_sub(self.binary.lo)
    }
}
