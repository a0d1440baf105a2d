//! Trace analysis: ASLR slide recovery and unmapped-region extraction.
//!
//! The entry point is [`TraceAnalysis`], which runs the whole pipeline once
//! at construction:
//!
//! 1. [`slide::detect_slide`] cross-correlates the binary's instruction
//!    addresses with the trace's executed addresses to recover the slide.
//! 2. The binary's address span plus the slide yield a
//!    [`RemappedRegion`](crate::model::RemappedRegion).
//! 3. [`unmapped::find_unmapped_entry_points`] scans the trace segments and
//!    records the last mapped index before each excursion into unmapped
//!    memory.
//!
//! All derived state is immutable after construction; queries are read-only
//! and safe to issue from multiple threads.

pub mod remap;
pub mod slide;
pub mod unmapped;

use thiserror::Error;

use crate::config::AnalysisConfig;
use crate::model::{AddressRange, InstructionAddress, RemappedRegion, SegmentLayoutError, Trace};

pub use slide::SlideDetection;
pub use unmapped::UnmappedEntryPoints;

/// Error type for trace analysis construction.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Slide detection had nothing to vote with: either the binary address
    /// set was empty, or no trace address shared a correlation bucket with
    /// any binary address.
    ///
    /// Retrying with the same inputs will fail identically; callers should
    /// treat this as "analysis unavailable for this trace/binary pair".
    #[error("insufficient evidence to detect an ASLR slide: {0}")]
    InsufficientEvidence(&'static str),

    /// The trace's segment layout violated its preconditions.
    #[error("invalid trace segment layout: {0}")]
    InvalidSegmentLayout(#[from] SegmentLayoutError),
}

/// Convenience result type for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// A high-level, debugger-like interface for querying an analyzed trace.
///
/// Construction runs the full analysis eagerly; afterwards the value is a
/// read-only snapshot. There is no incremental update: re-analysis means
/// constructing a new `TraceAnalysis`.
#[derive(Debug, Clone)]
pub struct TraceAnalysis {
    detection: SlideDetection,
    remapped_regions: Vec<RemappedRegion>,
    unmapped_entry_points: UnmappedEntryPoints,
}

impl TraceAnalysis {
    /// Analyze `trace` against the binary's known instruction addresses.
    ///
    /// `binary_addresses` must be non-empty; it need not be sorted, the span
    /// is computed from its min/max. Fails with
    /// [`AnalysisError::InvalidSegmentLayout`] on a malformed trace and
    /// [`AnalysisError::InsufficientEvidence`] when no slide can be ranked.
    pub fn new(
        trace: &Trace,
        binary_addresses: &[InstructionAddress],
        config: &AnalysisConfig,
    ) -> AnalysisResult<Self> {
        trace.validate_segments()?;

        let detection = slide::detect_slide(binary_addresses, &trace.ip_addrs, config.page_mask)?;

        let (Some(&lo), Some(&hi)) = (binary_addresses.iter().min(), binary_addresses.iter().max())
        else {
            // detect_slide already rejects an empty set; kept for totality.
            return Err(AnalysisError::InsufficientEvidence("no binary instruction addresses"));
        };
        let region = RemappedRegion::from_binary_span(AddressRange::new(lo, hi), detection.slide);

        let entries = unmapped::find_unmapped_entry_points(trace, region.runtime);

        Ok(Self {
            detection,
            remapped_regions: vec![region],
            unmapped_entry_points: UnmappedEntryPoints::new(entries),
        })
    }

    /// Return a rebased version of the given address, if one exists.
    ///
    /// Total: addresses outside every known region pass through unchanged
    /// (unmapped code, stack, heap). Within a region pair, rebasing is its
    /// own inverse.
    pub fn rebase_address(&self, address: InstructionAddress) -> InstructionAddress {
        remap::rebase_address(&self.remapped_regions, address)
    }

    /// The greatest recorded mapped-transition index `<= idx`, if any.
    pub fn prev_mapped_index(&self, idx: usize) -> Option<usize> {
        self.unmapped_entry_points.prev_mapped(idx)
    }

    /// Integer form of [`prev_mapped_index`](Self::prev_mapped_index):
    /// returns `-1` when no qualifying index exists.
    pub fn previous_mapped_index(&self, idx: usize) -> i64 {
        match self.prev_mapped_index(idx) {
            Some(found) => found as i64,
            None => -1,
        }
    }

    /// The detected slide and its vote support.
    pub fn detection(&self) -> SlideDetection {
        self.detection
    }

    /// The remapped region list (currently exactly one region).
    pub fn regions(&self) -> &[RemappedRegion] {
        &self.remapped_regions
    }

    /// The recorded mapped→unmapped transition indices.
    pub fn unmapped_entry_points(&self) -> &UnmappedEntryPoints {
        &self.unmapped_entry_points
    }
}
