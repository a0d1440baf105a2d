//! Unmapped-excursion extraction and the previous-mapped-index query.
//!
//! A trace may leave the known binary image for stretches of dynamically
//! generated or otherwise unknown code. This module finds those excursions in
//! a single forward pass and records, for each one, the last trace index that
//! was still inside the mapped region — the point a viewer can fall back to
//! when asked "where was I last on the map?".

use crate::model::{AddressRange, Trace};

/// Find the mapped→unmapped transition points in `trace`.
///
/// Walks all segments in global-index order (segments are logically
/// contiguous; segment `s`'s local index `r` is global index
/// `s.base_idx + r`). Each returned index is the last mapped index before an
/// excursion into unmapped territory, recorded exactly once per excursion.
/// The result is strictly ascending.
///
/// A trace that starts unmapped produces no entry for that initial gap:
/// there is no prior mapped index to record. Index 0 itself is a valid
/// transition point when the trace starts mapped.
///
/// Assumes `trace.validate_segments()` has already passed.
pub fn find_unmapped_entry_points(trace: &Trace, mapped_region: AddressRange) -> Vec<usize> {
    // One flag per IP table entry; segments test their compressed references
    // against this instead of decoding addresses in the inner loop.
    let mapped_ips: Vec<bool> =
        trace.ip_addrs.iter().map(|&address| mapped_region.contains(address)).collect();

    let mut last_good_idx: Option<usize> = None;
    let mut unmapped_entries = Vec::new();

    for seg in &trace.segments {
        for (relative_idx, &ip_ref) in seg.ips.iter().enumerate() {
            if mapped_ips[ip_ref as usize] {
                last_good_idx = Some(seg.base_idx + relative_idx);
            } else if let Some(idx) = last_good_idx.take() {
                // First unmapped instruction after a mapped run: record where
                // we left the map, once for the whole excursion.
                unmapped_entries.push(idx);
            }
        }
    }

    unmapped_entries
}

/// The ascending sequence of recorded mapped→unmapped transition indices,
/// with a logarithmic "greatest recorded index ≤ query" lookup.
///
/// Built once per analysis and immutable afterward.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnmappedEntryPoints {
    entries: Vec<usize>,
}

impl UnmappedEntryPoints {
    /// Wrap an ascending sequence of transition indices.
    pub fn new(entries: Vec<usize>) -> Self {
        debug_assert!(entries.windows(2).all(|w| w[0] < w[1]));
        Self { entries }
    }

    /// The greatest recorded transition index `<= idx`, or `None` if every
    /// recorded index is larger (or none were recorded).
    ///
    /// O(log M) in the number of recorded transitions, independent of trace
    /// length.
    pub fn prev_mapped(&self, idx: usize) -> Option<usize> {
        let n = self.entries.partition_point(|&entry| entry <= idx);
        if n == 0 {
            None
        } else {
            Some(self.entries[n - 1])
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.entries
    }
}
