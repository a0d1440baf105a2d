//! ASLR slide detection by bucket-and-vote cross-correlation.
//!
//! Loaders slide whole images by a page-aligned offset, so the low address
//! bits of every instruction survive relocation. Bucketing both address sets
//! by those bits lets us compare only addresses that could plausibly be the
//! same instruction, and vote on the exact distance between each candidate
//! pair. The best-supported distance is the slide.

use std::collections::HashMap;

use crate::analysis::{AnalysisError, AnalysisResult};
use crate::model::InstructionAddress;

/// Outcome of slide detection: the winning offset and its vote count.
///
/// `slide` is `binary_address - trace_address` for the correlated pairs, so a
/// negative slide means the image loaded above its static base. `support`
/// counts witnessing (trace, binary) address pairs; repeated trace addresses
/// contribute one vote per pairing occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideDetection {
    pub slide: i64,
    pub support: usize,
}

/// Detect the ASLR slide between `binary_addresses` and `trace_addresses`.
///
/// `page_mask` selects the low bits assumed stable across relocation
/// (`0xFFF` for 4 KiB slides). Fails with
/// [`AnalysisError::InsufficientEvidence`] when the binary set is empty or no
/// trace address lands in a bucket occupied by a binary address.
///
/// Deterministic: the winner is the maximum by `(support, slide)`, so among
/// equally supported candidates the numerically larger slide wins. That
/// tie-break is inherited behavior, deterministic but semantically arbitrary.
pub fn detect_slide(
    binary_addresses: &[InstructionAddress],
    trace_addresses: &[InstructionAddress],
    page_mask: u64,
) -> AnalysisResult<SlideDetection> {
    if binary_addresses.is_empty() {
        return Err(AnalysisError::InsufficientEvidence("no binary instruction addresses"));
    }

    // Bucket the binary addresses by their non-slid low bits.
    let mut binary_buckets: HashMap<u64, Vec<InstructionAddress>> = HashMap::new();
    for &address in binary_addresses {
        binary_buckets.entry(address & page_mask).or_default().push(address);
    }

    // Keep only trace addresses that could correspond to a known instruction;
    // anything in an unoccupied bucket cannot contribute evidence.
    let mut trace_buckets: HashMap<u64, Vec<InstructionAddress>> = HashMap::new();
    for &executed in trace_addresses {
        let bits = executed & page_mask;
        if binary_buckets.contains_key(&bits) {
            trace_buckets.entry(bits).or_default().push(executed);
        }
    }

    // Vote on the distance of every candidate pair, keeping the witnessing
    // trace addresses per candidate.
    let mut votes: HashMap<i64, Vec<InstructionAddress>> = HashMap::new();
    for (bits, bucket) in &binary_buckets {
        let Some(executed_addresses) = trace_buckets.get(bits) else {
            continue;
        };
        for &executed in executed_addresses {
            for &address in bucket {
                let distance = address.wrapping_sub(executed) as i64;
                votes.entry(distance).or_default().push(executed);
            }
        }
    }

    let (slide, support) = votes
        .iter()
        .map(|(&slide, witnesses)| (slide, witnesses.len()))
        .max_by_key(|&(slide, count)| (count, slide))
        .ok_or(AnalysisError::InsufficientEvidence(
            "no trace address shares a bucket with any binary address",
        ))?;

    Ok(SlideDetection { slide, support })
}
