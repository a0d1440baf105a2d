//! Bidirectional address rebasing across remapped regions.

use crate::model::{InstructionAddress, RemappedRegion};

/// Return a rebased version of the given address, if one exists.
///
/// Regions are tested in insertion order and the first interval match wins.
/// An address inside a region's binary-space interval is shifted up into
/// trace-space; one inside the trace-space interval is shifted down. An
/// address outside every interval passes through unchanged — that is the
/// designed default for unmapped code and data addresses, not an error.
///
/// The linear scan is deliberate: analyses currently produce a single region
/// (one dominant code module). Supporting many modules would warrant an
/// interval tree, not a longer list.
pub fn rebase_address(
    regions: &[RemappedRegion],
    address: InstructionAddress,
) -> InstructionAddress {
    for region in regions {
        if region.binary.contains(address) {
            return address.wrapping_add(region.delta());
        }
        if region.runtime.contains(address) {
            return address.wrapping_sub(region.delta());
        }
    }
    address
}
