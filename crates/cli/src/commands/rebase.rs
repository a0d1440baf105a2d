use std::path::Path;

use anyhow::Result;
use tracewalk_core::config::AnalysisConfig;

use super::run_analysis;

/// Rebase a single address across the detected region mapping.
///
/// Addresses outside every region pass through unchanged; the command prints
/// the result either way.
pub fn rebase_command(
    trace_path: &Path,
    addresses_path: &Path,
    config: &AnalysisConfig,
    segment_capacity: usize,
    address: u64,
) -> Result<()> {
    let (_trace, analysis) = run_analysis(trace_path, addresses_path, config, segment_capacity)?;

    let rebased = analysis.rebase_address(address);
    println!("0x{:x} -> 0x{:x}", address, rebased);

    Ok(())
}
