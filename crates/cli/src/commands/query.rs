use std::path::Path;

use anyhow::Result;
use tracewalk_core::config::AnalysisConfig;

use super::run_analysis;

/// Print the most recent mapped trace index at or before `idx`.
///
/// Prints `-1` when no mapped→unmapped transition precedes `idx`.
pub fn prev_mapped_command(
    trace_path: &Path,
    addresses_path: &Path,
    config: &AnalysisConfig,
    segment_capacity: usize,
    idx: usize,
) -> Result<()> {
    let (_trace, analysis) = run_analysis(trace_path, addresses_path, config, segment_capacity)?;

    println!("{}", analysis.previous_mapped_index(idx));

    Ok(())
}
