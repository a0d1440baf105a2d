pub mod analyze;
pub mod query;
pub mod rebase;

pub use analyze::*;
pub use query::*;
pub use rebase::*;

use std::path::Path;

use anyhow::{ensure, Context, Result};
use tracewalk_core::analysis::TraceAnalysis;
use tracewalk_core::config::AnalysisConfig;
use tracewalk_core::model::Trace;
use tracewalk_core::sources::{load_trace, FileAddressSource, InstructionAddressSource};

/// Load both inputs and run the analysis once.
///
/// Shared by every subcommand: the engine has no incremental mode, so each
/// invocation constructs a fresh [`TraceAnalysis`].
pub fn run_analysis(
    trace_path: &Path,
    addresses_path: &Path,
    config: &AnalysisConfig,
    segment_capacity: usize,
) -> Result<(Trace, TraceAnalysis)> {
    ensure!(segment_capacity > 0, "--segment-capacity must be nonzero");

    let addresses = FileAddressSource::new(addresses_path)
        .instruction_addresses()
        .with_context(|| format!("Failed to load address list {}", addresses_path.display()))?;

    let trace = load_trace(trace_path, segment_capacity)
        .with_context(|| format!("Failed to load trace {}", trace_path.display()))?;

    let analysis = TraceAnalysis::new(&trace, &addresses, config)
        .context("Trace analysis failed")?;

    Ok((trace, analysis))
}
