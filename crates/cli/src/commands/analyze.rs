use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use tracewalk_core::config::AnalysisConfig;
use tracewalk_core::model::RemappedRegion;

use crate::{format_slide, sha256_file};

use super::run_analysis;

/// One remapped region rendered for the report, addresses in hex.
#[derive(Debug, Serialize)]
pub struct RegionReport {
    pub binary_lo: String,
    pub binary_hi: String,
    pub runtime_lo: String,
    pub runtime_hi: String,
}

impl RegionReport {
    fn from_region(region: &RemappedRegion) -> Self {
        Self {
            binary_lo: format!("0x{:x}", region.binary.lo),
            binary_hi: format!("0x{:x}", region.binary.hi),
            runtime_lo: format!("0x{:x}", region.runtime.lo),
            runtime_hi: format!("0x{:x}", region.runtime.hi),
        }
    }
}

/// Serializable summary of one analysis run, emitted by `analyze --json`.
#[derive(Debug, Serialize)]
pub struct AnalysisReport {
    pub generated_at: String,
    pub trace_path: String,
    pub trace_sha256: String,
    pub addresses_path: String,
    pub addresses_sha256: String,
    pub page_mask: String,
    pub slide: i64,
    pub slide_hex: String,
    pub support: usize,
    pub instruction_count: usize,
    pub regions: Vec<RegionReport>,
    pub unmapped_entry_points: usize,
}

/// Run the full analysis and print a summary (human-readable or JSON).
pub fn analyze_command(
    trace_path: &Path,
    addresses_path: &Path,
    config: &AnalysisConfig,
    segment_capacity: usize,
    json: bool,
) -> Result<()> {
    let (trace, analysis) = run_analysis(trace_path, addresses_path, config, segment_capacity)?;
    let detection = analysis.detection();

    let report = AnalysisReport {
        generated_at: Utc::now().to_rfc3339(),
        trace_path: trace_path.display().to_string(),
        trace_sha256: sha256_file(trace_path)?,
        addresses_path: addresses_path.display().to_string(),
        addresses_sha256: sha256_file(addresses_path)?,
        page_mask: format!("0x{:x}", config.page_mask),
        slide: detection.slide,
        slide_hex: format_slide(detection.slide),
        support: detection.support,
        instruction_count: trace.instruction_count(),
        regions: analysis.regions().iter().map(RegionReport::from_region).collect(),
        unmapped_entry_points: analysis.unmapped_entry_points().len(),
    };

    if json {
        let serialized = serde_json::to_string_pretty(&report)
            .context("Failed to serialize analysis report to JSON")?;
        println!("{}", serialized);
        return Ok(());
    }

    println!("tracewalk v{}", tracewalk_core::version());
    println!("Trace: {} ({} instructions)", report.trace_path, report.instruction_count);
    println!("Addresses: {}", report.addresses_path);
    println!("Page mask: {}", report.page_mask);
    println!("Slide: {} (support: {})", report.slide_hex, report.support);
    for region in &report.regions {
        println!(
            "Region: binary [{}, {}] <-> runtime [{}, {}]",
            region.binary_lo, region.binary_hi, region.runtime_lo, region.runtime_hi
        );
    }
    println!("Unmapped entry points: {}", report.unmapped_entry_points);

    Ok(())
}
