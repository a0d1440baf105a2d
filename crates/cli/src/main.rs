use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracewalk::commands::{analyze_command, prev_mapped_command, rebase_command};
use tracewalk::{load_analysis_config, parse_hex};
use tracewalk_core::sources::DEFAULT_SEGMENT_CAPACITY;

/// Trace/binary correlation CLI.
///
/// This CLI is a thin wrapper around `tracewalk-core` (exposed in code as
/// `tracewalk_core`). All substantive logic lives in the library so it can be
/// tested thoroughly and reused from other frontends.
#[derive(Parser, Debug)]
#[command(
    name = "tracewalk",
    version,
    about = "ASLR slide recovery and unmapped-region analysis for execution traces",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Correlate a trace against a binary's instruction addresses and
    /// summarize the result.
    ///
    /// Reports the detected ASLR slide, its vote support, the remapped
    /// region bounds, and the number of unmapped entry points.
    Analyze {
        /// Path to the trace file (one executed IP per line, hex).
        #[arg(long)]
        trace: PathBuf,

        /// Path to the address-list file (one binary instruction address per line, hex).
        #[arg(long)]
        addresses: PathBuf,

        /// Optional YAML analysis config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the correlation page mask (hex, e.g. 0x3FFF for 16 KiB pages).
        #[arg(long)]
        page_mask: Option<String>,

        /// Trace entries per segment when reading the trace file.
        #[arg(long, default_value_t = DEFAULT_SEGMENT_CAPACITY)]
        segment_capacity: usize,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Rebase a single address between binary-space and trace-space.
    ///
    /// Addresses outside the detected region are printed unchanged.
    Rebase {
        /// Path to the trace file (one executed IP per line, hex).
        #[arg(long)]
        trace: PathBuf,

        /// Path to the address-list file (one binary instruction address per line, hex).
        #[arg(long)]
        addresses: PathBuf,

        /// Optional YAML analysis config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the correlation page mask (hex).
        #[arg(long)]
        page_mask: Option<String>,

        /// Trace entries per segment when reading the trace file.
        #[arg(long, default_value_t = DEFAULT_SEGMENT_CAPACITY)]
        segment_capacity: usize,

        /// Address to rebase (hex, optional 0x prefix).
        #[arg(long)]
        address: String,
    },

    /// Find the most recent mapped trace index at or before the given index.
    ///
    /// Prints -1 when no mapped-to-unmapped transition precedes the index.
    PrevMapped {
        /// Path to the trace file (one executed IP per line, hex).
        #[arg(long)]
        trace: PathBuf,

        /// Path to the address-list file (one binary instruction address per line, hex).
        #[arg(long)]
        addresses: PathBuf,

        /// Optional YAML analysis config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the correlation page mask (hex).
        #[arg(long)]
        page_mask: Option<String>,

        /// Trace entries per segment when reading the trace file.
        #[arg(long, default_value_t = DEFAULT_SEGMENT_CAPACITY)]
        segment_capacity: usize,

        /// Global trace index to query.
        #[arg(long)]
        idx: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Analyze { trace, addresses, config, page_mask, segment_capacity, json } => {
            let config = load_analysis_config(config.as_deref(), page_mask.as_deref())?;
            analyze_command(&trace, &addresses, &config, segment_capacity, json)?
        }
        Command::Rebase { trace, addresses, config, page_mask, segment_capacity, address } => {
            let config = load_analysis_config(config.as_deref(), page_mask.as_deref())?;
            let address = parse_hex(&address)?;
            rebase_command(&trace, &addresses, &config, segment_capacity, address)?
        }
        Command::PrevMapped { trace, addresses, config, page_mask, segment_capacity, idx } => {
            let config = load_analysis_config(config.as_deref(), page_mask.as_deref())?;
            prev_mapped_command(&trace, &addresses, &config, segment_capacity, idx)?
        }
    }

    Ok(())
}
