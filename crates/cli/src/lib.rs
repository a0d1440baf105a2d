use std::fs;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use sha2::{Digest, Sha256};
use tracewalk_core::config::AnalysisConfig;

pub mod commands;

/// Parse a hexadecimal value with an optional `0x` prefix.
///
/// Used for `--address` and `--page-mask` arguments so users can paste
/// addresses straight out of a disassembler.
pub fn parse_hex(text: &str) -> Result<u64> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    u64::from_str_radix(digits, 16)
        .map_err(|_| anyhow!("Invalid hexadecimal value: {text}"))
}

/// Load the analysis configuration.
///
/// Reads the optional YAML config file, then applies the optional
/// `--page-mask` override on top. With neither, the defaults apply.
pub fn load_analysis_config(
    config_path: Option<&Path>,
    page_mask_override: Option<&str>,
) -> Result<AnalysisConfig> {
    let mut config = match config_path {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config at {}", path.display()))?;
            serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse config at {}", path.display()))?
        }
        None => AnalysisConfig::default(),
    };

    if let Some(mask) = page_mask_override {
        config.page_mask = parse_hex(mask).context("Invalid --page-mask")?;
    }

    Ok(config)
}

/// Compute the SHA-256 hash of a file and return it as a hex string.
pub fn sha256_file(path: &Path) -> Result<String> {
    let file = fs::File::open(path)
        .with_context(|| format!("Failed to open file for hashing: {}", path.display()))?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];

    loop {
        let n = reader
            .read(&mut buf)
            .with_context(|| format!("Failed to read file for hashing: {}", path.display()))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    let digest = hasher.finalize();
    Ok(format!("{:x}", digest))
}

/// Render a slide as a signed hex string (e.g., `-0x4000`).
pub fn format_slide(slide: i64) -> String {
    if slide < 0 {
        format!("-0x{:x}", slide.unsigned_abs())
    } else {
        format!("0x{:x}", slide)
    }
}
