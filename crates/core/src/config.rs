//! Analysis configuration.

use serde::{Deserialize, Serialize};

/// Default correlation mask: low 12 bits, matching 4 KiB page-granularity
/// ASLR slides.
pub const DEFAULT_PAGE_MASK: u64 = 0xFFF;

fn default_page_mask() -> u64 {
    DEFAULT_PAGE_MASK
}

/// Tunable knobs for trace analysis.
///
/// `page_mask` selects the low address bits assumed untouched by the loader's
/// slide. The default assumes 4 KiB pages; platforms with coarser or finer
/// load alignment (e.g., 16 KiB pages on some ARM systems) should widen or
/// narrow it accordingly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Low-bit mask used to bucket addresses during slide correlation.
    #[serde(default = "default_page_mask")]
    pub page_mask: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self { page_mask: DEFAULT_PAGE_MASK }
    }
}

impl AnalysisConfig {
    /// Configuration with an explicit correlation mask.
    pub fn with_page_mask(page_mask: u64) -> Self {
        Self { page_mask }
    }
}
