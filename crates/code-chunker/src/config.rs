use serde::{Deserialize, Serialize};

/// Number of leading file lines scanned for import statements.
pub const DEFAULT_IMPORT_SCAN_LINES: usize = 50;

/// Configuration for structural extraction and chunk building
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChunkerConfig {
    /// Only the first N lines of a file are scanned for imports
    pub import_scan_lines: usize,

    /// Route files whose tree contains syntax errors to the whole-file fallback
    /// instead of emitting partial structural matches
    pub fallback_on_syntax_error: bool,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            import_scan_lines: DEFAULT_IMPORT_SCAN_LINES,
            fallback_on_syntax_error: true,
        }
    }
}

impl ChunkerConfig {
    /// Keep structural matches from trees with recoverable syntax errors
    pub fn lenient() -> Self {
        Self {
            fallback_on_syntax_error: false,
            ..Default::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.import_scan_lines == 0 {
            return Err("import_scan_lines must be > 0".to_string());
        }

        Ok(())
    }
}
