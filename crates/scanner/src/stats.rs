use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Statistics about a scan
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScanStats {
    /// Files read and chunked
    pub files: usize,

    /// Chunks handed to the consumer
    pub chunks: usize,

    /// Files that produced only the whole-file chunk
    pub fallback_files: usize,

    /// Candidate paths rejected by the filter
    pub skipped: usize,

    /// Total lines across chunked files
    pub total_lines: usize,

    /// Files per language
    pub languages: BTreeMap<String, usize>,

    /// Files that could not be read (each one is logged)
    pub read_errors: usize,
}

impl ScanStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, language: &str, lines: usize, fallback: bool) {
        self.files += 1;
        self.total_lines += lines;
        if fallback {
            self.fallback_files += 1;
        }
        *self.languages.entry(language.to_string()).or_insert(0) += 1;
    }

    pub fn add_chunk(&mut self) {
        self.chunks += 1;
    }

    pub fn add_skipped(&mut self) {
        self.skipped += 1;
    }

    pub fn add_read_error(&mut self) {
        self.read_errors += 1;
    }
}
