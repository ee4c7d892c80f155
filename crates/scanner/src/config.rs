use crate::filter::DEFAULT_MAX_FILE_SIZE;
use repo_ingest_chunker::ChunkerConfig;
use std::path::{Path, PathBuf};

/// Options for one repository scan
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Repository root
    pub root: PathBuf,

    /// Ignore patterns added to the defaults
    pub extra_ignore: Vec<String>,

    /// Files larger than this are skipped without being opened
    pub max_file_size: u64,

    /// Prefer version-control tracked paths when the root is a repository
    pub use_vcs: bool,

    pub chunker: ChunkerConfig,
}

impl ScanOptions {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            extra_ignore: Vec::new(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            use_vcs: true,
            chunker: ChunkerConfig::default(),
        }
    }

    #[must_use]
    pub fn ignore(mut self, pattern: impl Into<String>) -> Self {
        self.extra_ignore.push(pattern.into());
        self
    }

    #[must_use]
    pub const fn max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = bytes;
        self
    }

    #[must_use]
    pub const fn use_vcs(mut self, enabled: bool) -> Self {
        self.use_vcs = enabled;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.root.is_dir() {
            return Err(format!(
                "repository root {} is not a directory",
                self.root.display()
            ));
        }

        if self.max_file_size == 0 {
            return Err("max_file_size must be > 0".to_string());
        }

        if self.extra_ignore.iter().any(|p| p.trim().is_empty()) {
            return Err("ignore patterns must not be empty".to_string());
        }

        self.chunker.validate()
    }
}
