use crate::error::{Result, ScannerError};
use globset::{Glob, GlobSet, GlobSetBuilder};
use repo_ingest_chunker::GrammarRegistry;
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

pub const DEFAULT_MAX_FILE_SIZE: u64 = 1_048_576; // 1 MiB

/// Path segments skipped unless the caller replaces the defaults.
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    "node_modules",
    "build",
    "dist",
    ".git",
    "__pycache__",
    "*.pyc",
    "*.log",
    "target",
    "vendor",
];

/// Decides whether a discovered path is worth reading.
///
/// Never reads file content: ignore patterns and extensions are checked on
/// the path, size via `stat`.
#[derive(Debug, Clone)]
pub struct FileFilter {
    root: PathBuf,
    exact: HashSet<String>,
    globs: GlobSet,
    max_file_size: u64,
}

impl FileFilter {
    /// Filter with the default ignore set extended by `extra_patterns`.
    pub fn new(
        root: impl AsRef<Path>,
        extra_patterns: &[String],
        max_file_size: u64,
    ) -> Result<Self> {
        let patterns = DEFAULT_IGNORE_PATTERNS
            .iter()
            .map(|p| p.to_string())
            .chain(extra_patterns.iter().cloned());

        let mut exact = HashSet::new();
        let mut globs = GlobSetBuilder::new();
        for pattern in patterns {
            if is_glob(&pattern) {
                let glob = Glob::new(&pattern).map_err(|e| ScannerError::InvalidPattern {
                    pattern: pattern.clone(),
                    message: e.to_string(),
                })?;
                globs.add(glob);
            } else {
                exact.insert(pattern);
            }
        }
        let globs = globs.build().map_err(|e| ScannerError::InvalidPattern {
            pattern: "<set>".to_string(),
            message: e.to_string(),
        })?;

        Ok(Self {
            root: root.as_ref().to_path_buf(),
            exact,
            globs,
            max_file_size,
        })
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    /// Whether `path` should be read and chunked.
    ///
    /// Stat failures make a path ineligible rather than an error.
    pub fn is_eligible(&self, path: &Path) -> bool {
        if self.is_ignored(path) {
            log::trace!("Skipping ignored path {}", path.display());
            return false;
        }

        if GrammarRegistry::global().resolve_language(path).is_none() {
            return false;
        }

        match std::fs::metadata(path) {
            Ok(meta) if !meta.is_file() => false,
            Ok(meta) if meta.len() > self.max_file_size => {
                log::debug!(
                    "Skipping large file {} ({} bytes > {})",
                    path.display(),
                    meta.len(),
                    self.max_file_size
                );
                false
            }
            Ok(_) => true,
            Err(e) => {
                log::debug!("Cannot stat {}: {e}", path.display());
                false
            }
        }
    }

    /// Whether any segment of `path` below the root matches an ignore pattern.
    pub fn is_ignored(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        relative.components().any(|component| match component {
            Component::Normal(name) => {
                let name = name.to_string_lossy();
                self.exact.contains(&*name) || self.globs.is_match(&*name)
            }
            _ => false,
        })
    }
}

fn is_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}
