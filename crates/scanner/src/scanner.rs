use crate::config::ScanOptions;
use crate::error::{Result, ScannerError};
use crate::filter::FileFilter;
use crate::stats::ScanStats;
use crate::tracked::{GitIndex, TrackedFiles};
use ignore::WalkBuilder;
use repo_ingest_chunker::{Chunker, CodeChunk};
use std::collections::VecDeque;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// Where candidate paths come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSource {
    /// Tracked paths from version control
    Tracked,
    /// Full recursive traversal of the root
    Traversal,
}

/// Walks a repository and chunks every eligible file
pub struct RepositoryScanner {
    options: ScanOptions,
    filter: Arc<FileFilter>,
    tracked: Box<dyn TrackedFiles>,
}

impl RepositoryScanner {
    /// Validate options and prepare a scanner. Fails before any file is read.
    pub fn new(options: ScanOptions) -> Result<Self> {
        if !options.root.is_dir() {
            return Err(ScannerError::InvalidPath(options.root.display().to_string()));
        }
        options.validate().map_err(ScannerError::InvalidConfig)?;
        let filter = FileFilter::new(&options.root, &options.extra_ignore, options.max_file_size)?;

        Ok(Self {
            options,
            filter: Arc::new(filter),
            tracked: Box::new(GitIndex),
        })
    }

    /// Replace the tracked-path provider (git index by default).
    #[must_use]
    pub fn with_tracked_files(mut self, tracked: impl TrackedFiles + 'static) -> Self {
        self.tracked = Box::new(tracked);
        self
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Start a fresh, lazy pass over the repository.
    ///
    /// Each call walks from scratch; a stream is not restartable.
    pub fn scan(&self) -> Result<ChunkStream> {
        let chunker = Chunker::new(self.options.chunker.clone())?;
        let (source, paths) = self.candidate_paths();

        Ok(ChunkStream {
            root: self.options.root.clone(),
            source,
            paths,
            filter: Arc::clone(&self.filter),
            chunker,
            pending: VecDeque::new(),
            stats: ScanStats::new(),
        })
    }

    fn candidate_paths(&self) -> (PathSource, Box<dyn Iterator<Item = PathBuf>>) {
        let root = &self.options.root;

        if self.options.use_vcs {
            match self.tracked.list_tracked(root) {
                Ok(Some(tracked)) => {
                    log::info!(
                        "Scanning {} tracked paths in {}",
                        tracked.len(),
                        root.display()
                    );
                    let root = root.clone();
                    let paths = tracked.into_iter().map(move |rel| root.join(rel));
                    return (PathSource::Tracked, Box::new(paths));
                }
                Ok(None) => log::warn!(
                    "Not a version-controlled directory: {}. Scanning all files.",
                    root.display()
                ),
                Err(e) => log::warn!(
                    "Cannot read tracked paths in {}: {e}. Scanning all files.",
                    root.display()
                ),
            }
        }

        (PathSource::Traversal, Box::new(traverse(root, &self.filter)))
    }
}

/// Full recursive traversal, pruning ignored directories early.
fn traverse(root: &Path, filter: &Arc<FileFilter>) -> impl Iterator<Item = PathBuf> {
    let prune = Arc::clone(filter);
    let mut builder = WalkBuilder::new(root);
    builder
        .standard_filters(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b));
    builder.filter_entry(move |entry| !prune.is_ignored(entry.path()));

    builder.build().filter_map(|result| match result {
        Ok(entry) => entry
            .file_type()
            .is_some_and(|ft| ft.is_file())
            .then(|| entry.into_path()),
        Err(e) => {
            log::warn!("Failed to read entry: {e}");
            None
        }
    })
}

/// Lazy stream of chunks. Holds at most one file's chunks at a time.
pub struct ChunkStream {
    root: PathBuf,
    source: PathSource,
    paths: Box<dyn Iterator<Item = PathBuf>>,
    filter: Arc<FileFilter>,
    chunker: Chunker<'static>,
    pending: VecDeque<CodeChunk>,
    stats: ScanStats,
}

impl ChunkStream {
    pub fn source(&self) -> PathSource {
        self.source
    }

    /// Counters for everything pulled so far
    pub fn stats(&self) -> &ScanStats {
        &self.stats
    }

    pub fn into_stats(self) -> ScanStats {
        self.stats
    }

    fn process_file(&mut self, path: &Path) {
        if !self.filter.is_eligible(path) {
            self.stats.add_skipped();
            return;
        }

        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::error!("Failed to process {}: {e}", path.display());
                self.stats.add_read_error();
                return;
            }
        };
        let content = String::from_utf8_lossy(&bytes);
        let relative = relative_path(&self.root, path);

        let chunks = self.chunker.chunk_file(&relative, &content);
        let fallback = chunks.len() == 1 && chunks[0].is_whole_file();
        if let Some(first) = chunks.first() {
            self.stats
                .add_file(&first.language, content.split('\n').count(), fallback);
        }
        log::debug!("Processed {relative}: {} chunks", chunks.len());

        self.pending.extend(chunks);
    }
}

impl Iterator for ChunkStream {
    type Item = CodeChunk;

    fn next(&mut self) -> Option<CodeChunk> {
        loop {
            if let Some(chunk) = self.pending.pop_front() {
                self.stats.add_chunk();
                return Some(chunk);
            }
            let path = self.paths.next()?;
            self.process_file(&path);
        }
    }
}

/// `path` relative to `root`, `/`-separated.
fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(name) => Some(name.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
