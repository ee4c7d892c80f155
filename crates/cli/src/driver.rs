use crate::sink::ChunkSink;
use anyhow::{Context as AnyhowContext, Result};
use repo_ingest_scanner::{RepositoryScanner, ScanOptions, ScanStats};
use std::io;

pub const DEFAULT_PROGRESS_EVERY: usize = 100;

/// Scans a repository and feeds every chunk to a sink, in emission order
pub struct Pipeline {
    scanner: RepositoryScanner,
    progress_every: usize,
}

impl Pipeline {
    /// Validates the repository root and options; nothing is read yet.
    pub fn new(options: ScanOptions) -> Result<Self> {
        let root = options.root.display().to_string();
        let scanner = RepositoryScanner::new(options)
            .with_context(|| format!("Cannot scan repository {root}"))?;
        Ok(Self {
            scanner,
            progress_every: DEFAULT_PROGRESS_EVERY,
        })
    }

    /// Log a running count every `n` chunks. Zero disables progress logs.
    #[must_use]
    pub const fn progress_every(mut self, n: usize) -> Self {
        self.progress_every = n;
        self
    }

    pub fn run(&self, sink: &mut impl ChunkSink) -> Result<ScanStats> {
        let root = self.scanner.options().root.display().to_string();
        log::info!("Scanning {root}");

        let mut stream = self.scanner.scan()?;
        let mut emitted = 0usize;

        for chunk in stream.by_ref() {
            if let Err(err) = sink.write_chunk(&chunk) {
                if err.kind() == io::ErrorKind::BrokenPipe {
                    log::debug!("Output closed after {emitted} chunks");
                    break;
                }
                return Err(err).with_context(|| format!("Failed to write chunk {}", chunk.id));
            }
            emitted += 1;

            if self.progress_every > 0 && emitted % self.progress_every == 0 {
                log::info!("Processed {emitted} chunks");
            }
        }

        let mut stats = stream.into_stats();
        // The stream also counts a chunk the sink refused.
        stats.chunks = emitted;
        log::info!(
            "Done: {} files, {} chunks ({} whole-file), {} skipped, {} read errors",
            stats.files,
            stats.chunks,
            stats.fallback_files,
            stats.skipped,
            stats.read_errors
        );
        for (language, files) in &stats.languages {
            log::debug!("  {language}: {files} files");
        }

        Ok(stats)
    }
}

/// Scan `options.root` and write every chunk to `sink`
pub fn run(options: ScanOptions, sink: &mut impl ChunkSink) -> Result<ScanStats> {
    Pipeline::new(options)?.run(sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use repo_ingest_chunker::{ChunkType, CodeChunk};
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    struct ClosedPipe {
        accepted: usize,
    }

    impl ChunkSink for ClosedPipe {
        fn write_chunk(&mut self, _chunk: &CodeChunk) -> io::Result<()> {
            if self.accepted == 1 {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
            }
            self.accepted += 1;
            Ok(())
        }
    }

    struct FailingSink;

    impl ChunkSink for FailingSink {
        fn write_chunk(&mut self, _chunk: &CodeChunk) -> io::Result<()> {
            Err(io::Error::other("disk full"))
        }
    }

    #[test]
    fn emits_chunks_in_order_and_returns_stats() {
        let temp = tempdir().unwrap();
        write(
            temp.path(),
            "a.py",
            "def first():\n    pass\n\ndef second():\n    pass\n",
        );
        write(temp.path(), "b.rs", "const X: u8 = 1;\n");

        let mut chunks: Vec<CodeChunk> = Vec::new();
        let stats = run(ScanOptions::new(temp.path()).use_vcs(false), &mut chunks).unwrap();

        let names: Vec<_> = chunks.iter().filter_map(|c| c.name.as_deref()).collect();
        assert_eq!(names, vec!["first", "second", "b.rs"]);
        assert_eq!(chunks[2].chunk_type, ChunkType::ModuleFile);
        assert_eq!(stats.files, 2);
        assert_eq!(stats.chunks, 3);
        assert_eq!(stats.fallback_files, 1);
    }

    #[test]
    fn broken_pipe_stops_quietly() {
        let temp = tempdir().unwrap();
        write(temp.path(), "a.go", "package a\n\nfunc A() {}\n\nfunc B() {}\n");

        let mut sink = ClosedPipe { accepted: 0 };
        let stats = run(ScanOptions::new(temp.path()).use_vcs(false), &mut sink).unwrap();
        assert_eq!(sink.accepted, 1);
        assert_eq!(stats.chunks, 1);
    }

    #[test]
    fn other_write_errors_are_fatal() {
        let temp = tempdir().unwrap();
        write(temp.path(), "a.py", "x = 1\n");

        let err = run(ScanOptions::new(temp.path()), &mut FailingSink).unwrap_err();
        assert!(err.to_string().contains("Failed to write chunk"));
    }

    #[test]
    fn missing_root_fails_before_scanning() {
        let temp = tempdir().unwrap();
        let err = Pipeline::new(ScanOptions::new(temp.path().join("absent")))
            .err()
            .expect("missing root");
        assert!(err.to_string().contains("Cannot scan repository"));
    }
}
