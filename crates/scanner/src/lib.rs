//! # Repo Ingest Scanner
//!
//! Turns a repository into a lazy stream of code chunks.
//!
//! ## Pipeline
//!
//! ```text
//! Repository root
//!     │
//!     ├──> Tracked paths (git index)
//!     │      └─> or full traversal when not a repository
//!     │
//!     ├──> File Filter (ignore segments, extension, size)
//!     │
//!     ├──> Lossy UTF-8 read
//!     │
//!     └──> Chunker (structural units or whole file)
//!            └─> ChunkStream
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use repo_ingest_scanner::{RepositoryScanner, ScanOptions};
//!
//! fn main() -> repo_ingest_scanner::Result<()> {
//!     let scanner = RepositoryScanner::new(ScanOptions::new("/path/to/repo"))?;
//!     let mut stream = scanner.scan()?;
//!     for chunk in stream.by_ref() {
//!         println!("{} {}:{}", chunk.id, chunk.filepath, chunk.line_start);
//!     }
//!     println!("{} files, {} chunks", stream.stats().files, stream.stats().chunks);
//!     Ok(())
//! }
//! ```

mod config;
mod error;
mod filter;
mod scanner;
mod stats;
mod tracked;

pub use config::ScanOptions;
pub use error::{Result, ScannerError};
pub use filter::{FileFilter, DEFAULT_IGNORE_PATTERNS, DEFAULT_MAX_FILE_SIZE};
pub use scanner::{ChunkStream, PathSource, RepositoryScanner};
pub use stats::ScanStats;
pub use tracked::{GitIndex, TrackedFiles, TrackedList};
