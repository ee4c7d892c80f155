//! Pipeline driver for `repo-ingest`.
//!
//! Connects a [`RepositoryScanner`](repo_ingest_scanner::RepositoryScanner) to a
//! [`ChunkSink`], writing one JSON record per chunk.

mod driver;
mod sink;

pub use driver::{run, Pipeline, DEFAULT_PROGRESS_EVERY};
pub use sink::{open_output, ChunkSink, JsonLinesSink};
