//! # Repo Ingest Chunker
//!
//! Splits source files into self-contained, stably identified chunks using
//! per-language tree-sitter queries.
//!
//! ## Architecture
//!
//! ```text
//! Source file
//!     │
//!     ├──> Grammar Registry (extension → grammar + queries)
//!     │
//!     ├──> Structural Extractor
//!     │    ├─> Parse once with tree-sitter
//!     │    ├─> Run each query in registration order
//!     │    └─> Matched(units) | Unmatched
//!     │
//!     └──> Chunk Builder
//!          ├─> Line-sliced content + stable id
//!          ├─> Imports from the file head
//!          └─> Whole-file chunk when Unmatched
//! ```
//!
//! ## Example
//!
//! ```rust
//! use repo_ingest_chunker::{ChunkType, Chunker, ChunkerConfig};
//!
//! let chunker = Chunker::new(ChunkerConfig::default()).unwrap();
//!
//! let code = "def compute(x):\n    return x * 2\n";
//! let chunks = chunker.chunk_file("calc.py", code);
//!
//! assert_eq!(chunks.len(), 1);
//! assert_eq!(chunks[0].chunk_type, ChunkType::Function);
//! assert_eq!(chunks[0].name.as_deref(), Some("compute"));
//! ```

mod builder;
mod chunker;
mod config;
mod error;
mod extractor;
mod language;
mod types;

pub use builder::{chunk_id, extract_imports, SourceFile, CHUNK_ID_HEX_LEN};
pub use chunker::Chunker;
pub use config::{ChunkerConfig, DEFAULT_IMPORT_SCAN_LINES};
pub use error::{ChunkerError, Result};
pub use extractor::StructuralExtractor;
pub use language::{
    queries_for, resolve_language, Grammar, GrammarRegistry, GrammarSpec, StructuralQuery,
    FALLBACK_LANGUAGE, GRAMMAR_TABLE,
};
pub use types::{ChunkMetadata, ChunkType, CodeChunk, Extraction, LineSpan, StructuralMatch};
