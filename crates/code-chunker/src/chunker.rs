use crate::builder::SourceFile;
use crate::config::ChunkerConfig;
use crate::error::{ChunkerError, Result};
use crate::extractor::StructuralExtractor;
use crate::language::GrammarRegistry;
use crate::types::{CodeChunk, Extraction};
use std::path::Path;

/// Main chunker interface: extraction plus whole-file fallback
pub struct Chunker<'r> {
    config: ChunkerConfig,
    extractor: StructuralExtractor<'r>,
}

impl Chunker<'static> {
    /// Create a chunker over the global grammar registry
    pub fn new(config: ChunkerConfig) -> Result<Self> {
        Self::with_registry(GrammarRegistry::global(), config)
    }
}

impl<'r> Chunker<'r> {
    pub fn with_registry(registry: &'r GrammarRegistry, config: ChunkerConfig) -> Result<Self> {
        config.validate().map_err(ChunkerError::invalid_config)?;
        Ok(Self {
            extractor: StructuralExtractor::with_registry(registry, config.clone()),
            config,
        })
    }

    /// Chunk one file. Never returns an empty vector.
    ///
    /// `path` is recorded verbatim in every chunk and is also what the
    /// language is resolved from.
    pub fn chunk_file(&self, path: &str, content: &str) -> Vec<CodeChunk> {
        let path_ref = Path::new(path);
        let grammar = self.extractor.registry().resolve_language(path_ref);
        let file = SourceFile::new(path, content, grammar, self.config.import_scan_lines);

        match self.extractor.extract_resolved(path_ref, grammar, content) {
            Extraction::Matched(units) => units
                .iter()
                .map(|unit| file.build_from_match(unit))
                .collect(),
            Extraction::Unmatched => vec![file.build_whole_file()],
        }
    }
}
