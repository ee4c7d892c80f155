use crate::config::ChunkerConfig;
use crate::error::{ChunkerError, Result};
use crate::language::{Grammar, GrammarRegistry, StructuralQuery};
use crate::types::{Extraction, LineSpan, StructuralMatch};
use std::path::Path;
use streaming_iterator::StreamingIterator;
use tree_sitter::{Node, Parser, QueryCursor};

/// Runs a language's structural queries over a parsed tree.
///
/// Grammar-specific nodes never leave this module: every hit is turned into a
/// [`StructuralMatch`] before it is returned.
pub struct StructuralExtractor<'r> {
    registry: &'r GrammarRegistry,
    config: ChunkerConfig,
}

impl StructuralExtractor<'static> {
    /// Extractor over the global grammar registry
    pub fn new(config: ChunkerConfig) -> Self {
        Self::with_registry(GrammarRegistry::global(), config)
    }
}

impl<'r> StructuralExtractor<'r> {
    pub fn with_registry(registry: &'r GrammarRegistry, config: ChunkerConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &'r GrammarRegistry {
        self.registry
    }

    /// Extract structural units from `content`.
    ///
    /// Unsupported languages, structurally flat files and parse/query failures
    /// all come back as [`Extraction::Unmatched`].
    pub fn extract(&self, path: &Path, content: &str) -> Extraction {
        self.extract_resolved(path, self.registry.resolve_language(path), content)
    }

    /// [`extract`](Self::extract) with the grammar already resolved from `path`.
    pub fn extract_resolved(
        &self,
        path: &Path,
        grammar: Option<&Grammar>,
        content: &str,
    ) -> Extraction {
        let Some(grammar) = grammar else {
            return Extraction::Unmatched;
        };

        match self.extract_with_grammar(grammar, content) {
            Ok(matches) => {
                if matches.is_empty() {
                    log::debug!("No structural units in {}", path.display());
                }
                Extraction::from_matches(matches)
            }
            Err(e) => {
                log::warn!(
                    "Structural extraction failed for {}, using whole file: {e}",
                    path.display()
                );
                Extraction::Unmatched
            }
        }
    }

    /// Parse once and run every registered query in order.
    pub fn extract_with_grammar(
        &self,
        grammar: &Grammar,
        content: &str,
    ) -> Result<Vec<StructuralMatch>> {
        let mut parser = Parser::new();
        parser
            .set_language(grammar.tree_sitter_language())
            .map_err(|e| ChunkerError::tree_sitter(format!("Failed to set language: {e}")))?;

        let tree = parser
            .parse(content, None)
            .ok_or_else(|| ChunkerError::parse("Failed to parse source code"))?;
        let root = tree.root_node();

        if self.config.fallback_on_syntax_error && root.has_error() {
            return Err(ChunkerError::parse(format!(
                "{} source contains syntax errors",
                grammar.name()
            )));
        }

        let source = content.as_bytes();
        let mut matches = Vec::new();
        for query in grammar.queries() {
            collect_query_matches(query, root, source, &mut matches);
        }

        Ok(matches)
    }
}

/// Append every unit captured by one query, in tree traversal order.
///
/// A unit is named by the `@name` capture of the same match whose parent is
/// the unit node itself; otherwise it stays anonymous.
fn collect_query_matches(
    query: &StructuralQuery,
    root: Node,
    source: &[u8],
    out: &mut Vec<StructuralMatch>,
) {
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(query.query(), root, source);

    while let Some(m) = matches.next() {
        let name_node = m
            .captures
            .iter()
            .find(|capture| query.is_name(capture.index))
            .map(|capture| capture.node);

        for capture in m.captures {
            let Some(chunk_type) = query.role(capture.index) else {
                continue;
            };
            let node = capture.node;

            let name = name_node
                .filter(|name| name.parent() == Some(node))
                .and_then(|name| name.utf8_text(source).ok())
                .map(str::to_string);

            out.push(StructuralMatch {
                span: LineSpan::new(node.start_position().row, node.end_position().row),
                chunk_type,
                name,
                node_kind: node.kind(),
            });
        }
    }
}
