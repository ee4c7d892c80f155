//! Grammar registry: language name → grammar, extensions, structural queries.
//!
//! Languages are rows in [`GRAMMAR_TABLE`]. Supporting a new language means
//! adding a row; nothing downstream branches on a particular language.

use crate::error::{ChunkerError, Result};
use crate::types::ChunkType;
use once_cell::sync::Lazy;
use std::path::Path;
use tree_sitter::Query;

/// Language marker used for files no grammar claims.
pub const FALLBACK_LANGUAGE: &str = "text";

/// Static description of one supported language.
#[derive(Debug, Clone, Copy)]
pub struct GrammarSpec {
    pub name: &'static str,
    /// Lowercase extensions without the leading dot
    pub extensions: &'static [&'static str],
    pub grammar: fn() -> tree_sitter::Language,
    /// Query sources, run in this order
    pub queries: &'static [&'static str],
    /// Line prefixes treated as import/include statements
    pub import_prefixes: &'static [&'static str],
}

fn python_grammar() -> tree_sitter::Language {
    tree_sitter_python::LANGUAGE.into()
}

fn javascript_grammar() -> tree_sitter::Language {
    tree_sitter_javascript::LANGUAGE.into()
}

fn typescript_grammar() -> tree_sitter::Language {
    tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()
}

fn tsx_grammar() -> tree_sitter::Language {
    tree_sitter_typescript::LANGUAGE_TSX.into()
}

fn java_grammar() -> tree_sitter::Language {
    tree_sitter_java::LANGUAGE.into()
}

fn cpp_grammar() -> tree_sitter::Language {
    tree_sitter_cpp::LANGUAGE.into()
}

fn rust_grammar() -> tree_sitter::Language {
    tree_sitter_rust::LANGUAGE.into()
}

fn go_grammar() -> tree_sitter::Language {
    tree_sitter_go::LANGUAGE.into()
}

const TYPESCRIPT_QUERIES: &[&str] = &[
    "(function_declaration name: (identifier) @name) @function",
    "(method_definition name: (property_identifier) @name) @method",
    "(class_declaration name: (type_identifier) @name) @class",
    "(interface_declaration name: (type_identifier) @name) @interface",
];

const JS_IMPORT_PREFIXES: &[&str] = &["import ", "const ", "require("];

/// Every supported language. Extensions must be unique across rows.
pub const GRAMMAR_TABLE: &[GrammarSpec] = &[
    GrammarSpec {
        name: "python",
        extensions: &["py"],
        grammar: python_grammar,
        queries: &[
            "(function_definition name: (identifier) @name) @function",
            "(class_definition name: (identifier) @name) @class",
        ],
        import_prefixes: &["import ", "from "],
    },
    GrammarSpec {
        name: "javascript",
        extensions: &["js", "jsx"],
        grammar: javascript_grammar,
        queries: &[
            "(function_declaration name: (identifier) @name) @function",
            "(method_definition name: (property_identifier) @name) @method",
            "(class_declaration name: (identifier) @name) @class",
            "(arrow_function) @function",
        ],
        import_prefixes: JS_IMPORT_PREFIXES,
    },
    GrammarSpec {
        name: "typescript",
        extensions: &["ts"],
        grammar: typescript_grammar,
        queries: TYPESCRIPT_QUERIES,
        import_prefixes: JS_IMPORT_PREFIXES,
    },
    // TSX needs its own grammar for JSX syntax; records still say "typescript".
    GrammarSpec {
        name: "typescript",
        extensions: &["tsx"],
        grammar: tsx_grammar,
        queries: TYPESCRIPT_QUERIES,
        import_prefixes: JS_IMPORT_PREFIXES,
    },
    GrammarSpec {
        name: "java",
        extensions: &["java"],
        grammar: java_grammar,
        queries: &[
            "(method_declaration name: (identifier) @name) @method",
            "(class_declaration name: (identifier) @name) @class",
            "(interface_declaration name: (identifier) @name) @interface",
        ],
        import_prefixes: &["import "],
    },
    GrammarSpec {
        name: "cpp",
        extensions: &["cpp", "cc", "cxx", "c", "h", "hpp"],
        grammar: cpp_grammar,
        queries: &[
            "(function_definition declarator: (function_declarator declarator: (identifier) @name)) @function",
            "(class_specifier name: (type_identifier) @name) @class",
        ],
        import_prefixes: &[],
    },
    GrammarSpec {
        name: "rust",
        extensions: &["rs"],
        grammar: rust_grammar,
        queries: &[
            "(function_item name: (identifier) @name) @function",
            "(struct_item name: (type_identifier) @name) @struct",
            "(impl_item type: (type_identifier) @name) @impl",
        ],
        import_prefixes: &[],
    },
    GrammarSpec {
        name: "go",
        extensions: &["go"],
        grammar: go_grammar,
        queries: &[
            "(function_declaration name: (identifier) @name) @function",
            "(method_declaration name: (field_identifier) @name) @method",
            "(type_declaration (type_spec name: (type_identifier) @name)) @type",
        ],
        import_prefixes: &[],
    },
];

/// A compiled structural query with its capture roles resolved.
pub struct StructuralQuery {
    source: &'static str,
    query: Query,
    /// Chunk type per capture index; `None` for non-unit captures
    roles: Vec<Option<ChunkType>>,
    name_index: Option<u32>,
}

impl StructuralQuery {
    fn compile(language: &tree_sitter::Language, name: &str, source: &'static str) -> Result<Self> {
        let query = Query::new(language, source)
            .map_err(|e| ChunkerError::invalid_query(name, e.to_string()))?;

        let roles = query
            .capture_names()
            .iter()
            .map(|capture| ChunkType::from_capture(capture))
            .collect();
        let name_index = query.capture_index_for_name("name");

        Ok(Self {
            source,
            query,
            roles,
            name_index,
        })
    }

    pub fn source(&self) -> &'static str {
        self.source
    }

    pub(crate) fn query(&self) -> &Query {
        &self.query
    }

    /// Chunk type bound to a capture, if the capture names a unit kind.
    pub(crate) fn role(&self, capture_index: u32) -> Option<ChunkType> {
        self.roles.get(capture_index as usize).copied().flatten()
    }

    pub(crate) fn is_name(&self, capture_index: u32) -> bool {
        self.name_index == Some(capture_index)
    }
}

impl std::fmt::Debug for StructuralQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StructuralQuery")
            .field("source", &self.source)
            .finish()
    }
}

/// A registered language with its grammar loaded and queries compiled.
pub struct Grammar {
    spec: GrammarSpec,
    language: tree_sitter::Language,
    queries: Vec<StructuralQuery>,
}

impl Grammar {
    fn load(spec: GrammarSpec) -> Self {
        let language = (spec.grammar)();
        let queries = spec
            .queries
            .iter()
            .copied()
            .filter_map(|source| {
                match StructuralQuery::compile(&language, spec.name, source) {
                    Ok(query) => Some(query),
                    Err(e) => {
                        log::error!("Dropping structural query `{source}`: {e}");
                        None
                    }
                }
            })
            .collect();

        Self {
            spec,
            language,
            queries,
        }
    }

    pub fn name(&self) -> &'static str {
        self.spec.name
    }

    pub fn extensions(&self) -> &'static [&'static str] {
        self.spec.extensions
    }

    pub fn import_prefixes(&self) -> &'static [&'static str] {
        self.spec.import_prefixes
    }

    pub fn queries(&self) -> &[StructuralQuery] {
        &self.queries
    }

    pub fn tree_sitter_language(&self) -> &tree_sitter::Language {
        &self.language
    }
}

impl std::fmt::Debug for Grammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Grammar")
            .field("name", &self.spec.name)
            .field("extensions", &self.spec.extensions)
            .field("queries", &self.queries)
            .finish()
    }
}

/// Lookup table over loaded grammars. Read-only once built.
#[derive(Debug)]
pub struct GrammarRegistry {
    grammars: Vec<Grammar>,
}

static GLOBAL_REGISTRY: Lazy<GrammarRegistry> =
    Lazy::new(|| GrammarRegistry::from_specs(GRAMMAR_TABLE));

impl GrammarRegistry {
    /// Build a registry from an explicit table.
    pub fn from_specs(specs: &[GrammarSpec]) -> Self {
        Self {
            grammars: specs.iter().copied().map(Grammar::load).collect(),
        }
    }

    /// The process-wide registry built from [`GRAMMAR_TABLE`].
    pub fn global() -> &'static Self {
        &GLOBAL_REGISTRY
    }

    /// Resolve a path to a grammar by its extension (case-insensitive).
    pub fn resolve_language(&self, path: impl AsRef<Path>) -> Option<&Grammar> {
        let ext = path.as_ref().extension()?.to_str()?.to_lowercase();
        self.grammars
            .iter()
            .find(|grammar| grammar.extensions().contains(&ext.as_str()))
    }

    /// Queries registered for a language name, in registration order.
    ///
    /// Languages split across several rows (typescript/tsx) report the first row.
    pub fn queries_for(&self, language: &str) -> &[StructuralQuery] {
        self.grammars
            .iter()
            .find(|grammar| grammar.name() == language)
            .map(Grammar::queries)
            .unwrap_or(&[])
    }
}

/// Resolve a path against the global registry.
pub fn resolve_language(path: impl AsRef<Path>) -> Option<&'static Grammar> {
    GrammarRegistry::global().resolve_language(path)
}

/// Structural queries for a language in the global registry.
pub fn queries_for(language: &str) -> &'static [StructuralQuery] {
    GrammarRegistry::global().queries_for(language)
}
