use serde::{Deserialize, Serialize};

/// One emitted record: a structural unit or a whole file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CodeChunk {
    /// Stable 16-hex-char id derived from path, type, name and start line
    pub id: String,

    /// Repository-relative path
    pub filepath: String,

    /// Verbatim source of lines `line_start..=line_end`
    pub content: String,

    /// Registered grammar name, or `"text"`
    pub language: String,

    pub chunk_type: ChunkType,

    /// Unit name; `None` for anonymous constructs
    pub name: Option<String>,

    /// Start line (1-indexed)
    pub line_start: usize,

    /// End line (1-indexed, inclusive)
    pub line_end: usize,

    pub metadata: ChunkMetadata,
}

impl CodeChunk {
    /// Whether this chunk is the whole-file fallback
    #[must_use]
    pub fn is_whole_file(&self) -> bool {
        self.chunk_type == ChunkType::ModuleFile
    }
}

/// Metadata attached to every chunk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChunkMetadata {
    /// Raw import lines from the head of the containing file
    pub imports: Vec<String>,

    /// Size of the containing file in bytes
    pub file_size: usize,

    /// Size of `content` in bytes (structural chunks)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_size: Option<usize>,

    /// Number of lines in the file (whole-file chunks)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_count: Option<usize>,

    /// Grammar node kind of the matched unit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
}

/// Kind of logical unit a chunk represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ChunkType {
    Function,
    Method,
    Class,
    Interface,
    Struct,
    Impl,
    Type,
    /// Whole-file fallback
    ModuleFile,
}

impl ChunkType {
    /// Map a query capture name onto a unit kind.
    ///
    /// Only structural roles are recognized; `name` and anything else is `None`.
    #[must_use]
    pub fn from_capture(capture: &str) -> Option<Self> {
        match capture {
            "function" => Some(Self::Function),
            "method" => Some(Self::Method),
            "class" => Some(Self::Class),
            "interface" => Some(Self::Interface),
            "struct" => Some(Self::Struct),
            "impl" => Some(Self::Impl),
            "type" => Some(Self::Type),
            _ => None,
        }
    }

    /// Get the serialized name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Method => "method",
            Self::Class => "class",
            Self::Interface => "interface",
            Self::Struct => "struct",
            Self::Impl => "impl",
            Self::Type => "type",
            Self::ModuleFile => "module_file",
        }
    }
}

impl std::fmt::Display for ChunkType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 0-indexed inclusive line range of a matched unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSpan {
    pub start: usize,
    pub end: usize,
}

impl LineSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }
}

/// A unit found by a structural query, independent of grammar node shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralMatch {
    pub span: LineSpan,
    pub chunk_type: ChunkType,
    pub name: Option<String>,
    /// Grammar node kind, e.g. `function_item`
    pub node_kind: &'static str,
}

/// Outcome of structural extraction for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// At least one structural unit was found
    Matched(Vec<StructuralMatch>),
    /// Unsupported language, no matches, or a parse/query failure
    Unmatched,
}

impl Extraction {
    pub fn from_matches(matches: Vec<StructuralMatch>) -> Self {
        if matches.is_empty() {
            Self::Unmatched
        } else {
            Self::Matched(matches)
        }
    }

    pub fn is_matched(&self) -> bool {
        matches!(self, Self::Matched(_))
    }
}
