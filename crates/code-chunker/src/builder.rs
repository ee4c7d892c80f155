//! Turns structural matches (or whole files) into [`CodeChunk`] records.
//!
//! Content is always cut on line boundaries. The file is split on `\n` and a
//! span is rejoined with `\n`, so carriage returns survive untouched and a
//! chunk's text can be rebuilt from `line_start..=line_end` alone.

use crate::language::{Grammar, FALLBACK_LANGUAGE};
use crate::types::{ChunkMetadata, ChunkType, CodeChunk, LineSpan, StructuralMatch};
use sha2::{Digest, Sha256};
use std::path::Path;

/// Width of chunk ids in hex characters.
pub const CHUNK_ID_HEX_LEN: usize = 16;

/// Stable id for a chunk.
///
/// `start_line` is 0-indexed. Identical inputs always give the same id.
pub fn chunk_id(path: &str, chunk_type: ChunkType, name: Option<&str>, start_line: usize) -> String {
    let key = format!(
        "{path}:{chunk_type}:{}:{start_line}",
        name.unwrap_or("anonymous")
    );
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    let mut hex = hex_encode_lower(&hasher.finalize());
    hex.truncate(CHUNK_ID_HEX_LEN);
    hex
}

fn hex_encode_lower(bytes: &[u8]) -> String {
    use std::fmt::Write;

    let mut out = String::with_capacity(bytes.len().saturating_mul(2));
    for b in bytes {
        let _ = write!(out, "{b:02x}");
    }
    out
}

/// Import/include lines among the first `limit` lines.
///
/// A line counts when, after trimming, it starts with one of `prefixes`.
/// Multi-line and grouped imports are only caught by their first line.
pub fn extract_imports<'a>(
    lines: impl IntoIterator<Item = &'a str>,
    prefixes: &[&str],
    limit: usize,
) -> Vec<String> {
    if prefixes.is_empty() {
        return Vec::new();
    }

    lines
        .into_iter()
        .take(limit)
        .map(str::trim)
        .filter(|line| prefixes.iter().any(|prefix| line.starts_with(prefix)))
        .map(str::to_string)
        .collect()
}

/// One decoded source file, ready to be cut into chunks.
#[derive(Debug)]
pub struct SourceFile<'a> {
    path: &'a str,
    content: &'a str,
    lines: Vec<&'a str>,
    language: &'static str,
    imports: Vec<String>,
}

impl<'a> SourceFile<'a> {
    /// `path` is the repository-relative path recorded in every chunk.
    pub fn new(
        path: &'a str,
        content: &'a str,
        grammar: Option<&Grammar>,
        import_scan_lines: usize,
    ) -> Self {
        let lines: Vec<&str> = content.split('\n').collect();
        let imports = grammar
            .map(|g| extract_imports(lines.iter().copied(), g.import_prefixes(), import_scan_lines))
            .unwrap_or_default();

        Self {
            path,
            content,
            lines,
            language: grammar.map_or(FALLBACK_LANGUAGE, Grammar::name),
            imports,
        }
    }

    pub fn path(&self) -> &'a str {
        self.path
    }

    pub fn language(&self) -> &'static str {
        self.language
    }

    pub fn imports(&self) -> &[String] {
        &self.imports
    }

    /// Number of `\n`-separated lines, counting a trailing empty one.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Text of a 0-indexed inclusive span, clamped to the file.
    pub fn slice_lines(&self, span: LineSpan) -> String {
        let last = self.lines.len().saturating_sub(1);
        let end = span.end.min(last);
        let start = span.start.min(end);
        self.lines[start..=end].join("\n")
    }

    pub fn build_from_match(&self, unit: &StructuralMatch) -> CodeChunk {
        let last = self.lines.len().saturating_sub(1);
        let end = unit.span.end.min(last);
        let start = unit.span.start.min(end);
        let content = self.slice_lines(LineSpan::new(start, end));

        CodeChunk {
            id: chunk_id(self.path, unit.chunk_type, unit.name.as_deref(), start),
            filepath: self.path.to_string(),
            language: self.language.to_string(),
            chunk_type: unit.chunk_type,
            name: unit.name.clone(),
            line_start: start + 1,
            line_end: end + 1,
            metadata: ChunkMetadata {
                imports: self.imports.clone(),
                file_size: self.content.len(),
                chunk_size: Some(content.len()),
                line_count: None,
                node_type: Some(unit.node_kind.to_string()),
            },
            content,
        }
    }

    /// The single chunk emitted when a file has no structural units.
    pub fn build_whole_file(&self) -> CodeChunk {
        let name = Path::new(self.path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.to_string());
        let line_count = self.line_count();

        CodeChunk {
            id: chunk_id(self.path, ChunkType::ModuleFile, Some(&name), 0),
            filepath: self.path.to_string(),
            content: self.content.to_string(),
            language: self.language.to_string(),
            chunk_type: ChunkType::ModuleFile,
            name: Some(name),
            line_start: 1,
            line_end: line_count,
            metadata: ChunkMetadata {
                imports: self.imports.clone(),
                file_size: self.content.len(),
                chunk_size: None,
                line_count: Some(line_count),
                node_type: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::resolve_language;
    use pretty_assertions::assert_eq;

    fn source<'a>(path: &'a str, content: &'a str) -> SourceFile<'a> {
        SourceFile::new(path, content, resolve_language(path), 50)
    }

    #[test]
    fn test_chunk_id_is_stable_and_fixed_width() {
        let a = chunk_id("src/lib.rs", ChunkType::Function, Some("run"), 4);
        let b = chunk_id("src/lib.rs", ChunkType::Function, Some("run"), 4);
        assert_eq!(a, b);
        assert_eq!(a.len(), CHUNK_ID_HEX_LEN);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_chunk_id_matches_reference_key() {
        let mut hasher = Sha256::new();
        hasher.update(b"a.py:function:anonymous:0");
        let expected = hex_encode_lower(&hasher.finalize())[..16].to_string();
        assert_eq!(chunk_id("a.py", ChunkType::Function, None, 0), expected);
    }

    #[test]
    fn test_chunk_id_changes_with_each_field() {
        let base = chunk_id("a.rs", ChunkType::Function, Some("f"), 1);
        assert_ne!(base, chunk_id("b.rs", ChunkType::Function, Some("f"), 1));
        assert_ne!(base, chunk_id("a.rs", ChunkType::Method, Some("f"), 1));
        assert_ne!(base, chunk_id("a.rs", ChunkType::Function, Some("g"), 1));
        assert_ne!(base, chunk_id("a.rs", ChunkType::Function, None, 1));
        assert_ne!(base, chunk_id("a.rs", ChunkType::Function, Some("f"), 2));
    }

    #[test]
    fn test_imports_only_from_file_head() {
        let mut content = String::from("import os\nfrom typing import List\n");
        for _ in 0..60 {
            content.push_str("x = 1\n");
        }
        content.push_str("import late\n");

        let file = source("mod.py", &content);
        assert_eq!(file.imports(), ["import os", "from typing import List"]);
    }

    #[test]
    fn test_import_heuristic_keeps_js_const_lines() {
        let content = "import React from 'react';\nconst fs = require('fs');\n  require('dotenv').config();\nlet x = 1;\n";
        let file = source("app.js", content);
        assert_eq!(
            file.imports(),
            [
                "import React from 'react';",
                "const fs = require('fs');",
                "require('dotenv').config();",
            ]
        );
    }

    #[test]
    fn test_languages_without_prefixes_have_no_imports() {
        let file = source("main.rs", "use std::fs;\nfn main() {}\n");
        assert!(file.imports().is_empty());
    }

    #[test]
    fn test_build_from_match() {
        let content = "# header\n\ndef compute(x):\n    return x\n";
        let file = source("pkg/calc.py", content);
        let unit = StructuralMatch {
            span: LineSpan::new(2, 3),
            chunk_type: ChunkType::Function,
            name: Some("compute".to_string()),
            node_kind: "function_definition",
        };

        let chunk = file.build_from_match(&unit);
        assert_eq!(chunk.content, "def compute(x):\n    return x");
        assert_eq!((chunk.line_start, chunk.line_end), (3, 4));
        assert_eq!(chunk.filepath, "pkg/calc.py");
        assert_eq!(chunk.language, "python");
        assert_eq!(chunk.metadata.chunk_size, Some(chunk.content.len()));
        assert_eq!(chunk.metadata.file_size, content.len());
        assert_eq!(chunk.metadata.node_type.as_deref(), Some("function_definition"));
        assert_eq!(
            chunk.id,
            chunk_id("pkg/calc.py", ChunkType::Function, Some("compute"), 2)
        );
    }

    #[test]
    fn test_crlf_lines_are_preserved() {
        let content = "a\r\nb\r\nc\r\n";
        let file = source("x.go", content);
        assert_eq!(file.slice_lines(LineSpan::new(0, 1)), "a\r\nb\r");
        assert_eq!(file.slice_lines(LineSpan::new(0, 3)), content);
    }

    #[test]
    fn test_whole_file_chunk() {
        let content = "line one\nline two\n";
        let file = source("docs/setup.py", content);
        let chunk = file.build_whole_file();

        assert_eq!(chunk.chunk_type, ChunkType::ModuleFile);
        assert_eq!(chunk.name.as_deref(), Some("setup.py"));
        assert_eq!(chunk.content, content);
        assert_eq!((chunk.line_start, chunk.line_end), (1, 3));
        assert_eq!(chunk.metadata.line_count, Some(3));
        assert_eq!(chunk.metadata.chunk_size, None);
        assert_eq!(
            chunk.id,
            chunk_id("docs/setup.py", ChunkType::ModuleFile, Some("setup.py"), 0)
        );
    }

    #[test]
    fn test_whole_file_for_unknown_language() {
        let file = source("notes.txt", "hello");
        let chunk = file.build_whole_file();
        assert_eq!(chunk.language, FALLBACK_LANGUAGE);
        assert_eq!((chunk.line_start, chunk.line_end), (1, 1));
    }

    #[test]
    fn test_empty_file_has_one_line() {
        let file = source("empty.py", "");
        let chunk = file.build_whole_file();
        assert_eq!((chunk.line_start, chunk.line_end), (1, 1));
        assert_eq!(chunk.content, "");
    }
}
