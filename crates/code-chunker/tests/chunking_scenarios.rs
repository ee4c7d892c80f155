use pretty_assertions::assert_eq;
use repo_ingest_chunker::{ChunkType, Chunker, ChunkerConfig, CodeChunk};

fn chunk(path: &str, code: &str) -> Vec<CodeChunk> {
    let chunker = Chunker::new(ChunkerConfig::default()).expect("valid config");
    chunker.chunk_file(path, code)
}

/// Rebuild a chunk's text from the original file using only its line span.
fn reconstruct(file: &str, chunk: &CodeChunk) -> String {
    let lines: Vec<&str> = file.split('\n').collect();
    lines[chunk.line_start - 1..chunk.line_end].join("\n")
}

const COMPUTE_SCRIPT: &str = "\
#!/usr/bin/env python3

def compute(values):
    total = sum(values)
    scaled = total * 2
    return scaled

if __name__ == \"__main__\":
    result = [1, 2, 3]
    print(result)
";

#[test]
fn single_function_script_yields_one_function_chunk() {
    let chunks = chunk("scripts/compute.py", COMPUTE_SCRIPT);

    assert_eq!(chunks.len(), 1);
    let only = &chunks[0];
    assert_eq!(only.chunk_type, ChunkType::Function);
    assert_eq!(only.name.as_deref(), Some("compute"));
    assert_eq!((only.line_start, only.line_end), (3, 6));
    assert_eq!(only.language, "python");
}

#[test]
fn chunk_content_matches_line_span() {
    let code = r#"
use std::fmt;

pub struct Meters(f64);

impl fmt::Display for Meters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}m", self.0)
    }
}

pub fn double(m: Meters) -> Meters {
    Meters(m.0 * 2.0)
}
"#;

    let chunks = chunk("src/units.rs", code);
    assert!(chunks.len() >= 3);
    for c in &chunks {
        assert!(c.line_start <= c.line_end);
        assert_eq!(reconstruct(code, c), c.content, "span mismatch for {:?}", c.name);
    }
}

#[test]
fn extracts_functions_inside_module_impl() {
    let code = r"
mod api {
    pub struct Car;

    impl Car {
        pub fn drive(&self) {}
        fn stop(&self) {}
    }
}
";

    let chunks = chunk("nested.rs", code);
    let functions: Vec<_> = chunks
        .iter()
        .filter(|c| c.chunk_type == ChunkType::Function)
        .filter_map(|c| c.name.as_deref())
        .collect();

    assert_eq!(functions, vec!["drive", "stop"]);
    assert!(chunks
        .iter()
        .any(|c| c.chunk_type == ChunkType::Struct && c.name.as_deref() == Some("Car")));
}

#[test]
fn data_like_file_falls_back_to_whole_file() {
    let code = "DEFAULTS = {\n    \"retries\": 3,\n    \"timeout\": 30,\n}\n";
    let chunks = chunk("config/defaults.py", code);

    assert_eq!(chunks.len(), 1);
    let whole = &chunks[0];
    assert_eq!(whole.chunk_type, ChunkType::ModuleFile);
    assert_eq!(whole.name.as_deref(), Some("defaults.py"));
    assert_eq!(whole.content, code);
    assert_eq!(whole.line_start, 1);
    assert_eq!(whole.line_end, code.split('\n').count());
    assert_eq!(reconstruct(code, whole), whole.content);
}

#[test]
fn identical_content_at_different_paths_gets_different_ids() {
    let code = "def helper():\n    return 1\n";
    let a = chunk("a/util.py", code);
    let b = chunk("b/util.py", code);

    assert_eq!(a.len(), 1);
    assert_eq!(b.len(), 1);
    assert_ne!(a[0].id, b[0].id);
    assert_eq!(a[0].content, b[0].content);
}

#[test]
fn ids_are_stable_across_runs() {
    let first: Vec<_> = chunk("lib/app.js", "class App {\n  run() {}\n}\n")
        .into_iter()
        .map(|c| c.id)
        .collect();
    let second: Vec<_> = chunk("lib/app.js", "class App {\n  run() {}\n}\n")
        .into_iter()
        .map(|c| c.id)
        .collect();

    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
}

#[test]
fn malformed_source_yields_whole_file_chunk() {
    let code = "public class Broken {\n    void run( {\n}\n";
    let chunks = chunk("src/Broken.java", code);

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].chunk_type, ChunkType::ModuleFile);
    assert_eq!(chunks[0].language, "java");
}

#[test]
fn java_imports_are_recorded_on_every_chunk() {
    let code = "\
package demo;

import java.util.List;
import java.util.Map;

public class Registry {
    public void add(String key) {}
}
";
    let chunks = chunk("src/Registry.java", code);
    assert_eq!(chunks.len(), 2);
    for c in &chunks {
        assert_eq!(
            c.metadata.imports,
            vec![
                "import java.util.List;".to_string(),
                "import java.util.Map;".to_string()
            ]
        );
        assert_eq!(c.metadata.file_size, code.len());
    }
}
