use anyhow::{Context as AnyhowContext, Result};
use repo_ingest_chunker::CodeChunk;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Destination for emitted chunks
pub trait ChunkSink {
    fn write_chunk(&mut self, chunk: &CodeChunk) -> io::Result<()>;
}

/// One JSON object per line.
///
/// Each record is written whole and flushed, so an interrupted run leaves only
/// complete lines behind.
pub struct JsonLinesSink<W: Write> {
    writer: W,
    written: usize,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Records written so far
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ChunkSink for JsonLinesSink<W> {
    fn write_chunk(&mut self, chunk: &CodeChunk) -> io::Result<()> {
        let mut line = serde_json::to_vec(chunk)?;
        line.push(b'\n');
        self.writer.write_all(&line)?;
        self.writer.flush()?;
        self.written += 1;
        Ok(())
    }
}

impl ChunkSink for Vec<CodeChunk> {
    fn write_chunk(&mut self, chunk: &CodeChunk) -> io::Result<()> {
        self.push(chunk.clone());
        Ok(())
    }
}

/// Open the output destination. `-` means stdout.
pub fn open_output(path: &Path) -> Result<Box<dyn Write>> {
    if path.as_os_str() == "-" {
        return Ok(Box::new(io::stdout()));
    }

    let file = File::create(path)
        .with_context(|| format!("Failed to open output {}", path.display()))?;
    Ok(Box::new(BufWriter::new(file)))
}
