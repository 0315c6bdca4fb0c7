//! Deduplicating result sink
//!
//! Results are printed to stdout or appended to a file. When appending,
//! lines already present in the file are skipped, so repeated runs against
//! the same file only add what is new. The file is read once at the start
//! of each write; two writers racing on the same file can still duplicate
//! lines.

use crate::output::common::{existing_lines, OutputWriter};
use crate::types::ResultSet;
use std::io;
use std::path::{Path, PathBuf};

/// Where final results go
#[derive(Debug, Clone, Default)]
pub struct ResultSink {
    path: Option<PathBuf>,
}

impl ResultSink {
    /// Sink printing to stdout
    pub fn stdout() -> Self {
        Self { path: None }
    }

    /// Sink appending new lines to `path`
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Writes a result set in sorted order
    ///
    /// Returns the number of lines written. For file sinks, lines already
    /// in the file are not written again.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, opened or written
    pub fn write(&self, results: &ResultSet) -> io::Result<usize> {
        match self.path {
            None => write_all(&mut OutputWriter::stdout(), results),
            Some(ref path) => append_new(path, results),
        }
    }
}

fn write_all(writer: &mut OutputWriter, results: &ResultSet) -> io::Result<usize> {
    for line in results {
        writer.write_line(line)?;
    }
    writer.flush()?;
    Ok(results.len())
}

fn append_new(path: &Path, results: &ResultSet) -> io::Result<usize> {
    let mut existing = existing_lines(path)?;
    let mut writer = OutputWriter::file(path)?;
    let mut written = 0;

    for line in results {
        let line = line.trim();
        if line.is_empty() || existing.contains(line) {
            continue;
        }
        writer.write_line(line)?;
        existing.insert(line.to_string());
        written += 1;
    }
    writer.flush()?;
    Ok(written)
}
