//! Common utilities for result output

use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

/// Output writer that can write to stdout or append to a file
pub struct OutputWriter {
    file: Option<BufWriter<File>>,
    destination: String,
    /// The file ends mid-line; a newline goes out before the next line
    needs_newline: bool,
}

impl OutputWriter {
    /// Create a new OutputWriter for stdout
    pub fn stdout() -> Self {
        Self {
            file: None,
            destination: "-".to_string(),
            needs_newline: false,
        }
    }

    /// Create a new OutputWriter appending to a file, creating it if needed
    pub fn file(path: impl AsRef<Path>) -> io::Result<Self> {
        let path_str = path.as_ref().display().to_string();
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&path)?;
        let needs_newline = ends_mid_line(&mut file)?;

        Ok(Self {
            file: Some(BufWriter::new(file)),
            destination: path_str,
            needs_newline,
        })
    }

    /// Write one line, adding the newline
    pub fn write_line(&mut self, line: &str) -> io::Result<()> {
        if let Some(ref mut f) = self.file {
            if self.needs_newline {
                f.write_all(b"\n")?;
                self.needs_newline = false;
            }
            f.write_all(line.as_bytes())?;
            f.write_all(b"\n")
        } else {
            println!("{}", line);
            Ok(())
        }
    }

    pub fn flush(&mut self) -> io::Result<()> {
        match self.file {
            Some(ref mut f) => f.flush(),
            None => io::stdout().flush(),
        }
    }

    /// Get the destination (file path or "-" for stdout)
    pub fn destination(&self) -> &str {
        &self.destination
    }
}

/// True when a non-empty file does not end with `\n`
fn ends_mid_line(file: &mut File) -> io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

/// Reads the trimmed, non-empty lines already present in a file
///
/// A missing file has no lines.
pub fn existing_lines(path: impl AsRef<Path>) -> io::Result<HashSet<String>> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(HashSet::new()),
        Err(e) => return Err(e),
    };

    let mut lines = HashSet::new();
    for line in BufReader::new(file).lines() {
        let line = line?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            lines.insert(trimmed.to_string());
        }
    }
    Ok(lines)
}
