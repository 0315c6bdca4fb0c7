//! Term list loading
//!
//! Every list-valued flag (extensions, dictionary words, content terms,
//! exclusions) accepts either an existing file path or an inline
//! comma-separated list:
//!
//! - `pdf,doc,bak` - three inline terms
//! - `extensions.txt` - one term per line
//!
//! # Example
//!
//! ```
//! use banshee_core::terms::TermList;
//!
//! let list = TermList::load("pdf, doc,,bak").unwrap();
//! assert_eq!(list.terms, vec!["pdf", "doc", "bak"]);
//! assert!(!list.from_file);
//! ```

use crate::error::Result;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Terms expanded from a flag value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermList {
    /// Trimmed, non-empty terms in input order
    pub terms: Vec<String>,
    /// Whether the terms were read from a file
    pub from_file: bool,
}

impl TermList {
    /// Expands a flag value into its terms
    ///
    /// If `value` names an existing file its lines are used, otherwise the
    /// value is split on commas.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read
    pub fn load(value: &str) -> Result<Self> {
        let path = Path::new(value);
        if !value.is_empty() && path.is_file() {
            return Ok(Self {
                terms: read_lines(path)?,
                from_file: true,
            });
        }

        Ok(Self {
            terms: split_inline(value),
            from_file: false,
        })
    }

    /// Maps every term, dropping the ones that become empty
    pub fn map_terms<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> String,
    {
        self.terms = self
            .terms
            .iter()
            .map(|t| f(t))
            .filter(|t| !t.is_empty())
            .collect();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Splits a comma-separated value into trimmed, non-empty terms
pub fn split_inline(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Reads trimmed, non-empty lines from a file
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read
pub fn read_lines(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let file = File::open(path)?;
    read_lines_from(BufReader::new(file))
}

/// Reads trimmed, non-empty lines from any buffered reader
pub fn read_lines_from<R: BufRead>(reader: R) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            lines.push(trimmed.to_string());
        }
    }
    Ok(lines)
}

/// Reads a target list, skipping blank lines and `#` comments
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read
pub fn read_targets(path: impl AsRef<Path>) -> Result<Vec<String>> {
    Ok(read_lines(path)?
        .into_iter()
        .filter(|l| !l.starts_with('#'))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_single_inline_term() {
        let list = TermList::load("pdf").unwrap();
        assert_eq!(list.terms, vec!["pdf"]);
        assert!(!list.from_file);
    }

    #[test]
    fn test_inline_terms_trimmed() {
        let list = TermList::load(" admin , backup.zip ,").unwrap();
        assert_eq!(list.terms, vec!["admin", "backup.zip"]);
    }

    #[test]
    fn test_empty_value() {
        let list = TermList::load("").unwrap();
        assert!(list.is_empty());
        assert!(!list.from_file);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "pdf").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "  xlsx  ").unwrap();
        file.flush().unwrap();

        let list = TermList::load(file.path().to_str().unwrap()).unwrap();
        assert!(list.from_file);
        assert_eq!(list.terms, vec!["pdf", "xlsx"]);
    }

    #[test]
    fn test_map_terms_drops_empty() {
        let list = TermList::load("\"admin\",\"\",login").unwrap();
        let list = list.map_terms(|t| t.trim_matches('"').to_string());
        assert_eq!(list.terms, vec!["admin", "login"]);
    }

    #[test]
    fn test_read_targets_skips_comments() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "# scope").unwrap();
        writeln!(file, "example.com").unwrap();
        writeln!(file, "").unwrap();
        writeln!(file, "example.org").unwrap();
        file.flush().unwrap();

        let targets = read_targets(file.path()).unwrap();
        assert_eq!(targets, vec!["example.com", "example.org"]);
    }

    #[test]
    fn test_read_lines_missing_file() {
        assert!(read_lines("/nonexistent/banshee/terms.txt").is_err());
    }
}
