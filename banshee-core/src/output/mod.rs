//! Output of final results
//!
//! Results are written one per line, sorted, either to stdout or appended
//! to a file without repeating lines the file already holds.
//!
//! # Examples
//!
//! ```no_run
//! use banshee_core::output::ResultSink;
//! use banshee_core::types::ResultSet;
//!
//! let mut results = ResultSet::new();
//! results.insert("https://example.com/report.pdf".to_string());
//! let written = ResultSink::file("banshee-results.txt").write(&results)?;
//! # Ok::<(), std::io::Error>(())
//! ```

pub mod common;
pub mod sink;

pub use common::{existing_lines, OutputWriter};
pub use sink::ResultSink;
