//! Core data types for search intents and their outcomes
//!
//! A [`SearchIntent`] describes one logical reconnaissance request: one
//! target, one mode, one term set. Intents are immutable once built; the
//! engine turns each of them into an [`IntentReport`].
//!
//! # Examples
//!
//! ```
//! use banshee_core::types::{SearchIntent, SearchMode};
//!
//! let intent = SearchIntent::new("example.com", SearchMode::Extension("pdf".into()))
//!     .with_pages(2)
//!     .with_all_subdomains(true);
//! assert_eq!(intent.pages, 2);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Pages requested when none are given
pub const DEFAULT_PAGES: u32 = 10;

/// Results per provider page
pub const RESULTS_PER_PAGE: u32 = 10;

/// Normalized links (or hosts in subdomain mode) gathered by one intent
pub type ResultSet = BTreeSet<String>;

/// What kind of search an intent performs, with its mode-specific term
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode", content = "term")]
pub enum SearchMode {
    /// Files with the given extension (`filetype:` and `ext:`)
    Extension(String),
    /// Paths containing any of the words (`inurl:`)
    Dictionary(Vec<String>),
    /// Pages containing any of the terms (`intext:`, OR-joined)
    Content(Vec<String>),
    /// Hosts under the target
    Subdomain,
    /// Raw user query appended to the scope
    CustomDork(String),
    /// Bare `site:` query
    Plain,
}

impl SearchMode {
    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            SearchMode::Extension(_) => "extension",
            SearchMode::Dictionary(_) => "dictionary",
            SearchMode::Content(_) => "content",
            SearchMode::Subdomain => "subdomain",
            SearchMode::CustomDork(_) => "query",
            SearchMode::Plain => "plain",
        }
    }
}

/// One logical reconnaissance request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchIntent {
    /// Domain or IP address being searched
    pub target: String,

    /// Search mode and its term(s)
    pub mode: SearchMode,

    /// Expand the scope to `*.target`, `*.*.target` and `*.*.*.target`
    pub include_all_subdomains: bool,

    /// Sites excluded from every query, in input order
    pub exclusions: Vec<String>,

    /// Maximum number of provider pages, at least 1
    pub pages: u32,

    /// Fixed delay in seconds overriding adaptive pacing
    pub delay: Option<f64>,
}

impl SearchIntent {
    /// Creates an intent with default pages and no exclusions
    pub fn new(target: impl Into<String>, mode: SearchMode) -> Self {
        Self {
            target: target.into(),
            mode,
            include_all_subdomains: false,
            exclusions: Vec::new(),
            pages: DEFAULT_PAGES,
            delay: None,
        }
    }

    pub fn with_all_subdomains(mut self, include: bool) -> Self {
        self.include_all_subdomains = include;
        self
    }

    pub fn with_exclusions(mut self, exclusions: Vec<String>) -> Self {
        self.exclusions = exclusions;
        self
    }

    /// Sets the page count; zero falls back to the default
    pub fn with_pages(mut self, pages: u32) -> Self {
        self.pages = if pages == 0 { DEFAULT_PAGES } else { pages };
        self
    }

    pub fn with_delay(mut self, delay: Option<f64>) -> Self {
        self.delay = delay;
        self
    }

    /// 1-based provider offset of a 0-based page index
    pub fn start_offset(page: u32) -> u32 {
        page * RESULTS_PER_PAGE + 1
    }
}

/// Why the engine stopped working on an intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Every requested page returned links
    Completed,
    /// A page came back without links; the provider index is exhausted
    NoResults,
    /// No key with remaining quota is left
    KeyPoolExhausted,
    /// The user asked to stop
    Cancelled,
    /// The intent produced no query at all (empty term list)
    NothingToSearch,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StopReason::Completed => "completed",
            StopReason::NoResults => "no more results",
            StopReason::KeyPoolExhausted => "all API keys exhausted",
            StopReason::Cancelled => "cancelled",
            StopReason::NothingToSearch => "nothing to search",
        };
        f.write_str(s)
    }
}

/// Outcome of running one intent (or a job of several intents)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentReport {
    /// Accumulated, deduplicated results
    pub results: ResultSet,

    /// Reason the run ended
    pub stop: StopReason,

    /// Pages that returned links
    pub pages_completed: u32,
}

impl IntentReport {
    pub fn new(stop: StopReason) -> Self {
        Self {
            results: ResultSet::new(),
            stop,
            pages_completed: 0,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.stop == StopReason::Cancelled
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
