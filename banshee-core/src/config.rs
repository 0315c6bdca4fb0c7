//! Search configuration and per-target planning
//!
//! [`SearchConfig`] holds everything the CLI resolved from its flags, with
//! list values already expanded. [`plan_target`] turns it into the jobs
//! for one target. Each [`Job`] is a group of intents whose results are
//! merged and written together.

use crate::args::BansheeArgs;
use crate::error::{Error, Result};
use crate::terms::{read_targets, TermList};
use crate::types::{SearchIntent, SearchMode, DEFAULT_PAGES};
use std::path::PathBuf;

/// Resolved search settings shared by every target
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchConfig {
    pub extensions: Option<TermList>,
    pub dictionary: Option<TermList>,
    pub contents: Option<TermList>,
    pub query: Option<String>,
    pub subdomains: bool,
    pub include_all_subdomains: bool,
    pub exclusions: Vec<String>,
    pub pages: u32,
    pub delay: Option<f64>,
}

impl SearchConfig {
    /// Loads term lists and exclusions named by the arguments
    ///
    /// # Errors
    ///
    /// Returns an error if a list file exists but cannot be read, or a
    /// requested list turns out empty
    pub fn from_args(args: &BansheeArgs) -> Result<Self> {
        let extensions = load_list("extensions", args.extensions.as_deref())?
            .map(|list| list.map_terms(|t| t.trim_start_matches('.').to_string()));
        let dictionary = load_list("word", args.dictionary.as_deref())?;
        let contents = load_list("contents", args.contents.as_deref())?;

        let exclusions = match args.exclusions.as_deref() {
            Some(value) => TermList::load(value)?.terms,
            None => Vec::new(),
        };

        Ok(Self {
            extensions,
            dictionary,
            contents,
            query: args
                .query
                .as_deref()
                .map(str::trim)
                .filter(|q| !q.is_empty())
                .map(str::to_string),
            subdomains: args.subdomains,
            include_all_subdomains: args.recursive,
            exclusions,
            pages: args.pages.filter(|p| *p > 0).unwrap_or(DEFAULT_PAGES),
            delay: args.fixed_delay(),
        })
    }

    fn intent(&self, target: &str, mode: SearchMode) -> SearchIntent {
        SearchIntent::new(target, mode)
            .with_all_subdomains(self.include_all_subdomains)
            .with_exclusions(self.exclusions.clone())
            .with_pages(self.pages)
            .with_delay(self.delay)
    }
}

fn load_list(name: &str, value: Option<&str>) -> Result<Option<TermList>> {
    let Some(value) = value else {
        return Ok(None);
    };
    let list = TermList::load(value)?;
    if list.is_empty() {
        return Err(Error::InvalidInput(format!("--{} has no usable terms", name)));
    }
    Ok(Some(list))
}

/// A labelled group of intents flushed to the output together
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub label: String,
    pub intents: Vec<SearchIntent>,
}

impl Job {
    fn new(label: impl Into<String>, intents: Vec<SearchIntent>) -> Self {
        Self {
            label: label.into(),
            intents,
        }
    }
}

/// Builds the jobs for one target
///
/// Modes run in a fixed order: dictionary, extensions, subdomains,
/// contents, custom query. Extensions share one job. Content terms read
/// from a file get one job per line; inline content terms are OR-joined
/// into a single intent.
///
/// # Examples
///
/// ```
/// use banshee_core::args::BansheeArgs;
/// use banshee_core::config::{plan_target, SearchConfig};
///
/// let args = BansheeArgs::from_iter_safe(["banshee", "-u", "example.com", "-e", "pdf,doc", "-s"]).unwrap();
/// let config = SearchConfig::from_args(&args).unwrap();
/// let jobs = plan_target(&config, "example.com");
/// assert_eq!(jobs.len(), 2);
/// assert_eq!(jobs[0].intents.len(), 2);
/// ```
pub fn plan_target(config: &SearchConfig, target: &str) -> Vec<Job> {
    let mut jobs = Vec::new();

    if let Some(ref words) = config.dictionary {
        jobs.push(Job::new(
            "dictionary",
            vec![config.intent(target, SearchMode::Dictionary(words.terms.clone()))],
        ));
    }

    if let Some(ref extensions) = config.extensions {
        let intents = extensions
            .terms
            .iter()
            .map(|ext| config.intent(target, SearchMode::Extension(ext.clone())))
            .collect();
        jobs.push(Job::new("extensions", intents));
    }

    if config.subdomains {
        jobs.push(Job::new(
            "subdomains",
            vec![config.intent(target, SearchMode::Subdomain)],
        ));
    }

    if let Some(ref contents) = config.contents {
        if contents.from_file {
            for term in &contents.terms {
                jobs.push(Job::new(
                    format!("contents: {}", term),
                    vec![config.intent(target, SearchMode::Content(vec![term.clone()]))],
                ));
            }
        } else {
            jobs.push(Job::new(
                "contents",
                vec![config.intent(target, SearchMode::Content(contents.terms.clone()))],
            ));
        }
    }

    if let Some(ref query) = config.query {
        jobs.push(Job::new(
            "query",
            vec![config.intent(target, SearchMode::CustomDork(query.clone()))],
        ));
    }

    jobs
}

/// Targets named by the arguments, in input order
///
/// # Errors
///
/// Returns an error if the targets file cannot be read or yields no
/// targets
pub fn resolve_targets(args: &BansheeArgs) -> Result<Vec<String>> {
    let mut targets = Vec::new();

    if let Some(target) = args.target.as_deref().map(str::trim) {
        if !target.is_empty() {
            targets.push(target.to_string());
        }
    }

    if let Some(ref path) = args.domains_file {
        let from_file = read_targets(path)?;
        if from_file.is_empty() {
            return Err(Error::InvalidInput(format!(
                "No targets found in {}",
                path.display()
            )));
        }
        targets.extend(from_file);
    }

    if targets.is_empty() {
        return Err(Error::InvalidInput("No target specified".to_string()));
    }
    Ok(targets)
}

/// Keys file named by the arguments, or the default location
pub fn keys_path(args: &BansheeArgs) -> Option<PathBuf> {
    args.keys_file.clone().or_else(crate::keys::KeyPool::default_path)
}
