//! Query construction for the Custom Search API
//!
//! Turns a [`SearchIntent`] into the logical query strings sent to the
//! provider, one per scope and mode clause. Pagination and authentication
//! parameters are not part of the query text; the transport adds them.
//!
//! # Example
//!
//! ```
//! use banshee_core::query::expand;
//! use banshee_core::types::{SearchIntent, SearchMode};
//!
//! let intent = SearchIntent::new("example.com", SearchMode::Extension("pdf".into()));
//! assert_eq!(
//!     expand(&intent),
//!     vec!["site:example.com filetype:pdf", "site:example.com ext:pdf"]
//! );
//! ```

use crate::types::{SearchIntent, SearchMode};

/// Subdomain prefixes excluded from the broad custom-query scope
const NOISE_PREFIXES: [&str; 25] = [
    "techblog",
    "infohub",
    "blog",
    "store",
    "support",
    "help",
    "addons",
    "forum",
    "community",
    "docs",
    "developer",
    "about",
    "resources",
    "cdn",
    "career",
    "faq",
    "news",
    "jobs",
    "library",
    "id",
    "blogs",
    "trust",
    "forums",
    "dl",
    "downloads",
];

/// Which subdomain depths an intent covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeSet {
    /// `site:t` only
    Exact,
    /// `site:*.t`, `site:*.*.t`, `site:*.*.*.t`
    Subdomains,
    /// `site:t` followed by the three subdomain scopes
    All,
}

impl ScopeSet {
    /// Builds the ordered `site:` prefixes for a target
    pub fn scopes(self, target: &str) -> Vec<String> {
        let exact = format!("site:{}", target);
        let nested = || {
            ["*.", "*.*.", "*.*.*."]
                .into_iter()
                .map(move |wild| format!("site:{}{}", wild, target))
        };
        match self {
            ScopeSet::Exact => vec![exact],
            ScopeSet::Subdomains => nested().collect(),
            ScopeSet::All => std::iter::once(exact).chain(nested()).collect(),
        }
    }
}

/// Scope expansion used by a given intent
pub fn scope_set(intent: &SearchIntent) -> ScopeSet {
    if !intent.include_all_subdomains {
        return ScopeSet::Exact;
    }
    match intent.mode {
        SearchMode::Extension(_) => ScopeSet::All,
        SearchMode::Dictionary(_) | SearchMode::Content(_) => ScopeSet::Subdomains,
        SearchMode::Subdomain | SearchMode::CustomDork(_) | SearchMode::Plain => ScopeSet::Exact,
    }
}

/// Builds the exclusion clause `-site:a+-b+-c`
///
/// Returns `None` for an empty list.
///
/// # Examples
///
/// ```
/// use banshee_core::query::exclusion_clause;
///
/// let ex = vec!["a.example.com".to_string(), "b.example.com".to_string()];
/// assert_eq!(exclusion_clause(&ex).unwrap(), "-site:a.example.com+-b.example.com");
/// ```
pub fn exclusion_clause(exclusions: &[String]) -> Option<String> {
    let mut parts = exclusions.iter().map(|e| e.trim()).filter(|e| !e.is_empty());
    let first = parts.next()?;

    let mut clause = format!("-site:{}", first);
    for part in parts {
        clause.push_str("+-");
        clause.push_str(part);
    }
    Some(clause)
}

/// Builds the `intext:` clause for content terms
///
/// Several terms are OR-joined. Returns `None` when no term is left.
pub fn intext_clause(terms: &[String]) -> Option<String> {
    let parts: Vec<String> = terms
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(|t| format!("intext:\"{}\"", t))
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" OR "))
    }
}

/// Strips whitespace and surrounding double quotes from a dictionary term
pub fn clean_term(term: &str) -> String {
    term.trim().trim_matches('"').trim().to_string()
}

/// Expands an intent into its provider query strings
///
/// An intent whose term list is empty after cleaning yields no query.
pub fn expand(intent: &SearchIntent) -> Vec<String> {
    let target = intent.target.trim();
    let scopes = scope_set(intent).scopes(target);

    let clauses: Vec<String> = match &intent.mode {
        SearchMode::Extension(ext) => {
            let ext = ext.trim().trim_start_matches('.');
            if ext.is_empty() {
                Vec::new()
            } else {
                scopes
                    .iter()
                    .flat_map(|scope| {
                        [
                            format!("{} filetype:{}", scope, ext),
                            format!("{} ext:{}", scope, ext),
                        ]
                    })
                    .collect()
            }
        }
        SearchMode::Dictionary(words) => words
            .iter()
            .map(|w| clean_term(w))
            .filter(|w| !w.is_empty())
            .flat_map(|word| {
                scopes
                    .iter()
                    .map(move |scope| format!("{} inurl:\"{}\"", scope, word))
                    .collect::<Vec<_>>()
            })
            .collect(),
        SearchMode::Content(terms) => match intext_clause(terms) {
            Some(clause) => scopes
                .iter()
                .map(|scope| format!("{} {}", scope, clause))
                .collect(),
            None => Vec::new(),
        },
        SearchMode::CustomDork(dork) => dork_clauses(target, dork.trim(), intent.include_all_subdomains),
        SearchMode::Subdomain | SearchMode::Plain => scopes,
    };

    match exclusion_clause(&intent.exclusions) {
        Some(excl) => clauses
            .into_iter()
            .map(|c| format!("{} {}", c, excl))
            .collect(),
        None => clauses,
    }
}

fn dork_clauses(target: &str, dork: &str, include_all: bool) -> Vec<String> {
    if dork.is_empty() {
        return Vec::new();
    }
    if !include_all {
        return vec![format!("site:{} {}", target, dork)];
    }

    let noise: Vec<String> = NOISE_PREFIXES
        .iter()
        .map(|p| format!("-{}.{}", p, target))
        .collect();

    vec![
        format!("site:*.{} {} -www.{}", target, dork, target),
        format!("site:*.*.{} {}", target, dork),
        format!("site:*.*.*.{} {}", target, dork),
        format!("site:*.{} {} -www.{} {}", target, dork, target, noise.join(" ")),
    ]
}
