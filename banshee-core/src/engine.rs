//! Pagination and retry loop
//!
//! The engine drives one [`SearchIntent`] page by page. For every page it
//! picks a key, issues one request per built query, filters the returned
//! links and moves on once a page yields results. Keys that run out of
//! quota are retired for the rest of the run and another key is tried, at
//! most one attempt per key per page.
//!
//! A page that ends without links stops the whole intent: the provider has
//! nothing more for that scope. Running out of keys also stops the intent.
//! Cancellation is checked before every page, every attempt and every
//! request, and always yields the results gathered so far.
//!
//! All mutable state that should carry over between intents and targets
//! (the key pool and the adaptive delay) lives in [`EngineState`], passed
//! in by reference.
//!
//! # Example
//!
//! ```no_run
//! use banshee_core::engine::{run_intent, EngineState};
//! use banshee_core::google::CustomSearchClient;
//! use banshee_core::keys::KeyPool;
//! use banshee_core::types::{SearchIntent, SearchMode};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = CustomSearchClient::new()?;
//! let mut state = EngineState::new(KeyPool::from_file("keys.txt")?);
//! let intent = SearchIntent::new("example.com", SearchMode::Extension("pdf".into()));
//! let report = run_intent(&client, &mut state, &intent, &CancellationToken::new()).await;
//! for link in &report.results {
//!     println!("{}", link);
//! }
//! # Ok(())
//! # }
//! ```

use crate::error::Error;
use crate::filter::{filter_links, hosts_of};
use crate::google::SearchTransport;
use crate::keys::{mask_key, KeyPool};
use crate::pacing::AdaptiveDelay;
use crate::query::expand;
use crate::types::{IntentReport, ResultSet, SearchIntent, SearchMode, StopReason};
use std::collections::HashSet;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// State shared by every intent of one run
#[derive(Debug, Clone)]
pub struct EngineState {
    /// Keys and their quota status
    pub keys: KeyPool,
    /// Adaptive pacing between requests
    pub delay: AdaptiveDelay,
}

impl EngineState {
    pub fn new(keys: KeyPool) -> Self {
        Self {
            keys,
            delay: AdaptiveDelay::new(),
        }
    }
}

/// Outcome of a single attempt (one key, all queries of a page)
enum Attempt {
    /// Filtered links were found
    Found(Vec<String>),
    /// No links, and a request failed
    Failed(Error),
    /// Requests succeeded but nothing survived filtering
    Empty,
    Cancelled,
}

/// Runs one intent to completion, cancellation or exhaustion
///
/// Never fails: per-request errors are retried with another key, and every
/// other way of stopping is described by [`IntentReport::stop`].
pub async fn run_intent<T>(
    transport: &T,
    state: &mut EngineState,
    intent: &SearchIntent,
    cancel: &CancellationToken,
) -> IntentReport
where
    T: SearchTransport + ?Sized,
{
    let queries = expand(intent);
    if queries.is_empty() {
        debug!(target_domain = %intent.target, mode = intent.mode.name(), "nothing to search");
        return IntentReport::new(StopReason::NothingToSearch);
    }

    let mut report = IntentReport::new(StopReason::Completed);
    let mut collected: Vec<String> = Vec::new();

    'pages: for page in 0..intent.pages.max(1) {
        if cancel.is_cancelled() {
            report.stop = StopReason::Cancelled;
            break;
        }

        let start = SearchIntent::start_offset(page);
        let mut tried: HashSet<String> = HashSet::new();
        let mut page_found = false;

        loop {
            if cancel.is_cancelled() {
                report.stop = StopReason::Cancelled;
                break 'pages;
            }

            // one attempt per key per page
            let Some(key) = state.keys.select_excluding(&tried) else {
                break;
            };
            tried.insert(key.clone());
            debug!(key = %mask_key(&key), page = page + 1, start, "using API key");

            let mut page_empty = false;
            match attempt(transport, &mut state.keys, &key, start, &queries, &intent.target, cancel)
                .await
            {
                Attempt::Cancelled => {
                    report.stop = StopReason::Cancelled;
                    break 'pages;
                }
                Attempt::Found(links) => {
                    debug!(page = page + 1, links = links.len(), "page returned results");
                    collected.extend(links);
                    page_found = true;
                    if intent.delay.is_none() {
                        state.delay.on_success();
                    }
                }
                Attempt::Failed(e) => {
                    debug!(key = %mask_key(&key), error = %e, "attempt failed");
                }
                Attempt::Empty => {
                    debug!(page = page + 1, "no results on page");
                    page_empty = true;
                }
            }

            if !pause(state.delay.effective(intent.delay), cancel).await {
                report.stop = StopReason::Cancelled;
                if page_found {
                    report.pages_completed += 1;
                }
                break 'pages;
            }
            if page_found || page_empty {
                break;
            }
        }

        if !page_found {
            if intent.delay.is_none() {
                state.delay.on_empty();
            }
            if state.keys.available() == 0 {
                warn!("No valid API keys remaining.");
                report.stop = StopReason::KeyPoolExhausted;
            } else {
                report.stop = StopReason::NoResults;
            }
            break;
        }
        report.pages_completed += 1;
    }

    report.results = match intent.mode {
        SearchMode::Subdomain => hosts_of(&collected),
        _ => collected.into_iter().collect::<ResultSet>(),
    };

    info!(
        target_domain = %intent.target,
        mode = intent.mode.name(),
        results = report.results.len(),
        pages = report.pages_completed,
        stop = %report.stop,
        "intent finished"
    );
    report
}

/// Runs several intents and merges their results into one report
///
/// Stops early on cancellation or when no key is left.
pub async fn run_job<T>(
    transport: &T,
    state: &mut EngineState,
    intents: &[SearchIntent],
    cancel: &CancellationToken,
) -> IntentReport
where
    T: SearchTransport + ?Sized,
{
    let mut merged = IntentReport::new(StopReason::NothingToSearch);

    for intent in intents {
        if cancel.is_cancelled() {
            merged.stop = StopReason::Cancelled;
            break;
        }

        if let SearchMode::Extension(ext) = &intent.mode {
            debug!("Checking extension: {}", ext);
        }

        let report = run_intent(transport, state, intent, cancel).await;
        merged.results.extend(report.results);
        merged.pages_completed += report.pages_completed;
        merged.stop = report.stop;

        if matches!(report.stop, StopReason::Cancelled | StopReason::KeyPoolExhausted) {
            break;
        }
    }

    merged
}

async fn attempt<T>(
    transport: &T,
    keys: &mut KeyPool,
    key: &str,
    start: u32,
    queries: &[String],
    target: &str,
    cancel: &CancellationToken,
) -> Attempt
where
    T: SearchTransport + ?Sized,
{
    let mut combined = Vec::new();
    let mut last_error = None;

    for query in queries {
        if cancel.is_cancelled() {
            return Attempt::Cancelled;
        }

        match transport.search(key, start, query).await {
            Ok(response) => combined.extend(filter_links(&response.links(), target)),
            Err(e) => {
                let quota = e.is_quota();
                last_error = Some(e);
                if quota {
                    debug!(key = %mask_key(key), "quota exceeded, retiring key");
                    keys.mark_exhausted(key);
                    break;
                }
            }
        }
    }

    let mut seen = HashSet::new();
    combined.retain(|l| seen.insert(l.clone()));

    match (combined.is_empty(), last_error) {
        (false, _) => Attempt::Found(combined),
        (true, Some(e)) => Attempt::Failed(e),
        (true, None) => Attempt::Empty,
    }
}

/// Sleeps for `delay` unless cancelled first; returns false on cancellation
async fn pause(delay: Duration, cancel: &CancellationToken) -> bool {
    if delay.is_zero() {
        return !cancel.is_cancelled();
    }
    tokio::select! {
        _ = cancel.cancelled() => false,
        _ = tokio::time::sleep(delay) => true,
    }
}
