//! Engine integration tests
//!
//! These tests drive the pagination loop through scripted transports to
//! check filtering, key rotation and cancellation end to end.

use async_trait::async_trait;
use banshee_core::{
    engine::{run_intent, run_job, EngineState},
    error::{Error, Result},
    google::{SearchResponse, SearchTransport},
    keys::KeyPool,
    query::expand,
    types::{SearchIntent, SearchMode, StopReason},
};
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;

type Call = (String, u32, String);

/// Returns five links per page, distinct per offset
fn page_links(target: &str, start: u32) -> Vec<String> {
    (0..5)
        .map(|i| format!("https://{}/page{}/doc{}.pdf", target, start, i))
        .collect()
}

fn state(keys: &[&str], seed: u64) -> EngineState {
    let keys = keys.iter().map(|k| k.to_string()).collect();
    EngineState::new(KeyPool::with_seed(keys, seed).unwrap())
}

/// Fixed responses, recording each call
struct ScriptedTransport {
    links: Vec<String>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedTransport {
    fn new(links: &[&str]) -> Self {
        Self {
            links: links.iter().map(|s| s.to_string()).collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchTransport for ScriptedTransport {
    async fn search(&self, key: &str, start: u32, query: &str) -> Result<SearchResponse> {
        self.calls
            .lock()
            .unwrap()
            .push((key.to_string(), start, query.to_string()));
        Ok(SearchResponse::from_links(self.links.clone()))
    }
}

/// One key is always out of quota, the others page normally
struct QuotaTransport {
    bad_key: String,
    calls: Mutex<Vec<Call>>,
}

#[async_trait]
impl SearchTransport for QuotaTransport {
    async fn search(&self, key: &str, start: u32, query: &str) -> Result<SearchResponse> {
        self.calls
            .lock()
            .unwrap()
            .push((key.to_string(), start, query.to_string()));
        if key == self.bad_key {
            return Err(Error::QuotaExceeded("Quota exceeded for quota metric".into()));
        }
        Ok(SearchResponse::from_links(page_links("example.com", start)))
    }
}

/// Pages normally and cancels the run once `cancel_at` has been served
struct CancellingTransport {
    cancel_at: u32,
    token: CancellationToken,
    calls: Mutex<Vec<Call>>,
}

#[async_trait]
impl SearchTransport for CancellingTransport {
    async fn search(&self, key: &str, start: u32, query: &str) -> Result<SearchResponse> {
        self.calls
            .lock()
            .unwrap()
            .push((key.to_string(), start, query.to_string()));
        if start == self.cancel_at {
            self.token.cancel();
        }
        Ok(SearchResponse::from_links(page_links("example.com", start)))
    }
}

#[tokio::test(start_paused = true)]
async fn test_extension_search_drops_provider_links() {
    let transport = ScriptedTransport::new(&[
        "https://example.com/report.pdf",
        "https://www.google.com/url?q=https://example.com/report.pdf",
        "https://other.org/x.pdf",
    ]);
    let intent = SearchIntent::new("example.com", SearchMode::Extension("pdf".into())).with_pages(1);
    let mut state = state(&["k1"], 7);

    let report = run_intent(&transport, &mut state, &intent, &CancellationToken::new()).await;

    assert_eq!(report.stop, StopReason::Completed);
    assert_eq!(
        report.results.into_iter().collect::<Vec<_>>(),
        vec!["https://example.com/report.pdf"]
    );

    let queries: Vec<String> = transport.calls().into_iter().map(|c| c.2).collect();
    assert_eq!(
        queries,
        vec!["site:example.com filetype:pdf", "site:example.com ext:pdf"]
    );
}

#[tokio::test(start_paused = true)]
async fn test_quota_key_retired_after_one_call() {
    for seed in 0..8 {
        let transport = QuotaTransport {
            bad_key: "k1".into(),
            calls: Mutex::new(Vec::new()),
        };
        let intent = SearchIntent::new("example.com", SearchMode::Plain).with_pages(10);
        let mut state = state(&["k1", "k2"], seed);

        let report = run_intent(&transport, &mut state, &intent, &CancellationToken::new()).await;

        let calls = transport.calls.lock().unwrap().clone();
        let bad_calls = calls.iter().filter(|c| c.0 == "k1").count();
        assert!(bad_calls <= 1, "seed {}: k1 called {} times", seed, bad_calls);
        assert_eq!(report.stop, StopReason::Completed);
        assert_eq!(report.pages_completed, 10);
        assert_eq!(report.results.len(), 50);

        let offsets: Vec<u32> = calls.iter().filter(|c| c.0 == "k2").map(|c| c.1).collect();
        assert_eq!(offsets, vec![1, 11, 21, 31, 41, 51, 61, 71, 81, 91]);
    }
}

#[tokio::test(start_paused = true)]
async fn test_all_keys_out_of_quota() {
    struct AlwaysQuota;

    #[async_trait]
    impl SearchTransport for AlwaysQuota {
        async fn search(&self, _key: &str, _start: u32, _query: &str) -> Result<SearchResponse> {
            Err(Error::QuotaExceeded("quota".into()))
        }
    }

    let intent = SearchIntent::new("example.com", SearchMode::Plain).with_pages(3);
    let mut state = state(&["k1", "k2"], 3);

    let report = run_intent(&AlwaysQuota, &mut state, &intent, &CancellationToken::new()).await;
    assert_eq!(report.stop, StopReason::KeyPoolExhausted);
    assert!(report.is_empty());
    assert_eq!(state.keys.available(), 0);

    // later intents in the same run stop at once
    let report = run_intent(&AlwaysQuota, &mut state, &intent, &CancellationToken::new()).await;
    assert_eq!(report.stop, StopReason::KeyPoolExhausted);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_returns_partial_results() {
    let token = CancellationToken::new();
    let transport = CancellingTransport {
        cancel_at: 11,
        token: token.clone(),
        calls: Mutex::new(Vec::new()),
    };
    let intent = SearchIntent::new("example.com", SearchMode::Plain).with_pages(5);
    let mut state = state(&["k1"], 1);

    let report = run_intent(&transport, &mut state, &intent, &token).await;

    assert!(report.is_cancelled());
    assert_eq!(report.results.len(), 10);
    assert_eq!(report.pages_completed, 2);
    let offsets: Vec<u32> = transport.calls.lock().unwrap().iter().map(|c| c.1).collect();
    assert_eq!(offsets, vec![1, 11]);
}

#[tokio::test(start_paused = true)]
async fn test_dictionary_with_all_subdomains() {
    let intent = SearchIntent::new(
        "example.com",
        SearchMode::Dictionary(vec!["admin".into(), "login".into()]),
    )
    .with_all_subdomains(true)
    .with_pages(1);

    let queries = expand(&intent);
    assert_eq!(queries.len(), 6);
    assert!(queries.iter().all(|q| !q.starts_with("site:example.com")));

    let transport = ScriptedTransport::new(&["https://admin.example.com/admin/"]);
    let mut state = state(&["k1"], 1);
    let report = run_intent(&transport, &mut state, &intent, &CancellationToken::new()).await;

    assert_eq!(transport.calls().len(), 6);
    assert_eq!(report.results.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_job_shares_state_between_intents() {
    let transport = ScriptedTransport::new(&["https://example.com/a.doc"]);
    let intents = vec![
        SearchIntent::new("example.com", SearchMode::Extension("pdf".into())).with_pages(1),
        SearchIntent::new("example.com", SearchMode::Extension("doc".into())).with_pages(1),
    ];
    let mut state = state(&["k1"], 1);
    let before = state.delay.seconds();

    let report = run_job(&transport, &mut state, &intents, &CancellationToken::new()).await;

    assert_eq!(report.results.len(), 1);
    assert_eq!(report.pages_completed, 2);
    assert_eq!(transport.calls().len(), 4);
    assert!(state.delay.seconds() < before);
}

#[tokio::test(start_paused = true)]
async fn test_subdomain_mode_reports_hosts() {
    let transport = ScriptedTransport::new(&[
        "https://api.example.com/v1/users",
        "https://api.example.com/v2",
        "http://mail.example.com:8080/login",
    ]);
    let intent = SearchIntent::new("example.com", SearchMode::Subdomain).with_pages(1);
    let mut state = state(&["k1"], 1);

    let report = run_intent(&transport, &mut state, &intent, &CancellationToken::new()).await;
    assert_eq!(
        report.results.into_iter().collect::<Vec<_>>(),
        vec!["api.example.com", "mail.example.com:8080"]
    );
}

/// One key is rejected as invalid, the others page normally
struct InvalidKeyTransport {
    bad_key: String,
    calls: Mutex<Vec<Call>>,
}

#[async_trait]
impl SearchTransport for InvalidKeyTransport {
    async fn search(&self, key: &str, start: u32, query: &str) -> Result<SearchResponse> {
        self.calls
            .lock()
            .unwrap()
            .push((key.to_string(), start, query.to_string()));
        if key == self.bad_key {
            return Err(Error::SearchApi("API key not valid. Please pass a valid API key.".into()));
        }
        Ok(SearchResponse::from_links(page_links("example.com", start)))
    }
}

#[tokio::test(start_paused = true)]
async fn test_invalid_key_never_starves_valid_key() {
    for seed in 0..40 {
        let transport = InvalidKeyTransport {
            bad_key: "bad".into(),
            calls: Mutex::new(Vec::new()),
        };
        let intent = SearchIntent::new("example.com", SearchMode::Plain).with_pages(3);
        let mut state = state(&["bad", "good"], seed);

        let report = run_intent(&transport, &mut state, &intent, &CancellationToken::new()).await;

        assert_eq!(report.stop, StopReason::Completed, "seed {}", seed);
        assert_eq!(report.results.len(), 15, "seed {}", seed);

        // each key at most once per offset
        let calls = transport.calls.lock().unwrap().clone();
        let mut per_offset = std::collections::HashSet::new();
        for (key, start, _) in &calls {
            assert!(
                per_offset.insert((key.clone(), *start)),
                "seed {}: {} used twice at start={}",
                seed,
                key,
                start
            );
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_quota_error_stops_remaining_queries() {
    let transport = QuotaTransport {
        bad_key: "k1".into(),
        calls: Mutex::new(Vec::new()),
    };
    // eight queries per attempt
    let intent = SearchIntent::new("example.com", SearchMode::Extension("pdf".into()))
        .with_all_subdomains(true)
        .with_pages(1);
    assert_eq!(expand(&intent).len(), 8);
    let mut state = state(&["k1"], 1);

    let report = run_intent(&transport, &mut state, &intent, &CancellationToken::new()).await;

    assert_eq!(report.stop, StopReason::KeyPoolExhausted);
    assert_eq!(transport.calls.lock().unwrap().len(), 1);
    assert!(state.delay.seconds() > 0.25);
}
