//! Banshee Core Library
//!
//! This library drives reconnaissance searches against the Google Custom
//! Search JSON API. It expands a search intent into scoped queries and
//! pages through results. It rotates API keys as their quota runs out and
//! paces requests adaptively.
//!
//! # Modules
//!
//! - [`args`] - CLI argument parsing and validation
//! - [`config`] - Term list loading and per-target job planning
//! - [`terms`] - Comma list or file value expansion
//! - [`keys`] - API key pool with quota tracking
//! - [`query`] - Query string expansion per search mode
//! - [`filter`] - Result link filtering and decoding
//! - [`pacing`] - Adaptive request delay
//! - [`google`] - Custom Search API client
//! - [`engine`] - Pagination and key rotation loop
//! - [`types`] - Core data structures for intents and reports
//! - [`output`] - Deduplicating result output
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
//! let mut state = EngineState::new(KeyPool::new(vec!["AIza...".into()])?);
//! let intent = SearchIntent::new("example.com", SearchMode::Extension("pdf".into()));
//! let report = run_intent(&client, &mut state, &intent, &CancellationToken::new()).await;
//! println!("Found: {:?}", report.results);
//! # Ok(())
//! # }
//! ```

pub mod args;
pub mod config;
pub mod engine;
pub mod error;
pub mod filter;
pub mod google;
pub mod keys;
pub mod output;
pub mod pacing;
pub mod query;
pub mod terms;
pub mod types;

pub use error::{Error, Result};
