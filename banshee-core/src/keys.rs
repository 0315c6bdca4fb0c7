//! API key pool
//!
//! Holds the Custom Search API keys for one run and tracks which of them
//! have hit their daily quota. Exhausted keys stay in the pool file and are
//! retried on the next process run; within a run they are never selected
//! again.
//!
//! # Example
//!
//! ```
//! use banshee_core::keys::KeyPool;
//!
//! let mut pool = KeyPool::new(vec!["key-a".into(), "key-b".into()])?;
//! let key = pool.select()?;
//! pool.mark_exhausted(&key);
//! assert_eq!(pool.available(), 1);
//! # Ok::<(), banshee_core::Error>(())
//! ```

use crate::error::{Error, Result};
use crate::terms::read_lines;
use directories::BaseDirs;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Location of the keys file relative to the home directory
const KEYS_FILE: &str = ".config/banshee/keys.txt";

/// Pool of API keys with per-run quota tracking
#[derive(Debug, Clone)]
pub struct KeyPool {
    keys: Vec<String>,
    exhausted: HashSet<String>,
    rng: StdRng,
}

impl KeyPool {
    /// Creates a pool from a list of keys
    ///
    /// Blank entries are dropped and duplicates collapse onto their first
    /// occurrence.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if no usable key remains
    pub fn new(keys: Vec<String>) -> Result<Self> {
        Self::with_rng(keys, StdRng::from_entropy())
    }

    /// Creates a pool with a fixed selection seed
    pub fn with_seed(keys: Vec<String>, seed: u64) -> Result<Self> {
        Self::with_rng(keys, StdRng::seed_from_u64(seed))
    }

    fn with_rng(keys: Vec<String>, rng: StdRng) -> Result<Self> {
        let mut seen = HashSet::new();
        let keys: Vec<String> = keys
            .into_iter()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty() && seen.insert(k.clone()))
            .collect();

        if keys.is_empty() {
            return Err(Error::InvalidInput("key pool is empty".into()));
        }

        Ok(Self {
            keys,
            exhausted: HashSet::new(),
            rng,
        })
    }

    /// Loads keys from a newline-delimited file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or holds no keys
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let keys = read_lines(path)?;
        if keys.is_empty() {
            return Err(Error::NoKeys(path.to_path_buf()));
        }
        Self::new(keys)
    }

    /// Default keys file, `~/.config/banshee/keys.txt`
    pub fn default_path() -> Option<PathBuf> {
        BaseDirs::new().map(|dirs| dirs.home_dir().join(KEYS_FILE))
    }

    /// Picks a random key among the ones not yet exhausted
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyPoolExhausted`] when every key is exhausted
    pub fn select(&mut self) -> Result<String> {
        self.select_excluding(&HashSet::new())
            .ok_or(Error::KeyPoolExhausted)
    }

    /// Picks a random key that is neither exhausted nor in `tried`
    ///
    /// Returns `None` once every usable key has been tried.
    pub fn select_excluding(&mut self, tried: &HashSet<String>) -> Option<String> {
        let candidates: Vec<&String> = self
            .keys
            .iter()
            .filter(|k| !self.exhausted.contains(*k) && !tried.contains(*k))
            .collect();

        if candidates.is_empty() {
            return None;
        }

        let idx = self.rng.gen_range(0..candidates.len());
        Some(candidates[idx].clone())
    }

    /// Marks a key as out of quota for the rest of the run
    pub fn mark_exhausted(&mut self, key: &str) {
        if self.keys.iter().any(|k| k == key) {
            self.exhausted.insert(key.to_string());
        }
    }

    pub fn is_exhausted(&self, key: &str) -> bool {
        self.exhausted.contains(key)
    }

    /// Total number of distinct keys, exhausted or not
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Number of keys that can still be selected
    pub fn available(&self) -> usize {
        self.keys.len() - self.exhausted.len()
    }
}

/// Shortens a key for log output
pub fn mask_key(key: &str) -> String {
    let visible: String = key.chars().take(6).collect();
    if visible.len() < key.len() {
        format!("{}...", visible)
    } else {
        visible
    }
}
