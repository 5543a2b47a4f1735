//! Per-run cache of external link check results.
//!
//! The cache is keyed by normalized URL (fragment stripped) and lives for
//! one pipeline run; runs stay independent. Each slot is an `OnceLock`, so
//! concurrent first references to the same URL serialize on the slot: one
//! caller performs the network check, the others block on `get_or_init`
//! and reuse the in-flight result. A given normalized URL is therefore
//! checked at most once per run, no matter how many documents name it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

/// Outcome of checking one external URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    /// Terminal 2xx/3xx.
    Reachable,
    /// Terminal failure, retries exhausted where applicable.
    Unreachable(String),
    /// Live checking disabled; never an error.
    Skipped,
}

/// Cache of reachability results for one pipeline run.
#[derive(Debug, Default)]
pub struct LinkCache {
    slots: Mutex<HashMap<String, Arc<OnceLock<CheckStatus>>>>,
}

impl LinkCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Strip the fragment from a URL; scheme, host, path, and query
    /// make up the cache key.
    pub fn normalize(url: &str) -> &str {
        url.split('#').next().unwrap_or(url)
    }

    /// Look up the status of a URL, running `probe` on a cache miss.
    /// Concurrent callers for the same normalized URL run `probe` once.
    pub fn check_with(&self, url: &str, probe: impl FnOnce() -> CheckStatus) -> CheckStatus {
        let slot = {
            let mut slots = self.slots.lock().expect("link cache poisoned");
            Arc::clone(slots.entry(Self::normalize(url).to_string()).or_default())
        };
        slot.get_or_init(probe).clone()
    }

    /// Number of distinct normalized URLs seen.
    pub fn len(&self) -> usize {
        self.slots.lock().expect("link cache poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
