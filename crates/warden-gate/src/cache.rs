//! TTL-keyed classification cache.
//!
//! Sits in front of the classifier only, never in front of the path
//! sandbox, whose verdicts must be recomputed on every call. Entries are
//! invalidated explicitly on any successful write through the mutation
//! pipeline for the same path.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::classify::{Classification, Classify};

/// Process-wide in-memory classification cache with per-entry TTL.
#[derive(Debug)]
pub struct ClassifierCache {
    ttl: Duration,
    entries: Mutex<HashMap<PathBuf, (Instant, Classification)>>,
}

impl ClassifierCache {
    /// Create a cache whose entries expire after `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Fetch a cached classification or compute and store a fresh one.
    pub fn get_or_classify(
        &self,
        classifier: &dyn Classify,
        path: &Path,
        prefix: &[u8],
    ) -> Classification {
        if let Ok(entries) = self.entries.lock() {
            if let Some((stored_at, classification)) = entries.get(path) {
                if stored_at.elapsed() < self.ttl {
                    return classification.clone();
                }
            }
        }

        let fresh = classifier.classify(path, prefix);
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(path.to_path_buf(), (Instant::now(), fresh.clone()));
        }
        fresh
    }

    /// Drop the entry for a path.
    ///
    /// Called after every successful write so a stale verdict cannot
    /// outlive the content it described.
    pub fn invalidate(&self, path: &Path) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(path);
        }
    }

    /// Number of live (possibly expired) entries, for diagnostics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ClassifierCache {
    fn default() -> Self {
        // Short TTL: classification is cheap, staleness is not.
        Self::new(Duration::from_secs(30))
    }
}
