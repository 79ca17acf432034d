//! The key-value store seam.
//!
//! [`ConfigStore`](crate::ConfigStore) talks to the database through the
//! [`KvStore`] trait, so any hierarchical store with string keys and string
//! values can back it. [`MemoryStore`] is the reference implementation,
//! useful for tests and for embedding without a server.

use std::collections::BTreeMap;
use std::fmt;

/// Transport failure reported by a [`KvStore`] implementation.
///
/// The wrapped error is passed through verbatim; the crate never retries or
/// translates it, so callers can distinguish infrastructure failures from
/// data and format failures.
#[derive(Debug)]
pub struct StoreError(Box<dyn std::error::Error + Send + Sync>);

impl StoreError {
    pub fn new(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self(source.into())
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.0.as_ref())
    }
}

/// A hierarchical key-value store with slash-delimited keys.
///
/// `set` takes `&mut self`: a client is not assumed to be safe for
/// concurrent use from one [`ConfigStore`](crate::ConfigStore) instance.
pub trait KvStore {
    /// Writes one key. Each call is an independent write; there is no
    /// multi-key transaction.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Returns the `(key, value)` pairs stored under `prefix`, in a stable
    /// order. With `recursive` set, all descendants are returned; otherwise
    /// only direct children. An unknown prefix yields an empty set, not an
    /// error.
    fn get(&self, prefix: &str, recursive: bool) -> Result<Vec<(String, String)>, StoreError>;
}

/// In-memory [`KvStore`] backed by a sorted map.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KvStore for MemoryStore {
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get(&self, prefix: &str, recursive: bool) -> Result<Vec<(String, String)>, StoreError> {
        let below = format!("{prefix}/");
        let mut found = Vec::new();
        for (key, value) in &self.entries {
            let Some(rest) = key.strip_prefix(&below) else {
                continue;
            };
            if !recursive && rest.contains('/') {
                continue;
            }
            found.push((key.clone(), value.clone()));
        }
        Ok(found)
    }
}
