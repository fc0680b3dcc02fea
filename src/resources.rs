//! External text-resource adapter
//!
//! File-backed nodes never touch an environment directly; they go through an
//! injected [`TextStore`]. The host decides what a resource name means — a
//! file on disk, an embedded text block, a database row.

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Name of an external text resource
pub type ResourceId = String;

/// Read/write access to named text resources.
///
/// `read` returns `None` for a missing resource instead of failing, so a
/// vanished resource degrades into absent input rather than an error.
/// `write` replaces the entire content, creating the resource if needed.
pub trait TextStore {
    fn read(&self, id: &str) -> Option<String>;
    fn write(&mut self, id: &str, text: &str);
}

/// In-memory text store for tests, demos and embedded hosts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryTextStore {
    entries: HashMap<String, String>,
}

impl MemoryTextStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a resource, replacing any previous content
    pub fn insert(&mut self, id: impl Into<String>, text: impl Into<String>) {
        self.entries.insert(id.into(), text.into());
    }

    /// Deletes a resource, returning its content
    pub fn remove(&mut self, id: &str) -> Option<String> {
        self.entries.remove(id)
    }

    /// Whether a resource currently exists
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }
}

impl TextStore for MemoryTextStore {
    fn read(&self, id: &str) -> Option<String> {
        self.entries.get(id).cloned()
    }

    fn write(&mut self, id: &str, text: &str) {
        debug!("overwriting text resource \"{}\" ({} bytes)", id, text.len());
        self.entries.insert(id.to_string(), text.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_missing_returns_none() {
        let store = MemoryTextStore::new();
        assert_eq!(store.read("nope.txt"), None);
    }

    #[test]
    fn test_write_overwrites() {
        let mut store = MemoryTextStore::new();
        store.write("a.txt", "first");
        store.write("a.txt", "x");
        assert_eq!(store.read("a.txt"), Some("x".to_string()));
        assert!(store.contains("a.txt"));
        assert_eq!(store.remove("a.txt"), Some("x".to_string()));
        assert!(!store.contains("a.txt"));
    }
}
