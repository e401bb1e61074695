use std::collections::HashSet;

use crate::error::Result;

use super::{BlacklistStore, WhitelistStore};

fn fold(entry: &str) -> Option<String> {
    let entry = entry.trim().to_lowercase();
    if entry.is_empty() {
        None
    } else {
        Some(entry)
    }
}

/// In-memory whitelist
#[derive(Debug, Clone, Default)]
pub struct MemoryWhitelist {
    entries: HashSet<String>,
}

impl MemoryWhitelist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut store = Self::new();
        for entry in entries {
            store.add(entry.as_ref());
        }
        store
    }

    /// Add a trusted domain. Blank entries are ignored.
    pub fn add(&mut self, domain: &str) {
        if let Some(domain) = fold(domain) {
            self.entries.insert(domain);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl WhitelistStore for MemoryWhitelist {
    fn domains(&self) -> Result<HashSet<String>> {
        Ok(self.entries.clone())
    }
}

/// In-memory blacklist
///
/// Keeps insertion order so substring lookups return the earliest entry.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlacklist {
    ordered: Vec<String>,
    index: HashSet<String>,
}

impl MemoryBlacklist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut store = Self::new();
        for entry in entries {
            store.add(entry.as_ref());
        }
        store
    }

    /// Add a malicious URL or domain. Blank and duplicate entries are ignored.
    pub fn add(&mut self, entry: &str) {
        if let Some(entry) = fold(entry) {
            if self.index.insert(entry.clone()) {
                self.ordered.push(entry);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    fn lookup(&self, key: &str) -> Option<String> {
        self.index.get(key).cloned()
    }
}

impl BlacklistStore for MemoryBlacklist {
    fn find_url(&self, url: &str) -> Result<Option<String>> {
        Ok(self.lookup(&url.to_lowercase()))
    }

    fn find_domain(&self, domain: &str) -> Result<Option<String>> {
        let domain = domain.to_lowercase();
        Ok(self
            .lookup(&domain)
            .or_else(|| self.lookup(&format!("www.{}", domain))))
    }

    fn find_containing(&self, fragment: &str) -> Result<Option<String>> {
        let fragment = fragment.to_lowercase();
        // LIKE '%%' would match every row
        if fragment.is_empty() {
            return Ok(None);
        }
        Ok(self
            .ordered
            .iter()
            .find(|entry| entry.contains(&fragment))
            .cloned())
    }
}
