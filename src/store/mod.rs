//! Read-only lookup stores consulted by the classifier.
//!
//! The classifier only ever reads from these. Writing new entries belongs
//! to whatever maintains the underlying data.

mod file;
mod memory;

pub use file::{parse_entries, parse_entries_from_file, FileBlacklist, FileWhitelist};
pub use memory::{MemoryBlacklist, MemoryWhitelist};

use std::collections::HashSet;

use crate::error::{GuardError, Result, StoreName};

/// Source of trusted domains
pub trait WhitelistStore: Send + Sync {
    /// Current set of trusted domains, lowercased
    fn domains(&self) -> Result<HashSet<String>>;
}

/// Source of known-malicious URLs and domains
///
/// Every lookup is case-insensitive and returns the stored entry that matched.
pub trait BlacklistStore: Send + Sync {
    /// Entry equal to `url`
    fn find_url(&self, url: &str) -> Result<Option<String>>;

    /// Entry equal to `domain` or to `www.` + `domain`
    fn find_domain(&self, domain: &str) -> Result<Option<String>>;

    /// First entry containing `fragment` anywhere
    fn find_containing(&self, fragment: &str) -> Result<Option<String>>;
}

/// Store that is never reachable
#[derive(Debug, Clone, Copy, Default)]
pub struct NilStore;

impl WhitelistStore for NilStore {
    fn domains(&self) -> Result<HashSet<String>> {
        Err(GuardError::unavailable(
            StoreName::Whitelist,
            "whitelist not available",
        ))
    }
}

impl BlacklistStore for NilStore {
    fn find_url(&self, url: &str) -> Result<Option<String>> {
        Err(GuardError::unavailable(
            StoreName::Blacklist,
            format!("blacklist not available (url: {})", url),
        ))
    }

    fn find_domain(&self, domain: &str) -> Result<Option<String>> {
        Err(GuardError::unavailable(
            StoreName::Blacklist,
            format!("blacklist not available (domain: {})", domain),
        ))
    }

    fn find_containing(&self, fragment: &str) -> Result<Option<String>> {
        Err(GuardError::unavailable(
            StoreName::Blacklist,
            format!("blacklist not available (fragment: {})", fragment),
        ))
    }
}
