//! Trusted-domain matcher.
//!
//! A domain matches an entry when it equals the entry or is a subdomain of
//! it. One set lookup per domain level instead of a scan over every entry.

use std::collections::HashSet;

use crate::error::Result;
use crate::store::WhitelistStore;

/// Trusted-domain matcher
#[derive(Debug, Clone, Default)]
pub struct WhitelistMatcher {
    entries: HashSet<String>,
}

impl WhitelistMatcher {
    /// Build from whitelist entries; entries are lowercased.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = entries
            .into_iter()
            .map(|e| e.as_ref().trim().to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        Self { entries }
    }

    /// Check one hostname: exact match or `"." + entry` suffix.
    pub fn matches(&self, domain: &str) -> bool {
        let domain = domain.trim().trim_matches('/').to_lowercase();
        if domain.is_empty() {
            return false;
        }

        if self.entries.contains(&domain) {
            return true;
        }

        // Walk up the domain hierarchy, one lookup per level
        let mut pos = 0;
        while let Some(dot_pos) = domain[pos..].find('.') {
            let parent = &domain[pos + dot_pos + 1..];
            if self.entries.contains(parent) {
                return true;
            }
            pos += dot_pos + 1;
        }

        false
    }

    /// First candidate, in the given order, that matches any entry.
    pub fn first_match<'a>(&self, domains: &'a [String]) -> Option<&'a str> {
        domains
            .iter()
            .map(String::as_str)
            .find(|domain| self.matches(domain))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Check hostnames directly against a whitelist store.
pub fn is_whitelisted(domains: &[String], store: &dyn WhitelistStore) -> Result<bool> {
    if domains.is_empty() {
        return Ok(false);
    }
    let matcher = WhitelistMatcher::new(store.domains()?);
    Ok(matcher.first_match(domains).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryWhitelist, NilStore};

    #[test]
    fn test_exact_and_subdomain_match() {
        let matcher = WhitelistMatcher::new(["google.com"]);

        assert!(matcher.matches("google.com"));
        assert!(matcher.matches("docs.google.com"));
        assert!(matcher.matches("a.b.docs.google.com"));
        assert!(matcher.matches("DOCS.Google.com/"));
        assert!(!matcher.matches("notgoogle.com"));
        assert!(!matcher.matches("google.com.evil.net"));
        assert!(!matcher.matches("com"));
    }

    #[test]
    fn test_empty_candidate_never_matches() {
        let matcher = WhitelistMatcher::new(["google.com"]);
        assert!(!matcher.matches(""));
        assert!(!matcher.matches("  / "));
    }

    #[test]
    fn test_entries_lowercased() {
        let matcher = WhitelistMatcher::new(["GitHub.COM", " "]);
        assert_eq!(matcher.len(), 1);
        assert!(matcher.matches("gist.github.com"));
    }

    #[test]
    fn test_first_match_follows_candidate_order() {
        let matcher = WhitelistMatcher::new(["google.com", "github.com"]);
        let domains = vec![
            "evil.net".to_string(),
            "github.com".to_string(),
            "docs.google.com".to_string(),
        ];
        assert_eq!(matcher.first_match(&domains), Some("github.com"));
        assert_eq!(matcher.first_match(&domains[..1]), None);
    }

    #[test]
    fn test_is_whitelisted_with_store() {
        let store = MemoryWhitelist::from_entries(["google.com"]);
        assert!(is_whitelisted(&["docs.google.com".to_string()], &store).unwrap());
        assert!(!is_whitelisted(&["notgoogle.com".to_string()], &store).unwrap());
        assert!(!is_whitelisted(&[], &store).unwrap());
        assert!(is_whitelisted(&["a.com".to_string()], &NilStore).is_err());
    }
}
