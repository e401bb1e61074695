use std::fmt;

use crate::error::Result;
use crate::store::BlacklistStore;
use crate::types::ExtractedUrl;

/// Blacklist matching tier, in precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlacklistTier {
    /// Normalized full URL equals an entry
    ExactUrl,
    /// Domain equals an entry or `www.` + entry
    ExactDomain,
    /// Domain appears anywhere inside an entry.
    ///
    /// Broad: `go.com` hits an entry like `http://embargo.com/path`. Kept for
    /// compatibility with existing blacklist data; see
    /// [`BlacklistPolicy::without_substring`].
    Substring,
}

impl fmt::Display for BlacklistTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlacklistTier::ExactUrl => f.write_str("exact-url"),
            BlacklistTier::ExactDomain => f.write_str("exact-domain"),
            BlacklistTier::Substring => f.write_str("substring"),
        }
    }
}

/// URLs and hostnames to test against the blacklist
#[derive(Debug, Clone, Copy)]
pub struct Candidates<'a> {
    pub urls: &'a [ExtractedUrl],
    pub domains: &'a [String],
}

impl<'a> Candidates<'a> {
    pub fn new(urls: &'a [ExtractedUrl], domains: &'a [String]) -> Self {
        Self { urls, domains }
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty() && self.domains.is_empty()
    }
}

/// A blacklist match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlacklistHit {
    pub tier: BlacklistTier,
    /// URL or domain from the message
    pub candidate: String,
    /// Stored entry that matched
    pub entry: String,
}

impl fmt::Display for BlacklistHit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tier {
            BlacklistTier::ExactUrl => write!(f, "Blacklisted URL matched: {}", self.candidate)?,
            BlacklistTier::ExactDomain => {
                write!(f, "Blacklisted domain matched: {}", self.candidate)?
            }
            BlacklistTier::Substring => write!(
                f,
                "Blacklisted domain substring matched in URL for: {}",
                self.candidate
            )?,
        }
        write!(f, " (entry: {})", self.entry)
    }
}

impl BlacklistTier {
    /// Run this tier's lookups, stopping at the first hit.
    ///
    /// With `urls_as_written` the exact-URL tier also tries each token as it
    /// appeared in the message when that differs from its normalized form.
    pub fn find(
        &self,
        store: &dyn BlacklistStore,
        candidates: &Candidates<'_>,
        urls_as_written: bool,
    ) -> Result<Option<BlacklistHit>> {
        match self {
            BlacklistTier::ExactUrl => {
                for url in candidates.urls {
                    // Normalized form first, then the token as written
                    let mut forms = vec![url.normalized.to_lowercase()];
                    let original = url.original.trim().to_lowercase();
                    if urls_as_written && original != forms[0] {
                        forms.push(original);
                    }
                    for form in &forms {
                        if let Some(entry) = store.find_url(form)? {
                            return Ok(Some(self.hit(&url.original, entry)));
                        }
                    }
                }
                Ok(None)
            }
            BlacklistTier::ExactDomain => {
                for domain in candidates.domains {
                    if let Some(entry) = store.find_domain(domain)? {
                        return Ok(Some(self.hit(domain, entry)));
                    }
                }
                Ok(None)
            }
            BlacklistTier::Substring => {
                for domain in candidates.domains {
                    if let Some(entry) = store.find_containing(domain)? {
                        return Ok(Some(self.hit(domain, entry)));
                    }
                }
                Ok(None)
            }
        }
    }

    fn hit(&self, candidate: &str, entry: String) -> BlacklistHit {
        BlacklistHit {
            tier: *self,
            candidate: candidate.to_string(),
            entry,
        }
    }
}

/// Ordered list of tiers; evaluation stops at the first tier that hits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlacklistPolicy {
    tiers: Vec<BlacklistTier>,
    urls_as_written: bool,
}

impl Default for BlacklistPolicy {
    fn default() -> Self {
        Self::full()
    }
}

impl BlacklistPolicy {
    /// Exact URL, then exact domain, then substring.
    ///
    /// The exact-URL tier compares the normalized URL and then the token as
    /// written, so entries stored either way match.
    pub fn full() -> Self {
        Self {
            tiers: vec![
                BlacklistTier::ExactUrl,
                BlacklistTier::ExactDomain,
                BlacklistTier::Substring,
            ],
            urls_as_written: true,
        }
    }

    /// Exact URL comparison only, as used to override a whitelisted domain.
    ///
    /// Only the normalized URL is compared: an entry stored with a trailing
    /// slash (`https://docs.google.com/x/`) never overrides the whitelist.
    pub fn url_only() -> Self {
        Self {
            tiers: vec![BlacklistTier::ExactUrl],
            urls_as_written: false,
        }
    }

    /// Custom tier order. Duplicates are dropped.
    pub fn with_tiers(tiers: impl IntoIterator<Item = BlacklistTier>) -> Self {
        let mut ordered = Vec::new();
        for tier in tiers {
            if !ordered.contains(&tier) {
                ordered.push(tier);
            }
        }
        Self {
            tiers: ordered,
            urls_as_written: true,
        }
    }

    /// Same policy without the substring tier.
    pub fn without_substring(mut self) -> Self {
        self.tiers.retain(|t| *t != BlacklistTier::Substring);
        self
    }

    pub fn tiers(&self) -> &[BlacklistTier] {
        &self.tiers
    }

    /// Evaluate tiers in order, returning the first hit.
    pub fn check(
        &self,
        store: &dyn BlacklistStore,
        candidates: &Candidates<'_>,
    ) -> Result<Option<BlacklistHit>> {
        if candidates.is_empty() {
            return Ok(None);
        }
        for tier in &self.tiers {
            if let Some(hit) = tier.find(store, candidates, self.urls_as_written)? {
                log::debug!("Blacklist {} tier hit: {}", tier, hit);
                return Ok(Some(hit));
            }
        }
        Ok(None)
    }
}
