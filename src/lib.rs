//! Phish Guard - rule-based phishing classification for short text messages
//!
//! This library provides:
//! - Extraction of URLs, bare domains and email addresses from free text
//! - Domain and URL normalization for case/format-insensitive comparison
//! - Whitelist matching (exact domain or any subdomain)
//! - Three-tier blacklist matching (exact URL, exact domain, substring)
//! - A decision pipeline combining them into a Safe / Phishing / Error verdict
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use phish_guard::{Classifier, ClassifierOptions, MemoryBlacklist, MemoryWhitelist, Verdict};
//!
//! let whitelist = MemoryWhitelist::from_entries(["google.com"]);
//! let blacklist = MemoryBlacklist::from_entries(["http://evil-bank.com/login"]);
//!
//! let classifier = Classifier::new(
//!     Arc::new(whitelist),
//!     Arc::new(blacklist),
//!     ClassifierOptions::default(),
//! );
//!
//! let outcome = classifier.classify("Check https://docs.google.com/abc");
//! assert_eq!(outcome.verdict(), Some(Verdict::Safe));
//!
//! let outcome = classifier.classify("Verify now: http://evil-bank.com/login");
//! assert_eq!(outcome.verdict(), Some(Verdict::Phishing));
//! ```
//!
//! # Decision order
//!
//! 1. Empty or whitespace-only message: `{"error": "empty", "blacklist": false}`
//! 2. A domain in the message is whitelisted: `Safe`, unless one of the
//!    message's full URLs is blacklisted exactly, which overrides to `Phishing`
//! 3. Any URL or domain hits the blacklist: `Phishing`
//! 4. Otherwise `Safe` with both flags false. This is a placeholder default:
//!    callers are expected to consult a secondary classifier
//!    ([`ClassificationResult::needs_fallback`]).
//!
//! Store outages degrade the affected check to "no match". Anything else that
//! goes wrong yields an `Error` verdict with confidence `0%`, which callers
//! must not treat as safe.
//!
//! # List files
//!
//! File-backed stores read one entry per line:
//!
//! ```text
//! # comment
//! google.com
//! http://evil-bank.com/login    # trailing comment
//! file: /etc/phish-guard/extra.list
//! ```

pub mod classifier;
pub mod error;
pub mod extract;
pub mod matcher;
pub mod normalize;
pub mod store;
pub mod types;

// Re-export commonly used items
pub use classifier::{Classifier, ClassifierOptions};
pub use error::{GuardError, Result, StoreErrorKind, StoreName};
pub use extract::{extract, extract_domains, extract_tokens, mask_tokens, restore_tokens};
pub use matcher::{
    is_whitelisted, BlacklistHit, BlacklistPolicy, BlacklistTier, Candidates, WhitelistMatcher,
};
pub use normalize::{normalize_domain, normalize_domain_str, normalize_url};
pub use store::{
    parse_entries, parse_entries_from_file, BlacklistStore, FileBlacklist, FileWhitelist,
    MemoryBlacklist, MemoryWhitelist, NilStore, WhitelistStore,
};
pub use types::{
    ClassificationResult, EmptyInput, ExtractedUrl, Extraction, Outcome, Token, TokenKind,
    Verdict,
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_full_workflow() {
        let whitelist = MemoryWhitelist::from_entries(["google.com", "github.com"]);
        let blacklist = MemoryBlacklist::from_entries([
            "http://evil-bank.com/login",
            "www.phish-pay.net",
            "https://docs.google.com/forms/d/steal",
        ]);
        let classifier = Classifier::new(
            Arc::new(whitelist),
            Arc::new(blacklist),
            ClassifierOptions::default(),
        );

        // Empty input
        assert!(classifier.classify("   ").is_empty());

        // Trusted domain
        let outcome = classifier.classify("PR at https://github.com/org/repo/pull/1");
        assert_eq!(outcome.verdict(), Some(Verdict::Safe));
        assert!(outcome.result().unwrap().whitelist_matched);

        // Blacklisted URL on a trusted domain
        let outcome = classifier.classify("https://docs.google.com/forms/d/steal");
        assert_eq!(outcome.verdict(), Some(Verdict::Phishing));
        assert!(!outcome.result().unwrap().whitelist_matched);

        // Blacklisted domain stored with www.
        let outcome = classifier.classify("pay at phish-pay.net today");
        assert_eq!(outcome.verdict(), Some(Verdict::Phishing));

        // Unknown: placeholder Safe, caller should consult its fallback
        let outcome = classifier.classify("see unknown-site.org");
        assert_eq!(outcome.verdict(), Some(Verdict::Safe));
        assert!(outcome.result().unwrap().needs_fallback());
    }
}
