//! Classifier module.
//!
//! Runs the decision pipeline: extraction, whitelist-first check with a
//! blacklisted-URL override, then the full blacklist, then the default.

use std::path::Path;
use std::sync::Arc;

use crate::error::{GuardError, Result};
use crate::extract::extract;
use crate::matcher::{BlacklistHit, BlacklistPolicy, Candidates, WhitelistMatcher};
use crate::store::{BlacklistStore, FileBlacklist, FileWhitelist, WhitelistStore};
use crate::types::{ClassificationResult, EmptyInput, Extraction, Outcome};

/// Classifier options.
#[derive(Debug, Clone)]
pub struct ClassifierOptions {
    /// Keep the substring tier in the blacklist branch.
    ///
    /// It matches any domain that is a textual substring of a stored entry,
    /// which is over-broad but needed for existing blacklist data.
    pub substring_fallback: bool,
}

impl Default for ClassifierOptions {
    fn default() -> Self {
        Self {
            substring_fallback: true,
        }
    }
}

impl ClassifierOptions {
    /// Create new classifier options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the substring tier.
    pub fn with_substring_fallback(mut self, enabled: bool) -> Self {
        self.substring_fallback = enabled;
        self
    }

    fn blacklist_policy(&self) -> BlacklistPolicy {
        if self.substring_fallback {
            BlacklistPolicy::full()
        } else {
            BlacklistPolicy::full().without_substring()
        }
    }
}

/// Rule-based message classifier.
///
/// Holds no mutable state of its own; one instance can serve concurrent
/// `classify` calls. Stores are only read.
pub struct Classifier {
    whitelist: Arc<dyn WhitelistStore>,
    blacklist: Arc<dyn BlacklistStore>,
    policy: BlacklistPolicy,
    override_policy: BlacklistPolicy,
}

impl Classifier {
    /// Create a classifier over the given stores.
    pub fn new(
        whitelist: Arc<dyn WhitelistStore>,
        blacklist: Arc<dyn BlacklistStore>,
        options: ClassifierOptions,
    ) -> Self {
        Self {
            whitelist,
            blacklist,
            policy: options.blacklist_policy(),
            override_policy: BlacklistPolicy::url_only(),
        }
    }

    /// Create a classifier over list files. Files are read on first use.
    pub fn from_files(
        whitelist_path: impl AsRef<Path>,
        blacklist_path: impl AsRef<Path>,
        options: ClassifierOptions,
    ) -> Self {
        Self::new(
            Arc::new(FileWhitelist::new(whitelist_path)),
            Arc::new(FileBlacklist::new(blacklist_path)),
            options,
        )
    }

    /// Blacklist policy used when no domain is whitelisted.
    pub fn policy(&self) -> &BlacklistPolicy {
        &self.policy
    }

    /// Classify one message.
    ///
    /// Empty or whitespace-only input returns [`Outcome::Empty`]. Faults end
    /// in an `Error` verdict carrying the message as received.
    pub fn classify(&self, message: &str) -> Outcome {
        let text = message.trim();
        if text.is_empty() {
            return Outcome::Empty(EmptyInput::default());
        }

        match self.evaluate(text) {
            Ok(result) => Outcome::Classified(result),
            Err(e) => {
                log::error!("Pipeline error: {}", e);
                Outcome::Classified(ClassificationResult::error(message))
            }
        }
    }

    fn evaluate(&self, text: &str) -> Result<ClassificationResult> {
        let extraction = extract(text);

        if !extraction.domains.is_empty() {
            let trusted = recover(self.whitelist.domains(), "Whitelist load failed")?;
            let matcher = WhitelistMatcher::new(trusted);

            if !matcher.is_empty() {
                if let Some(domain) = matcher.first_match(&extraction.domains) {
                    if let Some(hit) = self.check_override(&extraction)? {
                        return Ok(ClassificationResult::phishing(text, hit.to_string()));
                    }
                    return Ok(ClassificationResult::whitelisted(text, domain));
                }
            }
        }

        let candidates = Candidates::new(&extraction.full_urls, &extraction.domains);
        let hit = recover(
            self.policy.check(self.blacklist.as_ref(), &candidates),
            "Blacklist check failed",
        )?;

        Ok(match hit {
            Some(hit) => ClassificationResult::phishing(text, hit.to_string()),
            None => ClassificationResult::safe(text),
        })
    }

    /// A blacklisted full URL overrides a whitelisted domain.
    fn check_override(&self, extraction: &Extraction) -> Result<Option<BlacklistHit>> {
        if extraction.full_urls.is_empty() {
            return Ok(None);
        }
        let candidates = Candidates::new(&extraction.full_urls, &[]);
        recover(
            self.override_policy
                .check(self.blacklist.as_ref(), &candidates),
            "Blacklist-full-url check failed",
        )
    }
}

/// Degrade recoverable store failures to an empty result; anything else is
/// a pipeline fault.
fn recover<T: Default>(result: Result<T>, context: &str) -> Result<T> {
    match result {
        Ok(value) => Ok(value),
        Err(e) if e.is_recoverable() => {
            log::warn!("{}: {}", context, e);
            Ok(T::default())
        }
        Err(e) => Err(GuardError::PipelineFault(format!("{}: {}", context, e))),
    }
}
