//! Token extraction: finds URL-, domain- and email-like substrings in a
//! message and turns them into deduplicated URLs and hostnames.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::normalize::{normalize_domain, normalize_url};
use crate::types::{ExtractedUrl, Extraction, Token, TokenKind};

/// Single pattern, alternatives in priority order:
/// scheme-prefixed run, dotted bare labels, anything around an `@`.
///
/// Trailing punctuation stays attached to scheme-prefixed tokens.
static TOKEN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i:https?)://[^\s<>"']+|\b[A-Za-z0-9-]+(?:\.[A-Za-z0-9-]+)+\b|\S+@\S+"#)
        .expect("TOKEN_PATTERN: hardcoded regex is invalid")
});

/// Masking pattern: like [`TOKEN_PATTERN`] but a scheme or `www.` prefix
/// swallows the whole non-space run, quotes included, so nothing of a URL
/// leaks past its placeholder.
static MASK_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i:https?://|www\.)\S+|\b[A-Za-z0-9-]+(?:\.[A-Za-z0-9-]+)+\b|\S+@\S+")
        .expect("MASK_PATTERN: hardcoded regex is invalid")
});

/// Raw tokens in order of appearance, not deduplicated or normalized.
pub fn extract_tokens(text: &str) -> Vec<Token> {
    TOKEN_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().trim())
        .filter(|t| !t.is_empty())
        .map(Token::classify)
        .collect()
}

/// Extract full URLs and hostnames from a message.
///
/// Tokens that cannot be reduced to a hostname are counted in
/// [`Extraction::rejected`] and otherwise skipped.
pub fn extract(text: &str) -> Extraction {
    let mut extraction = Extraction::default();
    let mut seen_urls = HashSet::new();
    let mut seen_domains = HashSet::new();

    for token in extract_tokens(text) {
        if token.kind == TokenKind::UrlLike {
            let normalized = normalize_url(&token.text);
            if seen_urls.insert(normalized.clone()) {
                extraction.full_urls.push(ExtractedUrl {
                    original: token.text.clone(),
                    normalized,
                });
            }
        }

        match normalize_domain(&token) {
            Ok(domain) => {
                if seen_domains.insert(domain.clone()) {
                    extraction.domains.push(domain);
                }
            }
            Err(e) => {
                log::debug!("Skipping token: {}", e);
                extraction.rejected += 1;
            }
        }
    }

    log::debug!(
        "Extracted {} URL(s), {} domain(s), {} rejected token(s)",
        extraction.full_urls.len(),
        extraction.domains.len(),
        extraction.rejected
    );

    extraction
}

/// Hostnames only.
pub fn extract_domains(text: &str) -> Vec<String> {
    extract(text).domains
}

/// Replace every URL, domain and email in `text` with a `__URL_<n>__`
/// placeholder.
///
/// Longer tokens are replaced first so a domain never clobbers part of a URL
/// that contains it. Returns the masked text and `(placeholder, original)`
/// pairs for [`restore_tokens`].
pub fn mask_tokens(text: &str) -> (String, Vec<(String, String)>) {
    let mut unique: Vec<&str> = Vec::new();
    for m in MASK_PATTERN.find_iter(text) {
        if !unique.contains(&m.as_str()) {
            unique.push(m.as_str());
        }
    }
    // Stable sort keeps first-occurrence order among equal lengths
    unique.sort_by(|a, b| b.len().cmp(&a.len()));

    let mut masked = text.to_string();
    let mut mapping = Vec::with_capacity(unique.len());
    for (i, original) in unique.into_iter().enumerate() {
        let placeholder = format!("__URL_{}__", i);
        masked = masked.replace(original, &placeholder);
        mapping.push((placeholder, original.to_string()));
    }
    (masked, mapping)
}

/// Undo [`mask_tokens`].
pub fn restore_tokens(text: &str, mapping: &[(String, String)]) -> String {
    mapping
        .iter()
        .fold(text.to_string(), |acc, (placeholder, original)| {
            acc.replace(placeholder.as_str(), original)
        })
}
