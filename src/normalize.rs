//! Canonical forms for comparing tokens against the lookup stores.
//!
//! Domains are reduced to a bare lowercase hostname. URLs keep their query
//! and fragment verbatim so they can be compared against stored full URLs.

use std::borrow::Cow;

use url::Url;

use crate::error::{GuardError, Result};
use crate::types::{Token, TokenKind};

/// Strip leading `www.` labels.
///
/// Repeating the strip keeps normalization idempotent for names like
/// `www.www.example.com`.
fn strip_www(host: &str) -> &str {
    let mut host = host;
    while let Some(rest) = host.strip_prefix("www.") {
        host = rest;
    }
    host
}

/// Drop a `:port` suffix.
fn strip_port(host: &str) -> &str {
    host.split(':').next().unwrap_or(host)
}

fn finish_host(host: &str, token: &str) -> Result<String> {
    let host = strip_www(strip_port(host));
    if host.is_empty() || !host.contains('.') {
        return Err(GuardError::MalformedToken(format!(
            "no dotted hostname in '{}'",
            token
        )));
    }
    Ok(host.to_string())
}

/// Prefix `http://` when the token carries no scheme.
fn with_scheme(raw: &str) -> Cow<'_, str> {
    if raw.contains("://") {
        Cow::Borrowed(raw)
    } else {
        Cow::Owned(format!("http://{}", raw))
    }
}

/// Split a scheme-prefixed URL into its raw authority and the remainder
/// (path, query and fragment).
fn split_authority(candidate: &str) -> Option<(&str, &str)> {
    let (_, after_scheme) = candidate.split_once("://")?;
    let authority_end = after_scheme
        .find(['/', '?', '#'])
        .unwrap_or(after_scheme.len());
    Some(after_scheme.split_at(authority_end))
}

/// Reduce a token to a canonical lowercase hostname.
pub fn normalize_domain(token: &Token) -> Result<String> {
    let raw = token.text.trim();

    match token.kind {
        TokenKind::UrlLike => {
            // Host comes from the raw authority so a bad port or a non-ASCII
            // name still yields the same lowercase hostname as the other arms
            let candidate = with_scheme(raw);
            let (authority, _) = split_authority(&candidate)
                .ok_or_else(|| GuardError::MalformedToken(format!("no scheme in '{}'", raw)))?;
            let host = authority
                .rsplit_once('@')
                .map_or(authority, |(_, host)| host);
            finish_host(&host.to_lowercase(), raw)
        }
        TokenKind::Email => {
            let (_, domain) = raw
                .split_once('@')
                .ok_or_else(|| GuardError::MalformedToken(format!("no '@' in '{}'", raw)))?;
            let domain = domain.to_lowercase();
            finish_host(domain.trim().trim_matches('/'), raw)
        }
        TokenKind::BareDomain => {
            let domain = raw.to_lowercase();
            finish_host(domain.trim_matches('/'), raw)
        }
    }
}

/// Normalize a hostname string that did not come from the extractor.
pub fn normalize_domain_str(domain: &str) -> Result<String> {
    normalize_domain(&Token::classify(domain))
}

/// Reduce a URL token to a canonical comparable string.
///
/// Scheme and authority are lowercased and trailing `/` is stripped from the
/// path. Query and fragment are kept byte for byte. When the token does not
/// parse as a URL the trimmed token is lowercased and `/`-stripped instead.
pub fn normalize_url(raw: &str) -> String {
    match try_normalize_url(raw) {
        Ok(normalized) => normalized,
        Err(e) => {
            log::debug!("URL normalization fell back: {}", e);
            raw.trim().to_lowercase().trim_end_matches('/').to_string()
        }
    }
}

fn try_normalize_url(raw: &str) -> Result<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(String::new());
    }

    let candidate = with_scheme(raw);
    let url = Url::parse(&candidate)
        .map_err(|e| GuardError::MalformedToken(format!("'{}': {}", raw, e)))?;

    let (authority, rest) = split_authority(&candidate)
        .ok_or_else(|| GuardError::MalformedToken(format!("no scheme in '{}'", raw)))?;

    let (rest, fragment) = match rest.split_once('#') {
        Some((before, fragment)) => (before, Some(fragment)),
        None => (rest, None),
    };
    let (path, query) = match rest.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (rest, None),
    };

    let mut normalized = format!("{}://{}", url.scheme(), authority.to_lowercase());
    normalized.push_str(path.trim_end_matches('/'));
    if let Some(query) = query.filter(|q| !q.is_empty()) {
        normalized.push('?');
        normalized.push_str(query);
    }
    if let Some(fragment) = fragment.filter(|f| !f.is_empty()) {
        normalized.push('#');
        normalized.push_str(fragment);
    }
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domain(text: &str) -> Option<String> {
        normalize_domain(&Token::classify(text)).ok()
    }

    #[test]
    fn test_url_token_host() {
        assert_eq!(
            domain("https://www.Example.COM:8443/path?q=1"),
            Some("example.com".to_string())
        );
        assert_eq!(
            domain("www.docs.google.com/x"),
            Some("docs.google.com".to_string())
        );
        assert_eq!(
            domain("http://user@Host.example.org/"),
            Some("host.example.org".to_string())
        );
    }

    #[test]
    fn test_email_token_host() {
        assert_eq!(domain("Alice@Mail.Example.com"), Some("mail.example.com".to_string()));
        assert_eq!(domain("bob@www.corp.net:25"), Some("corp.net".to_string()));
        assert_eq!(domain("root@localhost"), None);
    }

    #[test]
    fn test_bare_domain() {
        assert_eq!(domain("EXAMPLE.com"), Some("example.com".to_string()));
        assert_eq!(domain("example.com/"), Some("example.com".to_string()));
        assert_eq!(domain("example.com:8080"), Some("example.com".to_string()));
        assert_eq!(domain("localhost"), None);
    }

    #[test]
    fn test_www_only_name_rejected() {
        // Nothing dotted is left once `www.` is stripped
        assert_eq!(domain("www.com"), None);
        assert_eq!(domain("http://www.com/x"), None);
    }

    #[test]
    fn test_url_host_with_invalid_port() {
        assert_eq!(domain("http://evil.com:99999/x"), Some("evil.com".to_string()));
        assert_eq!(domain("http://Evil.com:abc/"), Some("evil.com".to_string()));
    }

    #[test]
    fn test_non_ascii_host_lowercased_not_punycoded() {
        assert_eq!(domain("http://ÉVIL.com/x"), Some("évil.com".to_string()));
        assert_eq!(domain("ÉVIL.com"), Some("évil.com".to_string()));
        assert_eq!(domain("admin@ÉVIL.com"), Some("évil.com".to_string()));
    }

    #[test]
    fn test_url_without_dotted_host_is_rejected() {
        assert!(normalize_domain(&Token::classify("http://localhost/admin")).is_err());
        assert!(normalize_domain(&Token::classify("http://")).is_err());
    }

    #[test]
    fn test_domain_idempotent() {
        for input in ["www.www.example.com", "Docs.Google.com", "a.b.c.d"] {
            let once = normalize_domain_str(input).unwrap();
            let twice = normalize_domain_str(&once).unwrap();
            assert_eq!(once, twice, "input: {}", input);
        }
    }

    #[test]
    fn test_normalize_url_basic() {
        assert_eq!(
            normalize_url("HTTPS://Evil-Bank.COM/Login/"),
            "https://evil-bank.com/Login"
        );
        assert_eq!(normalize_url("http://example.com/"), "http://example.com");
        assert_eq!(
            normalize_url("www.example.com/a"),
            "http://www.example.com/a"
        );
    }

    #[test]
    fn test_normalize_url_preserves_query_and_fragment() {
        assert_eq!(
            normalize_url("http://EXAMPLE.com/path/?Token=AbC#Frag/"),
            "http://example.com/path?Token=AbC#Frag/"
        );
        assert_eq!(
            normalize_url("http://example.com?q=1"),
            "http://example.com?q=1"
        );
        // '?' inside the fragment is not a query separator
        assert_eq!(
            normalize_url("http://example.com/#a?b"),
            "http://example.com#a?b"
        );
    }

    #[test]
    fn test_normalize_url_keeps_port() {
        assert_eq!(
            normalize_url("http://Example.com:8080/x/"),
            "http://example.com:8080/x"
        );
    }

    #[test]
    fn test_normalize_url_fallback() {
        // Unterminated IPv6 literal does not parse: lowercase and strip instead
        assert_eq!(normalize_url("  HTTP://[Broken/  "), "http://[broken");
    }

    #[test]
    fn test_normalize_url_idempotent() {
        for input in [
            "HTTPS://Evil.COM/Login/?a=B#C",
            "www.example.com/a/b/",
            "http://example.com",
            "http://[broken",
        ] {
            let once = normalize_url(input);
            let twice = normalize_url(&once);
            assert_eq!(once, twice, "input: {}", input);
        }
    }
}
