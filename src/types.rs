use std::fmt;

use serde::Serialize;

/// Confidence attached to every rule-based verdict.
pub const DECIDED_CONFIDENCE: &str = "100.0%";

/// Confidence attached to the fault verdict.
pub const ERROR_CONFIDENCE: &str = "0%";

/// Marker carried by the empty-input early exit.
pub const EMPTY_MARKER: &str = "empty";

/// Kind of a raw token found by the extractor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Starts with `http://`, `https://` or `www.` (any case)
    UrlLike,
    /// Dotted label sequence such as `example.com`
    BareDomain,
    /// Contains `@`
    Email,
}

/// A raw substring found in a message, tagged once at extraction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    /// Tag a raw substring.
    ///
    /// URL prefixes win over `@`, so `https://user@host.com` stays URL-like.
    pub fn classify(text: impl Into<String>) -> Self {
        let text = text.into();
        let lower = text.to_ascii_lowercase();
        let kind = if lower.starts_with("http://")
            || lower.starts_with("https://")
            || lower.starts_with("www.")
        {
            TokenKind::UrlLike
        } else if text.contains('@') {
            TokenKind::Email
        } else {
            TokenKind::BareDomain
        };
        Self { kind, text }
    }
}

/// A URL-like token with its canonical form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedUrl {
    /// Token as written in the message
    pub original: String,
    /// Scheme and host lowercased, trailing `/` stripped from the path,
    /// query and fragment kept verbatim
    pub normalized: String,
}

/// Result of running the extractor and normalizers over one message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Deduplicated (on the normalized form) in first-occurrence order
    pub full_urls: Vec<ExtractedUrl>,
    /// Deduplicated normalized hostnames in first-occurrence order
    pub domains: Vec<String>,
    /// Tokens that could not be turned into a hostname
    pub rejected: usize,
}

impl Extraction {
    /// True when nothing URL-, domain- or email-like was found.
    pub fn is_empty(&self) -> bool {
        self.full_urls.is_empty() && self.domains.is_empty()
    }
}

/// Final classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Verdict {
    Safe,
    Phishing,
    Error,
}

impl Verdict {
    /// Only `Safe` is safe. `Error` is a separate outcome and must never be
    /// treated as safe.
    pub fn is_safe(&self) -> bool {
        matches!(self, Verdict::Safe)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Safe => f.write_str("Safe"),
            Verdict::Phishing => f.write_str("Phishing"),
            Verdict::Error => f.write_str("Error"),
        }
    }
}

/// Verdict plus the flags explaining it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub verdict: Verdict,
    pub confidence: &'static str,
    pub message: String,
    #[serde(rename = "blacklist")]
    pub blacklist_matched: bool,
    #[serde(rename = "whitelist")]
    pub whitelist_matched: bool,
    /// Reserved, always `None`
    pub detected_lang: Option<String>,
    /// Reserved, always `None`
    pub translated_text: Option<String>,
    /// Whitelisted domain that decided a Safe verdict
    #[serde(skip)]
    pub matched_domain: Option<String>,
    /// Which blacklist entry and tier decided a Phishing verdict
    #[serde(skip)]
    pub reason: Option<String>,
}

impl ClassificationResult {
    fn decided(verdict: Verdict, message: impl Into<String>) -> Self {
        Self {
            verdict,
            confidence: DECIDED_CONFIDENCE,
            message: message.into(),
            blacklist_matched: false,
            whitelist_matched: false,
            detected_lang: None,
            translated_text: None,
            matched_domain: None,
            reason: None,
        }
    }

    /// Nothing matched either list.
    pub fn safe(message: impl Into<String>) -> Self {
        Self::decided(Verdict::Safe, message)
    }

    /// A domain in the message is trusted.
    pub fn whitelisted(message: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            whitelist_matched: true,
            matched_domain: Some(domain.into()),
            ..Self::decided(Verdict::Safe, message)
        }
    }

    /// A URL or domain in the message is blacklisted.
    pub fn phishing(message: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            blacklist_matched: true,
            reason: Some(reason.into()),
            ..Self::decided(Verdict::Phishing, message)
        }
    }

    /// Classification failed; the message is kept as received.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            confidence: ERROR_CONFIDENCE,
            ..Self::decided(Verdict::Error, message)
        }
    }

    /// Whether the caller should hand the message to its secondary (ML)
    /// classifier.
    ///
    /// The no-match Safe is a placeholder default: the core never calls a
    /// fallback classifier itself, the surrounding message layer does.
    pub fn needs_fallback(&self) -> bool {
        self.verdict == Verdict::Safe && !self.blacklist_matched && !self.whitelist_matched
    }
}

/// Early exit for empty or whitespace-only input
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmptyInput {
    pub error: &'static str,
    pub blacklist: bool,
}

impl Default for EmptyInput {
    fn default() -> Self {
        Self {
            error: EMPTY_MARKER,
            blacklist: false,
        }
    }
}

/// What a classification call returns
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    Empty(EmptyInput),
    Classified(ClassificationResult),
}

impl Outcome {
    /// The verdict, if the message was not empty.
    pub fn verdict(&self) -> Option<Verdict> {
        self.result().map(|r| r.verdict)
    }

    /// The classification result, if the message was not empty.
    pub fn result(&self) -> Option<&ClassificationResult> {
        match self {
            Outcome::Empty(_) => None,
            Outcome::Classified(result) => Some(result),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Outcome::Empty(_))
    }

    /// Render the outcome as the JSON object relayed to callers.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_token_classify() {
        assert_eq!(Token::classify("https://a.com/x").kind, TokenKind::UrlLike);
        assert_eq!(Token::classify("HTTP://A.COM").kind, TokenKind::UrlLike);
        assert_eq!(Token::classify("WWW.example.com").kind, TokenKind::UrlLike);
        assert_eq!(Token::classify("user@mail.com").kind, TokenKind::Email);
        assert_eq!(Token::classify("example.com").kind, TokenKind::BareDomain);
        assert_eq!(
            Token::classify("https://user@host.com").kind,
            TokenKind::UrlLike
        );
    }

    #[test]
    fn test_flags_never_both_true() {
        let results = [
            ClassificationResult::safe("m"),
            ClassificationResult::whitelisted("m", "google.com"),
            ClassificationResult::phishing("m", "reason"),
            ClassificationResult::error("m"),
        ];
        for r in &results {
            assert!(!(r.blacklist_matched && r.whitelist_matched), "{:?}", r);
        }
    }

    #[test]
    fn test_confidence_values() {
        assert_eq!(ClassificationResult::safe("m").confidence, "100.0%");
        assert_eq!(ClassificationResult::phishing("m", "r").confidence, "100.0%");
        assert_eq!(ClassificationResult::error("m").confidence, "0%");
    }

    #[test]
    fn test_needs_fallback_only_for_default_safe() {
        assert!(ClassificationResult::safe("m").needs_fallback());
        assert!(!ClassificationResult::whitelisted("m", "a.com").needs_fallback());
        assert!(!ClassificationResult::phishing("m", "r").needs_fallback());
        assert!(!ClassificationResult::error("m").needs_fallback());
    }

    #[test]
    fn test_error_verdict_is_not_safe() {
        assert!(Verdict::Safe.is_safe());
        assert!(!Verdict::Error.is_safe());
        assert!(!Verdict::Phishing.is_safe());
    }

    #[test]
    fn test_classified_json_shape() {
        let outcome = Outcome::Classified(ClassificationResult::whitelisted(
            "Check https://docs.google.com/abc",
            "docs.google.com",
        ));
        let value: serde_json::Value = serde_json::from_str(&outcome.to_json().unwrap()).unwrap();
        assert_eq!(
            value,
            json!({
                "verdict": "Safe",
                "confidence": "100.0%",
                "message": "Check https://docs.google.com/abc",
                "blacklist": false,
                "whitelist": true,
                "detectedLang": null,
                "translatedText": null
            })
        );
    }

    #[test]
    fn test_empty_json_shape() {
        let outcome = Outcome::Empty(EmptyInput::default());
        let value: serde_json::Value = serde_json::from_str(&outcome.to_json().unwrap()).unwrap();
        assert_eq!(value, json!({"error": "empty", "blacklist": false}));
        assert!(outcome.verdict().is_none());
    }
}
