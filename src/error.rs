use std::fmt;

use thiserror::Error;

/// Which collaborator store produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreName {
    Whitelist,
    Blacklist,
}

impl fmt::Display for StoreName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreName::Whitelist => f.write_str("whitelist"),
            StoreName::Blacklist => f.write_str("blacklist"),
        }
    }
}

/// Classifies store errors for programmatic matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    /// Store could not be reached or opened (missing file, connection refused)
    Unavailable,
    /// A read query against the store failed
    Query,
    /// Store content is corrupt or cannot be interpreted
    InvalidData,
}

/// Phish guard error types
#[derive(Error, Debug)]
pub enum GuardError {
    #[error("{store} store error: {message}")]
    Store {
        kind: StoreErrorKind,
        store: StoreName,
        message: String,
    },

    #[error("Malformed token: {0}")]
    MalformedToken(String),

    #[error("Pipeline fault: {0}")]
    PipelineFault(String),

    #[error("List parse error at line {line}: {message}")]
    ListParse { line: usize, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GuardError {
    /// Shorthand for an unreachable store.
    pub fn unavailable(store: StoreName, message: impl Into<String>) -> Self {
        GuardError::Store {
            kind: StoreErrorKind::Unavailable,
            store,
            message: message.into(),
        }
    }

    /// Shorthand for a failed store query.
    pub fn query(store: StoreName, message: impl Into<String>) -> Self {
        GuardError::Store {
            kind: StoreErrorKind::Query,
            store,
            message: message.into(),
        }
    }

    /// Whether the pipeline degrades the affected check to "no match"
    /// instead of faulting.
    ///
    /// Only connection and query failures are recoverable. Corrupt store
    /// data and everything else ends the classification with an Error verdict.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            GuardError::Store {
                kind: StoreErrorKind::Unavailable | StoreErrorKind::Query,
                ..
            }
        )
    }
}

pub type Result<T> = std::result::Result<T, GuardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_kind_is_matchable() {
        let err = GuardError::unavailable(StoreName::Whitelist, "connection refused");
        match &err {
            GuardError::Store { kind, store, .. } => {
                assert!(matches!(kind, StoreErrorKind::Unavailable));
                assert_eq!(*store, StoreName::Whitelist);
            }
            _ => panic!("expected Store error"),
        }
    }

    #[test]
    fn test_store_error_display_includes_store_and_message() {
        let err = GuardError::query(StoreName::Blacklist, "no such table: blacklist");
        let display = format!("{}", err);
        assert!(display.contains("blacklist store"), "got: {}", display);
        assert!(display.contains("no such table"), "got: {}", display);
    }

    #[test]
    fn test_recoverable_kinds() {
        assert!(GuardError::unavailable(StoreName::Blacklist, "down").is_recoverable());
        assert!(GuardError::query(StoreName::Whitelist, "bad query").is_recoverable());

        let corrupt = GuardError::Store {
            kind: StoreErrorKind::InvalidData,
            store: StoreName::Blacklist,
            message: "truncated record".into(),
        };
        assert!(!corrupt.is_recoverable());
        assert!(!GuardError::PipelineFault("boom".into()).is_recoverable());
        assert!(!GuardError::MalformedToken("http://[".into()).is_recoverable());
    }

    #[test]
    fn test_list_parse_error_display() {
        let err = GuardError::ListParse {
            line: 7,
            message: "include depth exceeded".into(),
        };
        assert_eq!(
            format!("{}", err),
            "List parse error at line 7: include depth exceeded"
        );
    }
}
