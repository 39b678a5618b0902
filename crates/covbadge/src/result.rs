//! Result and error types for covbadge.

use thiserror::Error;

/// Result type for covbadge operations
pub type CovbadgeResult<T> = Result<T, CovbadgeError>;

/// Errors that can occur while parsing, aggregating or storing profiles
#[derive(Debug, Error)]
pub enum CovbadgeError {
    /// First line of the report is not `mode: <token>`
    #[error("bad mode line: {line:?}")]
    BadModeLine {
        /// Offending line (empty when the input had no lines)
        line: String,
    },

    /// A data line does not match `file:l.c,l.c stmts count`
    #[error("line {line_number} doesn't match expected format: {line:?}")]
    MalformedLine {
        /// 1-based line number within the report
        line_number: usize,
        /// Offending line
        line: String,
    },

    /// A numeric field could not be represented
    #[error("line {line_number}: invalid {field} {value:?}")]
    InvalidNumber {
        /// 1-based line number within the report
        line_number: usize,
        /// Field name (e.g. "start line")
        field: &'static str,
        /// Raw field text
        value: String,
    },

    /// A block ends before it starts
    #[error("line {line_number}: block end precedes start")]
    InvertedBlock {
        /// 1-based line number within the report
        line_number: usize,
    },

    /// Report has no profiles to aggregate
    #[error("report contains no profiles")]
    EmptyReport,

    /// Report has more than one profile where exactly one was required
    #[error("expected a single profile, report describes {count} files")]
    MultipleProfiles {
        /// Number of profiles in the report
        count: usize,
    },

    /// Unknown aggregation selection name
    #[error("unknown selection {name:?} (expected combined, first or single)")]
    UnknownSelection {
        /// Name that failed to parse
        name: String,
    },

    /// Repository key rejected
    #[error("invalid repository name {name:?}: {reason}")]
    InvalidRepoName {
        /// Raw repository name
        name: String,
        /// Why it was rejected
        reason: &'static str,
    },

    /// No profile has been stored for the repository
    #[error("no profile stored for repository {repo:?}")]
    ProfileNotFound {
        /// Repository key
        repo: String,
    },

    /// Store lock was poisoned by a panicking writer
    #[error("profile store lock poisoned for repository {repo:?}")]
    LockPoisoned {
        /// Repository key
        repo: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CovbadgeError {
    /// Create a bad mode line error
    #[must_use]
    pub fn bad_mode_line(line: impl Into<String>) -> Self {
        Self::BadModeLine { line: line.into() }
    }

    /// Create a malformed line error
    #[must_use]
    pub fn malformed_line(line_number: usize, line: impl Into<String>) -> Self {
        Self::MalformedLine {
            line_number,
            line: line.into(),
        }
    }

    /// Create an invalid repository name error
    #[must_use]
    pub fn invalid_repo_name(name: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidRepoName {
            name: name.into(),
            reason,
        }
    }

    /// Whether the error stems from malformed report text
    #[must_use]
    pub const fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Self::BadModeLine { .. }
                | Self::MalformedLine { .. }
                | Self::InvalidNumber { .. }
                | Self::InvertedBlock { .. }
        )
    }

    /// Whether the error was caused by the caller's input rather than the server
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidRepoName { .. } | Self::UnknownSelection { .. }
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_mode_line_message() {
        let err = CovbadgeError::bad_mode_line("mod: set");
        assert_eq!(err.to_string(), "bad mode line: \"mod: set\"");
        assert!(err.is_parse_error());
    }

    #[test]
    fn test_malformed_line_message() {
        let err = CovbadgeError::malformed_line(3, "garbage");
        assert!(err.to_string().contains("line 3"));
        assert!(err.to_string().contains("garbage"));
        assert!(err.is_parse_error());
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_invalid_repo_name_is_client_error() {
        let err = CovbadgeError::invalid_repo_name("../etc", "parent segment");
        assert!(err.is_client_error());
        assert!(!err.is_parse_error());
        assert!(err.to_string().contains("parent segment"));
    }

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: CovbadgeError = io_err.into();
        assert!(err.to_string().contains("I/O"));
        assert!(!err.is_parse_error());
    }
}
