//! Error types for LDIF operations.
//!
//! Every pipeline stage (parse, validate, filter, sort, write) and the file-access
//! collaborators report expected failures through [`Error`] rather than panicking, so callers
//! have one error-handling pattern from input text to output text.

use thiserror::Error;

/// Main error type for LDIF operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A record in the LDIF input could not be parsed.
    #[error("Parse error in record {record} at line {line}: {message}")]
    Parse {
        /// 1-based index of the offending record
        record: usize,
        /// 1-based line number where the fault was detected
        line: usize,
        /// Description of the fault
        message: String,
    },

    /// Invalid distinguished name
    #[error("Invalid DN: {0}")]
    InvalidDn(String),

    /// One or more structural or limit violations
    #[error("Validation failed: {}", .issues.join("; "))]
    Validation {
        /// Every violation found in the pass, in report order
        issues: Vec<String>,
    },

    /// File or resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// I/O failure reported by a file-access collaborator
    #[error("I/O error on {path}: {message}")]
    Io {
        /// Path that was being accessed
        path: String,
        /// Underlying error message
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Specialized result type for LDIF operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Creates a parse error for the given record and line.
    #[must_use]
    pub fn parse(record: usize, line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            record,
            line,
            message: message.into(),
        }
    }

    /// Creates a validation error from a single issue.
    #[must_use]
    pub fn validation(issue: impl Into<String>) -> Self {
        Self::Validation {
            issues: vec![issue.into()],
        }
    }

    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Parse { .. } => "PARSE_ERROR",
            Self::InvalidDn(_) => "INVALID_DN",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Io { .. } => "IO_ERROR",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the individual violations carried by a validation error.
    ///
    /// Any other variant yields an empty slice.
    #[must_use]
    pub fn issues(&self) -> &[String] {
        match self {
            Self::Validation { issues } => issues,
            _ => &[],
        }
    }

    /// Returns true if this error should be logged as a serious error.
    #[must_use]
    pub const fn should_log(&self) -> bool {
        matches!(
            self,
            Self::Io { .. } | Self::ConfigError(_) | Self::InternalError(_)
        )
    }
}

// Conversions from external error types
impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ConfigError(format!("Invalid configuration: {err}"))
    }
}

impl From<std::fmt::Error> for Error {
    fn from(err: std::fmt::Error) -> Self {
        Self::InternalError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(Error::parse(1, 1, "x").error_code(), "PARSE_ERROR");
        assert_eq!(
            Error::InvalidDn("test".to_string()).error_code(),
            "INVALID_DN"
        );
        assert_eq!(Error::validation("test").error_code(), "VALIDATION_ERROR");
        assert_eq!(
            Error::NotFound("test".to_string()).error_code(),
            "NOT_FOUND"
        );
        assert_eq!(
            Error::Io {
                path: "/tmp/x".to_string(),
                message: "denied".to_string()
            }
            .error_code(),
            "IO_ERROR"
        );
        assert_eq!(
            Error::ConfigError("test".to_string()).error_code(),
            "CONFIG_ERROR"
        );
        assert_eq!(
            Error::InternalError("test".to_string()).error_code(),
            "INTERNAL_ERROR"
        );
    }

    #[test]
    fn test_error_display() {
        let err = Error::parse(3, 12, "missing dn line");
        assert_eq!(
            err.to_string(),
            "Parse error in record 3 at line 12: missing dn line"
        );

        let err = Error::Validation {
            issues: vec!["first".to_string(), "second".to_string()],
        };
        assert_eq!(err.to_string(), "Validation failed: first; second");

        let err = Error::NotFound("/nonexistent/file.ldif".to_string());
        assert!(err.to_string().to_lowercase().contains("not found"));
    }

    #[test]
    fn test_issues_accessor() {
        let err = Error::Validation {
            issues: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(err.issues().len(), 2);
        assert!(Error::NotFound("x".to_string()).issues().is_empty());
    }

    #[test]
    fn test_should_log() {
        assert!(Error::InternalError("test".to_string()).should_log());
        assert!(Error::ConfigError("test".to_string()).should_log());
        assert!(Error::Io {
            path: "p".to_string(),
            message: "m".to_string()
        }
        .should_log());

        assert!(!Error::NotFound("test".to_string()).should_log());
        assert!(!Error::validation("test").should_log());
        assert!(!Error::parse(1, 1, "test").should_log());
    }

    #[test]
    fn test_from_fmt_error() {
        let err: Error = std::fmt::Error.into();
        assert!(matches!(err, Error::InternalError(_)));
    }

    #[test]
    fn test_error_partial_eq() {
        let err1 = Error::NotFound("test".to_string());
        let err2 = Error::NotFound("test".to_string());
        let err3 = Error::NotFound("other".to_string());

        assert_eq!(err1, err2);
        assert_ne!(err1, err3);
    }
}
