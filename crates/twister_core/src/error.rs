//! Error types for twister core
//!
//! Configuration problems are surfaced as values so the embedding driver can
//! decide whether to abort, skip the offending source, or log and continue.

use std::io;

use crate::scripting::PatternDimension;

/// Result type for scripting operations
pub type ScriptingResult<T> = Result<T, ScriptingError>;

/// Invalid scripting configuration
#[derive(Debug, thiserror::Error)]
pub enum ScriptingError {
    /// Element with no scenarios, platforms or scripts
    #[error("At least one of the properties must be specified")]
    EmptyElement,

    #[error("invalid {dimension} pattern '{pattern}': {source}")]
    InvalidPattern {
        dimension: PatternDimension,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Error loading {origin}: {source}")]
    Read {
        origin: String,
        #[source]
        source: io::Error,
    },

    /// YAML syntax errors as well as rejected elements; serde folds the
    /// element's own error into the message.
    #[error("Error loading {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_yaml::Error,
    },
}

impl ScriptingError {
    /// Identifier of the source the error came from, if it is tied to one.
    pub fn origin(&self) -> Option<&str> {
        match self {
            ScriptingError::Read { origin, .. } | ScriptingError::Parse { origin, .. } => {
                Some(origin)
            }
            ScriptingError::EmptyElement | ScriptingError::InvalidPattern { .. } => None,
        }
    }
}

/// Status parsing and assignment errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatusError {
    #[error("unknown {kind} value '{value}'")]
    Unknown { kind: &'static str, value: String },

    #[error("{kind} '{value}' cannot be assigned to {target}")]
    NotAssignable {
        kind: &'static str,
        value: &'static str,
        target: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn empty_element_message() {
        assert_eq!(
            ScriptingError::EmptyElement.to_string(),
            "At least one of the properties must be specified"
        );
        assert!(ScriptingError::EmptyElement.origin().is_none());
    }

    #[test]
    fn read_error_carries_origin_and_source() {
        let err = ScriptingError::Read {
            origin: "missing.yaml".to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };
        assert_eq!(err.origin(), Some("missing.yaml"));
        assert!(err.to_string().starts_with("Error loading missing.yaml"));
        assert!(err.source().is_some());
    }

    #[test]
    fn invalid_pattern_names_dimension() {
        let source = regex::Regex::new("(").unwrap_err();
        let err = ScriptingError::InvalidPattern {
            dimension: PatternDimension::Platform,
            pattern: "(".to_string(),
            source,
        };
        assert!(err.to_string().starts_with("invalid platform pattern '('"));
    }

    #[test]
    fn status_error_messages() {
        let err = StatusError::Unknown {
            kind: "harness status",
            value: "bogus".to_string(),
        };
        assert_eq!(err.to_string(), "unknown harness status value 'bogus'");

        let err = StatusError::NotAssignable {
            kind: "QEMU output status",
            value: "timeout",
            target: "test instance status",
        };
        assert_eq!(
            err.to_string(),
            "QEMU output status 'timeout' cannot be assigned to test instance status"
        );
    }
}
