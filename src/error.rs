//! Error taxonomy for the configuration engine.
//!
//! Decode and strict-access failures are recoverable or fatal depending on
//! the phase: syntax and duplicate-key errors abort the decode that produced
//! them, a missing file degrades to an empty document, and `TypeMismatch` is
//! only fatal where strict access is deliberately used (panel sizing at
//! startup). Lenient coercion never produces an error at all.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the configuration engine.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors produced by the document codec and strict value access.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Malformed source text. Carries a human-readable position.
    #[error("syntax error at line {line}, column {column}: {message}")]
    Syntax {
        /// 1-based line of the offending character.
        line: usize,
        /// 1-based column of the offending character.
        column: usize,
        /// What the reader expected or found.
        message: String,
    },

    /// The source file does not exist. Callers treat this as "no user
    /// overrides", not as a failure.
    #[error("config file not found: {}", .path.display())]
    FileNotFound {
        /// Path that was probed.
        path: PathBuf,
    },

    /// The same key appeared twice at one map level while strict duplicate
    /// detection was requested.
    #[error("duplicate key '{key}' at line {line}")]
    DuplicateKey {
        /// The repeated key.
        key: String,
        /// 1-based line of the second occurrence.
        line: usize,
    },

    /// Strict access found a node of the wrong type.
    #[error("type mismatch: expected {expected}, found {actual}")]
    TypeMismatch {
        /// Tag name the caller asked for.
        expected: &'static str,
        /// Tag name actually present.
        actual: &'static str,
    },

    /// Strict map access on a key that is not present.
    #[error("key not found: '{key}'")]
    KeyNotFound {
        /// The missing key.
        key: String,
    },

    /// Strict array access past the end.
    #[error("index {index} out of range for array of length {len}")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Current array length.
        len: usize,
    },

    /// Reading or writing the config file failed for a reason other than
    /// the file being absent.
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    /// True for the benign missing-file case that startup maps to an empty
    /// document.
    pub fn is_file_not_found(&self) -> bool {
        matches!(self, ConfigError::FileNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_position() {
        let err = ConfigError::Syntax {
            line: 3,
            column: 7,
            message: "unexpected ']'".into(),
        };
        let text = err.to_string();
        assert!(text.contains("line 3"));
        assert!(text.contains("column 7"));
        assert!(text.contains("unexpected ']'"));
    }

    #[test]
    fn file_not_found_is_benign() {
        let err = ConfigError::FileNotFound {
            path: PathBuf::from("missing.hjson"),
        };
        assert!(err.is_file_not_found());
        let err = ConfigError::KeyNotFound { key: "alpha".into() };
        assert!(!err.is_file_not_found());
    }
}
