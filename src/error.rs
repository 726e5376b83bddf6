//! Error types for evaluation and its input plumbing.
//!
//! Input-shape problems are reported before any work starts; alignment errors carry
//! enough context (example index, language, token counts) to reproduce the failure.

use std::path::PathBuf;

use thiserror::Error;

/// Crate result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Evaluation error types with specific context for actionable debugging
#[derive(Debug, Error)]
pub enum Error {
    /// Reference and hypothesis lists differ in length
    #[error("Got {references} references but {hypotheses} hypotheses")]
    LengthMismatch {
        /// Number of reference transcripts.
        references: usize,
        /// Number of hypothesis transcripts.
        hypotheses: usize,
    },

    /// Per-example language list does not line up with the references
    #[error("Got {languages} language codes for {references} references")]
    LanguageCountMismatch {
        /// Number of language codes supplied.
        languages: usize,
        /// Number of reference transcripts.
        references: usize,
    },

    /// An alignment did not cover both token sequences
    #[error(
        "Alignment failed for example {index} (language {language}, \
         {reference_len} reference / {hypothesis_len} hypothesis tokens): {message}"
    )]
    Alignment {
        /// Position of the example in the input lists.
        index: usize,
        /// Language code the example was tokenized with.
        language: String,
        /// Number of reference tokens that were aligned.
        reference_len: usize,
        /// Number of hypothesis tokens that were aligned.
        hypothesis_len: usize,
        /// What went wrong.
        message: String,
    },

    /// IO error with path context
    #[error("IO error at {path:?}: {source}")]
    Io {
        /// The underlying IO error.
        source: std::io::Error,
        /// File path where the error occurred, if known.
        path: Option<PathBuf>,
    },

    /// Input file parsing error
    #[error("Parse error in {file:?} line {line}: {message}")]
    Parse {
        /// File that failed to parse, if known.
        file: Option<PathBuf>,
        /// One-based line number of the offending record.
        line: usize,
        /// Description of the parse failure.
        message: String,
    },

    /// Configuration error with guidance
    #[error("Configuration error: {message}. {hint}")]
    Config {
        /// Description of the configuration problem.
        message: String,
        /// Actionable guidance for fixing the issue.
        hint: &'static str,
    },
}

impl Error {
    /// Create an IO error with path context
    pub fn io(source: std::io::Error, path: impl Into<Option<PathBuf>>) -> Self {
        Self::Io { source, path: path.into() }
    }

    /// Create a config error with actionable hint
    pub fn config(message: impl Into<String>, hint: &'static str) -> Self {
        Self::Config { message: message.into(), hint }
    }

    /// Create a parse error with file and line context
    pub fn parse(
        message: impl Into<String>,
        file: impl Into<Option<PathBuf>>,
        line: usize,
    ) -> Self {
        Self::Parse { file: file.into(), line, message: message.into() }
    }
}

// Convenience conversions
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io { source: e, path: None }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn alignment_error_mentions_context() {
        let err = Error::Alignment {
            index: 3,
            language: "fr".to_string(),
            reference_len: 10,
            hypothesis_len: 12,
            message: "reference not fully consumed".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("example 3"));
        assert!(text.contains("language fr"));
        assert!(text.contains("10 reference"));
    }

    #[test]
    fn config_error_carries_hint() {
        let err = Error::config("bad value", "Use true or false");
        match err {
            Error::Config { hint, .. } => assert!(hint.contains("true or false")),
            _ => panic!("Expected Config error"),
        }
    }
}
