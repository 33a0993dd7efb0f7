//! Error types for the phone redaction library.
//!
//! Errors are grouped by what failed for the document being processed:
//! getting the source, reading its text, or composing the output. A batch
//! turns each of these into a per-document failure record instead of
//! stopping.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for redaction operations.
pub type RedactorResult<T> = Result<T, RedactorError>;

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// Error type for all redaction operations.
#[derive(Debug, Error)]
pub enum RedactorError {
    /// The source document or the font could not be retrieved.
    #[error("source unavailable '{resource}': {reason}")]
    SourceUnavailable {
        resource: String,
        reason: String,
        #[source]
        source: Option<BoxedSource>,
    },

    /// Text or geometry could not be extracted from the source document.
    #[error("{}", fmt_page("parse failure", *page, message))]
    ParseFailure {
        message: String,
        page: Option<u32>,
        #[source]
        source: Option<BoxedSource>,
    },

    /// The output document could not be composed.
    #[error("{}", fmt_page("render failure", *page, message))]
    RenderFailure {
        message: String,
        page: Option<u32>,
        #[source]
        source: Option<BoxedSource>,
    },

    /// Error occurred while reading or writing local files
    #[error("IO error for path '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Invalid configuration values
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Invalid parameters passed to an operation
    #[error("invalid input for '{parameter}': {reason}")]
    InvalidInput { parameter: String, reason: String },
}

fn fmt_page(kind: &str, page: Option<u32>, message: &str) -> String {
    match page {
        Some(p) => format!("{} on page {}: {}", kind, p, message),
        None => format!("{}: {}", kind, message),
    }
}

impl RedactorError {
    pub fn parse(message: impl Into<String>) -> Self {
        Self::ParseFailure {
            message: message.into(),
            page: None,
            source: None,
        }
    }

    pub fn render(message: impl Into<String>) -> Self {
        Self::RenderFailure {
            message: message.into(),
            page: None,
            source: None,
        }
    }

    pub fn source_unavailable(resource: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SourceUnavailable {
            resource: resource.into(),
            reason: reason.into(),
            source: None,
        }
    }

    /// Attaches a page number to parse and render failures.
    pub fn on_page(self, page_number: u32) -> Self {
        match self {
            Self::ParseFailure { message, source, .. } => Self::ParseFailure {
                message,
                page: Some(page_number),
                source,
            },
            Self::RenderFailure { message, source, .. } => Self::RenderFailure {
                message,
                page: Some(page_number),
                source,
            },
            other => other,
        }
    }
}

impl From<io::Error> for RedactorError {
    fn from(err: io::Error) -> Self {
        Self::Io {
            path: PathBuf::from("<unknown>"),
            source: err,
        }
    }
}

impl From<lopdf::Error> for RedactorError {
    fn from(err: lopdf::Error) -> Self {
        Self::RenderFailure {
            message: err.to_string(),
            page: None,
            source: Some(Box::new(err)),
        }
    }
}

impl From<toml::de::Error> for RedactorError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}
