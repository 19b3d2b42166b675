use thiserror::Error;

/// Classifies single-source fetch failures for programmatic matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// Request did not complete within the configured timeout
    Timeout,
    /// Connection failure or non-success HTTP status
    Http,
    /// Local file could not be read
    Io,
    /// Response was received but is not usable list text
    InvalidData,
}

/// Extraction engine error types
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Invalid host: {0}")]
    InvalidHost(String),

    #[error("Invalid suffix list source: {0}")]
    InvalidSource(String),

    #[error("Suffix list unavailable: {0}")]
    SuffixListUnavailable(String),

    #[error("Fetch error: {message}")]
    Fetch {
        kind: FetchErrorKind,
        message: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExtractError {
    pub(crate) fn fetch(kind: FetchErrorKind, message: impl Into<String>) -> Self {
        ExtractError::Fetch {
            kind,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ExtractError>;
