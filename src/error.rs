// Error types for flipquotes.
// Covers feed fetch failures, cache storage failures, and caller contract violations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlipQuotesError {
    #[error("Feed request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Feed returned HTTP {0}")]
    HttpStatus(reqwest::StatusCode),

    #[error("Feed returned an empty payload")]
    EmptyFeed,

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Pixel buffer of length {len} does not match {width}x{height}")]
    InvalidBuffer {
        len: usize,
        width: usize,
        height: usize,
    },

    #[error("{0}")]
    Other(String),
}

/// Broad failure category used when errors are reported instead of returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Network,
    Parse,
    Storage,
    Contract,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Network => "network",
            FailureKind::Parse => "parse",
            FailureKind::Storage => "storage",
            FailureKind::Contract => "contract",
        }
    }
}

impl FlipQuotesError {
    /// Categorize this error. A decode failure inside reqwest is a parse problem, not a
    /// transport one.
    pub fn kind(&self) -> FailureKind {
        match self {
            FlipQuotesError::Network(e) if e.is_decode() => FailureKind::Parse,
            FlipQuotesError::Network(_) | FlipQuotesError::HttpStatus(_) => FailureKind::Network,
            FlipQuotesError::EmptyFeed | FlipQuotesError::Json(_) => FailureKind::Parse,
            FlipQuotesError::Io(_) => FailureKind::Storage,
            FlipQuotesError::InvalidBuffer { .. } | FlipQuotesError::Other(_) => {
                FailureKind::Contract
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, FlipQuotesError>;
