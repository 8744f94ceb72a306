// File: src/error.rs
//! Error types for dictionary construction, persistence and configuration.
//!
//! Matching itself never fails: a term that does not fit a window is simply
//! not reported. Everything here belongs to start-up or build time.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LookupError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration file could not be parsed
    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Term store could not be encoded or decoded
    #[error("Persistence error: {0}")]
    Persistence(#[from] bincode::Error),

    /// Concept code is not a CUI
    #[error("Invalid concept code: {0}")]
    InvalidCui(String),

    /// Dictionary term breaks the anchor/token-count invariant
    #[error("Invalid dictionary term '{text}': {reason}")]
    InvalidTerm { text: String, reason: String },

    /// Malformed corpus input
    #[error("Corpus error at line {line}: {message}")]
    Corpus { line: usize, message: String },
}

/// Result type alias for lookup operations
pub type Result<T> = std::result::Result<T, LookupError>;

/// A fault raised by the host's token index while a window is being read.
///
/// The engine treats it as "abandon this window": it is logged and the
/// remaining windows are still processed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("window {window} could not be read: {message}")]
pub struct WindowFault {
    pub window: usize,
    pub message: String,
}
