//! Error types for motionfill
//!
//! The polyfill pass itself never fails: every malformed input is handled by
//! silently skipping the offending ruleset or declaration. Errors only arise
//! on the way in (reading and parsing the host document) and are surfaced
//! through the `thiserror`-based types here.

use thiserror::Error;

/// Result type alias for motionfill operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for motionfill
#[derive(Error, Debug)]
pub enum Error {
  /// HTML or selector parsing error
  #[error("Parse error: {0}")]
  Parse(#[from] ParseError),

  /// IO error reading an input document
  #[error("IO error: {0}")]
  Io(#[from] std::io::Error),
}

/// Parsing errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
  /// HTML document could not be parsed
  #[error("Invalid HTML: {message}")]
  InvalidHtml {
    /// Description of the parse failure
    message: String,
  },

  /// Selector text this engine does not understand
  #[error("Invalid selector '{selector}': {message}")]
  InvalidSelector {
    /// The selector text that failed to parse
    selector: String,
    /// Description of the parse failure
    message: String,
  },
}
