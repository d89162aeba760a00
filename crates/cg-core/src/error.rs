use thiserror::Error;

/// The main error type for cg-* crates
#[derive(Error, Debug)]
pub enum Error {
  /// Connection failure or timeout before a response arrived
  #[error("Network error: {0}")]
  Network(String),

  /// The provider answered with a non-success status
  #[error("API returned status code: {status}")]
  UpstreamStatus { status: u16 },

  /// Body could not be read or did not match the expected shape
  #[error("Failed to decode response: {0}")]
  Decode(String),

  /// A search returned zero results
  #[error("No coins found for '{query}'")]
  NotFound { query: String },

  /// Configuration error
  #[error("Configuration error: {0}")]
  Config(String),

  /// A fetch task died before producing a result
  #[error("Internal error: {0}")]
  Internal(String),

  /// Local I/O error (config file, log file)
  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),
}

impl Error {
  /// Upstream HTTP status, if this error carries one
  pub fn status(&self) -> Option<u16> {
    match self {
      Error::UpstreamStatus { status } => Some(*status),
      _ => None,
    }
  }

  /// True when a lookup succeeded but matched nothing
  pub fn is_not_found(&self) -> bool {
    matches!(self, Error::NotFound { .. })
  }
}

/// Result type alias for cg-* crates
pub type Result<T> = std::result::Result<T, Error>;
