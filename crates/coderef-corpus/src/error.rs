use std::io;

use thiserror::Error;

/// Error type for corpus loading operations
#[derive(Debug, Error)]
pub enum CorpusError {
  #[error("I/O error: {0}")]
  Io(#[from] io::Error),

  #[error("Serde error: {0}")]
  Serde(#[from] serde_json::Error),
}
