//! Error types for the imgtune hardware library.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when driving the panel mode attribute.
#[derive(Error, Debug)]
pub enum Error {
    /// Requested mode id is not in the mode table.
    #[error("Unknown mode id: {0}")]
    UnknownMode(i32),

    /// Reading or writing one of the control files failed.
    #[error("Panel I/O error: {0}")]
    Io(#[from] std::io::Error),
}
