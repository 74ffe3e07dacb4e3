//! Error kinds reported by the huff library.

use thiserror::Error;

/// Errors raised while counting, coding, compressing or decompressing.
#[derive(Debug, Error)]
pub enum HuffError {
    /// A symbol outside the alphabet (or missing from the code table) was used.
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(usize),

    /// The archive is foreign or corrupted.
    #[error("Not a valid huff archive: {0}")]
    Format(String),

    /// The bit source ran dry before the end-of-stream code was seen.
    #[error("Unexpected end of input")]
    UnexpectedEndOfInput,

    /// An operation was called before the state it depends on was built.
    #[error("Precondition failed: {0}")]
    Precondition(&'static str),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
