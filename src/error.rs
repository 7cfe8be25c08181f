//! Error types for crambit

use thiserror::Error;

/// Result type alias for crambit operations
pub type Result<T> = std::result::Result<T, CrambitError>;

/// Error types that can occur in crambit
#[derive(Debug, Error)]
pub enum CrambitError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Value does not fit the configured encoding width or offset.
    /// Raised at encode time; the stream is left untouched conceptually
    /// but callers should treat it as caller error, not corrupt data.
    #[error("Value out of range: {msg}")]
    OutOfRange {
        /// What did not fit and by how much
        msg: String,
    },

    /// Decode attempted past the available bits. Indicates truncated or
    /// corrupt input, or a caller reading at the wrong position.
    #[error("End of bit stream reached")]
    EndOfStream,

    /// Corrupt or invalid persisted codec data (malformed Huffman table,
    /// codeword with no match, impossible decoded magnitude)
    #[error("Invalid format: {msg}")]
    InvalidFormat {
        /// Error message
        msg: String,
    },

    /// Malformed line in a .crai index file
    #[error("Invalid index format at line {line}: {msg}")]
    InvalidIndexFormat {
        /// Line number where the error occurred (1-based)
        line: usize,
        /// Error message
        msg: String,
    },

    /// Invalid argument supplied by the caller
    #[error("Invalid input: {msg}")]
    InvalidInput {
        /// Error message
        msg: String,
    },
}
