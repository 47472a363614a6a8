//! Error types shared by every codec in the crate.

use thiserror::Error;

/// Error variants for compression and decompression.
#[derive(Debug, Error)]
pub enum Error {
    /// The input cannot be modelled or encoded (e.g. it is empty or too long).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The normalized weights do not fit the coder's fixed-point window.
    #[error("model overflow: total weight {total_weight} exceeds the coder precision")]
    ModelOverflow {
        /// Sum of all normalized weights.
        total_weight: u64,
    },

    /// The coding interval collapsed while encoding a symbol.
    #[error("arithmetic overflow: interval collapsed at symbol {position}")]
    ArithmeticOverflow {
        /// Index of the symbol being encoded.
        position: usize,
    },

    /// The bit stream does not match the frequency table.
    #[error("decode mismatch at symbol {position}")]
    DecodeMismatch {
        /// Index of the symbol being decoded.
        position: usize,
    },

    /// The container ended before its declared header did.
    #[error("truncated stream: needed {needed} bytes, found {available}")]
    TruncatedStream {
        /// Bytes required by the header.
        needed: usize,
        /// Bytes actually present.
        available: usize,
    },

    /// The container header is structurally invalid.
    #[error("malformed header: {0}")]
    MalformedHeader(String),

    /// A symbol occurs more often than the header can record.
    #[error("count overflow: symbol {symbol:#04x} occurs {count} times")]
    CountOverflow {
        /// The offending symbol.
        symbol: u8,
        /// Its raw occurrence count.
        count: u64,
    },

    /// An I/O error occurred while reading or writing a container.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for codec operations.
pub type Result<T> = std::result::Result<T, Error>;
