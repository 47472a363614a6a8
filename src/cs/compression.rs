//! Compression algorithms implementation.
//!
//! This module provides a lossless entropy coder:
//! - Arithmetic coding over a static order-0 byte model
//!
//! # Examples
//!
//! ```rust
//! use arithcode::cs::compression::{arithmetic::ArithmeticCodec, Compression};
//!
//! let codec = ArithmeticCodec;
//! let packed = codec.compress(b"abracadabra").unwrap();
//! assert_eq!(codec.decompress(&packed).unwrap(), b"abracadabra");
//! ```

use crate::error::Error;

/// Result type for compression operations
pub type Result<T> = std::result::Result<T, Error>;

/// Trait for compression algorithms
pub trait Compression {
    /// Compress the input data
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>>;

    /// Decompress the compressed data
    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>>;
}

pub mod arithmetic;
pub use arithmetic::{compress, decompress, ArithmeticCodec, Compressed};
