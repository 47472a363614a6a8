//! Arithmetic coding with a static order-0 byte model.
//!
//! Compression makes one pass to count byte frequencies, scales the counts to
//! 32-bit fixed-point weights and lays them out as a cumulative interval table
//! in ascending symbol order. The encoder then narrows an integer interval per
//! byte, shifting out bits as soon as they are settled. Only the raw counts
//! travel in the container header; the decoder rebuilds the identical table
//! from them and replays the same narrowing to recover the bytes.
//!
//! # Example
//!
//! ```
//! use arithcode::cs::compression::arithmetic::{compress, decompress};
//!
//! let input = b"abracadabra";
//! let packed = compress(input).unwrap();
//! assert_eq!(packed.header().total_symbols(), 11);
//! let restored = decompress(packed.header(), packed.payload()).unwrap();
//! assert_eq!(restored, input);
//! ```

use log::debug;

use super::Compression;
use crate::error::Result;

pub mod bits;
pub mod coder;
pub mod container;
pub mod decoder;
pub mod encoder;
pub mod model;

pub use bits::{pack, unpack, BitPacker, BitSink, BitUnpacker};
pub use coder::{CoderState, PRECISION};
pub use container::{Header, SymbolCount};
pub use decoder::{decode, RangeDecoder};
pub use encoder::{encode, encode_into, RangeEncoder};
pub use model::{FrequencyModel, Interval, SymbolCounts};

/// A compressed input: the header fields and the packed payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compressed {
    header: Header,
    payload: Vec<u8>,
}

impl Compressed {
    /// The container header.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// The packed arithmetic-coded bits.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Serialize header and payload into one container.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.header.encoded_len() + self.payload.len());
        self.header.write_to(&mut out);
        out.extend_from_slice(&self.payload);
        out
    }

    /// Split a container into header and payload.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (header, payload) = Header::parse(bytes)?;
        Ok(Compressed {
            header,
            payload: payload.to_vec(),
        })
    }

    /// Size of the serialized container.
    pub fn encoded_len(&self) -> usize {
        self.header.encoded_len() + self.payload.len()
    }

    /// Original size divided by container size.
    pub fn ratio(&self, original_len: usize) -> f64 {
        original_len as f64 / self.encoded_len() as f64
    }
}

/// Compress `data` into header fields and payload.
///
/// An empty input produces a header with no table and an empty payload.
pub fn compress(data: &[u8]) -> Result<Compressed> {
    let counts = SymbolCounts::from_bytes(data);
    let header = Header::from_counts(&counts)?;
    if data.is_empty() {
        return Ok(Compressed {
            header,
            payload: Vec::new(),
        });
    }

    let model = FrequencyModel::build(&counts, u64::from(header.total_symbols()))?;
    let payload = encode(data, &model)?;
    debug!(
        "compressed {} bytes into {} header + {} payload bytes",
        data.len(),
        header.encoded_len(),
        payload.len()
    );
    Ok(Compressed { header, payload })
}

/// Recover the original bytes from header fields and payload.
///
/// The model is rebuilt from the stored raw counts with the same
/// normalization the compressor used.
pub fn decompress(header: &Header, payload: &[u8]) -> Result<Vec<u8>> {
    let total_symbols = header.total_symbols();
    if total_symbols == 0 {
        return Ok(Vec::new());
    }
    let model = FrequencyModel::build(&header.counts(), u64::from(total_symbols))?;
    decode(payload, &model, total_symbols as usize)
}

/// [`Compression`] over the full container byte format.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArithmeticCodec;

impl Compression for ArithmeticCodec {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        compress(data).map(|packed| packed.to_bytes())
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let (header, payload) = Header::parse(data)?;
        decompress(&header, payload)
    }
}
