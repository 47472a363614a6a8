pub mod compression;

pub use compression::{compress, decompress, ArithmeticCodec, Compressed, Compression};
