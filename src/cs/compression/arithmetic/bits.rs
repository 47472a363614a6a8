//! Conversion between bit sequences and byte sequences, most-significant bit first.

use bitvec::prelude::*;

/// Destination for the bits produced by the encoder.
pub trait BitSink {
    /// Append one bit.
    fn push_bit(&mut self, bit: bool);
}

impl BitSink for Vec<bool> {
    fn push_bit(&mut self, bit: bool) {
        self.push(bit);
    }
}

/// Packs bits into bytes, MSB first.
#[derive(Debug, Clone, Default)]
pub struct BitPacker {
    bits: BitVec<u8, Msb0>,
}

impl BitPacker {
    /// Create an empty packer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bits pushed so far.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Whether no bits have been pushed.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Consume the packer and return the bytes.
    ///
    /// An incomplete final byte is left-aligned and padded with zero bits.
    pub fn finish(mut self) -> Vec<u8> {
        self.bits.set_uninitialized(false);
        self.bits.into_vec()
    }
}

impl BitSink for BitPacker {
    fn push_bit(&mut self, bit: bool) {
        self.bits.push(bit);
    }
}

/// Pack a finite bit sequence into bytes.
pub fn pack<I: IntoIterator<Item = bool>>(bits: I) -> Vec<u8> {
    let mut packer = BitPacker::new();
    for bit in bits {
        packer.push_bit(bit);
    }
    packer.finish()
}

/// Reads the bits of a byte slice, MSB first.
///
/// Iteration yields exactly `8 * bytes.len()` bits. [`BitUnpacker::next_or_zero`]
/// keeps going past the end with zero bits and counts how many it made up.
#[derive(Debug, Clone)]
pub struct BitUnpacker<'a> {
    bits: &'a BitSlice<u8, Msb0>,
    position: usize,
    padding: usize,
}

impl<'a> BitUnpacker<'a> {
    /// Create an unpacker over `bytes`.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bits: bytes.view_bits::<Msb0>(),
            position: 0,
            padding: 0,
        }
    }

    /// Next bit, or `false` once the input is exhausted.
    pub fn next_or_zero(&mut self) -> bool {
        match self.next() {
            Some(bit) => bit,
            None => {
                self.padding += 1;
                false
            }
        }
    }

    /// Number of real bits consumed.
    pub fn consumed(&self) -> usize {
        self.position
    }

    /// Number of zero bits synthesized past the end of the input.
    pub fn padding(&self) -> usize {
        self.padding
    }
}

impl Iterator for BitUnpacker<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        if self.position >= self.bits.len() {
            return None;
        }
        let bit = self.bits[self.position];
        self.position += 1;
        Some(bit)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.bits.len() - self.position;
        (remaining, Some(remaining))
    }
}

/// Expand bytes into their bits, MSB first.
pub fn unpack(bytes: &[u8]) -> BitUnpacker<'_> {
    BitUnpacker::new(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(pattern: &str) -> Vec<bool> {
        pattern.chars().map(|c| c == '1').collect()
    }

    #[test]
    fn test_pack_full_bytes() {
        let packed = pack(bits("1010000111111111"));
        assert_eq!(packed, vec![0b1010_0001, 0xFF]);
    }

    #[test]
    fn test_pack_partial_byte_is_left_aligned() {
        let packed = pack(bits("101"));
        assert_eq!(packed, vec![0b1010_0000]);

        let packed = pack(bits("111111111"));
        assert_eq!(packed, vec![0xFF, 0b1000_0000]);
    }

    #[test]
    fn test_pack_empty() {
        assert!(pack(Vec::<bool>::new()).is_empty());
        assert!(BitPacker::new().is_empty());
    }

    #[test]
    fn test_unpack_msb_first() {
        let unpacked: Vec<bool> = unpack(&[0b1000_0001, 0x40]).collect();
        assert_eq!(unpacked, bits("1000000101000000"));
    }

    #[test]
    fn test_unpack_reads_zero_past_end() {
        let mut reader = BitUnpacker::new(&[0xFF]);
        for _ in 0..8 {
            assert!(reader.next_or_zero());
        }
        assert!(!reader.next_or_zero());
        assert!(!reader.next_or_zero());
        assert_eq!(reader.consumed(), 8);
        assert_eq!(reader.padding(), 2);
    }

    #[test]
    fn test_unpack_of_packed_keeps_prefix() {
        let original = bits("1100101011101");
        let packed = pack(original.clone());
        let unpacked: Vec<bool> = unpack(&packed).collect();
        assert_eq!(unpacked.len(), 16);
        assert_eq!(&unpacked[..original.len()], &original[..]);
        assert!(unpacked[original.len()..].iter().all(|&b| !b));
    }
}
