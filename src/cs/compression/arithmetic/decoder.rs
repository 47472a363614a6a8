//! Range decoder: mirrors the encoder's state machine to recover symbols.

use log::debug;

use super::bits::BitUnpacker;
use super::coder::{CoderState, Renormalize, FIRST_QUARTER, PRECISION};
use super::model::FrequencyModel;
use crate::error::{Error, Result};

/// Bit input side of the renormalization loop: every rescale of the interval
/// shifts the next stream bit into `value`.
struct Receiver<'a> {
    bits: BitUnpacker<'a>,
    value: u32,
}

impl Receiver<'_> {
    fn pull(&mut self) -> u32 {
        u32::from(self.bits.next_or_zero())
    }
}

impl Renormalize for Receiver<'_> {
    fn settle(&mut self, _bit: bool) {
        self.value = (self.value << 1) | self.pull();
    }

    fn expand(&mut self) {
        // value sits in the middle half whenever the stream is intact;
        // corrupt input is caught by the bounds check on the next symbol
        self.value = (self.value.wrapping_sub(FIRST_QUARTER) << 1) | self.pull();
    }
}

/// Arithmetic decoder over a static [`FrequencyModel`].
pub struct RangeDecoder<'a, 'm> {
    model: &'m FrequencyModel,
    state: CoderState,
    receiver: Receiver<'a>,
    position: usize,
}

impl<'a, 'm> RangeDecoder<'a, 'm> {
    /// Start decoding `payload`, priming `value` with its first 32 bits.
    pub fn new(model: &'m FrequencyModel, payload: &'a [u8]) -> Self {
        let mut receiver = Receiver {
            bits: BitUnpacker::new(payload),
            value: 0,
        };
        for _ in 0..PRECISION {
            receiver.value = (receiver.value << 1) | receiver.pull();
        }
        RangeDecoder {
            model,
            state: CoderState::new(),
            receiver,
            position: 0,
        }
    }

    /// Decode the next symbol.
    ///
    /// # Errors
    ///
    /// `DecodeMismatch` if the stream position falls outside every interval
    /// of the model, which only happens for corrupt or mismatched input.
    pub fn decode_symbol(&mut self) -> Result<u8> {
        let position = self.position;
        let mismatch = || Error::DecodeMismatch { position };

        let CoderState { low, high } = self.state;
        let value = self.receiver.value;
        if value < low || value > high {
            return Err(mismatch());
        }

        // offset <= range, so the threshold is always below the total weight
        let range = u128::from(self.state.range());
        let total_weight = self.model.total_weight();
        let offset = u128::from(value - low) + 1;
        let threshold = ((offset * u128::from(total_weight) - 1) / range) as u64;

        let interval = self
            .model
            .interval_containing(threshold)
            .ok_or_else(mismatch)?;
        self.state
            .narrow(interval, total_weight)
            .ok_or_else(mismatch)?;

        self.state.renormalize(&mut self.receiver);
        self.position += 1;
        Ok(interval.symbol)
    }

    /// Number of symbols decoded so far.
    pub fn position(&self) -> usize {
        self.position
    }
}

/// Decode exactly `symbol_count` symbols from `payload`.
///
/// Bits missing at the end of the payload read as zero; bits left over once
/// `symbol_count` symbols are out are ignored.
pub fn decode(payload: &[u8], model: &FrequencyModel, symbol_count: usize) -> Result<Vec<u8>> {
    let mut decoder = RangeDecoder::new(model, payload);
    let mut output = Vec::with_capacity(symbol_count);
    for _ in 0..symbol_count {
        output.push(decoder.decode_symbol()?);
    }
    debug!(
        "decoded {} symbols from {} bits ({} padding bits)",
        decoder.position(),
        decoder.receiver.bits.consumed(),
        decoder.receiver.bits.padding()
    );
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cs::compression::arithmetic::encoder::encode;
    use crate::cs::compression::arithmetic::model::SymbolCounts;

    fn roundtrip(data: &[u8]) -> Vec<u8> {
        let model = FrequencyModel::from_bytes(data).unwrap();
        let payload = encode(data, &model).unwrap();
        decode(&payload, &model, data.len()).unwrap()
    }

    #[test]
    fn test_repeated_byte() {
        assert_eq!(roundtrip(&[0x41; 4]), vec![0x41; 4]);
    }

    #[test]
    fn test_order_is_restored() {
        assert_eq!(roundtrip(&[0x00, 0x01, 0x00, 0x02]), vec![0x00, 0x01, 0x00, 0x02]);
    }

    #[test]
    fn test_single_byte() {
        assert_eq!(roundtrip(&[0xFF]), vec![0xFF]);
    }

    #[test]
    fn test_text() {
        let input = b"The quick brown fox jumps over the lazy dog. Arithmetic coding is cool!";
        assert_eq!(roundtrip(input), input.to_vec());
    }

    #[test]
    fn test_midpoint_straddling_distribution() {
        // 1:2 splits keep the interval straddling the midpoint
        let mut input = Vec::new();
        for i in 0..3000 {
            input.push(if i % 3 == 0 { b'a' } else { b'b' });
        }
        input.extend(std::iter::repeat(b'b').take(500));
        assert_eq!(roundtrip(&input), input);
    }

    #[test]
    fn test_skewed_distribution() {
        let mut input = vec![0u8; 60_000];
        input[12_345] = 1;
        input[59_999] = 2;
        assert_eq!(roundtrip(&input), input);
    }

    #[test]
    fn test_truncated_payload_reads_zero_padding() {
        let input = [0x41u8; 10];
        let model = FrequencyModel::from_bytes(&input).unwrap();
        // the flush of a single-symbol stream is all zeros
        assert_eq!(decode(&[], &model, input.len()).unwrap(), input.to_vec());
    }

    #[test]
    fn test_trailing_bits_ignored() {
        let input = b"abcabcabd";
        let model = FrequencyModel::from_bytes(input).unwrap();
        let mut payload = encode(input, &model).unwrap();
        payload.extend_from_slice(&[0xAB, 0xCD, 0xEF]);
        assert_eq!(decode(&payload, &model, input.len()).unwrap(), input.to_vec());
    }

    #[test]
    fn test_value_outside_interval_is_mismatch() {
        let mut counts = SymbolCounts::new();
        counts.set(b'x', 1);
        counts.set(b'y', 1);
        let model = FrequencyModel::build(&counts, 2).unwrap();
        let mut decoder = RangeDecoder::new(&model, &[]);
        decoder.state = CoderState {
            low: 0x1000,
            high: 0x8000_0000,
        };
        assert!(matches!(
            decoder.decode_symbol(),
            Err(Error::DecodeMismatch { position: 0 })
        ));
    }

    #[test]
    fn test_flipped_bits_never_panic() {
        let input = b"mississippi river banks and sandbars";
        let model = FrequencyModel::from_bytes(input).unwrap();
        let payload = encode(input, &model).unwrap();
        for bit in 0..payload.len() * 8 {
            let mut corrupt = payload.clone();
            corrupt[bit / 8] ^= 0x80 >> (bit % 8);
            match decode(&corrupt, &model, input.len()) {
                Ok(output) => assert_eq!(output.len(), input.len()),
                Err(err) => assert!(matches!(err, Error::DecodeMismatch { .. })),
            }
        }
    }
}
