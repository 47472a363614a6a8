//! Range encoder: narrows the coding interval per symbol and emits settled bits.

use log::debug;

use super::bits::{BitPacker, BitSink};
use super::coder::{CoderState, Renormalize, HALF, PRECISION};
use super::model::FrequencyModel;
use crate::error::{Error, Result};

/// Bit output side of the renormalization loop.
///
/// Underflow expansions are remembered as pending bits and written, inverted,
/// right after the next settled bit.
struct Emitter<S: BitSink> {
    sink: S,
    pending: u64,
    emitted: u64,
}

impl<S: BitSink> Emitter<S> {
    fn emit(&mut self, bit: bool) {
        self.sink.push_bit(bit);
        self.emitted += 1;
        while self.pending > 0 {
            self.sink.push_bit(!bit);
            self.emitted += 1;
            self.pending -= 1;
        }
    }
}

impl<S: BitSink> Renormalize for Emitter<S> {
    fn settle(&mut self, bit: bool) {
        self.emit(bit);
    }

    fn expand(&mut self) {
        self.pending += 1;
    }
}

/// Arithmetic encoder over a static [`FrequencyModel`].
///
/// Single use: feed symbols with [`RangeEncoder::encode_symbol`], then call
/// [`RangeEncoder::finish`] to write the terminal bits.
pub struct RangeEncoder<'m, S: BitSink> {
    model: &'m FrequencyModel,
    state: CoderState,
    emitter: Emitter<S>,
    position: usize,
}

impl<'m, S: BitSink> RangeEncoder<'m, S> {
    /// Start encoding into `sink`.
    pub fn new(model: &'m FrequencyModel, sink: S) -> Self {
        RangeEncoder {
            model,
            state: CoderState::new(),
            emitter: Emitter {
                sink,
                pending: 0,
                emitted: 0,
            },
            position: 0,
        }
    }

    /// Current coder bounds.
    pub fn state(&self) -> CoderState {
        self.state
    }

    /// Encode one symbol.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if the symbol is not in the model, `ArithmeticOverflow`
    /// if narrowing would leave an empty interval.
    pub fn encode_symbol(&mut self, symbol: u8) -> Result<()> {
        let interval = self.model.interval_of(symbol).ok_or_else(|| {
            Error::InvalidInput(format!(
                "symbol {symbol:#04x} at position {} is not in the model",
                self.position
            ))
        })?;

        let total_weight = self.model.total_weight();
        self.state
            .narrow(interval, total_weight)
            .ok_or(Error::ArithmeticOverflow {
                position: self.position,
            })?;
        debug_assert!(self.state.low <= self.state.high);

        self.state.renormalize(&mut self.emitter);
        self.position += 1;
        Ok(())
    }

    /// Write the terminal bits and return the sink.
    ///
    /// The top bit of `low` goes out first (followed by any pending bits),
    /// then the remaining bits of `low`, so the decoder's value lands exactly
    /// on `low` and every encoded symbol can be recovered.
    pub fn finish(mut self) -> S {
        let low = self.state.low;
        self.emitter.emit(low & HALF != 0);
        for shift in (0..PRECISION - 1).rev() {
            self.emitter.emit((low >> shift) & 1 == 1);
        }
        debug!(
            "encoded {} symbols into {} bits",
            self.position, self.emitter.emitted
        );
        self.emitter.sink
    }
}

/// Encode `symbols` with `model` and return the bit stream packed into bytes.
///
/// # Example
///
/// ```
/// use arithcode::cs::compression::arithmetic::{decode, encode, FrequencyModel};
///
/// let input = b"hello arithmetic coding";
/// let model = FrequencyModel::from_bytes(input).unwrap();
/// let payload = encode(input, &model).unwrap();
/// let decoded = decode(&payload, &model, input.len()).unwrap();
/// assert_eq!(decoded, input);
/// ```
pub fn encode(symbols: &[u8], model: &FrequencyModel) -> Result<Vec<u8>> {
    encode_into(symbols, model, BitPacker::new()).map(BitPacker::finish)
}

/// Encode `symbols` with `model` into an arbitrary bit sink.
pub fn encode_into<S: BitSink>(symbols: &[u8], model: &FrequencyModel, sink: S) -> Result<S> {
    let mut encoder = RangeEncoder::new(model, sink);
    for &symbol in symbols {
        encoder.encode_symbol(symbol)?;
    }
    Ok(encoder.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cs::compression::arithmetic::coder::FIRST_QUARTER;

    #[test]
    fn test_single_symbol_emits_only_flush() {
        let model = FrequencyModel::from_bytes(&[0x41; 4]).unwrap();
        let bits = encode_into(&[0x41; 4], &model, Vec::new()).unwrap();
        // the whole window is the symbol, so nothing settles before the flush
        assert_eq!(bits.len(), PRECISION as usize);
        assert!(bits.iter().all(|&b| !b));
    }

    #[test]
    fn test_two_symbols_settle_one_bit_each() {
        let model = FrequencyModel::from_bytes(&[0, 1]).unwrap();
        let bits = encode_into(&[1, 0, 1], &model, Vec::new()).unwrap();
        assert_eq!(&bits[..3], &[true, false, true]);
        assert_eq!(bits.len(), 3 + PRECISION as usize);
    }

    #[test]
    fn test_interval_stays_ordered() {
        let data = b"the quick brown fox jumps over the lazy dog";
        let model = FrequencyModel::from_bytes(data).unwrap();
        let mut encoder = RangeEncoder::new(&model, BitPacker::new());
        for &symbol in data.iter() {
            encoder.encode_symbol(symbol).unwrap();
            let state = encoder.state();
            assert!(state.high >= state.low);
            assert!(state.range() > u64::from(FIRST_QUARTER));
        }
    }

    #[test]
    fn test_unknown_symbol_rejected() {
        let model = FrequencyModel::from_bytes(b"aaa").unwrap();
        let result = encode(b"ab", &model);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_pending_bits_follow_inverted() {
        let mut emitter = Emitter {
            sink: Vec::new(),
            pending: 0,
            emitted: 0,
        };
        emitter.expand();
        emitter.expand();
        emitter.settle(true);
        emitter.settle(false);
        assert_eq!(emitter.sink, vec![true, false, false, false]);
        assert_eq!(emitter.emitted, 4);
        assert_eq!(emitter.pending, 0);
    }
}
