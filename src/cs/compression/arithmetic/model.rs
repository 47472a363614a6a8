//! Static order-0 frequency model and its cumulative interval table.

use log::debug;

use super::coder::PRECISION;
use crate::error::{Error, Result};

/// The number of distinct byte symbols.
pub const ALPHABET_SIZE: usize = 256;

/// Largest total weight the coder window can hold (2^PRECISION).
pub const MAX_TOTAL_WEIGHT: u64 = 1 << PRECISION;

/// Raw occurrence counts per byte symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolCounts {
    counts: [u64; ALPHABET_SIZE],
}

impl Default for SymbolCounts {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolCounts {
    /// All counts zero.
    pub fn new() -> Self {
        SymbolCounts {
            counts: [0; ALPHABET_SIZE],
        }
    }

    /// Count every byte of `data`.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut counts = Self::new();
        for &b in data {
            counts.counts[b as usize] += 1;
        }
        counts
    }

    /// Set the count of `symbol`.
    pub fn set(&mut self, symbol: u8, count: u64) {
        self.counts[symbol as usize] = count;
    }

    /// Count of `symbol`.
    pub fn get(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Symbols with a nonzero count, ascending, with their counts.
    pub fn present(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        (0..=u8::MAX)
            .map(move |symbol| (symbol, self.counts[symbol as usize]))
            .filter(|&(_, count)| count > 0)
    }

    /// Number of symbols with a nonzero count.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }
}

/// One symbol's sub-range `[low, high)` of `[0, total_weight)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub symbol: u8,
    pub low: u64,
    pub high: u64,
}

impl Interval {
    /// Width of the interval, i.e. the symbol's normalized weight.
    pub fn weight(&self) -> u64 {
        self.high - self.low
    }
}

/// A frequency model normalized to the coder precision.
///
/// The interval table is kept in ascending symbol order, which is what lets
/// the decoder rebuild exactly the table the encoder used from raw counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyModel {
    intervals: Vec<Interval>,
    total_weight: u64,
}

impl FrequencyModel {
    /// Build a model from raw counts and the number of symbols they describe.
    ///
    /// Each present symbol receives `max(1, count * floor(2^32 / total_symbols))`.
    /// Both compressor and decompressor go through this function.
    ///
    /// # Errors
    ///
    /// `InvalidInput` when `total_symbols` is zero or no symbol has a nonzero
    /// count, `ModelOverflow` when the weights sum past 2^32 (only possible if
    /// the counts exceed `total_symbols`).
    pub fn build(counts: &SymbolCounts, total_symbols: u64) -> Result<Self> {
        if total_symbols == 0 {
            return Err(Error::InvalidInput(
                "cannot build a frequency model from zero symbols".to_string(),
            ));
        }
        let scale = MAX_TOTAL_WEIGHT / total_symbols;

        let mut intervals = Vec::with_capacity(counts.distinct());
        let mut cumulative: u64 = 0;
        for (symbol, count) in counts.present() {
            let weight = count.saturating_mul(scale).max(1);
            let high = cumulative.saturating_add(weight);
            intervals.push(Interval {
                symbol,
                low: cumulative,
                high,
            });
            cumulative = high;
        }

        if cumulative == 0 {
            return Err(Error::InvalidInput(
                "cannot build a frequency model without any counted symbol".to_string(),
            ));
        }
        if cumulative > MAX_TOTAL_WEIGHT {
            return Err(Error::ModelOverflow {
                total_weight: cumulative,
            });
        }

        debug!(
            "built model: {} distinct symbols, scale {}, total weight {}",
            intervals.len(),
            scale,
            cumulative
        );

        Ok(FrequencyModel {
            intervals,
            total_weight: cumulative,
        })
    }

    /// Build a model straight from input bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::build(&SymbolCounts::from_bytes(data), data.len() as u64)
    }

    /// The cumulative interval table, ascending by symbol.
    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    /// Sum of all normalized weights.
    pub fn total_weight(&self) -> u64 {
        self.total_weight
    }

    /// Interval assigned to `symbol`, if it is in the model.
    pub fn interval_of(&self, symbol: u8) -> Option<Interval> {
        self.intervals
            .binary_search_by_key(&symbol, |interval| interval.symbol)
            .ok()
            .map(|idx| self.intervals[idx])
    }

    /// The interval with `low <= threshold < high`.
    pub fn interval_containing(&self, threshold: u64) -> Option<Interval> {
        let idx = self
            .intervals
            .partition_point(|interval| interval.high <= threshold);
        self.intervals
            .get(idx)
            .filter(|interval| interval.low <= threshold)
            .copied()
    }
}
