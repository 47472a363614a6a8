//! Interval state and the renormalization state machine shared by the
//! encoder and the decoder.

use super::model::Interval;

// Fixed-point parameters for arithmetic coding
pub const PRECISION: u32 = u32::BITS; // 32
pub const HALF: u32 = 1 << (PRECISION - 1); // 0x8000_0000
pub const FIRST_QUARTER: u32 = HALF >> 1; // 0x4000_0000
pub const THIRD_QUARTER: u32 = HALF + FIRST_QUARTER; // 0xC000_0000

/// What happens to the outside world when the interval is rescaled.
///
/// The encoder writes bits out, the decoder pulls bits in. Both are driven by
/// the same [`CoderState::renormalize`] loop so the two sides cannot drift.
pub trait Renormalize {
    /// The top bit of `low` and `high` agree and is now `bit`.
    fn settle(&mut self, bit: bool);

    /// The interval straddles the midpoint inside the middle half.
    fn expand(&mut self);
}

/// The working `[low, high]` bounds of the coder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoderState {
    pub low: u32,
    pub high: u32,
}

impl Default for CoderState {
    fn default() -> Self {
        Self::new()
    }
}

impl CoderState {
    /// The full window `[0, 2^32 - 1]`.
    pub fn new() -> Self {
        CoderState {
            low: 0,
            high: u32::MAX,
        }
    }

    /// Number of values in `[low, high]`.
    pub fn range(&self) -> u64 {
        u64::from(self.high - self.low) + 1
    }

    /// Narrow the state to `interval` out of `total_weight`.
    ///
    /// Returns `None` if the new interval would be empty; the state is left
    /// untouched in that case.
    pub fn narrow(&mut self, interval: Interval, total_weight: u64) -> Option<()> {
        let range = u128::from(self.range());
        let total = u128::from(total_weight);
        let low = u128::from(self.low);

        let new_high = (low + range * u128::from(interval.high) / total).checked_sub(1)?;
        let new_low = low + range * u128::from(interval.low) / total;
        if new_high < new_low {
            return None;
        }

        let (low, high) = (u32::try_from(new_low).ok()?, u32::try_from(new_high).ok()?);
        self.low = low;
        self.high = high;
        Some(())
    }

    /// Shift out every determined bit and expand underflowing intervals.
    ///
    /// On return the top bits of `low` and `high` differ and the interval is
    /// not confined to the middle half, so `range() > 2^30`.
    pub fn renormalize<R: Renormalize>(&mut self, side: &mut R) {
        loop {
            if (self.low ^ self.high) & HALF == 0 {
                side.settle(self.low & HALF != 0);
                self.low <<= 1;
                self.high = (self.high << 1) | 1;
            } else if self.low >= FIRST_QUARTER && self.high < THIRD_QUARTER {
                side.expand();
                self.low = (self.low - FIRST_QUARTER) << 1;
                self.high = ((self.high - FIRST_QUARTER) << 1) | 1;
            } else {
                break;
            }
        }
    }
}
