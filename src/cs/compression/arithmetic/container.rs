//! Container header: the symbol count and raw frequency table stored in front
//! of the payload.
//!
//! Layout (big-endian):
//!
//! ```text
//! offset  size  field
//! 0       4     total symbols (u32)
//! 4       1     distinct symbols N (0 stands for 256 when total > 0)
//! 5       3*N   N x (symbol u8, raw count u16), ascending by symbol
//! 5+3N    rest  packed payload
//! ```

use super::model::SymbolCounts;
use crate::error::{Error, Result};

const TOTAL_LEN: usize = 4;
const FIXED_LEN: usize = TOTAL_LEN + 1;
const ENTRY_LEN: usize = 3;

/// One row of the stored frequency table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolCount {
    pub symbol: u8,
    pub count: u16,
}

/// Everything the decoder needs besides the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    total_symbols: u32,
    entries: Vec<SymbolCount>,
}

impl Header {
    /// Header for `counts`, which must describe an input of `counts.total()` bytes.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if the input is longer than `u32::MAX` bytes,
    /// `CountOverflow` if a symbol occurs more than `u16::MAX` times.
    pub fn from_counts(counts: &SymbolCounts) -> Result<Self> {
        let total = counts.total();
        let total_symbols = u32::try_from(total).map_err(|_| {
            Error::InvalidInput(format!("{total} bytes exceed the container limit"))
        })?;
        let entries = counts
            .present()
            .map(|(symbol, count)| {
                u16::try_from(count)
                    .map(|count| SymbolCount { symbol, count })
                    .map_err(|_| Error::CountOverflow { symbol, count })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Header {
            total_symbols,
            entries,
        })
    }

    /// Number of symbols the payload decodes to.
    pub fn total_symbols(&self) -> u32 {
        self.total_symbols
    }

    /// Stored frequency table, ascending by symbol.
    pub fn entries(&self) -> &[SymbolCount] {
        &self.entries
    }

    /// The stored table as counts for model construction.
    pub fn counts(&self) -> SymbolCounts {
        let mut counts = SymbolCounts::new();
        for entry in &self.entries {
            counts.set(entry.symbol, u64::from(entry.count));
        }
        counts
    }

    /// Serialized size in bytes.
    pub fn encoded_len(&self) -> usize {
        FIXED_LEN + ENTRY_LEN * self.entries.len()
    }

    /// Append the serialized header to `out`.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.reserve(self.encoded_len());
        out.extend_from_slice(&self.total_symbols.to_be_bytes());
        // 256 entries wrap to 0; an empty table only goes with an empty input
        out.push(self.entries.len() as u8);
        for entry in &self.entries {
            out.push(entry.symbol);
            out.extend_from_slice(&entry.count.to_be_bytes());
        }
    }

    /// Parse a header from the front of `bytes`, returning it and the payload.
    ///
    /// # Errors
    ///
    /// `TruncatedStream` if `bytes` ends inside the header, `MalformedHeader`
    /// if the table is not strictly ascending, holds a zero count, or its
    /// counts do not sum to the total symbol count.
    pub fn parse(bytes: &[u8]) -> Result<(Self, &[u8])> {
        if bytes.len() < FIXED_LEN {
            return Err(Error::TruncatedStream {
                needed: FIXED_LEN,
                available: bytes.len(),
            });
        }
        let mut total = [0u8; TOTAL_LEN];
        total.copy_from_slice(&bytes[..TOTAL_LEN]);
        let total_symbols = u32::from_be_bytes(total);

        let distinct = match (bytes[TOTAL_LEN], total_symbols) {
            (0, 0) => 0,
            (0, _) => 256,
            (n, 0) => {
                return Err(Error::MalformedHeader(format!(
                    "{n} table entries for an empty input"
                )))
            }
            (n, _) => usize::from(n),
        };

        let needed = FIXED_LEN + ENTRY_LEN * distinct;
        if bytes.len() < needed {
            return Err(Error::TruncatedStream {
                needed,
                available: bytes.len(),
            });
        }

        let entries: Vec<SymbolCount> = bytes[FIXED_LEN..needed]
            .chunks_exact(ENTRY_LEN)
            .map(|entry| SymbolCount {
                symbol: entry[0],
                count: u16::from_be_bytes([entry[1], entry[2]]),
            })
            .collect();
        if let Some(pair) = entries.windows(2).find(|pair| pair[0].symbol >= pair[1].symbol) {
            return Err(Error::MalformedHeader(format!(
                "symbol {:#04x} follows {:#04x}",
                pair[1].symbol, pair[0].symbol
            )));
        }
        if let Some(entry) = entries.iter().find(|entry| entry.count == 0) {
            return Err(Error::MalformedHeader(format!(
                "symbol {:#04x} has a zero count",
                entry.symbol
            )));
        }
        let counted: u64 = entries.iter().map(|entry| u64::from(entry.count)).sum();
        if counted != u64::from(total_symbols) {
            return Err(Error::MalformedHeader(format!(
                "table counts {counted} symbols, header declares {total_symbols}"
            )));
        }

        Ok((
            Header {
                total_symbols,
                entries,
            },
            &bytes[needed..],
        ))
    }
}
