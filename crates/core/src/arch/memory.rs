//! Data segment: a contiguous, word-addressable range of signed
//! 32-bit cells populated from the program image.

use crate::common::error::SimError;

/// Word-addressable data memory over a fixed, contiguous range.
///
/// The range starts at `base` (the address immediately after the
/// BREAK word) and holds exactly as many words as the program image
/// supplied. Addresses outside `[base, base + 4*len)` are out of
/// range; addresses inside it but not word-aligned are also rejected,
/// since the architecture has no unaligned-access mode.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DataSegment {
    base: u32,
    words: Vec<i32>,
}

impl DataSegment {
    /// Builds a data segment starting at `base`, initialized from
    /// `words` in address order.
    #[must_use]
    pub fn new(base: u32, words: Vec<i32>) -> Self {
        Self { base, words }
    }

    /// The first address this segment covers.
    #[must_use]
    pub fn base(&self) -> u32 {
        self.base
    }

    /// Number of words held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// True iff the segment holds no words.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    fn index_of(&self, address: u32, cycle: u64) -> Result<usize, SimError> {
        if address < self.base || address % 4 != 0 {
            return Err(SimError::AddressOutOfRange { address, cycle });
        }
        let index = ((address - self.base) / 4) as usize;
        if index >= self.words.len() {
            return Err(SimError::AddressOutOfRange { address, cycle });
        }
        Ok(index)
    }

    /// Reads the word at `address`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::AddressOutOfRange`] if `address` is
    /// unaligned or outside the populated range.
    pub fn read(&self, address: u32, cycle: u64) -> Result<i32, SimError> {
        let index = self.index_of(address, cycle)?;
        Ok(self.words[index])
    }

    /// Writes `value` to the word at `address`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::AddressOutOfRange`] if `address` is
    /// unaligned or outside the populated range.
    pub fn write(&mut self, address: u32, value: i32, cycle: u64) -> Result<(), SimError> {
        let index = self.index_of(address, cycle)?;
        self.words[index] = value;
        Ok(())
    }

    /// Renders the segment in rows of 8 words, each row headed by its
    /// starting address, matching the `sim` snapshot format.
    #[must_use]
    pub fn dump(&self) -> String {
        self.words
            .chunks(8)
            .enumerate()
            .map(|(row, chunk)| {
                let addr = self.base + (row as u32) * 32;
                let values = chunk
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("\t");
                format!("{addr}:\t{values}")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
