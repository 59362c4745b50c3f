//! Two's-complement bit codec shared by the decoder and disassembler.
//!
//! The program image represents every word as a 32-character string of
//! `'0'`/`'1'`, most-significant bit first. This module is the only
//! place that converts between that textual form and the `u32`/`i32`
//! values the rest of the crate works with.

use crate::common::error::SimError;

/// Width, in bits, of a MIPS32 instruction or data word.
pub const WORD_WIDTH: u32 = 32;

/// Parses a 32-character `'0'`/`'1'` string into a `u32`, MSB first.
///
/// # Errors
///
/// Returns [`SimError::Decode`] if `text` is not exactly 32 characters
/// or contains a character other than `'0'`/`'1'`.
pub fn parse_word(text: &str, line: usize) -> Result<u32, SimError> {
    if text.len() != WORD_WIDTH as usize {
        return Err(SimError::Decode {
            line,
            reason: format!("expected 32 bits, got {}", text.len()),
        });
    }
    u32::from_str_radix(text, 2).map_err(|_| SimError::Decode {
        line,
        reason: format!("not a binary string: {text:?}"),
    })
}

/// Interprets a 32-character `'0'`/`'1'` string as a signed 32-bit
/// two's-complement integer (used for data-segment words).
///
/// # Errors
///
/// Returns [`SimError::Decode`] under the same conditions as
/// [`parse_word`].
pub fn parse_signed_word(text: &str, line: usize) -> Result<i32, SimError> {
    parse_word(text, line).map(|bits| bits as i32)
}

/// Extracts `width` bits starting at bit `start` (0 = MSB of a 32-bit
/// word), returning them right-aligned in the low bits of the result.
#[inline]
#[must_use]
pub fn field(word: u32, start: u32, width: u32) -> u32 {
    let shift = WORD_WIDTH - start - width;
    (word >> shift) & ((1u32 << width) - 1)
}

/// Sign-extends the low `width` bits of `value` to a full `i32`.
#[inline]
#[must_use]
pub fn sign_extend(value: u32, width: u32) -> i32 {
    let shift = WORD_WIDTH - width;
    ((value << shift) as i32) >> shift
}

/// Renders `word` as six space-separated binary fields of widths
/// `6 5 5 5 5 6`, matching the disassembly column format.
#[must_use]
pub fn format_fields(word: u32) -> String {
    format!(
        "{:06b} {:05b} {:05b} {:05b} {:05b} {:06b}",
        field(word, 0, 6),
        field(word, 6, 5),
        field(word, 11, 5),
        field(word, 16, 5),
        field(word, 21, 5),
        field(word, 26, 6),
    )
}
