//! Conversions between bit sequences and their plain text form.
//!
//! Encoded data is a `Vec<u8>` whose elements are the binary digits 0 and 1.
//! No packing into bytes is done.

use crate::error::{Error, Result};

/// Validates a single binary digit.
#[inline]
pub(crate) fn check_bit(bit: u8) -> Result<bool> {
    match bit {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(Error::InvalidInput(format!(
            "bit must be 0 or 1, got {other}"
        ))),
    }
}

/// Renders bits as a string of `'0'` and `'1'` characters.
///
/// Any non-zero element is rendered as `'1'`.
pub fn to_bit_string(bits: &[u8]) -> String {
    bits.iter()
        .map(|&b| if b == 0 { '0' } else { '1' })
        .collect()
}

/// Parses a string of `'0'` and `'1'` characters into bits.
pub fn parse_bit_string(text: &str) -> Result<Vec<u8>> {
    text.chars()
        .enumerate()
        .map(|(i, c)| match c {
            '0' => Ok(0),
            '1' => Ok(1),
            other => Err(Error::InvalidInput(format!(
                "bit string contains {other:?} at position {i}"
            ))),
        })
        .collect()
}
