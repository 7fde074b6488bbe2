//! One's-complement transforms on AGC words.
//!
//! Storage cells are 15 bits wide: bit 15 (0o40000) is the sign and
//! bits 1-14 the magnitude.  The A and Q registers carry a 16th bit
//! (0o100000).  When the 15th and 16th bits agree the register holds
//! an ordinary value; when they differ, an addition has overflowed
//! and bit 16 holds the true sign.
//!
//! Negation is bitwise inversion, so there are two zeroes: +0 (all
//! bits clear) and -0 (all bits set).  Addition folds the carry out of
//! the top bit back into the bottom bit ("end-around carry").
//!
//! Bit numbering follows the AGC documentation: bit 1 is the least
//! significant.

use super::bitasserts::{assert_width, width_mask, BitAssertionFailed};
use super::Word;

#[cfg(test)]
mod tests;

/// Width of a storage cell.
pub const WORD_BITS: u32 = 15;
/// Width of the A and Q registers (and of the adder).
pub const REGISTER_BITS: u32 = 16;
pub const WORD_MASK: Word = 0o77777;
pub const REGISTER_MASK: Word = 0o177777;
/// The sign bit of a 15-bit word.
pub const SIGN_BIT: Word = 0o40000;
/// The 16th bit of a register; the true sign after an overflow.
pub const OVERFLOW_BIT: Word = 0o100000;

/// Widen a 15-bit word to 16 bits by copying bit 15 into bit 16.
///
/// After this the two top bits agree, so if they disagree following
/// an addition we know that the addition overflowed.
pub fn sign_extend(word: Word) -> Result<Word, BitAssertionFailed> {
    assert_width(word, WORD_BITS)?;
    Ok(word | ((word << 1) & OVERFLOW_BIT))
}

/// Rotate a 15-bit word one place to the right (the CYR register).
pub fn cycle_right(word: Word) -> Result<Word, BitAssertionFailed> {
    assert_width(word, WORD_BITS)?;
    Ok(((word & 1) << 14) | (word >> 1))
}

/// Rotate a 15-bit word one place to the left (the CYL register).
pub fn cycle_left(word: Word) -> Result<Word, BitAssertionFailed> {
    assert_width(word, WORD_BITS)?;
    Ok((word >> 14) | ((word << 1) & 0o77776))
}

/// Logical shift right by one place (the SR register).
pub fn shift_right(word: Word) -> Result<Word, BitAssertionFailed> {
    assert_width(word, WORD_BITS)?;
    Ok(word >> 1)
}

/// Shift a 15-bit word right seven places (the EDOP register).
pub fn edop(word: Word) -> Result<Word, BitAssertionFailed> {
    assert_width(word, WORD_BITS)?;
    Ok(word >> 7)
}

/// Invert every bit of a `width`-bit word; this is one's-complement
/// negation.
pub fn complement(word: Word, width: u32) -> Result<Word, BitAssertionFailed> {
    assert_width(word, width)?;
    Ok(!word & width_mask(width))
}

/// Add two `width`-bit words, folding the carry out of the top bit
/// back into bit 1.
///
/// No overflow correction is performed; for 16-bit sums the caller
/// can detect overflow by comparing bits 15 and 16 of the result.
pub fn add_end_around(left: Word, right: Word, width: u32) -> Result<Word, BitAssertionFailed> {
    assert_width(left, width)?;
    assert_width(right, width)?;
    let sum = left + right;
    // Both inputs fit in `width` bits, so the carry is 0 or 1, and
    // adding it back cannot carry again.
    Ok((sum & width_mask(width)) + (sum >> width))
}

/// The one's-complement representation of -1 at the given width.
#[must_use]
pub const fn minus_one(width: u32) -> Word {
    width_mask(width) ^ 1
}

/// Returns true if `word` is +0 or -0 at the given width.
#[must_use]
pub const fn is_zero(word: Word, width: u32) -> bool {
    word == 0 || word == width_mask(width)
}

/// Returns true if the top bit of a `width`-bit word is set.  For a
/// 16-bit register this is the true sign, even when the register has
/// overflowed.
#[must_use]
pub const fn is_negative(word: Word, width: u32) -> bool {
    width > 0 && (word >> (width - 1)) & 1 != 0
}

/// Returns true if a 16-bit register value has overflowed, that is,
/// its bits 15 and 16 disagree.
#[must_use]
pub const fn has_overflowed(register: Word) -> bool {
    ((register & OVERFLOW_BIT) >> 1) != (register & SIGN_BIT)
}
