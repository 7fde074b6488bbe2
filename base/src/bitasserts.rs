//! Checks that a value fits the register or storage cell it is
//! destined for.
//!
//! Most cells simply have a width.  A few (EBANK, BBANK) have legal
//! bits which are not contiguous, and for those we check the value
//! against a "shape": a mask of the bits which may be set.

use std::error::Error;
use std::fmt::{self, Debug, Display, Formatter};

use super::Word;

/// Describes a value which does not fit where it was going.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BitAssertionFailed {
    /// The value has bits set at or above position `max_width`.
    ValueTooWide { value: Word, max_width: u32 },
    /// The value has bits set outside `shape`.
    InvalidShape { value: Word, shape: Word },
}

impl Error for BitAssertionFailed {}

impl Display for BitAssertionFailed {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            BitAssertionFailed::ValueTooWide { value, max_width } => {
                write!(f, "value {value:o} was too wide (max bits: {max_width})")
            }
            BitAssertionFailed::InvalidShape { value, shape } => {
                write!(
                    f,
                    "value {value:o} ({value:015b}) did not have the expected shape {shape:015b}"
                )
            }
        }
    }
}

/// Returns the mask covering the low `width` bits.
#[must_use]
pub const fn width_mask(width: u32) -> Word {
    if width >= Word::BITS {
        Word::MAX
    } else {
        (1 << width) - 1
    }
}

/// Fails unless `value` fits in `max_width` bits.
pub fn assert_width(value: Word, max_width: u32) -> Result<(), BitAssertionFailed> {
    if value & width_mask(max_width) == value {
        Ok(())
    } else {
        Err(BitAssertionFailed::ValueTooWide { value, max_width })
    }
}

/// Fails unless every bit set in `value` is also set in `shape`.
pub fn assert_shape(value: Word, shape: Word) -> Result<(), BitAssertionFailed> {
    if value & shape == value {
        Ok(())
    } else {
        Err(BitAssertionFailed::InvalidShape { value, shape })
    }
}
