//! The prelude exports the word type, the bit-width checks and the
//! one's-complement transforms.  Providing this prelude is the main
//! purpose of the base crate.
pub use super::bitasserts::{assert_shape, assert_width, width_mask, BitAssertionFailed};
pub use super::onescomplement::{
    add_end_around, complement, cycle_left, cycle_right, edop, has_overflowed, is_negative,
    is_zero, minus_one, shift_right, sign_extend, OVERFLOW_BIT, REGISTER_BITS, REGISTER_MASK,
    SIGN_BIT, WORD_BITS, WORD_MASK,
};
pub use super::Word;
