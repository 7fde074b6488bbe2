//! The `base` crate defines the AGC-related things which have no
//! machine state: checks that a value fits in a register or storage
//! cell, and the one's-complement word transforms that the registers
//! and the arithmetic instructions are built from.  The `cpu` crate
//! depends on this one for all of its bit fiddling.

pub mod bitasserts;
pub mod onescomplement;
pub mod prelude;

/// A one's-complement quantity.  Storage cells hold 15 bits and the
/// A and Q registers hold 16.  The carrier type is wider than either,
/// so that the width checks see (and reject) over-wide values.
pub type Word = u32;
