//! Implementations of the arithmetic instructions.
//! - AD: [`ad`]
//! - COM: [`com`]
//! - INCR: [`incr`]
//! - AUG: [`aug`]
//! - DIM: [`dim`]
//! - SU: [`su`]
//! - DOUBLE: [`double`]
//!
//! These only know about memory through [`MemoryUnit`] and
//! [`AddressRef`]; fetching and decoding the instruction is the
//! caller's business.
//!
//! The adder is 16 bits wide.  A 15-bit operand is sign-extended
//! before it reaches the adder, so that when an addition overflows,
//! bits 15 and 16 of the result disagree.  The result is stored in A
//! as-is; nothing here corrects the overflow.
//!
//! INCR, AUG and DIM work on the operand at its own width: 16 bits
//! for A and Q, 15 for everything else.  For a 16-bit operand bit 16
//! is taken as the sign, so stepping across the overflow boundary
//! keeps moving in the same direction.
use tracing::{event, Level};

use base::prelude::*;

use super::memory::{AddressRef, MemoryOpFailure, MemoryUnit};
use super::registers::Register;


const A: AddressRef = AddressRef::Direct {
    address: Register::A.address(),
};

/// Fetch an operand widened to the adder's 16 bits.
fn widened_operand(mem: &MemoryUnit, operand: &AddressRef) -> Result<Word, MemoryOpFailure> {
    match mem.read_operand(operand)? {
        (value, REGISTER_BITS) => Ok(value),
        (value, _) => Ok(sign_extend(value)?),
    }
}

/// Add `addend` (already 16 bits wide) into A.
fn add_to_accumulator(mem: &mut MemoryUnit, addend: Word) -> Result<(), MemoryOpFailure> {
    let sum = add_end_around(mem.registers().a(), addend, REGISTER_BITS)?;
    if has_overflowed(sum) {
        event!(Level::TRACE, "accumulator overflow: A={:06o}", sum);
    }
    mem.registers_mut().set_a(sum)?;
    Ok(())
}

/// Apply `step` to the operand at its own width and write it back.
fn modify_operand<F>(
    mem: &mut MemoryUnit,
    operand: &AddressRef,
    step: F,
) -> Result<(), MemoryOpFailure>
where
    F: FnOnce(Word, u32) -> Result<Word, BitAssertionFailed>,
{
    let (value, width) = mem.read_operand(operand)?;
    let updated = step(value, width)?;
    event!(
        Level::TRACE,
        "{} ({} bits): {:o} -> {:o}",
        operand,
        width,
        value,
        updated
    );
    mem.write_operand(operand, updated)
}

/// AD: add the operand to A.
pub fn ad(mem: &mut MemoryUnit, operand: &AddressRef) -> Result<(), MemoryOpFailure> {
    let addend = widened_operand(mem, operand)?;
    add_to_accumulator(mem, addend)
}

/// COM: complement all 16 bits of A, overflow bit included.
pub fn com(mem: &mut MemoryUnit) -> Result<(), MemoryOpFailure> {
    let a = complement(mem.registers().a(), REGISTER_BITS)?;
    mem.registers_mut().set_a(a)?;
    Ok(())
}

/// INCR: add one to the operand.  -0 becomes +1.
pub fn incr(mem: &mut MemoryUnit, operand: &AddressRef) -> Result<(), MemoryOpFailure> {
    modify_operand(mem, operand, |value, width| add_end_around(value, 1, width))
}

/// AUG: move the operand one step away from zero.
pub fn aug(mem: &mut MemoryUnit, operand: &AddressRef) -> Result<(), MemoryOpFailure> {
    modify_operand(mem, operand, |value, width| {
        let step = if is_negative(value, width) {
            minus_one(width)
        } else {
            1
        };
        add_end_around(value, step, width)
    })
}

/// DIM: move the operand one step toward zero.  Both +0 and -0 are
/// left alone, +1 becomes +0 and -1 becomes -0.
pub fn dim(mem: &mut MemoryUnit, operand: &AddressRef) -> Result<(), MemoryOpFailure> {
    modify_operand(mem, operand, |value, width| {
        if is_zero(value, width) {
            Ok(value)
        } else if is_negative(value, width) {
            add_end_around(value, 1, width)
        } else {
            // Positive and nonzero, so this cannot borrow.
            Ok(value - 1)
        }
    })
}

/// SU: subtract the operand from A, by adding its complement.  The
/// operand itself is not changed.
pub fn su(mem: &mut MemoryUnit, operand: &AddressRef) -> Result<(), MemoryOpFailure> {
    let subtrahend = match mem.read_operand(operand)? {
        (value, REGISTER_BITS) => complement(value, REGISTER_BITS)?,
        (value, width) => sign_extend(complement(value, width)?)?,
    };
    add_to_accumulator(mem, subtrahend)
}

/// DOUBLE: add A to itself.  This is AD with A as its own operand.
pub fn double(mem: &mut MemoryUnit) -> Result<(), MemoryOpFailure> {
    ad(mem, &A)
}
