//! This module emulates the AGC's memory map, its central and
//! special registers, and the arithmetic instructions which work on
//! them.
#![crate_name = "cpu"]

mod instructions;
mod memory;
mod memorybank;
mod registers;

pub use instructions::{ad, aug, com, dim, double, incr, su};
pub use memory::{
    AddressRef, MachineVariant, MemoryConfiguration, MemoryOpFailure, MemoryType, MemoryUnit,
};
pub use memorybank::MemoryBank;
pub use registers::{Register, Registers, BBANK_SHAPE, EBANK_SHAPE};
