//! This module emulates the AGC's memory map.
//!
//! The AGC has two kinds of storage: erasable (read/write core, 8
//! banks of 0o400 words) and fixed (core rope, 36 banks of 0o2000
//! words, which we treat as read-only).  An instruction carries only
//! a 12-bit address field, which is not enough to name every word.
//! So most of storage is reached through a "switched" window whose
//! contents are chosen by the EBANK and FBANK registers (and, for the
//! highest fixed banks, the superbank bit).
//!
//! The 12-bit address space looks like this:
//!
//! | Address range     | Maps to                                    |
//! |-------------------|--------------------------------------------|
//! | 0o0000 - 0o0060   | central and special registers (see below)  |
//! | 0o0000 - 0o1377   | erasable banks E0, E1, E2 (unswitched)     |
//! | 0o1400 - 0o1777   | switched erasable (bank chosen by EBANK)   |
//! | 0o2000 - 0o3777   | switched fixed (bank chosen by FBANK)      |
//! | 0o4000 - 0o5777   | fixed bank F2 (unswitched)                 |
//! | 0o6000 - 0o7777   | fixed bank F3 (unswitched)                 |
//!
//! Since E0-E2 and F2-F3 can also be selected through the switched
//! windows, the same storage cell can have two different
//! [`AddressRef`]s.  The real machine behaves the same way.
//!
//! The lowest addresses of E0 are not storage at all, but registers.
//! Reads and writes of those addresses are routed to [`Registers`].
//!
//! The central registers A and Q are 16 bits wide.  Their 16th bit
//! (the overflow bit) is not visible through an ordinary memory read,
//! nor settable through an ordinary memory write.  The arithmetic
//! instructions get at it through [`MemoryUnit::read_operand`] and
//! [`MemoryUnit::write_operand`].
use std::error;
use std::fmt::{self, Display, Formatter};

use serde::Serialize;
use tracing::{event, Level};

use base::prelude::*;

use super::memorybank::MemoryBank;
use super::registers::{Register, Registers, BBANK_SHAPE};


pub(crate) const ERASABLE_BANKS: usize = 8;
pub(crate) const ERASABLE_BANK_SIZE: usize = 0o400;
pub(crate) const FIXED_BANKS: usize = 36;
pub(crate) const FIXED_BANK_SIZE: usize = 0o2000;

/// End of the unswitched erasable region (E0, E1, E2).
const UNSWITCHED_ERASABLE_END: Word = 0o1400;
const UNSWITCHED_FIXED_START: Word = 0o4000;
const UNSWITCHED_FIXED_END: Word = 0o10000;
/// The address which always reads as zero.
const ZEROS_ADDRESS: Word = 0o7;
/// Fixed bank numbers at or above this are affected by the superbank bit.
const SUPERBANK_THRESHOLD: Word = 0o30;
/// The highest fixed bank which physically exists.
const HIGHEST_FIXED_BANK: Word = 0o43;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryOpFailure {
    /// A value did not fit the cell or register it was written to.
    Bits(BitAssertionFailed),
    /// A bank index outside the bank array.
    InvalidBank { bank: usize, num_banks: usize },
    /// The reference doesn't name any register or mapped location.
    AddressOutOfBounds { address: Word, reason: &'static str },
    /// The address is a register on the real hardware, but not one
    /// we emulate.
    UnimplementedRegister(Word),
}

impl Display for MemoryOpFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            MemoryOpFailure::Bits(e) => Display::fmt(e, f),
            MemoryOpFailure::InvalidBank { bank, num_banks } => {
                write!(
                    f,
                    "invalid bank index {bank}: must be in the range 0 <= x < {num_banks}"
                )
            }
            MemoryOpFailure::AddressOutOfBounds { address, reason } => {
                write!(f, "address {address:o} is out of bounds: {reason}")
            }
            MemoryOpFailure::UnimplementedRegister(address) => {
                write!(f, "register access {address:o} is not implemented")
            }
        }
    }
}

impl error::Error for MemoryOpFailure {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            MemoryOpFailure::Bits(e) => Some(e),
            _ => None,
        }
    }
}

impl From<BitAssertionFailed> for MemoryOpFailure {
    fn from(e: BitAssertionFailed) -> MemoryOpFailure {
        MemoryOpFailure::Bits(e)
    }
}

/// Which AGC the memory belongs to.  The Lunar Module's computer has
/// a few more memory-mapped registers than the Command Module's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum MachineVariant {
    #[default]
    CommandModule,
    LunarModule,
}

impl Display for MachineVariant {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        f.write_str(match self {
            MachineVariant::CommandModule => "Command Module",
            MachineVariant::LunarModule => "Lunar Module",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MemoryType {
    Erasable,
    Fixed,
}

/// An unambiguous reference to a memory location.
///
/// The address field of an instruction can't by itself identify a
/// location, because the EBANK/FBANK registers and the superbank bit
/// also take part.  [`MemoryUnit::deduce_address`] resolves the field
/// into one of these.
///
/// I/O channels are not memory-mapped, and so cannot be expressed as
/// an `AddressRef`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AddressRef {
    /// Unswitched memory: a memory-mapped register or an unswitched
    /// location.  It is forbidden to use a `Direct` reference to
    /// point into switched memory.
    Direct { address: Word },
    Banked {
        memory_type: MemoryType,
        bank: usize,
        offset: usize,
    },
    /// A bank which is addressable but doesn't exist.  Writes are
    /// dropped and reads return all zeroes.
    DeadBank,
}

impl Display for AddressRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            AddressRef::Direct { address } => write!(f, "{address:04o}"),
            AddressRef::Banked {
                memory_type: MemoryType::Erasable,
                bank,
                offset,
            } => write!(f, "E{bank},{offset:04o}"),
            AddressRef::Banked {
                memory_type: MemoryType::Fixed,
                bank,
                offset,
            } => write!(f, "F{bank:o},{offset:04o}"),
            AddressRef::DeadBank => f.write_str("dead bank"),
        }
    }
}

/// What lives at a memory-mapped register address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MappedRegister {
    Named(Register),
    Zeros,
    Unimplemented(Word),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryConfiguration {
    pub variant: MachineVariant,
}

#[derive(Debug)]
pub struct MemoryUnit {
    variant: MachineVariant,
    registers: Registers,
    erasable: MemoryBank,
    fixed: MemoryBank,
    superbank: bool,
}

impl MemoryUnit {
    #[must_use]
    pub fn new(config: &MemoryConfiguration) -> MemoryUnit {
        MemoryUnit {
            variant: config.variant,
            registers: Registers::new(),
            erasable: MemoryBank::new(ERASABLE_BANKS, ERASABLE_BANK_SIZE),
            fixed: MemoryBank::new(FIXED_BANKS, FIXED_BANK_SIZE),
            superbank: false,
        }
    }

    #[must_use]
    pub fn variant(&self) -> MachineVariant {
        self.variant
    }

    #[must_use]
    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    pub fn registers_mut(&mut self) -> &mut Registers {
        &mut self.registers
    }

    #[must_use]
    pub fn erasable(&self) -> &MemoryBank {
        &self.erasable
    }

    #[must_use]
    pub fn fixed(&self) -> &MemoryBank {
        &self.fixed
    }

    /// The superbank bit lives in I/O channel 7, which we don't
    /// emulate, so whoever drives the I/O channels sets it here.
    pub fn set_superbank(&mut self, superbank: bool) {
        self.superbank = superbank;
    }

    #[must_use]
    pub fn superbank(&self) -> bool {
        self.superbank
    }

    /// Place the contents of a fixed bank.  Fixed storage is
    /// read-only to the program, so this is the only way to put
    /// anything there.  `words` may be shorter than the bank; the
    /// rest of the bank is left alone.
    pub fn load_fixed_bank(&mut self, bank: usize, words: &[Word]) -> Result<(), MemoryOpFailure> {
        let bank_size = self.fixed.bank_size();
        if words.len() > bank_size {
            return Err(MemoryOpFailure::AddressOutOfBounds {
                address: Word::try_from(words.len()).unwrap_or(Word::MAX),
                reason: "too much data for one fixed bank",
            });
        }
        for w in words {
            assert_width(*w, WORD_BITS)?;
        }
        let target = self.fixed.get_bank_mut(bank)?;
        target[..words.len()].copy_from_slice(words);
        event!(
            Level::DEBUG,
            "loaded {} words into fixed bank {:o}",
            words.len(),
            bank
        );
        Ok(())
    }

    /// Resolve the address field of an instruction into an
    /// [`AddressRef`], using the current bank registers.
    #[must_use]
    pub fn deduce_address(&self, field: Word) -> AddressRef {
        let result = if field & 0o6000 == 0 {
            // Erasable.  Switched erasable is selected only when bits
            // 9 and 10 are both set.
            if field & 0o1400 != 0o1400 {
                AddressRef::Direct {
                    address: field & 0o1777,
                }
            } else {
                AddressRef::Banked {
                    memory_type: MemoryType::Erasable,
                    bank: bank_index(self.registers.ebank() >> 8),
                    offset: bank_index(field & 0o377),
                }
            }
        } else if field & 0o4000 != 0 {
            // Unswitched fixed.
            AddressRef::Direct {
                address: field & 0o7777,
            }
        } else {
            let mut bank = self.registers.fbank();
            if bank >= SUPERBANK_THRESHOLD && self.superbank {
                // The superbank bit only applies when the top two
                // bits of the bank number are 11.
                bank += 0o10;
            }
            if bank <= HIGHEST_FIXED_BANK {
                AddressRef::Banked {
                    memory_type: MemoryType::Fixed,
                    bank: bank_index(bank),
                    offset: bank_index(field & 0o1777),
                }
            } else {
                // Banks 0o44-0o47 are addressable but don't exist.
                AddressRef::DeadBank
            }
        };
        event!(Level::TRACE, "address field {:04o} resolves to {}", field, result);
        result
    }

    /// Read a 15-bit word.
    pub fn read(&self, addr: &AddressRef) -> Result<Word, MemoryOpFailure> {
        let (memory_type, bank, offset) = match *addr {
            AddressRef::Direct { address } => match self.mapped_register(address) {
                Some(reg) => return self.read_register(reg),
                None => self.convert_to_banked(address)?,
            },
            AddressRef::Banked {
                memory_type,
                bank,
                offset,
            } => (memory_type, bank, offset),
            AddressRef::DeadBank => {
                event!(Level::TRACE, "read from a dead bank");
                return Ok(0);
            }
        };
        let bank = self.bank_for(memory_type).get_bank(bank)?;
        bank.get(offset)
            .copied()
            .ok_or_else(|| offset_out_of_range(offset))
    }

    /// Write a 15-bit word.  Writes to fixed storage and to dead
    /// banks are silently dropped.
    pub fn write(&mut self, addr: &AddressRef, value: Word) -> Result<(), MemoryOpFailure> {
        assert_width(value, WORD_BITS)?;
        let (memory_type, bank, offset) = match *addr {
            AddressRef::Direct { address } => match self.mapped_register(address) {
                Some(reg) => return self.write_register(reg, value),
                None => self.convert_to_banked(address)?,
            },
            AddressRef::Banked {
                memory_type,
                bank,
                offset,
            } => (memory_type, bank, offset),
            AddressRef::DeadBank => {
                event!(Level::DEBUG, "dropping write of {:o} to a dead bank", value);
                return Ok(());
            }
        };
        match memory_type {
            MemoryType::Fixed => {
                // Fixed storage is core rope.  Programs can't change it.
                event!(
                    Level::DEBUG,
                    "dropping write of {:o} to fixed bank {:o} offset {:o}",
                    value,
                    bank,
                    offset
                );
                // Still reject a reference to a bank or offset which
                // doesn't exist.
                let bank = self.fixed.get_bank(bank)?;
                if offset >= bank.len() {
                    return Err(offset_out_of_range(offset));
                }
                Ok(())
            }
            MemoryType::Erasable => {
                let bank = self.erasable.get_bank_mut(bank)?;
                match bank.get_mut(offset) {
                    Some(cell) => {
                        *cell = value;
                        Ok(())
                    }
                    None => Err(offset_out_of_range(offset)),
                }
            }
        }
    }

    /// Read an instruction operand at its full width.  For A and Q
    /// this includes the overflow bit; everything else is read as a
    /// 15-bit word.  Returns the value and its width.
    pub fn read_operand(&self, addr: &AddressRef) -> Result<(Word, u32), MemoryOpFailure> {
        match sixteen_bit_register(addr) {
            Some(reg) => Ok((self.registers.get(reg), REGISTER_BITS)),
            None => Ok((self.read(addr)?, WORD_BITS)),
        }
    }

    /// Write back an operand produced by [`MemoryUnit::read_operand`].
    pub fn write_operand(&mut self, addr: &AddressRef, value: Word) -> Result<(), MemoryOpFailure> {
        match sixteen_bit_register(addr) {
            Some(reg) => Ok(self.registers.set(reg, value)?),
            None => self.write(addr, value),
        }
    }

    fn bank_for(&self, memory_type: MemoryType) -> &MemoryBank {
        match memory_type {
            MemoryType::Erasable => &self.erasable,
            MemoryType::Fixed => &self.fixed,
        }
    }

    fn is_register(&self, address: Word) -> bool {
        address < 0o55
            || address == 0o57
            || (self.variant == MachineVariant::LunarModule
                && matches!(address, 0o55 | 0o56 | 0o60))
    }

    /// Decide whether `address` is a register.  Returns `None` for an
    /// address which is ordinary storage.
    fn mapped_register(&self, address: Word) -> Option<MappedRegister> {
        if !self.is_register(address) {
            return None;
        }
        let mapped = match Register::at_address(address) {
            Some(reg) => MappedRegister::Named(reg),
            None if address == ZEROS_ADDRESS => MappedRegister::Zeros,
            None => MappedRegister::Unimplemented(address),
        };
        event!(Level::TRACE, "address {:o} is register {:?}", address, mapped);
        Some(mapped)
    }

    fn read_register(&self, reg: MappedRegister) -> Result<Word, MemoryOpFailure> {
        match reg {
            // The 16th bit of A and Q is not visible to a memory read.
            MappedRegister::Named(reg @ (Register::A | Register::Q)) => {
                Ok(self.registers.get(reg) & WORD_MASK)
            }
            MappedRegister::Named(reg) => Ok(self.registers.get(reg)),
            MappedRegister::Zeros => Ok(0),
            MappedRegister::Unimplemented(address) => {
                Err(MemoryOpFailure::UnimplementedRegister(address))
            }
        }
    }

    fn write_register(&mut self, reg: MappedRegister, value: Word) -> Result<(), MemoryOpFailure> {
        match reg {
            MappedRegister::Named(Register::Z) => Ok(self.registers.set_z(value & 0o7777)?),
            MappedRegister::Named(Register::BBANK) => {
                Ok(self.registers.set_bbank(value & BBANK_SHAPE)?)
            }
            MappedRegister::Named(reg) => Ok(self.registers.set(reg, value)?),
            MappedRegister::Zeros => {
                event!(Level::DEBUG, "dropping write of {:o} to the zero register", value);
                Ok(())
            }
            MappedRegister::Unimplemented(address) => {
                Err(MemoryOpFailure::UnimplementedRegister(address))
            }
        }
    }

    /// Convert the address of an unswitched (non-register) location
    /// to the banked location it is permanently mapped to.
    fn convert_to_banked(
        &self,
        address: Word,
    ) -> Result<(MemoryType, usize, usize), MemoryOpFailure> {
        if address < UNSWITCHED_ERASABLE_END {
            // E0, E1 and E2 are consecutive from address 0.
            let a = bank_index(address);
            let size = self.erasable.bank_size();
            Ok((MemoryType::Erasable, a / size, a % size))
        } else if (UNSWITCHED_FIXED_START..UNSWITCHED_FIXED_END).contains(&address) {
            // F2 is at 0o4000-0o5777 and F3 at 0o6000-0o7777.
            let a = bank_index(address - UNSWITCHED_FIXED_START);
            let size = self.fixed.bank_size();
            Ok((MemoryType::Fixed, 2 + a / size, a % size))
        } else {
            Err(MemoryOpFailure::AddressOutOfBounds {
                address,
                reason: "not an unswitched address",
            })
        }
    }
}

/// Registers whose instruction operands are 16 bits wide.
fn sixteen_bit_register(addr: &AddressRef) -> Option<Register> {
    match addr {
        AddressRef::Direct { address } => {
            Register::at_address(*address).filter(|reg| reg.width() == REGISTER_BITS)
        }
        _ => None,
    }
}

fn offset_out_of_range(offset: usize) -> MemoryOpFailure {
    MemoryOpFailure::AddressOutOfBounds {
        address: Word::try_from(offset).unwrap_or(Word::MAX),
        reason: "offset is beyond the end of the bank",
    }
}

fn bank_index(n: Word) -> usize {
    // Bank numbers and offsets have at most 12 significant bits.
    usize::try_from(n).unwrap_or(usize::MAX)
}
