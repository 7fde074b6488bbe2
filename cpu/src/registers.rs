//! The AGC's central and special registers.
//!
//! Every register here also has a memory address (see
//! [`Register::address`]) and can be read and written as an ordinary
//! memory cell.  But each has its own rules about what may be stored
//! in it, and some transform the value as it is written (the CYR, SR,
//! CYL and EDOP "editing" registers).  The accessors on [`Registers`]
//! implement those rules and are the only way the register contents
//! change; the memory unit's address-based path routes into them.
//!
//! Register widths and behaviours are taken from the "Central
//! registers" section of the Virtual AGC assembly language manual.
use std::fmt::{self, Display, Formatter};

use serde::Serialize;

use base::prelude::*;

/// The bank-select bits of EBANK (bits 9-11).
pub const EBANK_SHAPE: Word = 0b000_011_100_000_000;
/// The legal bits of BBANK: FBANK in bits 11-15, EBANK in bits 1-3.
pub const BBANK_SHAPE: Word = 0b111_110_000_000_111;
const FBANK_BITS: u32 = 5;
const Z_BITS: u32 = 12;

/// The modelled registers, named as in the AGC documentation.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Register {
    A,
    L,
    Q,
    EBANK,
    FBANK,
    Z,
    BBANK,
    ARUPT,
    LRUPT,
    QRUPT,
    SAMPTIME1,
    SAMPTIME2,
    ZRUPT,
    BBRUPT,
    BRUPT,
    CYR,
    SR,
    CYL,
    EDOP,
}

impl Register {
    #[must_use]
    pub const fn all() -> [Register; 19] {
        [
            Register::A,
            Register::L,
            Register::Q,
            Register::EBANK,
            Register::FBANK,
            Register::Z,
            Register::BBANK,
            Register::ARUPT,
            Register::LRUPT,
            Register::QRUPT,
            Register::SAMPTIME1,
            Register::SAMPTIME2,
            Register::ZRUPT,
            Register::BBRUPT,
            Register::BRUPT,
            Register::CYR,
            Register::SR,
            Register::CYL,
            Register::EDOP,
        ]
    }

    /// The address at which the register is mapped into erasable
    /// memory.
    #[must_use]
    pub const fn address(&self) -> Word {
        match self {
            Register::A => 0o0,
            Register::L => 0o1,
            Register::Q => 0o2,
            Register::EBANK => 0o3,
            Register::FBANK => 0o4,
            Register::Z => 0o5,
            Register::BBANK => 0o6,
            // 0o7 is not a register, it is a source of zeroes.
            Register::ARUPT => 0o10,
            Register::LRUPT => 0o11,
            Register::QRUPT => 0o12,
            Register::SAMPTIME1 => 0o13,
            Register::SAMPTIME2 => 0o14,
            Register::ZRUPT => 0o15,
            Register::BBRUPT => 0o16,
            Register::BRUPT => 0o17,
            Register::CYR => 0o20,
            Register::SR => 0o21,
            Register::CYL => 0o22,
            Register::EDOP => 0o23,
        }
    }

    /// Look up the register mapped at `address`, if a modelled one is.
    #[must_use]
    pub fn at_address(address: Word) -> Option<Register> {
        Register::all().into_iter().find(|r| r.address() == address)
    }

    /// The width of the register's contents as seen by the
    /// arithmetic instructions.  Only A and Q keep the 16th
    /// (overflow) bit.
    #[must_use]
    pub const fn width(&self) -> u32 {
        match self {
            Register::A | Register::Q => REGISTER_BITS,
            _ => WORD_BITS,
        }
    }
}

impl Display for Register {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        f.write_str(match self {
            Register::A => "A",
            Register::L => "L",
            Register::Q => "Q",
            Register::EBANK => "EBANK",
            Register::FBANK => "FBANK",
            Register::Z => "Z",
            Register::BBANK => "BBANK",
            Register::ARUPT => "ARUPT",
            Register::LRUPT => "LRUPT",
            Register::QRUPT => "QRUPT",
            Register::SAMPTIME1 => "SAMPTIME1",
            Register::SAMPTIME2 => "SAMPTIME2",
            Register::ZRUPT => "ZRUPT",
            Register::BBRUPT => "BBRUPT",
            Register::BRUPT => "BRUPT",
            Register::CYR => "CYR",
            Register::SR => "SR",
            Register::CYL => "CYL",
            Register::EDOP => "EDOP",
        })
    }
}

/// Register contents.  Fields are private because the setters
/// enforce each register's width and shape.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registers {
    a: Word,
    l: Word,
    q: Word,
    ebank: Word,
    fbank: Word,
    z: Word,
    arupt: Word,
    lrupt: Word,
    qrupt: Word,
    samptime1: Word,
    samptime2: Word,
    zrupt: Word,
    bbrupt: Word,
    brupt: Word,
    cyr: Word,
    sr: Word,
    cyl: Word,
    edop: Word,
}

impl Registers {
    #[must_use]
    pub fn new() -> Registers {
        Registers::default()
    }

    /// Read a register by name.
    #[must_use]
    pub fn get(&self, reg: Register) -> Word {
        match reg {
            Register::A => self.a(),
            Register::L => self.l(),
            Register::Q => self.q(),
            Register::EBANK => self.ebank(),
            Register::FBANK => self.fbank(),
            Register::Z => self.z(),
            Register::BBANK => self.bbank(),
            Register::ARUPT => self.arupt(),
            Register::LRUPT => self.lrupt(),
            Register::QRUPT => self.qrupt(),
            Register::SAMPTIME1 => self.samptime1(),
            Register::SAMPTIME2 => self.samptime2(),
            Register::ZRUPT => self.zrupt(),
            Register::BBRUPT => self.bbrupt(),
            Register::BRUPT => self.brupt(),
            Register::CYR => self.cyr(),
            Register::SR => self.sr(),
            Register::CYL => self.cyl(),
            Register::EDOP => self.edop(),
        }
    }

    /// Write a register by name, applying that register's checks and
    /// transforms.
    pub fn set(&mut self, reg: Register, value: Word) -> Result<(), BitAssertionFailed> {
        match reg {
            Register::A => self.set_a(value),
            Register::L => self.set_l(value),
            Register::Q => self.set_q(value),
            Register::EBANK => self.set_ebank(value),
            Register::FBANK => self.set_fbank(value),
            Register::Z => self.set_z(value),
            Register::BBANK => self.set_bbank(value),
            Register::ARUPT => self.set_arupt(value),
            Register::LRUPT => self.set_lrupt(value),
            Register::QRUPT => self.set_qrupt(value),
            Register::SAMPTIME1 => self.set_samptime1(value),
            Register::SAMPTIME2 => self.set_samptime2(value),
            Register::ZRUPT => self.set_zrupt(value),
            Register::BBRUPT => self.set_bbrupt(value),
            Register::BRUPT => self.set_brupt(value),
            Register::CYR => self.set_cyr(value),
            Register::SR => self.set_sr(value),
            Register::CYL => self.set_cyl(value),
            Register::EDOP => self.set_edop(value),
        }
    }

    /// The accumulator, including its overflow bit.
    #[must_use]
    pub fn a(&self) -> Word {
        self.a
    }

    pub fn set_a(&mut self, value: Word) -> Result<(), BitAssertionFailed> {
        assert_width(value, REGISTER_BITS)?;
        self.a = value;
        Ok(())
    }

    #[must_use]
    pub fn l(&self) -> Word {
        self.l
    }

    /// L accepts a 16-bit value but only keeps 15 bits of it.
    pub fn set_l(&mut self, value: Word) -> Result<(), BitAssertionFailed> {
        assert_width(value, REGISTER_BITS)?;
        self.l = value & WORD_MASK;
        Ok(())
    }

    /// The return-address register, including its overflow bit.
    #[must_use]
    pub fn q(&self) -> Word {
        self.q
    }

    pub fn set_q(&mut self, value: Word) -> Result<(), BitAssertionFailed> {
        assert_width(value, REGISTER_BITS)?;
        self.q = value;
        Ok(())
    }

    /// Erasable bank select, held in bits 9-11.
    #[must_use]
    pub fn ebank(&self) -> Word {
        self.ebank
    }

    pub fn set_ebank(&mut self, value: Word) -> Result<(), BitAssertionFailed> {
        assert_width(value, WORD_BITS)?;
        assert_shape(value, EBANK_SHAPE)?;
        self.ebank = value;
        Ok(())
    }

    /// Fixed bank number.
    #[must_use]
    pub fn fbank(&self) -> Word {
        self.fbank
    }

    pub fn set_fbank(&mut self, value: Word) -> Result<(), BitAssertionFailed> {
        assert_width(value, FBANK_BITS)?;
        self.fbank = value;
        Ok(())
    }

    /// The program counter.
    #[must_use]
    pub fn z(&self) -> Word {
        self.z
    }

    pub fn set_z(&mut self, value: Word) -> Result<(), BitAssertionFailed> {
        assert_width(value, Z_BITS)?;
        self.z = value;
        Ok(())
    }

    /// BBANK has no storage of its own; it is a combined view of FBANK
    /// and EBANK and so is recomputed on every read.
    #[must_use]
    pub fn bbank(&self) -> Word {
        (self.fbank << 10) | (self.ebank >> 8)
    }

    pub fn set_bbank(&mut self, value: Word) -> Result<(), BitAssertionFailed> {
        assert_width(value, WORD_BITS)?;
        assert_shape(value, BBANK_SHAPE)?;
        self.set_fbank(value >> 10)?;
        self.set_ebank((value & 0b111) << 8)
    }

    #[must_use]
    pub fn arupt(&self) -> Word {
        self.arupt
    }

    pub fn set_arupt(&mut self, value: Word) -> Result<(), BitAssertionFailed> {
        assert_width(value, WORD_BITS)?;
        self.arupt = value;
        Ok(())
    }

    #[must_use]
    pub fn lrupt(&self) -> Word {
        self.lrupt
    }

    pub fn set_lrupt(&mut self, value: Word) -> Result<(), BitAssertionFailed> {
        assert_width(value, WORD_BITS)?;
        self.lrupt = value;
        Ok(())
    }

    #[must_use]
    pub fn qrupt(&self) -> Word {
        self.qrupt
    }

    pub fn set_qrupt(&mut self, value: Word) -> Result<(), BitAssertionFailed> {
        assert_width(value, WORD_BITS)?;
        self.qrupt = value;
        Ok(())
    }

    #[must_use]
    pub fn samptime1(&self) -> Word {
        self.samptime1
    }

    pub fn set_samptime1(&mut self, value: Word) -> Result<(), BitAssertionFailed> {
        assert_width(value, WORD_BITS)?;
        self.samptime1 = value;
        Ok(())
    }

    #[must_use]
    pub fn samptime2(&self) -> Word {
        self.samptime2
    }

    pub fn set_samptime2(&mut self, value: Word) -> Result<(), BitAssertionFailed> {
        assert_width(value, WORD_BITS)?;
        self.samptime2 = value;
        Ok(())
    }

    #[must_use]
    pub fn zrupt(&self) -> Word {
        self.zrupt
    }

    pub fn set_zrupt(&mut self, value: Word) -> Result<(), BitAssertionFailed> {
        assert_width(value, WORD_BITS)?;
        self.zrupt = value;
        Ok(())
    }

    #[must_use]
    pub fn bbrupt(&self) -> Word {
        self.bbrupt
    }

    pub fn set_bbrupt(&mut self, value: Word) -> Result<(), BitAssertionFailed> {
        assert_width(value, WORD_BITS)?;
        self.bbrupt = value;
        Ok(())
    }

    #[must_use]
    pub fn brupt(&self) -> Word {
        self.brupt
    }

    pub fn set_brupt(&mut self, value: Word) -> Result<(), BitAssertionFailed> {
        assert_width(value, WORD_BITS)?;
        self.brupt = value;
        Ok(())
    }

    #[must_use]
    pub fn cyr(&self) -> Word {
        self.cyr
    }

    /// Values written to CYR are stored rotated right one place.
    pub fn set_cyr(&mut self, value: Word) -> Result<(), BitAssertionFailed> {
        self.cyr = cycle_right(value)?;
        Ok(())
    }

    #[must_use]
    pub fn sr(&self) -> Word {
        self.sr
    }

    /// Values written to SR are stored shifted right one place.
    pub fn set_sr(&mut self, value: Word) -> Result<(), BitAssertionFailed> {
        self.sr = shift_right(value)?;
        Ok(())
    }

    #[must_use]
    pub fn cyl(&self) -> Word {
        self.cyl
    }

    /// Values written to CYL are stored rotated left one place.
    pub fn set_cyl(&mut self, value: Word) -> Result<(), BitAssertionFailed> {
        self.cyl = cycle_left(value)?;
        Ok(())
    }

    #[must_use]
    pub fn edop(&self) -> Word {
        self.edop
    }

    /// EDOP keeps the value written to it shifted right seven places.
    pub fn set_edop(&mut self, value: Word) -> Result<(), BitAssertionFailed> {
        self.edop = edop(value)?;
        Ok(())
    }
}
