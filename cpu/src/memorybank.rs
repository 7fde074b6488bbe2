//! Storage for erasable and fixed memory.
//!
//! A `MemoryBank` is a set of equal-sized, independent banks of
//! words.  The memory unit owns two: eight banks of 0o400 words of
//! erasable storage and 36 banks of 0o2000 words of fixed storage.
use base::prelude::*;

use super::memory::MemoryOpFailure;

#[derive(Debug, Clone)]
pub struct MemoryBank {
    banks: Vec<Vec<Word>>,
    // Kept separately so that a MemoryBank with no banks still knows
    // its bank size.
    bank_size: usize,
}

impl MemoryBank {
    /// Allocate `num_banks` zero-filled banks of `bank_size` words.
    #[must_use]
    pub fn new(num_banks: usize, bank_size: usize) -> MemoryBank {
        MemoryBank {
            banks: vec![vec![0; bank_size]; num_banks],
            bank_size,
        }
    }

    pub fn get_bank(&self, bank: usize) -> Result<&[Word], MemoryOpFailure> {
        let num_banks = self.num_banks();
        self.banks
            .get(bank)
            .map(Vec::as_slice)
            .ok_or(MemoryOpFailure::InvalidBank { bank, num_banks })
    }

    pub fn get_bank_mut(&mut self, bank: usize) -> Result<&mut [Word], MemoryOpFailure> {
        let num_banks = self.num_banks();
        self.banks
            .get_mut(bank)
            .map(Vec::as_mut_slice)
            .ok_or(MemoryOpFailure::InvalidBank { bank, num_banks })
    }

    #[must_use]
    pub fn num_banks(&self) -> usize {
        self.banks.len()
    }

    #[must_use]
    pub fn bank_size(&self) -> usize {
        self.bank_size
    }
}
