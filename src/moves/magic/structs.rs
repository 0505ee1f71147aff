use crate::error::TableCacheError;
use serde::{Deserialize, Serialize};

/// Relevant blocker bits never exceed this (rook on a corner square).
const MAX_RELEVANT_BITS: u32 = 12;

/// Magic hashing data and attack sets for one slider on one square.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MagicEntry {
    pub magic: u64,
    /// 64 minus the number of relevant blocker bits.
    pub shift: u32,
    /// Relevant blocker squares: the rays, minus their last square.
    pub mask: u64,
    /// Attack sets indexed by `((blockers & mask) * magic) >> shift`.
    pub table: Box<[u64]>,
}

impl MagicEntry {
    #[inline(always)]
    fn attacks(&self, blockers: u64) -> u64 {
        let index = (blockers & self.mask).wrapping_mul(self.magic) >> self.shift;
        self.table[index as usize]
    }

    /// Slot count the mask calls for, if `shift` agrees with it.
    fn expected_slots(&self) -> Option<usize> {
        let bits = self.mask.count_ones();
        (bits <= MAX_RELEVANT_BITS && self.shift == 64 - bits).then(|| 1usize << bits)
    }
}

/// One slider's entries, indexed by square (a1 = 0).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SliderTable {
    pub entries: Vec<MagicEntry>,
}

impl SliderTable {
    /// Attack set from `square` with the given board occupancy.
    #[inline(always)]
    pub fn attacks(&self, square: usize, blockers: u64) -> u64 {
        self.entries[square].attacks(blockers)
    }

    /// Reject tables that would index out of bounds on lookup.
    pub fn check(&self) -> Result<(), TableCacheError> {
        if self.entries.len() != 64 {
            return Err(TableCacheError::Shape(self.entries.len()));
        }
        for (square, entry) in self.entries.iter().enumerate() {
            if entry.expected_slots() != Some(entry.table.len()) {
                return Err(TableCacheError::Slots {
                    square,
                    shift: entry.shift,
                    len: entry.table.len(),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MagicTables {
    pub rook: SliderTable,
    pub bishop: SliderTable,
}

impl MagicTables {
    #[inline(always)]
    pub fn queen_attacks(&self, square: usize, blockers: u64) -> u64 {
        self.rook.attacks(square, blockers) | self.bishop.attacks(square, blockers)
    }

    pub fn check(&self) -> Result<(), TableCacheError> {
        self.rook.check()?;
        self.bishop.check()
    }
}
