/// Small helpers on raw `u64` bitboards (bit 0 = a1).
pub trait BitboardExt {
    /// Index of the least significant set bit. Undefined (returns 64) on empty.
    fn lsb(self) -> u8;
    fn is_set(self, idx: u8) -> bool;
    fn popcount(self) -> u32;
}

impl BitboardExt for u64 {
    #[inline(always)]
    fn lsb(self) -> u8 {
        self.trailing_zeros() as u8
    }

    #[inline(always)]
    fn is_set(self, idx: u8) -> bool {
        (self >> idx) & 1 != 0
    }

    #[inline(always)]
    fn popcount(self) -> u32 {
        self.count_ones()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lsb_and_membership() {
        let bb: u64 = (1 << 12) | (1 << 40);
        assert_eq!(bb.lsb(), 12);
        assert!(bb.is_set(40));
        assert!(!bb.is_set(41));
        assert_eq!(bb.popcount(), 2);
    }
}
