use crate::error::ParseError;
use std::fmt;
use std::str::FromStr;

/// A board square, 0 = a1 … 63 = h8 (little-endian rank-file mapping).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square(u8);

impl Square {
    /// Build from a 0..63 index. Out-of-range input is a programming error.
    #[inline(always)]
    pub const fn from_index(idx: u8) -> Self {
        debug_assert!(idx < 64, "square index out of range");
        Square(idx)
    }

    #[inline(always)]
    pub const fn from_file_rank(file: u8, rank: u8) -> Self {
        Square::from_index(rank * 8 + file)
    }

    #[inline(always)]
    pub const fn index(self) -> u8 {
        self.0
    }

    /// 0 = a-file … 7 = h-file
    #[inline(always)]
    pub const fn file(self) -> u8 {
        self.0 % 8
    }

    /// 0 = rank 1 … 7 = rank 8
    #[inline(always)]
    pub const fn rank(self) -> u8 {
        self.0 / 8
    }

    #[inline(always)]
    pub const fn bb(self) -> u64 {
        1u64 << self.0
    }
}

impl TryFrom<u8> for Square {
    type Error = ParseError;

    fn try_from(idx: u8) -> Result<Self, Self::Error> {
        if idx < 64 {
            Ok(Square(idx))
        } else {
            Err(ParseError::SquareIndex(idx))
        }
    }
}

impl FromStr for Square {
    type Err = ParseError;

    /// Accepts `a1`..`h8`, either case for the file letter.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(ParseError::Square(s.to_string()));
        }
        let file = bytes[0].to_ascii_lowercase().wrapping_sub(b'a');
        let rank = bytes[1].wrapping_sub(b'1');
        if file > 7 || rank > 7 {
            return Err(ParseError::Square(s.to_string()));
        }
        Ok(Square::from_file_rank(file, rank))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = (b'a' + self.file()) as char;
        let rank = (b'1' + self.rank()) as char;
        write!(f, "{file}{rank}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_round_trip_through_text() {
        for (txt, idx) in [("a1", 0), ("h1", 7), ("a8", 56), ("h8", 63), ("e4", 28)] {
            let sq = Square::from_str(txt).unwrap();
            assert_eq!(sq.index(), idx);
            assert_eq!(sq.to_string(), txt);
        }
    }

    #[test]
    fn uppercase_file_is_accepted() {
        assert_eq!(Square::from_str("E2").unwrap(), Square::from_index(12));
    }

    #[test]
    fn off_board_text_is_rejected() {
        for bad in ["i1", "a9", "a0", "", "e", "e44"] {
            assert!(Square::from_str(bad).is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn try_from_rejects_64() {
        assert!(Square::try_from(64u8).is_err());
        assert_eq!(Square::try_from(63u8).unwrap().to_string(), "h8");
    }
}
