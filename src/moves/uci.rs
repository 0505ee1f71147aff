//! Coordinate move notation: `e2e4`, `e7e8q`.

use crate::board::Piece;
use crate::error::ParseError;
use crate::moves::types::Move;
use crate::square::Square;
use std::fmt;
use std::str::FromStr;

/// A syntactically valid coordinate move, not yet checked against a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coordinate {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<Piece>,
}

impl Coordinate {
    /// True when `mv` is the move this text names. Flags are ignored; they
    /// belong to the generator.
    #[inline]
    pub fn matches(&self, mv: &Move) -> bool {
        mv.from == self.from && mv.to == self.to && mv.promotion == self.promotion
    }
}

impl FromStr for Coordinate {
    type Err = ParseError;

    /// Four or five characters, `[a-h][1-8][a-h][1-8][qrbn]?`, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = s.chars().collect();
        if !(4..=5).contains(&chars.len()) {
            return Err(ParseError::Length(chars.len()));
        }

        let square = |pair: &[char]| -> Result<Square, ParseError> {
            pair.iter().collect::<String>().parse()
        };
        let from = square(&chars[0..2])?;
        let to = square(&chars[2..4])?;

        let promotion = match chars.get(4) {
            None => None,
            Some(&c) => Some(Piece::from_promotion_char(c).ok_or(ParseError::Promotion(c))?),
        };

        Ok(Coordinate {
            from,
            to,
            promotion,
        })
    }
}

impl From<Move> for Coordinate {
    fn from(mv: Move) -> Self {
        Coordinate {
            from: mv.from,
            to: mv.to,
            promotion: mv.promotion,
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(c) = self.promotion.and_then(Piece::promotion_char) {
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_promotion() {
        let c: Coordinate = "e2e4".parse().unwrap();
        assert_eq!(c.from, Square::from_index(12));
        assert_eq!(c.to, Square::from_index(28));
        assert_eq!(c.promotion, None);

        let c: Coordinate = "E7E8Q".parse().unwrap();
        assert_eq!(c.promotion, Some(Piece::Queen));
        assert_eq!(c.to_string(), "e7e8q");
    }

    #[test]
    fn rejects_malformed_text() {
        assert_eq!("e2e".parse::<Coordinate>(), Err(ParseError::Length(3)));
        assert_eq!("e2e4qq".parse::<Coordinate>(), Err(ParseError::Length(6)));
        assert_eq!(
            "i2e4".parse::<Coordinate>(),
            Err(ParseError::Square("i2".to_string()))
        );
        assert_eq!(
            "e2e9".parse::<Coordinate>(),
            Err(ParseError::Square("e9".to_string()))
        );
        assert_eq!("e7e8k".parse::<Coordinate>(), Err(ParseError::Promotion('k')));
    }

    #[test]
    fn multibyte_input_does_not_panic() {
        assert!("é2e4".parse::<Coordinate>().is_err());
        assert!("♔♔♔♔".parse::<Coordinate>().is_err());
    }
}
