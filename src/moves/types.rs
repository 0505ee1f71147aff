use crate::board::{CastleBits, Color, Piece};
use crate::square::Square;
use arrayvec::ArrayVec;
use std::fmt;
use std::ops::{Deref, DerefMut};

/// Upper bound on legal moves in any reachable position (218), rounded up.
pub const MAX_MOVES: usize = 256;

/// Fixed-capacity list used where allocation per call is unwanted.
pub type MoveList = ArrayVec<Move, MAX_MOVES>;

/// Sink for generated moves, so generators work over `Vec` and `ArrayVec` alike.
pub trait MoveBuffer: Deref<Target = [Move]> + DerefMut {
    fn push(&mut self, mv: Move);
    fn clear(&mut self);
}

impl MoveBuffer for Vec<Move> {
    fn push(&mut self, mv: Move) {
        Vec::push(self, mv);
    }
    fn clear(&mut self) {
        Vec::clear(self);
    }
}

impl<const N: usize> MoveBuffer for ArrayVec<Move, N> {
    fn push(&mut self, mv: Move) {
        ArrayVec::push(self, mv);
    }
    fn clear(&mut self) {
        ArrayVec::clear(self);
    }
}

// Move flag encoding (4 bits)
// Bits 0-1: special kind (00=plain, 01=double push, 10=O-O, 11=O-O-O)
// Bit 2: capture
// Bit 3: promotion
pub const QUIET_MOVE: u8 = 0b0000;
pub const DOUBLE_PAWN_PUSH: u8 = 0b0001;
pub const KINGSIDE_CASTLE: u8 = 0b0010;
pub const QUEENSIDE_CASTLE: u8 = 0b0011;
pub const CAPTURE: u8 = 0b0100;
pub const EN_PASSANT: u8 = 0b0101;
pub const PROMOTION: u8 = 0b1000;
pub const PROMOTION_CAPTURE: u8 = 0b1100;

/// A fully resolved move. Flags are filled in by the generator from the
/// board; two moves are equal only if every field matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub piece: Piece,
    pub promotion: Option<Piece>,
    pub flags: u8,
}

impl Move {
    #[inline(always)]
    pub fn is_capture(&self) -> bool {
        (self.flags & CAPTURE) != 0
    }

    #[inline(always)]
    pub fn is_en_passant(&self) -> bool {
        self.flags == EN_PASSANT
    }

    #[inline(always)]
    pub fn is_castling(&self) -> bool {
        self.flags == KINGSIDE_CASTLE || self.flags == QUEENSIDE_CASTLE
    }

    #[inline(always)]
    pub fn is_kingside_castle(&self) -> bool {
        self.flags == KINGSIDE_CASTLE
    }

    #[inline(always)]
    pub fn is_queenside_castle(&self) -> bool {
        self.flags == QUEENSIDE_CASTLE
    }

    #[inline(always)]
    pub fn is_promotion(&self) -> bool {
        (self.flags & PROMOTION) != 0
    }

    #[inline(always)]
    pub fn is_double_pawn_push(&self) -> bool {
        self.flags == DOUBLE_PAWN_PUSH
    }

    #[inline(always)]
    pub fn is_quiet(&self) -> bool {
        self.flags == QUIET_MOVE
    }

    /// Lowercase coordinate notation, e.g. `e2e4` or `e7e8q`.
    pub fn to_uci(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(c) = self.promotion.and_then(Piece::promotion_char) {
            write!(f, "{c}")?;
        }

        if f.alternate() {
            if self.is_castling() {
                f.write_str(" (castle)")?;
            } else if self.is_en_passant() {
                f.write_str(" (ep)")?;
            } else if self.is_capture() {
                f.write_str(" (x)")?;
            }
        }
        Ok(())
    }
}

/// State `make_move_basic` overwrote, so `undo_move_basic` can put it back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Undo {
    pub mv: Move,
    /// Captured piece and the square it stood on (behind the target for en passant).
    pub capture: Option<(Color, Piece, Square)>,
    pub prev_castling_rights: CastleBits,
    pub prev_en_passant: Option<Square>,
    pub prev_halfmove_clock: u32,
    pub prev_fullmove_number: u32,
    pub prev_zobrist: u64,
    /// Repetition history before an irreversible move cleared it.
    pub prev_history: Option<Vec<u64>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mv(from: u8, to: u8, piece: Piece, promotion: Option<Piece>, flags: u8) -> Move {
        Move {
            from: Square::from_index(from),
            to: Square::from_index(to),
            piece,
            promotion,
            flags,
        }
    }

    #[test]
    fn flag_predicates() {
        assert!(mv(12, 28, Piece::Pawn, None, DOUBLE_PAWN_PUSH).is_double_pawn_push());
        assert!(mv(4, 6, Piece::King, None, KINGSIDE_CASTLE).is_castling());
        assert!(mv(4, 2, Piece::King, None, QUEENSIDE_CASTLE).is_queenside_castle());

        let ep = mv(36, 43, Piece::Pawn, None, EN_PASSANT);
        assert!(ep.is_en_passant() && ep.is_capture());

        let pc = mv(52, 61, Piece::Pawn, Some(Piece::Queen), PROMOTION_CAPTURE);
        assert!(pc.is_promotion() && pc.is_capture() && !pc.is_en_passant());
    }

    #[test]
    fn display_is_lowercase_coordinates() {
        assert_eq!(mv(12, 28, Piece::Pawn, None, DOUBLE_PAWN_PUSH).to_uci(), "e2e4");
        assert_eq!(
            mv(52, 60, Piece::Pawn, Some(Piece::Knight), PROMOTION).to_string(),
            "e7e8n"
        );
    }

    #[test]
    fn alternate_display_tags_kind() {
        let castle = mv(4, 6, Piece::King, None, KINGSIDE_CASTLE);
        assert_eq!(format!("{castle:#}"), "e1g1 (castle)");
        assert_eq!(format!("{:#}", mv(36, 43, Piece::Pawn, None, EN_PASSANT)), "e5d6 (ep)");
        assert_eq!(format!("{:#}", mv(1, 18, Piece::Knight, None, CAPTURE)), "b1c3 (x)");
        assert_eq!(format!("{:#}", mv(1, 18, Piece::Knight, None, QUIET_MOVE)), "b1c3");
    }
}
