//! The rules engine callers talk to: one game state plus the log needed to
//! take moves back.

use crate::board::{Board, Color, Piece};
use crate::error::PositionError;
use crate::moves::execute::{generate_legal, make_move_basic, undo_move_basic};
use crate::moves::magic::MagicTables;
use crate::moves::magic::loader::load_magic_tables;
use crate::moves::square_control::in_check;
use crate::moves::types::{Move, MoveList, Undo};
use crate::moves::uci::Coordinate;
use crate::square::Square;
use crate::status::{GameStatus, position_status};
use std::fmt;
use tracing::{debug, trace};

/// Outcome of reading one coordinate string against a position.
///
/// Holds the resolved move when the text names a legal move, otherwise the
/// reason it does not. Building one never fails hard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveDescriptor {
    notation: String,
    resolved: Result<Move, PositionError>,
}

impl MoveDescriptor {
    pub fn notation(&self) -> &str {
        &self.notation
    }

    pub fn is_valid(&self) -> bool {
        self.resolved.is_ok()
    }

    /// The legal move, with flags computed from the board.
    pub fn mv(&self) -> Option<Move> {
        self.resolved.as_ref().ok().copied()
    }

    pub fn error(&self) -> Option<&PositionError> {
        self.resolved.as_ref().err()
    }

    pub fn into_result(self) -> Result<Move, PositionError> {
        self.resolved
    }
}

/// A chess game state with undo history.
#[derive(Clone)]
pub struct Position {
    board: Board,
    log: Vec<Undo>,
    tables: &'static MagicTables,
}

impl Position {
    /// Standard starting position.
    pub fn new() -> Self {
        Position {
            board: Board::new(),
            log: Vec::new(),
            tables: load_magic_tables(),
        }
    }

    pub fn from_fen(fen: &str) -> Result<Self, PositionError> {
        let mut pos = Position::new();
        pos.set_fen(fen)?;
        Ok(pos)
    }

    /// Replace the position; the undo log is dropped. On error nothing changes.
    pub fn set_fen(&mut self, fen: &str) -> Result<(), PositionError> {
        self.board.set_fen(fen)?;
        self.log.clear();
        Ok(())
    }

    pub fn to_fen(&self) -> String {
        self.board.to_fen()
    }

    /// Back to the starting position with an empty undo log.
    pub fn reset(&mut self) {
        self.board = Board::new();
        self.log.clear();
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn side_to_move(&self) -> Color {
        self.board.side_to_move
    }

    pub fn piece_at(&self, sq: Square) -> Option<(Color, Piece)> {
        self.board.piece_at(sq)
    }

    pub fn castling_rights(&self) -> u8 {
        self.board.castling_rights
    }

    pub fn en_passant(&self) -> Option<Square> {
        self.board.en_passant
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.board.halfmove_clock
    }

    pub fn fullmove_number(&self) -> u32 {
        self.board.fullmove_number
    }

    pub fn zobrist(&self) -> u64 {
        self.board.zobrist
    }

    /// Moves applied since construction, reset or the last FEN load.
    pub fn history(&self) -> impl Iterator<Item = Move> + '_ {
        self.log.iter().map(|undo| undo.mv)
    }

    pub fn ply_count(&self) -> usize {
        self.log.len()
    }

    /// Every legal move for the side to move, in generation order.
    pub fn legal_moves(&self) -> MoveList {
        let mut scratch_board = self.board.clone();
        let mut moves = MoveList::new();
        let mut pseudo = MoveList::new();
        generate_legal(&mut scratch_board, self.tables, &mut moves, &mut pseudo);
        moves
    }

    /// Resolve coordinate text to a legal move of this position.
    pub fn parse(&self, text: &str) -> MoveDescriptor {
        let notation = text.trim().to_string();
        let resolved = notation
            .parse::<Coordinate>()
            .map_err(PositionError::from)
            .and_then(|coord| {
                self.legal_moves()
                    .into_iter()
                    .find(|mv| coord.matches(mv))
                    .ok_or_else(|| PositionError::IllegalMove {
                        notation: notation.clone(),
                    })
            });

        if let Err(error) = &resolved {
            debug!(%notation, %error, fen = %self.board, "move rejected");
        }
        MoveDescriptor { notation, resolved }
    }

    /// Play `mv`. It must equal one of [`Position::legal_moves`] exactly,
    /// flags included; otherwise the position is left as it was.
    pub fn apply(&mut self, mv: Move) -> Result<(), PositionError> {
        if !self.legal_moves().contains(&mv) {
            debug!(mv = %mv, fen = %self.board, "apply refused");
            return Err(PositionError::IllegalMove {
                notation: mv.to_uci(),
            });
        }

        let undo = make_move_basic(&mut self.board, mv);
        self.log.push(undo);
        trace!(%mv, flags = mv.flags, ply = self.log.len(), "applied");
        Ok(())
    }

    /// Apply a descriptor produced by [`Position::parse`].
    pub fn apply_descriptor(&mut self, desc: &MoveDescriptor) -> Result<(), PositionError> {
        match &desc.resolved {
            Ok(mv) => self.apply(*mv),
            Err(e) => Err(e.clone()),
        }
    }

    /// Parse and apply in one step, returning the resolved move.
    pub fn play(&mut self, text: &str) -> Result<Move, PositionError> {
        let mv = self.parse(text).into_result()?;
        self.apply(mv)?;
        Ok(mv)
    }

    /// Take back the last applied move and return it.
    pub fn undo(&mut self) -> Result<Move, PositionError> {
        let undo = self.log.pop().ok_or(PositionError::NoHistory)?;
        let mv = undo.mv;
        undo_move_basic(&mut self.board, undo);
        trace!(%mv, ply = self.log.len(), "undone");
        Ok(mv)
    }

    /// The side to move's king is attacked.
    pub fn in_check(&self) -> bool {
        in_check(&self.board, self.board.side_to_move, self.tables)
    }

    pub fn is_checkmate(&self) -> bool {
        self.in_check() && self.legal_moves().is_empty()
    }

    pub fn is_stalemate(&self) -> bool {
        !self.in_check() && self.legal_moves().is_empty()
    }

    pub fn repetition_count(&self) -> u8 {
        self.board.repetition_count()
    }

    pub fn status(&self) -> GameStatus {
        let mut scratch_board = self.board.clone();
        position_status(&mut scratch_board, self.tables)
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::new()
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Position")
            .field("fen", &self.board.to_fen())
            .field("plies", &self.log.len())
            .finish()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            write!(f, "{:#}", self.board)
        } else {
            write!(f, "{}", self.board)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_side_effect_free() {
        let pos = Position::new();
        let before = pos.to_fen();
        assert!(pos.parse("e2e4").is_valid());
        assert!(!pos.parse("e2e5").is_valid());
        assert_eq!(pos.to_fen(), before);
    }

    #[test]
    fn parse_errors_are_classified() {
        let pos = Position::new();
        assert!(matches!(
            pos.parse("zz").error(),
            Some(PositionError::Parse(_))
        ));
        assert!(matches!(
            pos.parse("e2e5").error(),
            Some(PositionError::IllegalMove { notation }) if notation == "e2e5"
        ));
    }

    #[test]
    fn descriptor_carries_computed_flags() {
        let pos = Position::new();
        let mv = pos.parse("e2e4").mv().unwrap();
        assert!(mv.is_double_pawn_push());
        assert_eq!(mv.piece, Piece::Pawn);
    }

    #[test]
    fn forged_flags_are_refused() {
        let mut pos = Position::new();
        let mut mv = pos.parse("g1f3").mv().unwrap();
        mv.flags = crate::moves::types::CAPTURE;
        let before = pos.to_fen();
        assert!(matches!(pos.apply(mv), Err(PositionError::IllegalMove { .. })));
        assert_eq!(pos.to_fen(), before);
    }

    #[test]
    fn undo_on_fresh_position_is_no_history() {
        let mut pos = Position::new();
        assert_eq!(pos.undo(), Err(PositionError::NoHistory));
    }

    #[test]
    fn reset_clears_log() {
        let mut pos = Position::new();
        pos.play("e2e4").unwrap();
        pos.reset();
        assert_eq!(pos.ply_count(), 0);
        assert_eq!(pos.to_fen(), crate::board::START_FEN);
    }
}
