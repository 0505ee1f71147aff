use crate::board::{Board, Color, Piece};
use crate::moves::execute::generate_legal;
use crate::moves::magic::MagicTables;
use crate::moves::square_control::in_check;
use crate::moves::types::MoveList;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    InPlay,
    DrawFivefold,
    DrawSeventyFiveMove,
    DrawThreefold,
    DrawFiftyMove,
    DrawDeadPosition,
    Stalemate,
    Checkmate,
}

impl GameStatus {
    /// Any draw, automatic or claimable, including stalemate.
    pub fn is_draw(self) -> bool {
        !matches!(self, GameStatus::InPlay | GameStatus::Checkmate)
    }

    /// The game cannot continue. Threefold and fifty-move draws only end
    /// the game when claimed, so they do not count.
    pub fn is_terminal(self) -> bool {
        !matches!(
            self,
            GameStatus::InPlay | GameStatus::DrawThreefold | GameStatus::DrawFiftyMove
        )
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GameStatus::InPlay => "in play",
            GameStatus::DrawFivefold => "draw by fivefold repetition",
            GameStatus::DrawSeventyFiveMove => "draw by seventy-five-move rule",
            GameStatus::DrawThreefold => "threefold repetition (claimable)",
            GameStatus::DrawFiftyMove => "fifty-move rule (claimable)",
            GameStatus::DrawDeadPosition => "draw by insufficient material",
            GameStatus::Stalemate => "stalemate",
            GameStatus::Checkmate => "checkmate",
        })
    }
}

pub fn is_draw_by_threefold(board: &Board) -> bool {
    board.is_threefold()
}

pub fn is_draw_by_fifty_move(board: &Board) -> bool {
    board.halfmove_clock >= 100
}

pub fn is_fivefold(board: &Board) -> bool {
    board.repetition_count() >= 5
}

pub fn is_seventyfive_move(board: &Board) -> bool {
    board.halfmove_clock >= 150
}

/// Light squares (b1, a2, ...).
const LIGHT_SQUARES: u64 = 0x55AA_55AA_55AA_55AA;

/// Dead position: no sequence of legal moves can end in mate. Recognized
/// sets are K v K, K+N v K, and kings plus bishops (either side, any count)
/// all standing on one square color. Everything else, including K+NN v K
/// and K+B v K+N, is playable since a helpmate exists.
pub fn is_insufficient_material(board: &Board) -> bool {
    let both = |p: Piece| board.pieces(p, Color::White) | board.pieces(p, Color::Black);
    if both(Piece::Pawn) | both(Piece::Rook) | both(Piece::Queen) != 0 {
        return false;
    }

    let knights = both(Piece::Knight);
    let bishops = both(Piece::Bishop);
    match (knights.count_ones(), bishops) {
        (0, 0) | (1, 0) => true,
        (0, b) => b & LIGHT_SQUARES == 0 || b & !LIGHT_SQUARES == 0,
        _ => false,
    }
}

/// Determine the game status for the current position.
///
/// Priority (highest first):
///  1) `DrawFivefold`
///  2) `DrawSeventyFiveMove` (halfmove clock >= 150)
///  3) `DrawDeadPosition`
///  4) `DrawThreefold` (claimable)
///  5) `DrawFiftyMove` (claimable, halfmove clock >= 100)
///  6) `Checkmate` / `Stalemate` / `InPlay`
pub fn position_status(board: &mut Board, tables: &MagicTables) -> GameStatus {
    if is_fivefold(board) {
        return GameStatus::DrawFivefold;
    }
    if is_seventyfive_move(board) {
        return GameStatus::DrawSeventyFiveMove;
    }
    if is_insufficient_material(board) {
        return GameStatus::DrawDeadPosition;
    }
    if is_draw_by_threefold(board) {
        return GameStatus::DrawThreefold;
    }
    if is_draw_by_fifty_move(board) {
        return GameStatus::DrawFiftyMove;
    }

    let mut legal = MoveList::new();
    let mut scratch = MoveList::new();
    generate_legal(board, tables, &mut legal, &mut scratch);
    match (legal.is_empty(), in_check(board, board.side_to_move, tables)) {
        (true, true) => GameStatus::Checkmate,
        (true, false) => GameStatus::Stalemate,
        (false, _) => GameStatus::InPlay,
    }
}
