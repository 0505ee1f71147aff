use crate::board::castle_bits::castle_route;
use crate::board::{Board, Color, Piece};
use crate::moves::king::KING_ATTACKS;
use crate::moves::knight::KNIGHT_ATTACKS;
use crate::moves::magic::MagicTables;
use crate::moves::pawn::pawn_attacks;
use crate::moves::types::Move;
use crate::square::Square;
use crate::utils::pop_lsb;

/// Squares `piece` of `color` on `square` attacks given `blockers`.
pub fn attacks_from(
    piece: Piece,
    color: Color,
    square: u8,
    blockers: u64,
    tables: &MagicTables,
) -> u64 {
    let sq = square as usize;

    match piece {
        Piece::Knight => KNIGHT_ATTACKS[sq],
        Piece::King => KING_ATTACKS[sq],
        Piece::Pawn => pawn_attacks(square, color),
        Piece::Bishop => tables.bishop.attacks(sq, blockers),
        Piece::Rook => tables.rook.attacks(sq, blockers),
        Piece::Queen => tables.queen_attacks(sq, blockers),
    }
}

/// Bitboard of `attacker`'s pieces that attack `square` on the current board.
pub fn attackers_to(board: &Board, square: Square, attacker: Color, tables: &MagicTables) -> u64 {
    let index = square.index();
    let sq = index as usize;
    let occupied = board.occupied();

    // A pawn of `attacker` hits `square` iff a pawn of the other color on
    // `square` would hit it back.
    let pawns = pawn_attacks(index, attacker.opposite()) & board.pieces(Piece::Pawn, attacker);
    let knights = KNIGHT_ATTACKS[sq] & board.pieces(Piece::Knight, attacker);
    let king = KING_ATTACKS[sq] & board.pieces(Piece::King, attacker);

    let queens = board.pieces(Piece::Queen, attacker);
    let rook_like = board.pieces(Piece::Rook, attacker) | queens;
    let bishop_like = board.pieces(Piece::Bishop, attacker) | queens;
    let straight = tables.rook.attacks(sq, occupied) & rook_like;
    let diagonal = tables.bishop.attacks(sq, occupied) & bishop_like;

    pawns | knights | king | straight | diagonal
}

pub fn is_square_attacked(
    board: &Board,
    square: Square,
    attacker: Color,
    tables: &MagicTables,
) -> bool {
    attackers_to(board, square, attacker, tables) != 0
}

#[inline(always)]
pub fn in_check(board: &Board, side: Color, tables: &MagicTables) -> bool {
    let king_sq = board.king_square(side);
    is_square_attacked(board, king_sq, side.opposite(), tables)
}

/// Castling path safety: the king may not start on, pass over, or land on an
/// attacked square.
pub fn is_legal_castling(board: &Board, mv: Move, tables: &MagicTables) -> bool {
    let us = board.side_to_move;
    let Some(route) = castle_route(mv.to.index()).filter(|r| r.color == us) else {
        return false;
    };

    let mut path = route.king_path;
    while path != 0 {
        let sq = Square::from_index(pop_lsb(&mut path));
        if is_square_attacked(board, sq, us.opposite(), tables) {
            return false;
        }
    }
    true
}
