use crate::board::castle_bits::routes_for;
use crate::board::{Board, Color, Piece};
use crate::moves::magic::MagicTables;
use crate::moves::pawn::pawn_attacks;
use crate::moves::square_control::attacks_from;
use crate::moves::types::{
    CAPTURE, DOUBLE_PAWN_PUSH, EN_PASSANT, KINGSIDE_CASTLE, Move, MoveBuffer, PROMOTION,
    PROMOTION_CAPTURE, QUEENSIDE_CASTLE, QUIET_MOVE,
};
use crate::square::Square;
use crate::utils::pop_lsb;

const PROMOS: [Piece; 4] = [Piece::Queen, Piece::Rook, Piece::Bishop, Piece::Knight];

/// Knights and sliders, in generation order.
const OFFICERS: [Piece; 4] = [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen];

#[inline(always)]
fn emit(list: &mut impl MoveBuffer, from: u8, to: u8, piece: Piece, flags: u8) {
    list.push(Move {
        from: Square::from_index(from),
        to: Square::from_index(to),
        piece,
        promotion: None,
        flags,
    });
}

#[inline(always)]
fn emit_promotions(list: &mut impl MoveBuffer, from: u8, to: u8, flags: u8) {
    for promo in PROMOS {
        list.push(Move {
            from: Square::from_index(from),
            to: Square::from_index(to),
            piece: Piece::Pawn,
            promotion: Some(promo),
            flags,
        });
    }
}

/// Squares a piece of the side to move may land on: not our own pieces and
/// never the enemy king.
#[inline(always)]
fn landing_mask(board: &Board) -> u64 {
    let us = board.side_to_move;
    !board.occupancy(us) & !board.pieces(Piece::King, us.opposite())
}

/// Moves of every `piece` of the side to move that has no special rules
/// (knight, bishop, rook, queen, plain king steps).
fn generate_steps(
    board: &Board,
    piece: Piece,
    tables: &MagicTables,
    list: &mut impl MoveBuffer,
) {
    let us = board.side_to_move;
    let enemy = board.occupancy(us.opposite());
    let blockers = board.occupied();
    let landing = landing_mask(board);

    let mut origins = board.pieces(piece, us);
    while origins != 0 {
        let from = pop_lsb(&mut origins);
        let mut targets = attacks_from(piece, us, from, blockers, tables) & landing;
        while targets != 0 {
            let to = pop_lsb(&mut targets);
            let flags = if enemy & (1u64 << to) != 0 {
                CAPTURE
            } else {
                QUIET_MOVE
            };
            emit(list, from, to, piece, flags);
        }
    }
}

/// King steps plus castling candidates. Castling here only checks rights,
/// home squares and empty between-squares; attacked-path rules are applied by
/// the legal filter.
pub fn generate_king_moves(board: &Board, tables: &MagicTables, list: &mut impl MoveBuffer) {
    generate_steps(board, Piece::King, tables, list);

    let us = board.side_to_move;
    let king = board.pieces(Piece::King, us);
    let rooks = board.pieces(Piece::Rook, us);
    let occupied = board.occupied();

    for route in routes_for(us) {
        let ready = board.has_castling(route.right)
            && king & (1u64 << route.king_from) != 0
            && rooks & (1u64 << route.rook_from) != 0
            && occupied & route.between == 0;
        if ready {
            let flags = if route.king_to > route.king_from {
                KINGSIDE_CASTLE
            } else {
                QUEENSIDE_CASTLE
            };
            emit(list, route.king_from, route.king_to, Piece::King, flags);
        }
    }
}

/// Pushes, captures, promotions and en passant for every pawn of the side
/// to move.
pub fn generate_pawn_moves(board: &Board, list: &mut impl MoveBuffer) {
    let us = board.side_to_move;
    let empty = !board.occupied();
    let enemy = board.occupancy(us.opposite()) & landing_mask(board);
    let (start_rank, last_rank, step): (u8, u8, i8) = match us {
        Color::White => (1, 7, 8),
        Color::Black => (6, 0, -8),
    };
    let ahead = |sq: u8| sq.wrapping_add_signed(step);

    // A target counts for en passant only if the pushed pawn sits behind it.
    let ep_target = board.en_passant.map(Square::index).filter(|&ep| {
        let behind = ep.wrapping_add_signed(-step);
        empty & (1u64 << ep) != 0
            && board.pieces(Piece::Pawn, us.opposite()) & (1u64 << behind) != 0
    });

    let mut pawns = board.pieces(Piece::Pawn, us);
    while pawns != 0 {
        let from = pop_lsb(&mut pawns);
        let promotes = |to: u8| to / 8 == last_rank;

        let one = ahead(from);
        if empty & (1u64 << one) != 0 {
            if promotes(one) {
                emit_promotions(list, from, one, PROMOTION);
            } else {
                emit(list, from, one, Piece::Pawn, QUIET_MOVE);
                let two = ahead(one);
                if from / 8 == start_rank && empty & (1u64 << two) != 0 {
                    emit(list, from, two, Piece::Pawn, DOUBLE_PAWN_PUSH);
                }
            }
        }

        let hits = pawn_attacks(from, us);
        let mut captures = hits & enemy;
        while captures != 0 {
            let to = pop_lsb(&mut captures);
            if promotes(to) {
                emit_promotions(list, from, to, PROMOTION_CAPTURE);
            } else {
                emit(list, from, to, Piece::Pawn, CAPTURE);
            }
        }

        if let Some(ep) = ep_target
            && hits & (1u64 << ep) != 0
        {
            emit(list, from, ep, Piece::Pawn, EN_PASSANT);
        }
    }
}

/// Every pseudo-legal move for the side to move. Clears `moves` first.
pub fn generate_pseudo_legal(board: &Board, tables: &MagicTables, moves: &mut impl MoveBuffer) {
    moves.clear();
    generate_pawn_moves(board, moves);
    for piece in OFFICERS {
        generate_steps(board, piece, tables, moves);
    }
    generate_king_moves(board, tables, moves);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::magic::loader::load_magic_tables;
    use std::str::FromStr;

    fn pseudo(fen: &str) -> Vec<Move> {
        let board = Board::from_str(fen).unwrap();
        let mut moves = Vec::new();
        generate_pseudo_legal(&board, load_magic_tables(), &mut moves);
        moves
    }

    #[test]
    fn start_position_has_twenty_pseudo_moves() {
        assert_eq!(pseudo(crate::board::START_FEN).len(), 20);
    }

    #[test]
    fn enemy_king_is_never_a_target() {
        // Rook on a1 sees the black king on a8 down an open file.
        let moves = pseudo("k7/8/8/8/8/8/8/R3K3 w - - 0 1");
        assert!(moves.iter().all(|m| m.to.index() != 56));
    }

    #[test]
    fn castling_needs_rook_on_home_square() {
        // Rights present but the h1 rook is gone.
        let mut board = Board::from_str("4k3/8/8/8/8/8/8/R3K3 w Q - 0 1").unwrap();
        board.castling_rights |= crate::board::CASTLE_WK;
        let mut moves = Vec::new();
        generate_pseudo_legal(&board, load_magic_tables(), &mut moves);
        assert!(moves.iter().any(|m| m.is_queenside_castle()));
        assert!(!moves.iter().any(|m| m.is_kingside_castle()));
    }

    #[test]
    fn officers_generate_through_one_path() {
        let board = Board::from_str("4k3/8/8/8/3Q4/8/8/N3K3 w - - 0 1").unwrap();
        let t = load_magic_tables();
        let mut queen = Vec::new();
        generate_steps(&board, Piece::Queen, t, &mut queen);
        assert_eq!(queen.len(), 26, "own knight on a1 blocks the long diagonal");
        let mut knight = Vec::new();
        generate_steps(&board, Piece::Knight, t, &mut knight);
        assert_eq!(knight.len(), 2); // b3, c2
    }
}
