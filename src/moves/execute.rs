use crate::board::castle_bits::{RIGHTS_LOST_AT, castle_route};
use crate::board::{Board, Color, Piece};
use crate::hash::zobrist::ep_key;
use crate::moves::magic::MagicTables;
use crate::moves::movegen::generate_pseudo_legal;
use crate::moves::square_control::{in_check, is_legal_castling};
use crate::moves::types::{Move, MoveBuffer, Undo};
use crate::square::Square;

/// Square of the pawn taken by an en passant capture landing on `target`.
#[inline(always)]
fn en_passant_victim(target: Square, mover: Color) -> Square {
    match mover {
        Color::White => Square::from_index(target.index() - 8),
        Color::Black => Square::from_index(target.index() + 8),
    }
}

/// Play `mv` for the side to move. `mv` must be pseudo-legal for `board`;
/// callers that accept outside input go through `generate_legal` first.
pub fn make_move_basic(board: &mut Board, mv: Move) -> Undo {
    let mover = board.side_to_move;
    let mut undo = Undo {
        mv,
        capture: None,
        prev_castling_rights: board.castling_rights,
        prev_en_passant: board.en_passant,
        prev_halfmove_clock: board.halfmove_clock,
        prev_fullmove_number: board.fullmove_number,
        prev_zobrist: board.zobrist,
        prev_history: None,
    };

    // The en passant term depends on the whole position; drop it now and
    // add the new one once the move is complete.
    board.zobrist ^= ep_key(board);
    board.en_passant = None;

    let victim_sq = if mv.is_en_passant() {
        en_passant_victim(mv.to, mover)
    } else {
        mv.to
    };
    undo.capture = board
        .take(victim_sq)
        .map(|(color, piece)| (color, piece, victim_sq));

    board.take(mv.from);
    board.put(mover, mv.promotion.unwrap_or(mv.piece), mv.to);

    if mv.is_castling()
        && let Some(route) = castle_route(mv.to.index())
    {
        board.relocate(
            Square::from_index(route.rook_from),
            Square::from_index(route.rook_to),
        );
    }

    let lost = RIGHTS_LOST_AT[mv.from.index() as usize] | RIGHTS_LOST_AT[mv.to.index() as usize];
    if board.castling_rights & lost != 0 {
        board.set_castling_rights(board.castling_rights & !lost);
    }

    if mv.piece == Piece::Pawn && mv.from.index().abs_diff(mv.to.index()) == 16 {
        // The passed-over square is midway between origin and target.
        board.en_passant = Some(Square::from_index((mv.from.index() + mv.to.index()) / 2));
    }

    let irreversible = undo.capture.is_some() || mv.piece == Piece::Pawn;
    board.halfmove_clock = if irreversible {
        0
    } else {
        board.halfmove_clock.saturating_add(1)
    };
    if mover == Color::Black {
        board.fullmove_number = board.fullmove_number.saturating_add(1);
    }

    board.pass_turn();
    board.zobrist ^= ep_key(board);

    // Earlier positions can never recur past an irreversible move.
    if irreversible {
        undo.prev_history = Some(std::mem::take(&mut board.history));
    }
    board.history.push(undo.prev_zobrist);

    #[cfg(debug_assertions)]
    debug_assert_valid_ep(board);

    #[cfg(all(debug_assertions, feature = "paranoid_hash"))]
    report_hash_drift(board, mv);

    #[cfg(debug_assertions)]
    board.assert_hash();

    undo
}

/// Reverse the `make_move_basic` call that produced `undo`.
pub fn undo_move_basic(board: &mut Board, undo: Undo) {
    let mv = undo.mv;
    let mover = board.side_to_move.opposite();

    board.take(mv.to);
    board.put(mover, mv.piece, mv.from);

    if mv.is_castling()
        && let Some(route) = castle_route(mv.to.index())
    {
        board.relocate(
            Square::from_index(route.rook_to),
            Square::from_index(route.rook_from),
        );
    }

    if let Some((color, piece, sq)) = undo.capture {
        board.put(color, piece, sq);
    }

    board.side_to_move = mover;
    board.castling_rights = undo.prev_castling_rights;
    board.en_passant = undo.prev_en_passant;
    board.halfmove_clock = undo.prev_halfmove_clock;
    board.fullmove_number = undo.prev_fullmove_number;
    // Piece edits above toggled the key; the saved one is authoritative.
    board.zobrist = undo.prev_zobrist;

    board.history.pop();
    if let Some(prev) = undo.prev_history {
        board.history = prev;
    }

    #[cfg(debug_assertions)]
    board.assert_hash();
}

/// Fill `moves` with the legal moves of the side to move. `scratch` holds the
/// pseudo-legal candidates. `board` is restored before returning.
pub fn generate_legal(
    board: &mut Board,
    tables: &MagicTables,
    moves: &mut impl MoveBuffer,
    scratch: &mut impl MoveBuffer,
) {
    generate_pseudo_legal(board, tables, scratch);
    moves.clear();

    for mv in scratch.iter().copied() {
        if is_legal_move(board, mv, tables) {
            moves.push(mv);
        }
    }
}

/// True when pseudo-legal `mv` does not leave the mover's king attacked. For
/// castling the king's path is checked as well.
#[inline]
pub fn is_legal_move(board: &mut Board, mv: Move, tables: &MagicTables) -> bool {
    if mv.is_castling() && !is_legal_castling(board, mv, tables) {
        return false;
    }
    let mover = board.side_to_move;
    let undo = make_move_basic(board, mv);
    let exposed = in_check(board, mover, tables);
    undo_move_basic(board, undo);
    !exposed
}

#[cfg(all(debug_assertions, feature = "paranoid_hash"))]
fn report_hash_drift(board: &Board, mv: Move) {
    let full = board.compute_zobrist_full();
    if board.zobrist != full {
        tracing::error!(%mv, stored = board.zobrist, full, fen = %board, "zobrist drift");
    }
}

#[cfg(debug_assertions)]
#[inline]
fn debug_assert_valid_ep(board: &Board) {
    if let Some(ep) = board.en_passant {
        let expected = match board.side_to_move {
            Color::White => 5,
            Color::Black => 2,
        };
        debug_assert_eq!(
            ep.rank(),
            expected,
            "en passant square {ep} on wrong rank for {:?} to move",
            board.side_to_move
        );
    }
}
