use std::str::FromStr;

use arbiter::board::{Board, CASTLE_ALL, CASTLE_BK, CASTLE_BQ, CASTLE_WK, CASTLE_WQ, Color, Piece};
use arbiter::moves::execute::{generate_legal, make_move_basic, undo_move_basic};
use arbiter::moves::magic::loader::load_magic_tables;
use arbiter::moves::types::Move;
use arbiter::square::Square;

fn sq(name: &str) -> Square {
    Square::from_str(name).unwrap()
}

fn legal(board: &mut Board) -> Vec<Move> {
    let mut moves = Vec::new();
    let mut scratch = Vec::new();
    generate_legal(board, load_magic_tables(), &mut moves, &mut scratch);
    moves
}

/// Find the generated move for `text` (flags included).
fn find(board: &mut Board, text: &str) -> Move {
    legal(board)
        .into_iter()
        .find(|m| m.to_uci() == text)
        .unwrap_or_else(|| panic!("{text} is not legal in {board}"))
}

fn play(board: &mut Board, text: &str) {
    let mv = find(board, text);
    let _ = make_move_basic(board, mv);
}

fn assert_roundtrip_all(fen: &str) {
    let mut board = Board::from_str(fen).unwrap();
    let before = board.clone();
    for mv in legal(&mut board) {
        let undo = make_move_basic(&mut board, mv);
        undo_move_basic(&mut board, undo);
        assert_eq!(board, before, "make/undo of {mv:#} did not restore {fen}");
    }
}

#[test]
fn roundtrip_every_move_in_busy_positions() {
    for fen in [
        arbiter::board::START_FEN,
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
        "4k3/8/8/2PpP3/8/8/8/4K3 w - d6 0 1",
        "r3k2r/1P6/8/8/8/8/6p1/R3K2R b KQkq - 3 30",
    ] {
        assert_roundtrip_all(fen);
    }
}

#[test]
fn en_passant_removes_the_passed_pawn() {
    let mut b = Board::from_str("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
    let mv = find(&mut b, "e5d6");
    assert!(mv.is_en_passant());
    let undo = make_move_basic(&mut b, mv);

    assert_eq!(b.piece_at(sq("d6")), Some((Color::White, Piece::Pawn)));
    assert_eq!(b.piece_at(sq("d5")), None, "captured pawn sits on d5");
    assert_eq!(b.piece_at(sq("e5")), None);
    assert_eq!(undo.capture, Some((Color::Black, Piece::Pawn, sq("d5"))));

    undo_move_basic(&mut b, undo);
    assert_eq!(b.piece_at(sq("d5")), Some((Color::Black, Piece::Pawn)));
    assert_eq!(b.en_passant, Some(sq("d6")));
}

#[test]
fn castling_moves_the_rook() {
    let mut b = Board::from_str("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    play(&mut b, "e1g1");
    assert_eq!(b.piece_at(sq("g1")), Some((Color::White, Piece::King)));
    assert_eq!(b.piece_at(sq("f1")), Some((Color::White, Piece::Rook)));
    assert_eq!(b.piece_at(sq("h1")), None);
    assert_eq!(b.castling_rights, CASTLE_BK | CASTLE_BQ);

    play(&mut b, "e8c8");
    assert_eq!(b.piece_at(sq("c8")), Some((Color::Black, Piece::King)));
    assert_eq!(b.piece_at(sq("d8")), Some((Color::Black, Piece::Rook)));
    assert_eq!(b.piece_at(sq("a8")), None);
    assert_eq!(b.castling_rights, 0);
}

#[test]
fn rook_moves_and_captures_revoke_rights() {
    let mut b = Board::from_str("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    play(&mut b, "a1a8");
    // White's a1 rook moved and black's a8 rook was taken.
    assert_eq!(b.castling_rights, CASTLE_WK | CASTLE_BK);

    // Rights never come back, even with the rook home again.
    play(&mut b, "e8f7");
    play(&mut b, "a8a1");
    assert_eq!(b.castling_rights, CASTLE_WK);
}

#[test]
fn double_push_sets_en_passant_for_one_ply() {
    let mut b = Board::new();
    play(&mut b, "e2e4");
    assert_eq!(b.en_passant, Some(sq("e3")));
    play(&mut b, "g8f6");
    assert_eq!(b.en_passant, None);
}

#[test]
fn clocks_follow_pawn_moves_and_captures() {
    let mut b = Board::new();
    play(&mut b, "g1f3");
    assert_eq!((b.halfmove_clock, b.fullmove_number), (1, 1));
    play(&mut b, "b8c6");
    assert_eq!((b.halfmove_clock, b.fullmove_number), (2, 2));
    play(&mut b, "e2e4");
    assert_eq!((b.halfmove_clock, b.fullmove_number), (0, 2));
    play(&mut b, "c6d4");
    play(&mut b, "f3d4");
    assert_eq!(b.halfmove_clock, 0, "capture resets the clock");
    assert_eq!(b.side_to_move, Color::Black);
}

#[test]
fn promotion_replaces_the_pawn() {
    let mut b = Board::from_str("1n2k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
    let before = b.clone();
    let mv = find(&mut b, "a7b8n");
    assert!(mv.is_promotion() && mv.is_capture());
    let undo = make_move_basic(&mut b, mv);
    assert_eq!(b.piece_at(sq("b8")), Some((Color::White, Piece::Knight)));
    assert_eq!(b.pieces(Piece::Pawn, Color::White), 0);
    undo_move_basic(&mut b, undo);
    assert_eq!(b, before);
}

#[test]
fn start_position_rights_are_full() {
    assert_eq!(Board::new().castling_rights, CASTLE_ALL);
    assert_eq!(CASTLE_ALL, CASTLE_WK | CASTLE_WQ | CASTLE_BK | CASTLE_BQ);
}
