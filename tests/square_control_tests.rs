use std::str::FromStr;

use arbiter::board::{Board, Color};
use arbiter::moves::magic::loader::load_magic_tables;
use arbiter::moves::square_control::{attackers_to, in_check, is_square_attacked};
use arbiter::square::Square;

fn sq(name: &str) -> Square {
    Square::from_str(name).unwrap()
}

#[test]
fn in_check_detects_simple_rook_check() {
    let b = Board::from_str("4r2k/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
    let t = load_magic_tables();
    assert!(in_check(&b, Color::White, t));
    assert!(!in_check(&b, Color::Black, t));
}

#[test]
fn is_square_attacked_handles_pawn_direction() {
    // White pawn on b5; a6 and c6 are attacked, a4 and c4 are not.
    let b = Board::from_str("8/8/8/1P6/8/8/8/K3k3 w - - 0 1").unwrap();
    let t = load_magic_tables();

    assert!(is_square_attacked(&b, sq("a6"), Color::White, t));
    assert!(is_square_attacked(&b, sq("c6"), Color::White, t));
    assert!(!is_square_attacked(&b, sq("a4"), Color::White, t));
    assert!(!is_square_attacked(&b, sq("c4"), Color::White, t));
}

#[test]
fn pawn_wraparound_edges_are_masked() {
    let b = Board::from_str("8/8/8/P7/8/8/8/4k2K w - - 0 1").unwrap();
    let t = load_magic_tables();

    assert!(is_square_attacked(&b, sq("b6"), Color::White, t));
    assert!(!is_square_attacked(&b, sq("h6"), Color::White, t));
    assert!(!is_square_attacked(&b, sq("h4"), Color::White, t));
}

#[test]
fn black_pawns_attack_downward() {
    let b = Board::from_str("4k3/8/8/3p4/8/8/8/4K3 w - - 0 1").unwrap();
    let t = load_magic_tables();
    assert!(is_square_attacked(&b, sq("c4"), Color::Black, t));
    assert!(is_square_attacked(&b, sq("e4"), Color::Black, t));
    assert!(!is_square_attacked(&b, sq("d4"), Color::Black, t));
    assert!(!is_square_attacked(&b, sq("c6"), Color::Black, t));
}

#[test]
fn sliders_stop_at_first_blocker() {
    // Queen d1, own pawn d3: d2 attacked, d4 not.
    let b = Board::from_str("4k3/8/8/8/8/3P4/8/3QK3 w - - 0 1").unwrap();
    let t = load_magic_tables();
    assert!(is_square_attacked(&b, sq("d2"), Color::White, t));
    assert!(is_square_attacked(&b, sq("d3"), Color::White, t));
    assert!(!is_square_attacked(&b, sq("d4"), Color::White, t));
    assert!(is_square_attacked(&b, sq("h5"), Color::White, t));
}

#[test]
fn attackers_to_lists_every_attacker() {
    // e4 hit by knight f2, bishop b1, rook e8 (black side excluded).
    let b = Board::from_str("k3r3/8/8/8/8/8/5N2/1B2K3 w - - 0 1").unwrap();
    let t = load_magic_tables();
    let white = attackers_to(&b, sq("e4"), Color::White, t);
    assert_eq!(white, sq("f2").bb() | sq("b1").bb());
    let black = attackers_to(&b, sq("e4"), Color::Black, t);
    assert_eq!(black, sq("e8").bb());
}
