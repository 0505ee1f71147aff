use super::king::build_leaper_table;
use crate::board::Color;

/// Squares a white pawn on the index square attacks.
pub const WHITE_PAWN_ATTACKS: [u64; 64] = build_leaper_table(&[(-1, 1), (1, 1)]);
/// Squares a black pawn on the index square attacks.
pub const BLACK_PAWN_ATTACKS: [u64; 64] = build_leaper_table(&[(-1, -1), (1, -1)]);

#[inline(always)]
pub fn pawn_attacks(square: u8, color: Color) -> u64 {
    match color {
        Color::White => WHITE_PAWN_ATTACKS[square as usize],
        Color::Black => BLACK_PAWN_ATTACKS[square as usize],
    }
}
