use super::king::build_leaper_table;

/// Knight attack masks indexed by square (a1 = 0).
pub const KNIGHT_ATTACKS: [u64; 64] = build_leaper_table(&[
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
]);
