use super::Color;

/// Underlying bit type for castling rights.
pub type CastleBits = u8;

pub const CASTLE_WK: CastleBits = 0b0001;
pub const CASTLE_WQ: CastleBits = 0b0010;
pub const CASTLE_BK: CastleBits = 0b0100;
pub const CASTLE_BQ: CastleBits = 0b1000;
pub const CASTLE_ALL: CastleBits = CASTLE_WK | CASTLE_WQ | CASTLE_BK | CASTLE_BQ;

/// FEN letter for each right, in `KQkq` order.
pub const CASTLE_CHARS: [(CastleBits, char); 4] = [
    (CASTLE_WK, 'K'),
    (CASTLE_WQ, 'Q'),
    (CASTLE_BK, 'k'),
    (CASTLE_BQ, 'q'),
];

/// Fixed geometry of one castling move. Square fields are indices (a1 = 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastleRoute {
    pub right: CastleBits,
    pub color: Color,
    pub king_from: u8,
    pub king_to: u8,
    pub rook_from: u8,
    pub rook_to: u8,
    /// Squares strictly between king and rook; all must be empty.
    pub between: u64,
    /// Squares the king starts on, crosses and lands on; none may be attacked.
    pub king_path: u64,
}

const fn route(
    right: CastleBits,
    color: Color,
    king_from: u8,
    king_to: u8,
    rook_from: u8,
    rook_to: u8,
) -> CastleRoute {
    let (lo, hi) = if king_from < rook_from {
        (king_from, rook_from)
    } else {
        (rook_from, king_from)
    };
    let (path_lo, path_hi) = if king_from < king_to {
        (king_from, king_to)
    } else {
        (king_to, king_from)
    };
    CastleRoute {
        right,
        color,
        king_from,
        king_to,
        rook_from,
        rook_to,
        between: span(lo + 1, hi - 1),
        king_path: span(path_lo, path_hi),
    }
}

/// Bits `lo..=hi` on one rank.
const fn span(lo: u8, hi: u8) -> u64 {
    let mut bb = 0u64;
    let mut sq = lo;
    while sq <= hi {
        bb |= 1u64 << sq;
        sq += 1;
    }
    bb
}

/// The four castling moves, in `KQkq` order.
pub const CASTLE_ROUTES: [CastleRoute; 4] = [
    route(CASTLE_WK, Color::White, 4, 6, 7, 5),
    route(CASTLE_WQ, Color::White, 4, 2, 0, 3),
    route(CASTLE_BK, Color::Black, 60, 62, 63, 61),
    route(CASTLE_BQ, Color::Black, 60, 58, 56, 59),
];

/// Route whose king lands on `king_to`, if any.
#[inline]
pub fn castle_route(king_to: u8) -> Option<&'static CastleRoute> {
    CASTLE_ROUTES.iter().find(|r| r.king_to == king_to)
}

/// Routes available to `color`, kingside first.
#[inline]
pub fn routes_for(color: Color) -> impl Iterator<Item = &'static CastleRoute> {
    CASTLE_ROUTES.iter().filter(move |r| r.color == color)
}

/// Rights lost once anything leaves or lands on a square: king and rook
/// home squares revoke their rights, every other square revokes nothing.
pub const RIGHTS_LOST_AT: [CastleBits; 64] = {
    let mut table = [0; 64];
    let mut i = 0;
    while i < CASTLE_ROUTES.len() {
        let r = &CASTLE_ROUTES[i];
        table[r.king_from as usize] |= r.right;
        table[r.rook_from as usize] |= r.right;
        i += 1;
    }
    table
};
