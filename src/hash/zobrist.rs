use crate::board::castle_bits::{CASTLE_CHARS, CastleBits};
use crate::board::{Board, Color, Piece};
use crate::moves::pawn::pawn_attacks;
use crate::square::Square;
use once_cell::sync::OnceCell;
use rand::{RngCore, SeedableRng, rngs::StdRng};

// Fixed so keys (and therefore repetition history) are reproducible across runs.
const ZOBRIST_SEED: u64 = 0x9E37_79B9_AAAC_5C87;

pub struct ZobristKeys {
    /// [color][piece][square] with {White=0, Black=1} and {P,N,B,R,Q,K}={0..5}
    piece: [[[u64; 64]; 6]; 2],
    side_to_move: u64,
    /// One key per right, in `KQkq` order.
    castling: [u64; 4],
    /// a..h => 0..7
    ep_file: [u64; 8],
}

impl ZobristKeys {
    #[inline(always)]
    pub fn piece(&self, color: Color, piece: Piece, sq: Square) -> u64 {
        self.piece[color as usize][piece as usize][sq.index() as usize]
    }

    #[inline(always)]
    pub fn side_to_move(&self) -> u64 {
        self.side_to_move
    }

    /// XOR of the keys of every right held in `rights`.
    #[inline]
    pub fn castling(&self, rights: CastleBits) -> u64 {
        CASTLE_CHARS
            .iter()
            .zip(self.castling)
            .filter(|((bit, _), _)| rights & bit != 0)
            .fold(0, |acc, (_, key)| acc ^ key)
    }

    #[inline(always)]
    pub fn ep_file(&self, file: u8) -> u64 {
        self.ep_file[file as usize]
    }
}

/// File of the en passant target when it belongs in the hash: only if a pawn
/// of the side to move could capture onto it (pins ignored).
pub fn hashed_ep_file(board: &Board) -> Option<u8> {
    let target = board.en_passant?;
    let us = board.side_to_move;
    // Our pawns attacking the target sit where an enemy pawn on it would attack.
    let capturers = pawn_attacks(target.index(), us.opposite()) & board.pieces(Piece::Pawn, us);
    (capturers != 0).then_some(target.file())
}

/// Hash contribution of the en passant target (0 when it does not count).
#[inline]
pub fn ep_key(board: &Board) -> u64 {
    hashed_ep_file(board).map_or(0, |file| zobrist_keys().ep_file(file))
}

/// Global keys, initialized on first use.
pub fn zobrist_keys() -> &'static ZobristKeys {
    static KEYS: OnceCell<ZobristKeys> = OnceCell::new();
    KEYS.get_or_init(|| generate_keys(&mut StdRng::seed_from_u64(ZOBRIST_SEED)))
}

fn generate_keys(rng: &mut StdRng) -> ZobristKeys {
    let mut draw = || loop {
        let v = rng.next_u64();
        if v != 0 {
            break v;
        }
    };

    let mut keys = ZobristKeys {
        piece: [[[0u64; 64]; 6]; 2],
        side_to_move: 0,
        castling: [0u64; 4],
        ep_file: [0u64; 8],
    };
    keys.piece
        .iter_mut()
        .flatten()
        .flatten()
        .for_each(|k| *k = draw());
    keys.castling.iter_mut().for_each(|k| *k = draw());
    keys.ep_file.iter_mut().for_each(|k| *k = draw());
    keys.side_to_move = draw();
    keys
}
