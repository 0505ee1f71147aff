mod fen;

use crate::bitboard::BitboardExt;
use crate::error::FenError;
use crate::hash::zobrist::{ep_key, zobrist_keys};
use crate::square::Square;
use std::fmt;
use std::str::FromStr;

pub mod castle_bits;
mod fen_tables;
pub use castle_bits::*;

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Piece on each file of the first rank in the starting position.
const HOME_RANK: [Piece; 8] = [
    Piece::Rook,
    Piece::Knight,
    Piece::Bishop,
    Piece::Queen,
    Piece::King,
    Piece::Bishop,
    Piece::Knight,
    Piece::Rook,
];

/// Which side is to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Color {
    White,
    Black,
}

/// Closed set of piece kinds; movement rules dispatch on this by `match`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Piece {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

/// Bitboard position plus the game-state fields that travel with it.
///
/// Piece placement is private: it only changes through `put`, `take` and
/// `relocate`, which keep bitboards, occupancy, the square table and the
/// Zobrist key in step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// [color][piece]
    pieces: [[u64; 6]; 2],
    /// [color]
    occupancy: [u64; 2],
    squares: [Option<(Color, Piece)>; 64],

    pub side_to_move: Color,
    /// `CASTLE_*` bits.
    pub castling_rights: CastleBits,
    /// Square passed over by the last double pawn push, for exactly one ply.
    pub en_passant: Option<Square>,
    pub halfmove_clock: u32,
    /// Starts at 1, bumped after Black moves.
    pub fullmove_number: u32,
    pub zobrist: u64,
    /// Keys of earlier positions since the last irreversible move.
    pub(crate) history: Vec<u64>,
}

impl Board {
    /// No pieces, White to move, no rights.
    pub fn new_empty() -> Self {
        // Nothing on the board and nothing hashed: the key is zero.
        Board {
            pieces: [[0; 6]; 2],
            occupancy: [0; 2],
            squares: [None; 64],
            side_to_move: Color::White,
            castling_rights: 0,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            zobrist: 0,
            history: Vec::new(),
        }
    }

    /// Standard starting position, White to move, full castling rights.
    pub fn new() -> Self {
        let mut b = Board::new_empty();
        for (file, &piece) in (0u8..).zip(HOME_RANK.iter()) {
            b.put(Color::White, piece, Square::from_file_rank(file, 0));
            b.put(Color::White, Piece::Pawn, Square::from_file_rank(file, 1));
            b.put(Color::Black, Piece::Pawn, Square::from_file_rank(file, 6));
            b.put(Color::Black, piece, Square::from_file_rank(file, 7));
        }
        b.set_castling_rights(CASTLE_ALL);
        b
    }

    /// Place a piece on an empty square.
    #[inline]
    pub(crate) fn put(&mut self, color: Color, piece: Piece, sq: Square) {
        debug_assert!(self.squares[sq.index() as usize].is_none(), "{sq} is occupied");
        self.toggle(color, piece, sq);
        self.squares[sq.index() as usize] = Some((color, piece));
    }

    /// Lift whatever stands on `sq`.
    #[inline]
    pub(crate) fn take(&mut self, sq: Square) -> Option<(Color, Piece)> {
        let lifted = self.squares[sq.index() as usize].take();
        if let Some((color, piece)) = lifted {
            self.toggle(color, piece, sq);
        }
        lifted
    }

    /// Move the piece on `from` to the empty square `to`.
    #[inline]
    pub(crate) fn relocate(&mut self, from: Square, to: Square) {
        if let Some((color, piece)) = self.take(from) {
            self.put(color, piece, to);
        }
    }

    #[inline(always)]
    fn toggle(&mut self, color: Color, piece: Piece, sq: Square) {
        let bit = sq.bb();
        self.pieces[color as usize][piece as usize] ^= bit;
        self.occupancy[color as usize] ^= bit;
        self.zobrist ^= zobrist_keys().piece(color, piece, sq);
    }

    /// Replace the rights mask, keeping the key in step.
    #[inline]
    pub(crate) fn set_castling_rights(&mut self, rights: CastleBits) {
        let keys = zobrist_keys();
        self.zobrist ^= keys.castling(self.castling_rights) ^ keys.castling(rights);
        self.castling_rights = rights;
    }

    /// Hand the move to the other side, keeping the key in step.
    #[inline]
    pub(crate) fn pass_turn(&mut self) {
        self.side_to_move = self.side_to_move.opposite();
        self.zobrist ^= zobrist_keys().side_to_move();
    }

    /// Bitboard of all pieces (both colors).
    #[inline(always)]
    pub fn occupied(&self) -> u64 {
        self.occupancy[0] | self.occupancy[1]
    }

    /// Bitboard of all pieces for one side.
    #[inline(always)]
    pub fn occupancy(&self, color: Color) -> u64 {
        self.occupancy[color as usize]
    }

    #[inline(always)]
    pub fn pieces(&self, piece: Piece, color: Color) -> u64 {
        self.pieces[color as usize][piece as usize]
    }

    #[inline(always)]
    pub fn piece_at(&self, sq: Square) -> Option<(Color, Piece)> {
        self.squares[sq.index() as usize]
    }

    #[inline(always)]
    pub fn has_castling(&self, flag: CastleBits) -> bool {
        self.castling_rights & flag != 0
    }

    pub fn has_kingside_castle(&self, color: Color) -> bool {
        routes_for(color).next().is_some_and(|r| self.has_castling(r.right))
    }

    pub fn has_queenside_castle(&self, color: Color) -> bool {
        routes_for(color).nth(1).is_some_and(|r| self.has_castling(r.right))
    }

    /// Square of `color`'s king. Every board reachable through FEN loading or
    /// legal play has exactly one king per side.
    #[inline(always)]
    pub fn king_square(&self, color: Color) -> Square {
        let king_bb = self.pieces(Piece::King, color);
        debug_assert!(king_bb.popcount() == 1, "expected one {color:?} king");
        Square::from_index(king_bb.lsb() & 63)
    }

    /// Key computed from scratch. Always equal to `zobrist`.
    pub fn compute_zobrist_full(&self) -> u64 {
        let keys = zobrist_keys();
        let placement = (0u8..64)
            .map(Square::from_index)
            .filter_map(|sq| {
                self.piece_at(sq)
                    .map(|(color, piece)| keys.piece(color, piece, sq))
            })
            .fold(0, |acc, key| acc ^ key);
        let side = match self.side_to_move {
            Color::White => 0,
            Color::Black => keys.side_to_move(),
        };
        placement ^ side ^ keys.castling(self.castling_rights) ^ ep_key(self)
    }

    /// Key recomputed after a wholesale edit such as a FEN load.
    fn rehash(&mut self) {
        self.zobrist = self.compute_zobrist_full();
    }

    /// Keys of the earlier positions that can still repeat, oldest first.
    pub fn history(&self) -> &[u64] {
        &self.history
    }

    /// Occurrences of the current position, itself included.
    pub fn repetition_count(&self) -> u8 {
        let earlier = self.history.iter().filter(|&&k| k == self.zobrist).count();
        u8::try_from(earlier).unwrap_or(u8::MAX - 1).saturating_add(1)
    }

    pub fn is_threefold(&self) -> bool {
        self.repetition_count() >= 3
    }

    #[cfg(debug_assertions)]
    #[inline]
    pub fn assert_hash(&self) {
        let full = self.compute_zobrist_full();
        debug_assert_eq!(
            self.zobrist, full,
            "Zobrist parity mismatch: stored={:#018x}, full={:#018x}",
            self.zobrist, full
        );
    }
}

impl Color {
    pub fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Color::White => "white",
            Color::Black => "black",
        }
    }
}

impl Piece {
    /// Lowercase promotion letter used in coordinate notation.
    pub fn promotion_char(self) -> Option<char> {
        match self {
            Piece::Queen => Some('q'),
            Piece::Rook => Some('r'),
            Piece::Bishop => Some('b'),
            Piece::Knight => Some('n'),
            Piece::Pawn | Piece::King => None,
        }
    }

    pub fn from_promotion_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'q' => Some(Piece::Queen),
            'r' => Some(Piece::Rook),
            'b' => Some(Piece::Bishop),
            'n' => Some(Piece::Knight),
            _ => None,
        }
    }
}

/// An empty board with White to move.
impl Default for Board {
    fn default() -> Self {
        Board::new_empty()
    }
}

impl FromStr for Board {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut board = Board::new_empty();
        board.set_fen(s)?;
        Ok(board)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !f.alternate() {
            return f.write_str(&self.to_fen());
        }
        // Diagram, rank 8 at the top.
        for rank in (0..8u8).rev() {
            for file in 0..8u8 {
                let glyph = self
                    .piece_at(Square::from_file_rank(file, rank))
                    .map_or('.', |(c, p)| fen_tables::glyph(p, c));
                write!(f, "{glyph} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
