use super::fen_tables::{glyph, lookup};
use super::{Board, CASTLE_CHARS, CASTLE_ROUTES, CastleBits, Color, Piece};
use crate::error::FenError;
use crate::square::Square;
use std::str::FromStr;

const BACK_RANKS: u64 = 0xFF00_0000_0000_00FF;

impl Board {
    /// Replace the whole state with the position described by `fen`.
    ///
    /// The two clock fields are optional. On error `self` is left untouched.
    pub fn set_fen(&mut self, fen: &str) -> Result<(), FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 4 && fields.len() != 6 {
            return Err(FenError::FieldCount(fields.len()));
        }

        let mut b = Board::new_empty();
        parse_placement(&mut b, fields[0])?;

        b.side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::SideToMove(other.to_string())),
        };

        // Rights only survive when king and rook are still on their home squares.
        let claimed = parse_castling(fields[2])?;
        b.castling_rights = CASTLE_ROUTES
            .iter()
            .filter(|r| claimed & r.right != 0)
            .filter(|r| b.piece_at(Square::from_index(r.king_from)) == Some((r.color, Piece::King)))
            .filter(|r| b.piece_at(Square::from_index(r.rook_from)) == Some((r.color, Piece::Rook)))
            .fold(0, |acc, r| acc | r.right);

        b.en_passant = match fields[3] {
            "-" => None,
            txt => {
                let sq = Square::from_str(txt).map_err(|_| FenError::EnPassant(txt.to_string()))?;
                let expected_rank = match b.side_to_move {
                    Color::White => 5,
                    Color::Black => 2,
                };
                if sq.rank() != expected_rank {
                    return Err(FenError::EnPassant(txt.to_string()));
                }
                Some(sq)
            }
        };

        if fields.len() == 6 {
            b.halfmove_clock = fields[4]
                .parse()
                .map_err(|_| FenError::Clock(fields[4].to_string()))?;
            b.fullmove_number = fields[5]
                .parse()
                .map_err(|_| FenError::Clock(fields[5].to_string()))?;
            if b.fullmove_number == 0 {
                return Err(FenError::Clock(fields[5].to_string()));
            }
        }

        b.rehash();
        *self = b;
        Ok(())
    }

    /// Serialize to a six-field FEN string.
    pub fn to_fen(&self) -> String {
        let mut out = String::with_capacity(90);

        for rank in (0..8u8).rev() {
            let mut empty = 0;
            for file in 0..8u8 {
                match self.piece_at(Square::from_file_rank(file, rank)) {
                    Some((color, piece)) => {
                        if empty > 0 {
                            out.push(char::from(b'0' + empty));
                            empty = 0;
                        }
                        out.push(glyph(piece, color));
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push(char::from(b'0' + empty));
            }
            if rank > 0 {
                out.push('/');
            }
        }

        out.push(' ');
        out.push(match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        });

        out.push(' ');
        if self.castling_rights == 0 {
            out.push('-');
        } else {
            for (bit, c) in CASTLE_CHARS {
                if self.has_castling(bit) {
                    out.push(c);
                }
            }
        }

        out.push(' ');
        match self.en_passant {
            Some(sq) => out.push_str(&sq.to_string()),
            None => out.push('-'),
        }

        out.push_str(&format!(
            " {} {}",
            self.halfmove_clock, self.fullmove_number
        ));
        out
    }
}

fn parse_placement(b: &mut Board, placement: &str) -> Result<(), FenError> {
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::Placement(format!(
            "expected 8 ranks, got {}",
            ranks.len()
        )));
    }

    for (i, rank_txt) in ranks.iter().enumerate() {
        let rank = 7 - i as u8;
        let mut file: u8 = 0;
        for c in rank_txt.chars() {
            if let Some(skip) = c.to_digit(10) {
                if !(1..=8).contains(&skip) {
                    return Err(FenError::Placement(format!("bad run length `{c}`")));
                }
                file += skip as u8;
            } else {
                let (piece, color) =
                    lookup(c).ok_or_else(|| FenError::Placement(format!("bad piece `{c}`")))?;
                if file > 7 {
                    return Err(FenError::Placement(format!("rank {} too long", rank + 1)));
                }
                b.put(color, piece, Square::from_file_rank(file, rank));
                file += 1;
            }
            if file > 8 {
                return Err(FenError::Placement(format!("rank {} too long", rank + 1)));
            }
        }
        if file != 8 {
            return Err(FenError::Placement(format!("rank {} too short", rank + 1)));
        }
    }

    for color in [Color::White, Color::Black] {
        let count = b.pieces(Piece::King, color).count_ones();
        if count != 1 {
            return Err(FenError::KingCount {
                color: color.name(),
                count,
            });
        }
    }

    let pawns = b.pieces(Piece::Pawn, Color::White) | b.pieces(Piece::Pawn, Color::Black);
    if pawns & BACK_RANKS != 0 {
        return Err(FenError::Placement("pawn on first or last rank".to_string()));
    }

    Ok(())
}

fn parse_castling(field: &str) -> Result<CastleBits, FenError> {
    if field == "-" {
        return Ok(0);
    }
    let mut rights = 0;
    for c in field.chars() {
        let (bit, _) = CASTLE_CHARS
            .iter()
            .find(|&&(_, letter)| letter == c)
            .ok_or_else(|| FenError::Castling(field.to_string()))?;
        rights |= bit;
    }
    Ok(rights)
}
