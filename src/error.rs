use thiserror::Error;

/// Coordinate-notation failures. Never fatal: they surface as an invalid
/// `MoveDescriptor` so batch replays keep going.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("expected 4 or 5 characters, got {0}")]
    Length(usize),
    #[error("invalid square `{0}`")]
    Square(String),
    #[error("square index {0} is off the board")]
    SquareIndex(u8),
    #[error("invalid promotion piece `{0}`")]
    Promotion(char),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    #[error("expected 4 or 6 fields, got {0}")]
    FieldCount(usize),
    #[error("bad piece placement: {0}")]
    Placement(String),
    #[error("bad side to move `{0}`")]
    SideToMove(String),
    #[error("bad castling field `{0}`")]
    Castling(String),
    #[error("bad en passant field `{0}`")]
    EnPassant(String),
    #[error("bad move clock `{0}`")]
    Clock(String),
    #[error("{color} has {count} kings")]
    KingCount { color: &'static str, count: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PositionError {
    #[error("illegal move `{notation}`")]
    IllegalMove { notation: String },
    #[error("no move to undo")]
    NoHistory,
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Fen(#[from] FenError),
}

#[derive(Debug, Error)]
pub enum TableCacheError {
    #[error("magic table cache I/O: {0}")]
    Io(#[from] std::io::Error),
    #[error("magic table cache encoding: {0}")]
    Encoding(#[from] bincode::Error),
    #[error("magic table cache holds {0} entries, expected 64")]
    Shape(usize),
    #[error("magic table cache entry {square} has {len} slots for shift {shift}")]
    Slots { square: usize, shift: u32, len: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PerftError {
    #[error("perft depth {depth} exceeds the limit of {max}")]
    DepthLimit { depth: u32, max: usize },
}
