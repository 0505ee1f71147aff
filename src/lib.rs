pub mod bitboard;
pub mod board;
pub mod error;
pub mod hash;
#[cfg(feature = "cli")]
pub mod logger;
pub mod moves;
pub mod position;
pub mod replay;
pub mod square;
pub mod status;
pub mod utils;

pub use error::{FenError, ParseError, PositionError};
pub use moves::types::Move;
pub use position::{MoveDescriptor, Position};
pub use status::GameStatus;
