//! Replays games printed by an engine under test, one game per line of
//! whitespace-separated coordinate moves.

use crate::error::PositionError;
use crate::moves::types::Move;
use crate::position::Position;
use crate::status::GameStatus;
use std::io::{self, BufRead};
use tracing::{debug, info, instrument};

/// The first move of a game that could not be played.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayFailure {
    /// 1-based index of the move within the game.
    pub ply: usize,
    pub notation: String,
    pub error: PositionError,
}

/// One replayed game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameReplay {
    /// 1-based line number in the source stream.
    pub line: usize,
    /// Move tokens as they appeared, empty tokens removed.
    pub tokens: Vec<String>,
    /// Moves played before the first failure, with computed flags.
    pub moves: Vec<Move>,
    pub failure: Option<ReplayFailure>,
    pub final_fen: String,
    pub status: GameStatus,
}

impl GameReplay {
    pub fn is_ok(&self) -> bool {
        self.failure.is_none()
    }

    /// The original move list, space separated.
    pub fn move_text(&self) -> String {
        self.tokens.join(" ")
    }
}

/// Replay a single game from the starting position, stopping at the first
/// move that does not parse or is not legal.
pub fn replay_line(line: &str) -> GameReplay {
    replay_numbered(1, line)
}

fn replay_numbered(line_no: usize, line: &str) -> GameReplay {
    let tokens: Vec<String> = line.split_whitespace().map(str::to_string).collect();
    let mut pos = Position::new();
    let mut moves = Vec::with_capacity(tokens.len());
    let mut failure = None;

    for (i, token) in tokens.iter().enumerate() {
        match pos.play(token) {
            Ok(mv) => moves.push(mv),
            Err(error) => {
                debug!(line = line_no, ply = i + 1, %token, %error, "replay stopped");
                failure = Some(ReplayFailure {
                    ply: i + 1,
                    notation: token.clone(),
                    error,
                });
                break;
            }
        }
    }

    GameReplay {
        line: line_no,
        tokens,
        moves,
        failure,
        final_fen: pos.to_fen(),
        status: pos.status(),
    }
}

/// Results of replaying a whole stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplayReport {
    pub games: Vec<GameReplay>,
}

impl ReplayReport {
    pub fn failures(&self) -> impl Iterator<Item = &GameReplay> {
        self.games.iter().filter(|g| !g.is_ok())
    }

    pub fn game_count(&self) -> usize {
        self.games.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    pub fn passed_count(&self) -> usize {
        self.game_count() - self.failure_count()
    }
}

/// Replay every non-empty line of `reader`. A failing game never stops the
/// others; only read errors end the stream early. Bytes that are not UTF-8
/// are replaced, so a garbled line fails as a game instead.
pub fn replay_stream<R: BufRead>(reader: R) -> io::Result<ReplayReport> {
    replay_stream_with(reader, |_| {})
}

/// [`replay_stream`] with a callback after each game, for progress display.
#[instrument(skip_all)]
pub fn replay_stream_with<R, F>(mut reader: R, mut on_game: F) -> io::Result<ReplayReport>
where
    R: BufRead,
    F: FnMut(&GameReplay),
{
    let mut report = ReplayReport::default();
    let mut buf = Vec::new();
    let mut line_no = 0;
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_no += 1;
        let line = String::from_utf8_lossy(&buf);
        if line.trim().is_empty() {
            continue;
        }
        let game = replay_numbered(line_no, &line);
        on_game(&game);
        report.games.push(game);
    }

    info!(
        games = report.game_count(),
        failed = report.failure_count(),
        "replay finished"
    );
    Ok(report)
}
