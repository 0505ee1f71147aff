use crate::board::Board;
use crate::error::PerftError;
use crate::moves::execute::{generate_legal, make_move_basic, undo_move_basic};
use crate::moves::magic::MagicTables;
use crate::moves::square_control::in_check;
use crate::moves::types::Move;
use std::fmt;
use std::iter::Sum;
use std::ops::AddAssign;
use tracing::{debug, instrument};

/// Root splits deeper than this are only summarized in the log.
const MAX_LOG_DEPTH: u32 = 3;
pub const MAX_PERFT_DEPTH: usize = 20;

/// Per-edge tallies for a perft walk. Move tags count the last ply only;
/// `checks` and `checkmates` describe the leaf positions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounters {
    pub nodes: u64,
    pub captures: u64,
    pub ep_captures: u64,
    pub castles: u64,
    pub promotions: u64,
    pub checks: u64,
    pub checkmates: u64,
}

impl AddAssign for PerftCounters {
    fn add_assign(&mut self, o: PerftCounters) {
        self.nodes += o.nodes;
        self.captures += o.captures;
        self.ep_captures += o.ep_captures;
        self.castles += o.castles;
        self.promotions += o.promotions;
        self.checks += o.checks;
        self.checkmates += o.checkmates;
    }
}

impl Sum for PerftCounters {
    fn sum<I: Iterator<Item = PerftCounters>>(iter: I) -> Self {
        iter.fold(PerftCounters::default(), |mut acc, c| {
            acc += c;
            acc
        })
    }
}

/// One move list and one scratch list per ply, allocated once per walk.
struct PlyBuffers {
    moves: Vec<Vec<Move>>,
    pseudo: Vec<Vec<Move>>,
}

impl PlyBuffers {
    fn new(depth: u32) -> Self {
        let plies = depth as usize + 1;
        PlyBuffers {
            moves: (0..plies).map(|_| Vec::with_capacity(64)).collect(),
            pseudo: (0..plies).map(|_| Vec::with_capacity(256)).collect(),
        }
    }

    /// Generate legal moves at `ply` and return how many there are.
    fn fill(&mut self, board: &mut Board, tables: &MagicTables, ply: usize) -> usize {
        generate_legal(board, tables, &mut self.moves[ply], &mut self.pseudo[ply]);
        self.moves[ply].len()
    }
}

/// What a walk accumulates.
trait Tally: Default {
    /// Called once per leaf position.
    fn leaf(&mut self, board: &mut Board, tables: &MagicTables, bufs: &mut PlyBuffers, ply: usize);

    /// Called for every move that lands on a leaf.
    fn edge(&mut self, _mv: Move) {}

    /// Take the `leaves` one ply down without visiting them. Returns false
    /// when leaves must be visited.
    fn bulk(&mut self, _leaves: usize) -> bool {
        false
    }
}

impl Tally for u64 {
    fn leaf(&mut self, _: &mut Board, _: &MagicTables, _: &mut PlyBuffers, _: usize) {
        *self += 1;
    }

    fn bulk(&mut self, leaves: usize) -> bool {
        *self += leaves as u64;
        true
    }
}

impl Tally for PerftCounters {
    fn leaf(&mut self, board: &mut Board, tables: &MagicTables, bufs: &mut PlyBuffers, ply: usize) {
        self.nodes += 1;
        if in_check(board, board.side_to_move, tables) {
            self.checks += 1;
            if bufs.fill(board, tables, ply) == 0 {
                self.checkmates += 1;
            }
        }
    }

    fn edge(&mut self, mv: Move) {
        self.captures += u64::from(mv.is_capture());
        self.ep_captures += u64::from(mv.is_en_passant());
        self.castles += u64::from(mv.is_castling());
        self.promotions += u64::from(mv.is_promotion());
    }
}

fn check_depth(depth: u32) -> Result<(), PerftError> {
    if depth as usize > MAX_PERFT_DEPTH {
        return Err(PerftError::DepthLimit {
            depth,
            max: MAX_PERFT_DEPTH,
        });
    }
    Ok(())
}

fn walk<T: Tally>(
    board: &mut Board,
    tables: &MagicTables,
    depth: u32,
    ply: usize,
    bufs: &mut PlyBuffers,
    out: &mut T,
) {
    if depth == 0 {
        out.leaf(board, tables, bufs, ply);
        return;
    }

    let move_count = bufs.fill(board, tables, ply);
    if depth == 1 && out.bulk(move_count) {
        return;
    }

    for i in 0..move_count {
        let mv = bufs.moves[ply][i];
        if depth == 1 {
            out.edge(mv);
        }

        #[cfg(debug_assertions)]
        let key = board.zobrist;

        let undo = make_move_basic(board, mv);
        walk(board, tables, depth - 1, ply + 1, bufs, out);
        undo_move_basic(board, undo);

        #[cfg(debug_assertions)]
        debug_assert_eq!(board.zobrist, key, "zobrist changed across make/undo");
    }
}

fn total<T: Tally>(board: &mut Board, tables: &MagicTables, depth: u32) -> Result<T, PerftError> {
    check_depth(depth)?;
    let mut out = T::default();
    walk(board, tables, depth, 0, &mut PlyBuffers::new(depth), &mut out);
    Ok(out)
}

fn divide<T: Tally + fmt::Debug>(
    board: &mut Board,
    tables: &MagicTables,
    depth: u32,
) -> Result<Vec<(Move, T)>, PerftError> {
    check_depth(depth)?;
    if depth == 0 {
        return Ok(Vec::new());
    }

    let mut bufs = PlyBuffers::new(depth);
    let move_count = bufs.fill(board, tables, 0);
    let mut out = Vec::with_capacity(move_count);
    for i in 0..move_count {
        let mv = bufs.moves[0][i];
        let mut sub = T::default();
        if depth == 1 {
            sub.edge(mv);
        }
        let undo = make_move_basic(board, mv);
        walk(board, tables, depth - 1, 1, &mut bufs, &mut sub);
        undo_move_basic(board, undo);

        if depth <= MAX_LOG_DEPTH {
            debug!(%mv, tally = ?sub, "divide: root child");
        }
        out.push((mv, sub));
    }
    debug!(depth, moves = move_count, "divide: done");
    Ok(out)
}

/// Number of leaf nodes `depth` plies below `board`.
#[instrument(skip(board, tables), fields(depth))]
pub fn perft(board: &mut Board, tables: &MagicTables, depth: u32) -> Result<u64, PerftError> {
    total(board, tables, depth)
}

/// Leaf counts split by root move.
#[instrument(skip(board, tables), fields(depth))]
pub fn perft_divide(
    board: &mut Board,
    tables: &MagicTables,
    depth: u32,
) -> Result<Vec<(Move, u64)>, PerftError> {
    divide(board, tables, depth)
}

/// Perft with the standard breakdown columns at the final ply.
#[instrument(skip(board, tables), fields(depth))]
pub fn perft_count_with_breakdown(
    board: &mut Board,
    tables: &MagicTables,
    depth: u32,
) -> Result<PerftCounters, PerftError> {
    total(board, tables, depth)
}

/// Breakdown split by root move.
pub fn perft_divide_with_breakdown(
    board: &mut Board,
    tables: &MagicTables,
    depth: u32,
) -> Result<Vec<(Move, PerftCounters)>, PerftError> {
    divide(board, tables, depth)
}
