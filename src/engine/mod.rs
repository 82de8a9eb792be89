use crate::logic::board::{Board, PieceId, Square};
use crate::logic::game::GameSession;
use serde::{Deserialize, Serialize};

pub mod config;
pub mod eval;
pub mod search;
pub mod tt;
pub mod zobrist;


/// Value standing in for "forced mate" at the search horizon; plays the role
/// of infinity in the minimax bounds.
pub const SCORE_MATE: i32 = 1_000_000;
/// Stalemate outcome.
pub const SCORE_DRAW: i32 = 0;
/// Window edges strictly outside every reachable value.
pub const SCORE_BOUND: i32 = SCORE_MATE + 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpecialMove {
    #[default]
    None,
    CastleKingside,
    CastleQueenside,
    PromoteQueen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub piece: PieceId,
    pub from: Square,
    pub to: Square,
    pub special: SpecialMove,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum SearchLimit {
    /// Fixed ply depth.
    Depth(u8),
    /// Wall-clock budget in milliseconds, at the configured depth.
    Time(u64),
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SearchStats {
    pub depth: u8,
    pub nodes: u64,
    pub time_ms: u64,
}

/// Search verdict: the minimax value and the chosen move. `best` is `None`
/// when the side to move has no legal move at all, in which case `value` is
/// `-SCORE_MATE` (the searching side is mated), `SCORE_MATE` (the opponent
/// is mated) or `SCORE_DRAW` (stalemate).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SearchResult {
    pub value: i32,
    pub best: Option<Move>,
    pub stats: SearchStats,
}

pub trait Evaluator {
    /// Static evaluation, positive in White's favor.
    fn evaluate(&self, board: &Board) -> i32;
}

pub trait Searcher {
    fn search(&mut self, session: &GameSession, limit: SearchLimit) -> SearchResult;
}
