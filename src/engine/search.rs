use crate::engine::config::EngineConfig;
use crate::engine::eval::MaterialEvaluator;
use crate::engine::tt::{TTFlag, TranspositionTable};
use crate::engine::{
    Evaluator, Move, SearchLimit, SearchResult, SearchStats, Searcher, SCORE_BOUND, SCORE_DRAW,
    SCORE_MATE,
};
use crate::logic::board::{Board, Color};
use crate::logic::game::GameSession;
use crate::logic::generator::MoveGenerator;
use crate::logic::rules;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Depth-limited minimax with alpha-beta pruning over the shared board.
///
/// The engine clones the session's board once per search and then explores
/// the move tree by applying and reverting moves on that single instance.
/// Values are signed from the searching side's perspective: the side to move
/// at the root is the maximizing player.
pub struct AlphaBetaEngine {
    config: Arc<EngineConfig>,
    evaluator: MaterialEvaluator,
    generator: MoveGenerator,
    tt: TranspositionTable,
    engine_color: Color,
    last_color: Option<Color>,
    nodes: u64,
    started: Instant,
    deadline: Option<Duration>,
    aborted: bool,
}

impl AlphaBetaEngine {
    #[must_use]
    pub fn new(config: Arc<EngineConfig>) -> Self {
        let tt = TranspositionTable::new(config.tt_size_mb);
        Self {
            config,
            evaluator: MaterialEvaluator::new(),
            generator: MoveGenerator::new(),
            tt,
            engine_color: Color::White,
            last_color: None,
            nodes: 0,
            started: Instant::now(),
            deadline: None,
            aborted: false,
        }
    }

    /// Swaps in a new configuration; the memoization table is rebuilt only
    /// when its size changed.
    pub fn update_config(&mut self, config: Arc<EngineConfig>) {
        if config.tt_size_mb != self.config.tt_size_mb {
            self.tt = TranspositionTable::new(config.tt_size_mb);
        }
        self.config = config;
    }

    fn evaluate(&self, board: &Board) -> i32 {
        self.engine_color.sign() * self.evaluator.evaluate(board)
    }

    /// Budget check between recursive calls. The wall clock is sampled every
    /// 1024 nodes.
    fn out_of_budget(&mut self) -> bool {
        if self.aborted {
            return true;
        }
        if let Some(max_nodes) = self.config.max_nodes {
            if self.nodes > max_nodes {
                self.aborted = true;
                return true;
            }
        }
        if let Some(deadline) = self.deadline {
            if self.nodes % 1024 == 0 && self.started.elapsed() >= deadline {
                self.aborted = true;
                return true;
            }
        }
        false
    }

    /// One minimax node. Returns the value of the position at the given
    /// remaining depth together with the move realizing it; the move is
    /// `None` at the horizon and in positions without a legal move.
    ///
    /// Among equal-valued moves the first in enumeration order wins, so the
    /// result is deterministic for a fixed position and depth.
    pub fn minimax(
        &mut self,
        board: &mut Board,
        depth: u8,
        alpha: i32,
        beta: i32,
        maximizing: bool,
    ) -> (i32, Option<Move>) {
        self.nodes += 1;
        if self.out_of_budget() {
            return (self.evaluate(board), None);
        }
        if depth == 0 {
            return (self.evaluate(board), None);
        }

        let key = board.zobrist();
        if self.config.use_memo {
            if let Some((score, best)) = self.tt.probe(key, depth, alpha, beta) {
                return (score, best);
            }
        }

        let side = if maximizing {
            self.engine_color
        } else {
            self.engine_color.opposite()
        };
        let moves = self.generator.legal_moves(board, side);

        // No legal move ends the game here: checkmate if the king is
        // attacked, stalemate otherwise.
        if moves.is_empty() {
            let value = if rules::is_in_check(board, side) {
                if maximizing {
                    -SCORE_MATE
                } else {
                    SCORE_MATE
                }
            } else {
                SCORE_DRAW
            };
            return (value, None);
        }

        let alpha_orig = alpha;
        let beta_orig = beta;
        let mut alpha = alpha;
        let mut beta = beta;
        let mut best_value = if maximizing { -SCORE_BOUND } else { SCORE_BOUND };
        let mut best_move = None;

        for mv in &moves {
            let undo = board.apply_move(mv);
            let (value, _) = self.minimax(board, depth - 1, alpha, beta, !maximizing);
            board.undo_move(undo);

            if maximizing {
                if value > best_value {
                    best_value = value;
                    best_move = Some(*mv);
                }
                alpha = alpha.max(best_value);
            } else {
                if value < best_value {
                    best_value = value;
                    best_move = Some(*mv);
                }
                beta = beta.min(best_value);
            }

            if self.aborted {
                break;
            }
            if alpha >= beta {
                break;
            }
        }

        if self.config.use_memo && !self.aborted {
            let flag = if best_value <= alpha_orig {
                TTFlag::UpperBound
            } else if best_value >= beta_orig {
                TTFlag::LowerBound
            } else {
                TTFlag::Exact
            };
            self.tt.store(key, depth, best_value, flag, best_move);
        }

        (best_value, best_move)
    }
}

impl Searcher for AlphaBetaEngine {
    #[allow(clippy::cast_possible_truncation)]
    fn search(&mut self, session: &GameSession, limit: SearchLimit) -> SearchResult {
        self.nodes = 0;
        self.aborted = false;
        self.started = Instant::now();
        self.engine_color = session.turn;

        // Cached values are signed toward the searching side; a table built
        // for the other color would answer with the wrong sign.
        if self.last_color != Some(session.turn) {
            self.tt.clear();
        }
        self.last_color = Some(session.turn);

        let depth = match limit {
            SearchLimit::Depth(d) => {
                self.deadline = None;
                d
            }
            SearchLimit::Time(ms) => {
                self.deadline = Some(Duration::from_millis(ms));
                self.config.search_depth
            }
        };

        let mut board = session.board.clone();
        let (value, best) = self.minimax(&mut board, depth, -SCORE_BOUND, SCORE_BOUND, true);
        debug_assert_eq!(board, session.board, "search left the board mutated");

        let stats = SearchStats {
            depth,
            nodes: self.nodes,
            time_ms: self.started.elapsed().as_millis() as u64,
        };
        log::debug!(
            "search for {:?}: depth {} nodes {} time {}ms value {} aborted {}",
            session.turn,
            stats.depth,
            stats.nodes,
            stats.time_ms,
            value,
            self.aborted,
        );

        SearchResult { value, best, stats }
    }
}
