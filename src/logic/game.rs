use crate::engine::{Move, SpecialMove};
use crate::logic::board::{Board, Color, PieceId, PieceKind, Square, SquareSet};
use crate::logic::generator::MoveGenerator;
use crate::logic::rules::{self, MoveError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Playing,
    /// Winner color.
    Checkmate(Color),
    Stalemate,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MoveRecord {
    pub mv: Move,
    pub kind: PieceKind,
    pub color: Color,
    pub captured: Option<PieceKind>,
}

/// Promotion bookkeeping for the presentation layer: which handle to retire
/// and which to adopt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionReport {
    pub queen: PieceId,
    pub pawn: PieceId,
}

/// Everything the caller needs after a successfully applied move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOutcome {
    pub mv: Move,
    pub captured: Option<PieceId>,
    pub promotion: Option<PromotionReport>,
    /// Color whose king is attacked after the move, if any.
    pub check: Option<Color>,
    pub status: GameStatus,
}

/// Explicit game context: whose turn it is and how the game stands, threaded
/// through the caller's turn loop instead of living in globals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSession {
    pub board: Board,
    pub turn: Color,
    pub status: GameStatus,
    pub last_move: Option<(Square, Square)>,
    pub history: Vec<MoveRecord>,
    #[serde(skip)]
    generator: MoveGenerator,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    #[must_use]
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            turn: Color::White,
            status: GameStatus::Playing,
            last_move: None,
            history: Vec::new(),
            generator: MoveGenerator::new(),
        }
    }

    /// Session over a hand-built position. The status is evaluated
    /// immediately, so a dead position is reported as such up front.
    #[must_use]
    pub fn from_board(board: Board, turn: Color) -> Self {
        let mut session = Self {
            board,
            turn,
            status: GameStatus::Playing,
            last_move: None,
            history: Vec::new(),
            generator: MoveGenerator::new(),
        };
        session.update_status();
        session
    }

    #[must_use]
    pub fn in_check(&self, color: Color) -> bool {
        rules::is_in_check(&self.board, color)
    }

    /// Destinations consistent with the selected piece's movement pattern,
    /// for the caller's highlighting. Self-check filtering happens later, in
    /// `make_move`, so a rejected candidate can be reported distinctly.
    pub fn pseudo_legal_destinations(&self, from: Square) -> Result<SquareSet, MoveError> {
        if self.status != GameStatus::Playing {
            return Err(MoveError::GameOver);
        }
        let id = self.board.piece_at(from).ok_or(MoveError::NoPieceAtSource)?;
        let piece = self.board.piece(id);
        if piece.color != self.turn {
            return Err(MoveError::NotYourTurn);
        }
        Ok(rules::pseudo_legal_moves(&self.board, piece, false))
    }

    /// Castling destinations for the side to move.
    #[must_use]
    pub fn special_destinations(&self) -> Vec<(Square, SpecialMove)> {
        self.generator.special_moves(&self.board, self.turn)
    }

    /// Validates and applies one move for the side to move.
    ///
    /// Rejections leave the session untouched: selection errors surface as
    /// `NoPieceAtSource`/`NotYourTurn`, unreachable destinations as
    /// `IllegalDestination`, and pseudo-legal candidates that expose the
    /// king as `SelfCheck` (the caller can distinguish "would put you in
    /// check" from "you must escape check" via `in_check` beforehand).
    pub fn make_move(&mut self, from: Square, to: Square) -> Result<MoveOutcome, MoveError> {
        if self.status != GameStatus::Playing {
            return Err(MoveError::GameOver);
        }
        let id = self.board.piece_at(from).ok_or(MoveError::NoPieceAtSource)?;
        let piece = *self.board.piece(id);
        if piece.color != self.turn {
            return Err(MoveError::NotYourTurn);
        }

        let dests = rules::pseudo_legal_moves(&self.board, &piece, false);
        let mv = if dests & to.bit() != 0 {
            let special = if piece.kind == PieceKind::Pawn
                && to.row == self.turn.promotion_rank()
            {
                SpecialMove::PromoteQueen
            } else {
                SpecialMove::None
            };
            let mv = Move {
                piece: id,
                from,
                to,
                special,
            };
            if !self.generator.is_legal(&mut self.board, &mv) {
                return Err(MoveError::SelfCheck);
            }
            mv
        } else if let Some((_, special)) = self
            .generator
            .special_moves(&self.board, self.turn)
            .into_iter()
            .find(|&(landing, _)| landing == to)
        {
            // A castling destination is only meaningful for the king itself.
            if piece.kind != PieceKind::King {
                return Err(MoveError::IllegalDestination);
            }
            Move {
                piece: id,
                from,
                to,
                special,
            }
        } else {
            return Err(MoveError::IllegalDestination);
        };

        let undo = self.board.apply_move(&mv);
        self.history.push(MoveRecord {
            mv,
            kind: piece.kind,
            color: piece.color,
            captured: undo.captured.map(|cap| self.board.piece(cap).kind),
        });
        self.last_move = Some((from, to));
        self.turn = self.turn.opposite();
        self.update_status();

        Ok(MoveOutcome {
            mv,
            captured: undo.captured,
            promotion: undo.promoted.map(|queen| PromotionReport { queen, pawn: id }),
            check: self.in_check(self.turn).then_some(self.turn),
            status: self.status,
        })
    }

    /// After a move the side to move may be out of options: with its king
    /// attacked that is checkmate, otherwise stalemate.
    fn update_status(&mut self) {
        let side = self.turn;
        if self.generator.has_legal_moves(&mut self.board, side) {
            return;
        }
        if rules::is_in_check(&self.board, side) {
            self.status = GameStatus::Checkmate(side.opposite());
            log::info!("checkmate, {:?} wins", side.opposite());
        } else {
            self.status = GameStatus::Stalemate;
            log::info!("stalemate");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::logic::board::PieceKind;

    fn sq(row: u8, col: u8) -> Square {
        Square::new(row, col).unwrap()
    }

    #[test]
    fn test_selection_errors() {
        let mut session = GameSession::new();

        // Empty square.
        assert_eq!(
            session.make_move(sq(4, 4), sq(3, 4)),
            Err(MoveError::NoPieceAtSource)
        );
        // Opponent piece while it is White's turn.
        assert_eq!(
            session.make_move(sq(1, 4), sq(2, 4)),
            Err(MoveError::NotYourTurn)
        );
        // Own pawn, unreachable destination.
        assert_eq!(
            session.make_move(sq(6, 4), sq(3, 4)),
            Err(MoveError::IllegalDestination)
        );
    }

    #[test]
    fn test_self_check_rejected_and_board_untouched() {
        let mut board = Board::empty();
        board.add_piece(sq(7, 4), PieceKind::King, Color::White);
        board.add_piece(sq(6, 4), PieceKind::Rook, Color::White);
        board.add_piece(sq(0, 4), PieceKind::Rook, Color::Black);
        board.add_piece(sq(0, 7), PieceKind::King, Color::Black);

        let mut session = GameSession::from_board(board, Color::White);
        let before = session.board.clone();

        assert_eq!(
            session.make_move(sq(6, 4), sq(6, 0)),
            Err(MoveError::SelfCheck)
        );
        assert_eq!(session.board, before);
        assert_eq!(session.turn, Color::White);
    }

    #[test]
    fn test_pawn_capture_reports_and_scores() {
        let mut board = Board::empty();
        board.add_piece(sq(7, 4), PieceKind::King, Color::White);
        board.add_piece(sq(0, 4), PieceKind::King, Color::Black);
        board.add_piece(sq(6, 4), PieceKind::Pawn, Color::White);
        let knight_sq = sq(5, 3);
        let knight = board.add_piece(knight_sq, PieceKind::Knight, Color::Black);

        let mut session = GameSession::from_board(board, Color::White);
        let outcome = session.make_move(sq(6, 4), knight_sq).unwrap();

        assert_eq!(outcome.captured, Some(knight));
        assert!(!session.board.piece(knight).alive);
        assert_eq!(session.board.material_score(), 100);
        assert_eq!(session.turn, Color::Black);
        assert_eq!(session.history.len(), 1);
        assert_eq!(session.history[0].captured, Some(PieceKind::Knight));
    }

    #[test]
    fn test_fools_mate_ends_the_game() {
        let mut session = GameSession::new();

        session.make_move(sq(6, 5), sq(5, 5)).unwrap(); // f2 f3
        session.make_move(sq(1, 4), sq(3, 4)).unwrap(); // e7 e5
        session.make_move(sq(6, 6), sq(4, 6)).unwrap(); // g2 g4
        let outcome = session.make_move(sq(0, 3), sq(4, 7)).unwrap(); // Qd8 h4#

        assert_eq!(outcome.check, Some(Color::White));
        assert_eq!(outcome.status, GameStatus::Checkmate(Color::Black));
        assert_eq!(session.status, GameStatus::Checkmate(Color::Black));

        // Terminal sessions refuse further input.
        assert_eq!(
            session.make_move(sq(6, 0), sq(5, 0)),
            Err(MoveError::GameOver)
        );
    }

    #[test]
    fn test_stalemate_is_distinguished_from_checkmate() {
        let mut board = Board::empty();
        board.add_piece(sq(0, 0), PieceKind::King, Color::Black);
        board.add_piece(sq(1, 2), PieceKind::Queen, Color::White);
        board.add_piece(sq(7, 7), PieceKind::King, Color::White);

        let session = GameSession::from_board(board, Color::Black);
        assert!(!session.in_check(Color::Black));
        assert_eq!(session.status, GameStatus::Stalemate);
    }

    #[test]
    fn test_castling_through_session() {
        let mut board = Board::empty();
        board.add_piece(sq(7, 4), PieceKind::King, Color::White);
        board.add_piece(sq(7, 7), PieceKind::Rook, Color::White);
        board.add_piece(sq(0, 4), PieceKind::King, Color::Black);

        let mut session = GameSession::from_board(board, Color::White);
        let specials = session.special_destinations();
        assert_eq!(specials, vec![(sq(7, 6), SpecialMove::CastleKingside)]);

        let outcome = session.make_move(sq(7, 4), sq(7, 6)).unwrap();
        assert_eq!(outcome.mv.special, SpecialMove::CastleKingside);

        let rook = session.board.piece_at(sq(7, 5)).unwrap();
        assert_eq!(session.board.piece(rook).kind, PieceKind::Rook);
    }

    #[test]
    fn test_promotion_through_session() {
        let mut board = Board::empty();
        board.add_piece(sq(7, 4), PieceKind::King, Color::White);
        board.add_piece(sq(2, 6), PieceKind::King, Color::Black);
        board.add_piece(sq(1, 0), PieceKind::Pawn, Color::White);

        let mut session = GameSession::from_board(board, Color::White);
        let outcome = session.make_move(sq(1, 0), sq(0, 0)).unwrap();

        let promotion = outcome.promotion.unwrap();
        assert_eq!(session.board.piece(promotion.queen).kind, PieceKind::Queen);
        assert!(!session.board.piece(promotion.pawn).alive);
    }
}
