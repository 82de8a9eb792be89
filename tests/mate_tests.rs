#[cfg(test)]
mod tests {
    use chess_core::engine::config::EngineConfig;
    use chess_core::engine::search::AlphaBetaEngine;
    use chess_core::engine::{SearchLimit, Searcher, SCORE_MATE};
    use chess_core::logic::board::{Board, Color, PieceKind, Square};
    use chess_core::logic::game::{GameSession, GameStatus};
    use std::sync::Arc;

    fn sq(row: u8, col: u8) -> Square {
        Square::new(row, col).unwrap()
    }

    #[test]
    fn test_corner_mate_is_terminal() {
        // Lone king in the corner; queen gives the check, the rook guards
        // the queen, every escape square is covered.
        let mut board = Board::empty();
        board.add_piece(sq(0, 7), PieceKind::King, Color::Black);
        board.add_piece(sq(1, 6), PieceKind::Queen, Color::White);
        board.add_piece(sq(7, 6), PieceKind::Rook, Color::White);
        board.add_piece(sq(7, 0), PieceKind::King, Color::White);

        let session = GameSession::from_board(board, Color::Black);
        assert_eq!(session.status, GameStatus::Checkmate(Color::White));
        assert!(session.in_check(Color::Black));

        let mut engine = AlphaBetaEngine::new(Arc::new(EngineConfig::default()));
        let result = engine.search(&session, SearchLimit::Depth(3));
        assert_eq!(result.value, -SCORE_MATE);
        assert!(result.best.is_none());
    }

    #[test]
    fn test_fools_mate_detected_by_engine() {
        let mut session = GameSession::new();
        session.make_move(sq(6, 5), sq(5, 5)).unwrap(); // f2 f3
        session.make_move(sq(1, 4), sq(3, 4)).unwrap(); // e7 e5
        session.make_move(sq(6, 6), sq(4, 6)).unwrap(); // g2 g4

        // Black to move has mate in one; the engine must find it.
        let mut engine = AlphaBetaEngine::new(Arc::new(EngineConfig::default()));
        let result = engine.search(&session, SearchLimit::Depth(3));

        assert_eq!(result.value, SCORE_MATE);
        let best = result.best.unwrap();
        assert_eq!(best.from, sq(0, 3));
        assert_eq!(best.to, sq(4, 7));

        // Playing it out confirms the verdict on the session side.
        let outcome = session.make_move(best.from, best.to).unwrap();
        assert_eq!(outcome.status, GameStatus::Checkmate(Color::Black));
    }

    #[test]
    fn test_engine_escapes_check() {
        // White is in check and searches for a reply; whatever it picks must
        // be legal, which here means dealing with the check.
        let mut board = Board::empty();
        board.add_piece(sq(7, 4), PieceKind::King, Color::White);
        board.add_piece(sq(0, 4), PieceKind::Rook, Color::Black);
        board.add_piece(sq(0, 0), PieceKind::King, Color::Black);
        board.add_piece(sq(6, 1), PieceKind::Rook, Color::White);

        let mut session = GameSession::from_board(board, Color::White);
        assert!(session.in_check(Color::White));

        let mut engine = AlphaBetaEngine::new(Arc::new(EngineConfig::default()));
        let result = engine.search(&session, SearchLimit::Depth(3));
        let best = result.best.unwrap();

        session.make_move(best.from, best.to).unwrap();
        assert!(!session.in_check(Color::White));
    }
}
