use crate::engine::Evaluator;
use crate::logic::board::Board;

/// Material-only evaluation: the board's running score, positive in White's
/// favor. The board maintains it incrementally, so this is a field read.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialEvaluator;

impl MaterialEvaluator {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Evaluator for MaterialEvaluator {
    fn evaluate(&self, board: &Board) -> i32 {
        board.material_score()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::logic::board::{Color, PieceKind, Square};

    #[test]
    fn test_material_balance() {
        let evaluator = MaterialEvaluator::new();
        assert_eq!(evaluator.evaluate(&Board::new()), 0);

        let mut board = Board::empty();
        board.add_piece(Square::new(7, 4).unwrap(), PieceKind::King, Color::White);
        board.add_piece(Square::new(0, 4).unwrap(), PieceKind::King, Color::Black);
        board.add_piece(Square::new(4, 0).unwrap(), PieceKind::Rook, Color::White);
        board.add_piece(Square::new(4, 7).unwrap(), PieceKind::Knight, Color::Black);
        assert_eq!(evaluator.evaluate(&board), 500 - 320);
    }
}
