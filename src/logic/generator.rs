use crate::engine::{Move, SpecialMove};
use crate::logic::board::{
    Board, Color, PieceKind, Square, SquareSet, SquareSetIter, NUM_SQUARES,
};
use crate::logic::rules;

/// Legal move enumeration and castling derivation.
///
/// Enumeration order is fixed and observable: the grid is scanned row-major,
/// each piece's destinations come out in ascending square order, and castling
/// entries are appended last. Search tie-breaking depends on this order.
#[derive(Debug, Clone, Copy, Default)]
pub struct MoveGenerator;

impl MoveGenerator {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Union of the pseudo-legal destinations of every piece of `color`.
    #[must_use]
    pub fn move_squares(&self, board: &Board, color: Color, attacks_only: bool) -> SquareSet {
        rules::move_squares(board, color, attacks_only)
    }

    /// Union of the attacked-square sets of every piece of `color`.
    #[must_use]
    pub fn attack_squares(&self, board: &Board, color: Color) -> SquareSet {
        rules::attack_squares(board, color)
    }

    /// Tests one pseudo-legal candidate by speculatively applying it,
    /// scanning the opponent's replies for the mover's king square and
    /// reverting. The board is restored exactly whether or not the move
    /// survives the test.
    #[must_use]
    pub fn is_legal(&self, board: &mut Board, mv: &Move) -> bool {
        let mover = board.piece(mv.piece).color;
        let undo = board.apply_move(mv);
        let attacked = rules::attack_squares(board, mover.opposite());
        let safe = board
            .king_square(mover)
            .is_none_or(|king_sq| attacked & king_sq.bit() == 0);
        board.undo_move(undo);
        safe
    }

    /// Every legal move for `color`, castling included.
    #[must_use]
    pub fn legal_moves(&self, board: &mut Board, color: Color) -> Vec<Move> {
        let mut moves = Vec::with_capacity(48);

        for index in 0..NUM_SQUARES {
            let sq = Square::from_index(index);
            let Some(id) = board.piece_at(sq) else {
                continue;
            };
            let piece = *board.piece(id);
            if piece.color != color {
                continue;
            }

            let dests = rules::pseudo_legal_moves(board, &piece, false);
            for to in SquareSetIter::new(dests) {
                let mv = Move {
                    piece: id,
                    from: sq,
                    to,
                    special: promotion_tag(piece.kind, to, color),
                };
                if self.is_legal(board, &mv) {
                    moves.push(mv);
                }
            }
        }

        if let Some(king_id) = board.king(color) {
            let king_from = board.piece(king_id).pos;
            for (to, special) in self.special_moves(board, color) {
                moves.push(Move {
                    piece: king_id,
                    from: king_from,
                    to,
                    special,
                });
            }
        }

        moves
    }

    /// Whether `color` has at least one legal move. Early-exits without
    /// building the full list; castling never matters here because a
    /// castle-eligible king always has an ordinary legal move too.
    #[must_use]
    pub fn has_legal_moves(&self, board: &mut Board, color: Color) -> bool {
        for index in 0..NUM_SQUARES {
            let sq = Square::from_index(index);
            let Some(id) = board.piece_at(sq) else {
                continue;
            };
            let piece = *board.piece(id);
            if piece.color != color {
                continue;
            }

            let dests = rules::pseudo_legal_moves(board, &piece, false);
            for to in SquareSetIter::new(dests) {
                let mv = Move {
                    piece: id,
                    from: sq,
                    to,
                    special: promotion_tag(piece.kind, to, color),
                };
                if self.is_legal(board, &mv) {
                    return true;
                }
            }
        }
        false
    }

    /// Castling destinations for `color`: at most a kingside and a queenside
    /// entry. Offered only while king and rook both keep their castle
    /// eligibility, every square between them is empty, and none of the
    /// king's current, transit or landing squares is attacked.
    #[must_use]
    pub fn special_moves(&self, board: &Board, color: Color) -> Vec<(Square, SpecialMove)> {
        let mut specials = Vec::new();
        let Some(king_id) = board.king(color) else {
            return specials;
        };
        let king = *board.piece(king_id);
        if !king.can_castle {
            return specials;
        }
        debug_assert_eq!(king.pos.row, color.back_rank());
        debug_assert_eq!(king.pos.col, 4);

        let row = color.back_rank();
        let occupied = board.occupied_by(Color::White) | board.occupied_by(Color::Black);
        let attacked = rules::attack_squares(board, color.opposite());

        // (rook home column, columns that must be empty, king path columns,
        //  king landing square, tag)
        let sides: [(u8, &[u8], [u8; 3], Square, SpecialMove); 2] = [
            (
                7,
                &[5, 6],
                [4, 5, 6],
                Square { row, col: 6 },
                SpecialMove::CastleKingside,
            ),
            (
                0,
                &[1, 2, 3],
                [4, 3, 2],
                Square { row, col: 2 },
                SpecialMove::CastleQueenside,
            ),
        ];

        for (rook_col, empty_cols, path_cols, landing, tag) in sides {
            let rook_sq = Square { row, col: rook_col };
            let eligible_rook = board.piece_at(rook_sq).is_some_and(|id| {
                let rook = board.piece(id);
                rook.kind == PieceKind::Rook && rook.color == color && rook.can_castle
            });
            if !eligible_rook {
                continue;
            }

            let clear = empty_cols
                .iter()
                .all(|&col| occupied & Square { row, col }.bit() == 0);
            let safe = path_cols
                .iter()
                .all(|&col| attacked & Square { row, col }.bit() == 0);
            if clear && safe {
                specials.push((landing, tag));
            }
        }

        specials
    }
}

const fn promotion_tag(kind: PieceKind, to: Square, color: Color) -> SpecialMove {
    if matches!(kind, PieceKind::Pawn) && to.row == color.promotion_rank() {
        SpecialMove::PromoteQueen
    } else {
        SpecialMove::None
    }
}
