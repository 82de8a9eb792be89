#![allow(clippy::indexing_slicing)]

use crate::logic::board::{Board, Color, Piece, PieceKind, SquareSet, SquareSetIter};
use crate::logic::lookup::MoveTables;
use thiserror::Error;

/// Caller-visible rejection reasons for an attempted move. None of these
/// leaves the board mutated.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    #[error("the game is already over")]
    GameOver,
    #[error("no piece on the selected square")]
    NoPieceAtSource,
    #[error("that piece belongs to the opponent")]
    NotYourTurn,
    #[error("the destination is not reachable by this piece")]
    IllegalDestination,
    #[error("this move would leave the king attacked")]
    SelfCheck,
}

const ROOK_DIRS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
const BISHOP_DIRS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Destination squares consistent with the piece's movement pattern and
/// current occupancy, ignoring whether the mover's own king ends up attacked.
///
/// With `attacks_only` set, pawns also contribute their diagonal capture
/// squares regardless of occupancy; a pawn threatens a square it could
/// capture into even while nothing stands there. Used for check detection
/// and castling safety.
#[must_use]
pub fn pseudo_legal_moves(board: &Board, piece: &Piece, attacks_only: bool) -> SquareSet {
    match piece.kind {
        PieceKind::Pawn => pawn_moves(board, piece, attacks_only),
        PieceKind::Knight => {
            MoveTables::get().knight[piece.pos.index()] & !board.occupied_by(piece.color)
        }
        PieceKind::Bishop => slide(board, piece, &BISHOP_DIRS),
        PieceKind::Rook => slide(board, piece, &ROOK_DIRS),
        PieceKind::Queen => slide(board, piece, &ROOK_DIRS) | slide(board, piece, &BISHOP_DIRS),
        PieceKind::King => {
            MoveTables::get().king[piece.pos.index()] & !board.occupied_by(piece.color)
        }
    }
}

fn pawn_moves(board: &Board, piece: &Piece, attacks_only: bool) -> SquareSet {
    let mut moves = 0;
    let dir = piece.color.forward();
    let any = board.occupied_by(Color::White) | board.occupied_by(Color::Black);

    // One square forward onto an empty square, two from the starting rank
    // when both squares are empty.
    if let Some(step) = piece.pos.offset(dir, 0) {
        if any & step.bit() == 0 {
            moves |= step.bit();
            if piece.pos.row == piece.color.pawn_rank() {
                if let Some(jump) = step.offset(dir, 0) {
                    if any & jump.bit() == 0 {
                        moves |= jump.bit();
                    }
                }
            }
        }
    }

    // Diagonals: captures normally, threatened squares unconditionally when
    // scanning attacks.
    for dc in [-1, 1] {
        if let Some(diag) = piece.pos.offset(dir, dc) {
            if attacks_only {
                moves |= diag.bit();
            } else if board.occupied_by(piece.color.opposite()) & diag.bit() != 0 {
                moves |= diag.bit();
            }
        }
    }

    moves
}

fn slide(board: &Board, piece: &Piece, dirs: &[(i8, i8)]) -> SquareSet {
    let mut moves = 0;
    let friendly = board.occupied_by(piece.color);
    let enemy = board.occupied_by(piece.color.opposite());

    for &(dr, dc) in dirs {
        let mut sq = piece.pos;
        while let Some(next) = sq.offset(dr, dc) {
            if friendly & next.bit() != 0 {
                break;
            }
            moves |= next.bit();
            if enemy & next.bit() != 0 {
                break;
            }
            sq = next;
        }
    }

    moves
}

/// Union of the pseudo-legal destinations of every piece of `color`. With
/// `attacks_only` the pawn threat squares are included (see
/// `pseudo_legal_moves`).
#[must_use]
pub fn move_squares(board: &Board, color: Color, attacks_only: bool) -> SquareSet {
    let mut squares = 0;
    for sq in SquareSetIter::new(board.occupied_by(color)) {
        if let Some(id) = board.piece_at(sq) {
            squares |= pseudo_legal_moves(board, board.piece(id), attacks_only);
        }
    }
    squares
}

/// Every square the given color could move or capture into.
#[must_use]
pub fn attack_squares(board: &Board, color: Color) -> SquareSet {
    move_squares(board, color, true)
}

/// A king is in check exactly when its square is a member of the opponent's
/// attacked-square set.
#[must_use]
pub fn is_in_check(board: &Board, color: Color) -> bool {
    board.king_square(color).is_some_and(|king_sq| {
        attack_squares(board, color.opposite()) & king_sq.bit() != 0
    })
}
