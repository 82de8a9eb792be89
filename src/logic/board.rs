#![allow(clippy::indexing_slicing)]

use crate::engine::zobrist::ZobristKeys;
use crate::engine::{Move, SpecialMove};
use serde::{Deserialize, Serialize};
use serde_big_array::BigArray;
use std::fmt;

pub const BOARD_SIZE: usize = 8;
pub const NUM_SQUARES: usize = 64;

/// Bitset over the 64 board squares, bit index = `row * 8 + col`.
pub type SquareSet = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
}

impl Color {
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::White => 0,
            Self::Black => 1,
        }
    }

    /// Row delta a pawn of this color advances by. White pawns start on row 6
    /// and move toward row 0; Black pawns start on row 1 and move toward row 7.
    #[must_use]
    pub const fn forward(self) -> i8 {
        match self {
            Self::White => -1,
            Self::Black => 1,
        }
    }

    #[must_use]
    pub const fn back_rank(self) -> u8 {
        match self {
            Self::White => 7,
            Self::Black => 0,
        }
    }

    #[must_use]
    pub const fn pawn_rank(self) -> u8 {
        match self {
            Self::White => 6,
            Self::Black => 1,
        }
    }

    #[must_use]
    pub const fn promotion_rank(self) -> u8 {
        match self {
            Self::White => 0,
            Self::Black => 7,
        }
    }

    /// +1 for White, -1 for Black. The board score is White minus Black.
    #[must_use]
    pub const fn sign(self) -> i32 {
        match self {
            Self::White => 1,
            Self::Black => -1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl PieceKind {
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Material value in centipawns. The King carries no material value and
    /// is excluded from scoring.
    #[must_use]
    pub const fn value(self) -> i32 {
        match self {
            Self::Pawn => 100,
            Self::Knight => 320,
            Self::Bishop => 330,
            Self::Rook => 500,
            Self::Queen => 900,
            Self::King => 0,
        }
    }

    #[must_use]
    pub const fn to_char(self, color: Color) -> char {
        let c = match self {
            Self::Pawn => 'p',
            Self::Knight => 'n',
            Self::Bishop => 'b',
            Self::Rook => 'r',
            Self::Queen => 'q',
            Self::King => 'k',
        };
        match color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Square {
    pub row: u8,
    pub col: u8,
}

impl Square {
    #[must_use]
    pub const fn new(row: u8, col: u8) -> Option<Self> {
        if row < BOARD_SIZE as u8 && col < BOARD_SIZE as u8 {
            Some(Self { row, col })
        } else {
            None
        }
    }

    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_index(index: usize) -> Self {
        debug_assert!(index < NUM_SQUARES);
        Self {
            row: (index / BOARD_SIZE) as u8,
            col: (index % BOARD_SIZE) as u8,
        }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.row as usize * BOARD_SIZE + self.col as usize
    }

    #[must_use]
    pub const fn bit(self) -> SquareSet {
        1 << self.index()
    }

    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn offset(self, dr: i8, dc: i8) -> Option<Self> {
        let row = i16::from(self.row) + i16::from(dr);
        let col = i16::from(self.col) + i16::from(dc);
        if (0..BOARD_SIZE as i16).contains(&row) && (0..BOARD_SIZE as i16).contains(&col) {
            Some(Self {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }
}

impl fmt::Display for Square {
    /// Algebraic form: file letter then rank number, e.g. "e4".
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = (b'a' + self.col) as char;
        let rank = 8 - self.row;
        write!(f, "{file}{rank}")
    }
}

/// Stable handle into the board's piece arena. Handles stay valid for the
/// lifetime of the game; captured pieces are marked dead, never removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PieceId(pub(crate) u16);

impl PieceId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    pub pos: Square,
    /// Castle eligibility. True at creation for Kings and Rooks standing on
    /// their home squares, cleared the first time the piece moves.
    pub can_castle: bool,
    pub alive: bool,
}

/// Everything needed to reverse one `apply_move` exactly.
#[derive(Debug, Clone, Copy)]
pub struct MoveUndo {
    pub mv: Move,
    pub captured: Option<PieceId>,
    /// Id of the queen synthesized by a promotion.
    pub promoted: Option<PieceId>,
    pub cleared_castle: bool,
    pub captured_castle: bool,
    /// Castling rook relocation: (rook id, home square, landing square).
    pub rook: Option<(PieceId, Square, Square)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pieces: Vec<Piece>,
    #[serde(with = "BigArray")]
    grid: [Option<PieceId>; NUM_SQUARES],
    kings: [Option<PieceId>; 2],
    occupied: [SquareSet; 2],
    score: i32,
    zobrist_hash: u64,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(clippy::expect_used)]
impl Board {
    /// Standard starting position, 32 pieces.
    #[must_use]
    pub fn new() -> Self {
        let mut board = Self::empty();
        board.setup_side(Color::Black);
        board.setup_side(Color::White);
        board
    }

    /// Board with no pieces, for hand-built positions.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            pieces: Vec::with_capacity(40),
            grid: [None; NUM_SQUARES],
            kings: [None; 2],
            occupied: [0; 2],
            score: 0,
            zobrist_hash: 0,
        }
    }

    fn setup_side(&mut self, color: Color) {
        let back = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];

        for (col, &kind) in back.iter().enumerate() {
            let sq = Square {
                row: color.back_rank(),
                col: col as u8,
            };
            self.add_piece(sq, kind, color);
        }
        for col in 0..BOARD_SIZE as u8 {
            let sq = Square {
                row: color.pawn_rank(),
                col,
            };
            self.add_piece(sq, PieceKind::Pawn, color);
        }
    }

    /// Creates a piece in the arena and places it on the grid. Used during
    /// setup and by tests building custom positions.
    #[allow(clippy::cast_possible_truncation)]
    pub fn add_piece(&mut self, sq: Square, kind: PieceKind, color: Color) -> PieceId {
        debug_assert!(
            self.grid[sq.index()].is_none(),
            "add_piece onto occupied square"
        );

        let id = PieceId(self.pieces.len() as u16);
        // Castle eligibility only for kings and rooks standing on their
        // home squares.
        let can_castle = match kind {
            PieceKind::King => sq.row == color.back_rank() && sq.col == 4,
            PieceKind::Rook => sq.row == color.back_rank() && (sq.col == 0 || sq.col == 7),
            _ => false,
        };
        self.pieces.push(Piece {
            kind,
            color,
            pos: sq,
            can_castle,
            alive: true,
        });

        if kind == PieceKind::King {
            debug_assert!(self.kings[color.index()].is_none(), "second king");
            self.kings[color.index()] = Some(id);
        }

        self.grid[sq.index()] = Some(id);
        self.occupied[color.index()] |= sq.bit();
        self.score += color.sign() * kind.value();

        let keys = ZobristKeys::get();
        self.zobrist_hash ^= keys.piece_key(kind, color, sq);
        if can_castle {
            self.zobrist_hash ^= keys.castle_key(sq);
        }

        id
    }

    #[must_use]
    pub const fn piece_at(&self, sq: Square) -> Option<PieceId> {
        self.grid[sq.index()]
    }

    /// Panics on a handle that was never issued by this board.
    #[must_use]
    pub fn piece(&self, id: PieceId) -> &Piece {
        self.pieces
            .get(id.index())
            .expect("piece id outside the arena")
    }

    fn piece_mut(&mut self, id: PieceId) -> &mut Piece {
        self.pieces
            .get_mut(id.index())
            .expect("piece id outside the arena")
    }

    #[must_use]
    pub const fn king(&self, color: Color) -> Option<PieceId> {
        self.kings[color.index()]
    }

    #[must_use]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.kings[color.index()].map(|id| self.piece(id).pos)
    }

    /// Squares holding pieces of `color`.
    #[must_use]
    pub const fn occupied_by(&self, color: Color) -> SquareSet {
        self.occupied[color.index()]
    }

    /// Running material score, White minus Black.
    #[must_use]
    pub const fn material_score(&self) -> i32 {
        self.score
    }

    /// Position hash, maintained incrementally. Covers piece placement, the
    /// side-to-move toggle and castle eligibility.
    #[must_use]
    pub const fn zobrist(&self) -> u64 {
        self.zobrist_hash
    }

    /// Live pieces in arena order.
    #[allow(clippy::cast_possible_truncation)]
    pub fn live_pieces(&self) -> impl Iterator<Item = (PieceId, &Piece)> {
        self.pieces
            .iter()
            .enumerate()
            .filter(|(_, p)| p.alive)
            .map(|(i, p)| (PieceId(i as u16), p))
    }

    fn lift(&mut self, id: PieceId) {
        let piece = *self.piece(id);
        debug_assert_eq!(
            self.grid[piece.pos.index()],
            Some(id),
            "grid and piece position disagree"
        );
        self.grid[piece.pos.index()] = None;
        self.occupied[piece.color.index()] &= !piece.pos.bit();
        self.zobrist_hash ^= ZobristKeys::get().piece_key(piece.kind, piece.color, piece.pos);
    }

    fn place(&mut self, id: PieceId, sq: Square) {
        debug_assert!(self.grid[sq.index()].is_none(), "place onto occupied square");
        self.piece_mut(id).pos = sq;
        let piece = *self.piece(id);
        self.grid[sq.index()] = Some(id);
        self.occupied[piece.color.index()] |= sq.bit();
        self.zobrist_hash ^= ZobristKeys::get().piece_key(piece.kind, piece.color, sq);
    }

    /// Applies a move and returns the record needed to reverse it exactly.
    ///
    /// Handles capture removal, castling rook relocation, castle-eligibility
    /// clearing and automatic queen promotion on the terminal rank. The
    /// promotion queen is the only piece identity created after setup. Score
    /// and hash are maintained incrementally.
    #[allow(clippy::cast_possible_truncation)]
    pub fn apply_move(&mut self, mv: &Move) -> MoveUndo {
        let keys = ZobristKeys::get();
        let piece = *self.piece(mv.piece);
        debug_assert_eq!(piece.pos, mv.from, "move origin disagrees with piece");

        // Castling relocates the rook alongside the king.
        let rook = match mv.special {
            SpecialMove::CastleKingside | SpecialMove::CastleQueenside => {
                let row = piece.color.back_rank();
                let (from_col, to_col) = if mv.special == SpecialMove::CastleKingside {
                    (7, 5)
                } else {
                    (0, 3)
                };
                let rook_from = Square { row, col: from_col };
                let rook_to = Square { row, col: to_col };
                let rook_id = self
                    .piece_at(rook_from)
                    .expect("castling without a rook on its home square");
                debug_assert!(self.piece(rook_id).can_castle);
                self.lift(rook_id);
                self.place(rook_id, rook_to);
                self.piece_mut(rook_id).can_castle = false;
                self.zobrist_hash ^= keys.castle_key(rook_from);
                Some((rook_id, rook_from, rook_to))
            }
            SpecialMove::None | SpecialMove::PromoteQueen => None,
        };

        // Capture before the mover lands.
        let captured = self.piece_at(mv.to);
        let mut captured_castle = false;
        if let Some(cap_id) = captured {
            let cap = *self.piece(cap_id);
            debug_assert_ne!(cap.kind, PieceKind::King, "a king is never captured");
            self.lift(cap_id);
            self.piece_mut(cap_id).alive = false;
            self.score -= cap.color.sign() * cap.kind.value();
            if cap.can_castle {
                captured_castle = true;
                self.zobrist_hash ^= keys.castle_key(cap.pos);
            }
        }

        self.lift(mv.piece);
        self.place(mv.piece, mv.to);

        let cleared_castle = piece.can_castle;
        if cleared_castle {
            self.piece_mut(mv.piece).can_castle = false;
            self.zobrist_hash ^= keys.castle_key(mv.from);
        }

        // A pawn reaching the terminal rank becomes a queen.
        let promoted = if piece.kind == PieceKind::Pawn
            && mv.to.row == piece.color.promotion_rank()
        {
            self.lift(mv.piece);
            self.piece_mut(mv.piece).alive = false;
            let queen_id = PieceId(self.pieces.len() as u16);
            self.pieces.push(Piece {
                kind: PieceKind::Queen,
                color: piece.color,
                pos: mv.to,
                can_castle: false,
                alive: true,
            });
            self.grid[mv.to.index()] = Some(queen_id);
            self.occupied[piece.color.index()] |= mv.to.bit();
            self.zobrist_hash ^= keys.piece_key(PieceKind::Queen, piece.color, mv.to);
            self.score += piece.color.sign() * (PieceKind::Queen.value() - PieceKind::Pawn.value());
            Some(queen_id)
        } else {
            None
        };

        self.zobrist_hash ^= keys.side_key;

        MoveUndo {
            mv: *mv,
            captured,
            promoted,
            cleared_castle,
            captured_castle,
            rook,
        }
    }

    /// Exact inverse of `apply_move`. Restores by id: a promotion undo
    /// revives the original pawn and retires the synthesized queen.
    pub fn undo_move(&mut self, undo: MoveUndo) {
        let keys = ZobristKeys::get();
        let mv = undo.mv;
        self.zobrist_hash ^= keys.side_key;

        if let Some(queen_id) = undo.promoted {
            debug_assert_eq!(
                queen_id.index() + 1,
                self.pieces.len(),
                "promotion undo out of order"
            );
            let color = self.piece(queen_id).color;
            self.grid[mv.to.index()] = None;
            self.occupied[color.index()] &= !mv.to.bit();
            self.zobrist_hash ^= keys.piece_key(PieceKind::Queen, color, mv.to);
            self.score -= color.sign() * (PieceKind::Queen.value() - PieceKind::Pawn.value());
            self.pieces.pop();

            self.piece_mut(mv.piece).alive = true;
            self.grid[mv.to.index()] = Some(mv.piece);
            self.occupied[color.index()] |= mv.to.bit();
            self.zobrist_hash ^= keys.piece_key(PieceKind::Pawn, color, mv.to);
        }

        self.lift(mv.piece);
        self.place(mv.piece, mv.from);
        if undo.cleared_castle {
            self.piece_mut(mv.piece).can_castle = true;
            self.zobrist_hash ^= keys.castle_key(mv.from);
        }

        if let Some(cap_id) = undo.captured {
            self.piece_mut(cap_id).alive = true;
            let cap = *self.piece(cap_id);
            debug_assert_eq!(cap.pos, mv.to);
            self.grid[mv.to.index()] = Some(cap_id);
            self.occupied[cap.color.index()] |= mv.to.bit();
            self.zobrist_hash ^= keys.piece_key(cap.kind, cap.color, cap.pos);
            self.score += cap.color.sign() * cap.kind.value();
            if undo.captured_castle {
                self.zobrist_hash ^= keys.castle_key(cap.pos);
            }
        }

        if let Some((rook_id, rook_from, _)) = undo.rook {
            self.lift(rook_id);
            self.place(rook_id, rook_from);
            self.piece_mut(rook_id).can_castle = true;
            self.zobrist_hash ^= keys.castle_key(rook_from);
        }
    }

    /// Piece placement and side to move in FEN-style notation, for logs.
    #[must_use]
    pub fn placement_string(&self, turn: Color) -> String {
        let mut out = String::new();
        for row in 0..BOARD_SIZE as u8 {
            let mut empty = 0;
            for col in 0..BOARD_SIZE as u8 {
                let sq = Square { row, col };
                if let Some(id) = self.piece_at(sq) {
                    if empty > 0 {
                        out.push_str(&empty.to_string());
                        empty = 0;
                    }
                    let piece = self.piece(id);
                    out.push(piece.kind.to_char(piece.color));
                } else {
                    empty += 1;
                }
            }
            if empty > 0 {
                out.push_str(&empty.to_string());
            }
            if row + 1 < BOARD_SIZE as u8 {
                out.push('/');
            }
        }
        out.push(' ');
        out.push(if turn == Color::White { 'w' } else { 'b' });
        out
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..BOARD_SIZE as u8 {
            write!(f, "{} ", 8 - row)?;
            for col in 0..BOARD_SIZE as u8 {
                let sq = Square { row, col };
                let c = self.piece_at(sq).map_or('.', |id| {
                    let piece = self.piece(id);
                    piece.kind.to_char(piece.color)
                });
                write!(f, "{c} ")?;
            }
            writeln!(f)?;
        }
        write!(f, "  a b c d e f g h")
    }
}

/// Iterator over the squares of a `SquareSet`, in ascending index order.
pub struct SquareSetIter {
    set: SquareSet,
}

impl SquareSetIter {
    #[must_use]
    pub const fn new(set: SquareSet) -> Self {
        Self { set }
    }
}

impl Iterator for SquareSetIter {
    type Item = Square;

    fn next(&mut self) -> Option<Self::Item> {
        if self.set == 0 {
            None
        } else {
            let index = self.set.trailing_zeros() as usize;
            self.set &= self.set - 1;
            Some(Square::from_index(index))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_setup() {
        let board = Board::new();

        let white_king = board.piece_at(Square::new(7, 4).unwrap()).unwrap();
        assert_eq!(board.piece(white_king).kind, PieceKind::King);
        assert_eq!(board.piece(white_king).color, Color::White);

        let black_queen = board.piece_at(Square::new(0, 3).unwrap()).unwrap();
        assert_eq!(board.piece(black_queen).kind, PieceKind::Queen);
        assert_eq!(board.piece(black_queen).color, Color::Black);

        assert_eq!(board.material_score(), 0);
        assert_eq!(board.live_pieces().count(), 32);
    }

    #[test]
    fn test_placement_string() {
        let board = Board::new();
        assert_eq!(
            board.placement_string(Color::White),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w"
        );
    }

    #[test]
    fn test_capture_adjusts_score_and_undo_restores() {
        let mut board = Board::empty();
        board.add_piece(Square::new(7, 4).unwrap(), PieceKind::King, Color::White);
        board.add_piece(Square::new(0, 4).unwrap(), PieceKind::King, Color::Black);
        let pawn = board.add_piece(Square::new(6, 4).unwrap(), PieceKind::Pawn, Color::White);
        board.add_piece(Square::new(5, 3).unwrap(), PieceKind::Knight, Color::Black);

        let before = board.clone();
        assert_eq!(board.material_score(), 100 - 320);

        let mv = Move {
            piece: pawn,
            from: Square::new(6, 4).unwrap(),
            to: Square::new(5, 3).unwrap(),
            special: SpecialMove::None,
        };
        let undo = board.apply_move(&mv);

        assert_eq!(board.material_score(), 100);
        assert!(undo.captured.is_some());
        assert_eq!(board.piece(pawn).pos, Square::new(5, 3).unwrap());

        board.undo_move(undo);
        assert_eq!(board, before);
    }

    #[test]
    fn test_promotion_synthesizes_queen_and_undo_revives_pawn() {
        let mut board = Board::empty();
        board.add_piece(Square::new(7, 4).unwrap(), PieceKind::King, Color::White);
        board.add_piece(Square::new(0, 7).unwrap(), PieceKind::King, Color::Black);
        let pawn = board.add_piece(Square::new(1, 0).unwrap(), PieceKind::Pawn, Color::White);

        let before = board.clone();
        let mv = Move {
            piece: pawn,
            from: Square::new(1, 0).unwrap(),
            to: Square::new(0, 0).unwrap(),
            special: SpecialMove::PromoteQueen,
        };
        let undo = board.apply_move(&mv);

        let queen_id = undo.promoted.unwrap();
        assert_eq!(board.piece(queen_id).kind, PieceKind::Queen);
        assert_eq!(board.piece(queen_id).color, Color::White);
        assert_eq!(board.piece(queen_id).pos, Square::new(0, 0).unwrap());
        assert!(!board.piece(pawn).alive);
        assert_eq!(board.material_score(), 900);

        board.undo_move(undo);
        assert_eq!(board, before);
        assert!(board.piece(pawn).alive);
    }

    #[test]
    fn test_castle_moves_rook_and_undo_restores() {
        let mut board = Board::empty();
        let king = board.add_piece(Square::new(7, 4).unwrap(), PieceKind::King, Color::White);
        let rook = board.add_piece(Square::new(7, 7).unwrap(), PieceKind::Rook, Color::White);
        board.add_piece(Square::new(0, 4).unwrap(), PieceKind::King, Color::Black);

        let before = board.clone();
        let mv = Move {
            piece: king,
            from: Square::new(7, 4).unwrap(),
            to: Square::new(7, 6).unwrap(),
            special: SpecialMove::CastleKingside,
        };
        let undo = board.apply_move(&mv);

        assert_eq!(board.piece(king).pos, Square::new(7, 6).unwrap());
        assert_eq!(board.piece(rook).pos, Square::new(7, 5).unwrap());
        assert!(!board.piece(king).can_castle);
        assert!(!board.piece(rook).can_castle);

        board.undo_move(undo);
        assert_eq!(board, before);
        assert!(board.piece(king).can_castle);
        assert!(board.piece(rook).can_castle);
    }

    #[test]
    fn test_square_display() {
        assert_eq!(Square::new(7, 4).unwrap().to_string(), "e1");
        assert_eq!(Square::new(0, 0).unwrap().to_string(), "a8");
    }
}
