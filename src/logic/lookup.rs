use crate::logic::board::{Square, SquareSet, NUM_SQUARES};
use std::sync::OnceLock;

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Precomputed jump targets for the fixed-offset pieces.
pub struct MoveTables {
    pub knight: [SquareSet; NUM_SQUARES],
    pub king: [SquareSet; NUM_SQUARES],
}

impl MoveTables {
    #[allow(clippy::indexing_slicing)]
    fn new() -> Self {
        let mut knight = [0; NUM_SQUARES];
        let mut king = [0; NUM_SQUARES];

        for idx in 0..NUM_SQUARES {
            let from = Square::from_index(idx);
            knight[idx] = targets(from, &KNIGHT_OFFSETS);
            king[idx] = targets(from, &KING_OFFSETS);
        }

        Self { knight, king }
    }

    pub fn get() -> &'static Self {
        static INSTANCE: OnceLock<MoveTables> = OnceLock::new();
        INSTANCE.get_or_init(Self::new)
    }
}

fn targets(from: Square, offsets: &[(i8, i8)]) -> SquareSet {
    let mut set = 0;
    for &(dr, dc) in offsets {
        if let Some(to) = from.offset(dr, dc) {
            set |= to.bit();
        }
    }
    set
}
