use crate::logic::board::{Color, PieceKind, Square, NUM_SQUARES};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::OnceLock;

const NUM_KINDS: usize = 6;
const NUM_COLORS: usize = 2;
const TABLE_SIZE: usize = NUM_KINDS * NUM_COLORS * NUM_SQUARES;

/// Random key tables for position hashing. Seeded with a fixed value so
/// hashes are reproducible across runs and processes.
pub struct ZobristKeys {
    piece_keys: [u64; TABLE_SIZE],
    /// One key per board square; only the six castle home squares per color
    /// are ever used.
    castle_keys: [u64; NUM_SQUARES],
    pub side_key: u64,
}

impl ZobristKeys {
    #[allow(clippy::indexing_slicing)]
    fn new() -> Self {
        let mut rng = StdRng::seed_from_u64(0x00C0_FFEE_D00D_5EED);

        let mut piece_keys = [0; TABLE_SIZE];
        for key in &mut piece_keys {
            *key = rng.gen();
        }
        let mut castle_keys = [0; NUM_SQUARES];
        for key in &mut castle_keys {
            *key = rng.gen();
        }
        let side_key = rng.gen();

        Self {
            piece_keys,
            castle_keys,
            side_key,
        }
    }

    pub fn get() -> &'static Self {
        static INSTANCE: OnceLock<ZobristKeys> = OnceLock::new();
        INSTANCE.get_or_init(Self::new)
    }

    #[must_use]
    #[allow(clippy::indexing_slicing)]
    pub const fn piece_key(&self, kind: PieceKind, color: Color, sq: Square) -> u64 {
        let idx = (kind.index() * NUM_COLORS + color.index()) * NUM_SQUARES + sq.index();
        self.piece_keys[idx]
    }

    #[must_use]
    #[allow(clippy::indexing_slicing)]
    pub const fn castle_key(&self, sq: Square) -> u64 {
        self.castle_keys[sq.index()]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_stable_and_distinct() {
        let keys = ZobristKeys::get();
        let a = keys.piece_key(
            PieceKind::Pawn,
            Color::White,
            Square::new(6, 4).unwrap(),
        );
        let b = keys.piece_key(
            PieceKind::Pawn,
            Color::Black,
            Square::new(6, 4).unwrap(),
        );
        assert_ne!(a, b);
        assert_eq!(
            a,
            keys.piece_key(PieceKind::Pawn, Color::White, Square::new(6, 4).unwrap())
        );
        assert_ne!(keys.side_key, 0);
    }
}
