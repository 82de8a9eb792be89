use crate::engine::Move;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TTFlag {
    Exact,
    /// Beta cutoff (fail-high).
    LowerBound,
    /// Alpha cutoff (fail-low).
    UpperBound,
}

#[derive(Clone, Copy, Debug)]
pub struct TTEntry {
    pub key: u64,
    pub best_move: Option<Move>,
    pub score: i32,
    pub depth: u8,
    pub flag: TTFlag,
}

impl Default for TTEntry {
    fn default() -> Self {
        Self {
            key: 0,
            best_move: None,
            score: 0,
            depth: 0,
            flag: TTFlag::Exact,
        }
    }
}

/// Memoization table for search values, keyed by position hash. An entry is
/// only usable for a query of equal or smaller remaining depth; shallow
/// values never answer deeper questions.
pub struct TranspositionTable {
    entries: Vec<TTEntry>,
    mask: usize,
}

impl TranspositionTable {
    #[must_use]
    pub fn new(size_mb: usize) -> Self {
        let entry_size = std::mem::size_of::<TTEntry>();
        let num_entries = (size_mb * 1024 * 1024) / entry_size;

        // Power of two for cheap index masking.
        let mut size = 1;
        while size * 2 <= num_entries {
            size *= 2;
        }
        if size < 1024 {
            size = 1024;
        }

        Self {
            entries: vec![TTEntry::default(); size],
            mask: size - 1,
        }
    }

    /// Cached verdict for this position, honoring the entry's bound flag
    /// against the current window.
    #[must_use]
    #[allow(clippy::indexing_slicing)]
    pub fn probe(&self, key: u64, depth: u8, alpha: i32, beta: i32) -> Option<(i32, Option<Move>)> {
        let entry = self.entries[(key as usize) & self.mask];
        if entry.key != key || entry.depth < depth {
            return None;
        }
        match entry.flag {
            TTFlag::Exact => Some((entry.score, entry.best_move)),
            TTFlag::LowerBound if entry.score >= beta => Some((entry.score, entry.best_move)),
            TTFlag::UpperBound if entry.score <= alpha => Some((entry.score, entry.best_move)),
            _ => None,
        }
    }

    /// Depth-preferred replacement: a colliding position or a deeper search
    /// overwrites, a shallower one is dropped.
    #[allow(clippy::indexing_slicing)]
    pub fn store(&mut self, key: u64, depth: u8, score: i32, flag: TTFlag, best_move: Option<Move>) {
        let entry = &mut self.entries[(key as usize) & self.mask];
        if entry.key != key || depth >= entry.depth {
            *entry = TTEntry {
                key,
                best_move,
                score,
                depth,
                flag,
            };
        }
    }

    pub fn clear(&mut self) {
        for entry in &mut self.entries {
            *entry = TTEntry::default();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_and_probe_roundtrip() {
        let mut tt = TranspositionTable::new(1);
        tt.store(42, 3, 150, TTFlag::Exact, None);

        assert_eq!(tt.probe(42, 3, -1000, 1000), Some((150, None)));
        assert_eq!(tt.probe(42, 2, -1000, 1000), Some((150, None)));
        // A deeper query must not be answered by the shallow entry.
        assert_eq!(tt.probe(42, 4, -1000, 1000), None);
        // Unknown key.
        assert_eq!(tt.probe(43, 3, -1000, 1000), None);
    }

    #[test]
    fn test_bound_flags_respect_window() {
        let mut tt = TranspositionTable::new(1);
        tt.store(7, 2, 300, TTFlag::LowerBound, None);
        // Usable only as a cutoff against beta.
        assert_eq!(tt.probe(7, 2, 0, 200), Some((300, None)));
        assert_eq!(tt.probe(7, 2, 0, 400), None);

        tt.store(8, 2, -50, TTFlag::UpperBound, None);
        assert_eq!(tt.probe(8, 2, 0, 200), Some((-50, None)));
        assert_eq!(tt.probe(8, 2, -100, 200), None);
    }

    #[test]
    fn test_shallow_store_keeps_deeper_entry() {
        let mut tt = TranspositionTable::new(1);
        tt.store(9, 5, 500, TTFlag::Exact, None);
        tt.store(9, 2, 100, TTFlag::Exact, None);
        assert_eq!(tt.probe(9, 5, -1000, 1000), Some((500, None)));
    }

    #[test]
    fn test_clear() {
        let mut tt = TranspositionTable::new(1);
        tt.store(42, 3, 150, TTFlag::Exact, None);
        tt.clear();
        assert_eq!(tt.probe(42, 1, -1000, 1000), None);
    }
}
