//! Zobrist-keyed transposition table.
//!
//! Direct-indexed table with one entry per slot. A probe only counts as a
//! hit when the full 64-bit key matches; an index collision is reported as a
//! miss so the search never trusts a foreign entry. Replacement prefers
//! deeper entries within a generation and always evicts entries from earlier
//! searches.

use crate::movegen::encoding::Move;

/// How an entry's score relates to the true value of the position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// Searched with a full window; the score is exact.
    Exact,
    /// A beta cutoff happened; the true score is at least this.
    Lower,
    /// No move raised alpha; the true score is at most this.
    Upper,
}

#[derive(Debug, Clone, Copy)]
pub struct TtEntry {
    pub key: u64,
    pub depth: u8,
    pub score: i32,
    pub bound: Bound,
    pub best_move: Option<Move>,
    generation: u8,
}

/// Probe/store counters, reset with the table.
#[derive(Debug, Clone, Copy, Default)]
pub struct TtStats {
    pub hits: u64,
    pub misses: u64,
    /// Probes where the slot held an entry for a different full key.
    pub collisions: u64,
    pub stores: u64,
    pub replacements: u64,
    pub rejected_stores: u64,
}

pub struct TranspositionTable {
    entries: Vec<Option<TtEntry>>,
    generation: u8,
    stats: TtStats,
}

impl TranspositionTable {
    /// `capacity` is rounded up to a power of two so indexing is a mask.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1).next_power_of_two();
        TranspositionTable {
            entries: vec![None; capacity],
            generation: 0,
            stats: TtStats::default(),
        }
    }

    pub fn with_default_capacity() -> Self {
        // 2^20 entries, a few dozen megabytes.
        TranspositionTable::new(1 << 20)
    }

    #[inline]
    fn index(&self, key: u64) -> usize {
        (key as usize) & (self.entries.len() - 1)
    }

    /// Bumps the generation; existing entries become replacement fodder but
    /// stay probeable, which is what makes table reuse across searches pay.
    pub fn new_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    pub fn probe(&mut self, key: u64) -> Option<TtEntry> {
        let index = self.index(key);
        match self.entries[index] {
            Some(entry) if entry.key == key => {
                self.stats.hits += 1;
                Some(entry)
            }
            Some(_) => {
                self.stats.collisions += 1;
                self.stats.misses += 1;
                None
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    pub fn store(
        &mut self,
        key: u64,
        depth: u8,
        score: i32,
        bound: Bound,
        best_move: Option<Move>,
    ) {
        let index = self.index(key);
        let candidate = TtEntry {
            key,
            depth,
            score,
            bound,
            best_move,
            generation: self.generation,
        };

        match self.entries[index] {
            None => {
                self.entries[index] = Some(candidate);
                self.stats.stores += 1;
            }
            Some(existing) => {
                // Same-generation entries only yield to equal or deeper
                // searches; stale generations always go.
                let replace = existing.generation != self.generation
                    || existing.key == key
                    || depth >= existing.depth;
                if replace {
                    self.entries[index] = Some(candidate);
                    self.stats.stores += 1;
                    self.stats.replacements += 1;
                } else {
                    self.stats.rejected_stores += 1;
                }
            }
        }
    }

    pub fn stats(&self) -> TtStats {
        self.stats
    }

    pub fn clear(&mut self) {
        for slot in self.entries.iter_mut() {
            *slot = None;
        }
        self.generation = 0;
        self.stats = TtStats::default();
    }

    pub fn capacity(&self) -> usize {
        self.entries.len()
    }
}
