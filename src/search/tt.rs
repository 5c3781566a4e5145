//! Transposition Table for caching search results.
//!
//! # Design
//! - 8-byte plain-old-data entries on top of [`AlignedHashTable`]
//! - Slot chosen from the high key bits, verified against the low 16
//! - Depth-preferred replacement with age-based eviction
//! - Mate scores stored relative to the storing node

use crate::hash::AlignedHashTable;
use crate::types::{Depth, Hash, Move, Score};
use bytemuck::{Pod, Zeroable};

const GENERATION_MASK: u8 = 0x3F;
const HASHFULL_SAMPLE: usize = 1000;

/// Type of bound stored in TT entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BoundType {
    /// No bound (empty entry)
    None = 0,
    /// Exact score (PV node)
    Exact = 1,
    /// Lower bound (fail-high, score >= beta)
    LowerBound = 2,
    /// Upper bound (fail-low, score <= alpha)
    UpperBound = 3,
}

impl From<u8> for BoundType {
    fn from(v: u8) -> Self {
        match v & 0x03 {
            1 => BoundType::Exact,
            2 => BoundType::LowerBound,
            3 => BoundType::UpperBound,
            _ => BoundType::None,
        }
    }
}

/// A single entry in the transposition table.
///
/// The all-zero entry is empty, so a freshly mapped table needs no
/// initialization pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct TTEntry {
    /// Low 16 bits of the Zobrist hash
    key: u16,
    best_move: u16,
    score: i16,
    depth: i8,
    /// Bound type (2 bits) + generation (6 bits)
    bound_and_age: u8,
}

#[inline]
fn key_check(hash: Hash) -> u16 {
    hash as u16
}

impl TTEntry {
    #[inline]
    pub fn matches(&self, hash: Hash) -> bool {
        self.key == key_check(hash)
    }

    #[inline]
    pub fn bound(&self) -> BoundType {
        BoundType::from(self.bound_and_age)
    }

    #[inline]
    pub fn generation(&self) -> u8 {
        self.bound_and_age >> 2
    }

    /// Stored score, still relative to the node that stored it. See
    /// [`TranspositionTable::probe`].
    #[inline]
    pub fn score(&self) -> Score {
        Score::cp(self.score as i32)
    }

    #[inline]
    pub fn depth(&self) -> Depth {
        Depth::new(self.depth as i32)
    }

    /// Best move, `None` for the null move.
    #[inline]
    pub fn best_move(&self) -> Option<Move> {
        let mv = Move::from_u16(self.best_move);
        (!mv.is_null()).then_some(mv)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bound() == BoundType::None
    }
}

/// Search cache keyed by position hash.
///
/// Owned by one search thread; mutation goes through `&mut self`.
pub struct TranspositionTable {
    table: AlignedHashTable<TTEntry>,
    generation: u8,
    size_mb: usize,
}

impl TranspositionTable {
    /// Allocate a table of `size_mb` megabytes.
    ///
    /// # Panics
    /// If `size_mb` is zero or the allocation fails.
    pub fn new(size_mb: usize) -> Self {
        Self {
            table: AlignedHashTable::new(size_mb),
            generation: 0,
            size_mb,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn size_mb(&self) -> usize {
        self.size_mb
    }

    #[inline]
    pub fn generation(&self) -> u8 {
        self.generation
    }

    /// Reallocate, dropping every entry.
    pub fn resize(&mut self, size_mb: usize) {
        self.table.resize(size_mb);
        self.size_mb = size_mb;
        self.generation = 0;
    }

    pub fn clear(&mut self) {
        self.table.clear();
        self.generation = 0;
    }

    /// Advance the generation (call at start of each search)
    pub fn new_search(&mut self) {
        self.generation = (self.generation + 1) & GENERATION_MASK;
    }

    /// Look up `hash`. The returned score is already converted back to the
    /// probing node's `ply`.
    #[inline]
    pub fn probe(&self, hash: Hash, ply: i32) -> Option<TTEntry> {
        let entry = *self.table.get(hash);
        if entry.is_empty() || !entry.matches(hash) {
            return None;
        }
        Some(TTEntry {
            score: entry.score().from_tt(ply).raw() as i16,
            ..entry
        })
    }

    /// Store a search result.
    ///
    /// Replaces empty slots, slots from older searches, and slots searched
    /// no deeper than `depth`. A null `best_move` keeps the move already
    /// stored for the same position.
    pub fn store(
        &mut self,
        hash: Hash,
        best_move: Move,
        score: Score,
        depth: Depth,
        bound: BoundType,
        ply: i32,
    ) {
        let generation = self.generation;
        let slot = self.table.get_mut(hash);
        let existing = *slot;

        let should_replace = existing.is_empty()
            || existing.generation() != generation
            || depth.raw() >= existing.depth as i32;
        if !should_replace {
            return;
        }

        let best_move = if best_move.is_null() && existing.matches(hash) {
            existing.best_move
        } else {
            best_move.to_u16()
        };

        *slot = TTEntry {
            key: key_check(hash),
            best_move,
            score: score.to_tt(ply).raw() as i16,
            depth: depth.raw().clamp(i8::MIN as i32, i8::MAX as i32) as i8,
            bound_and_age: (bound as u8) | ((generation & GENERATION_MASK) << 2),
        };
    }

    /// Permill of sampled slots written during the current search.
    pub fn hashfull(&self) -> u32 {
        let generation = self.generation;
        let slots = self.table.slots();
        let sample = &slots[..slots.len().min(HASHFULL_SAMPLE)];
        let used = sample
            .iter()
            .filter(|e| !e.is_empty() && e.generation() == generation)
            .count();
        ((used * 1000) / sample.len().max(1)) as u32
    }

    #[inline]
    pub fn prefetch(&self, hash: Hash) {
        self.table.prefetch(hash);
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        Self::new(crate::uci::DEFAULT_HASH_MB)
    }
}
