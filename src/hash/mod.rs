//! Fixed-capacity, direct-mapped hash tables.
//!
//! The foundation for every position-keyed cache in the engine. A key maps to
//! exactly one slot; storing a new key in an occupied slot silently evicts the
//! previous occupant. The tables never compare keys: slot types that care
//! embed a key check of their own.
//!
//! Neither table is internally synchronized. Resizing and clearing need
//! exclusive access, which `&mut self` enforces.

mod alloc;

pub use alloc::{HugePageBuffer, PAGE_ALIGN};

use crate::error::AllocationError;
use bytemuck::Pod;
use std::mem;
use tracing::info;

const BYTES_PER_MB: usize = 1024 * 1024;

/// Maps a 64-bit key into `[0, len)`.
pub trait Indexer {
    fn index(&self, key: u64, len: usize) -> usize;
}

/// High half of the 128-bit product `key * len`.
///
/// Uniform for uniformly distributed keys, needs no division and works for
/// any table length.
#[derive(Debug, Clone, Copy, Default)]
pub struct MulHiIndexer;

impl Indexer for MulHiIndexer {
    #[inline(always)]
    fn index(&self, key: u64, len: usize) -> usize {
        ((key as u128 * len as u128) >> 64) as usize
    }
}

/// Number of `T` slots that fit in `megabytes`.
pub fn slots_for<T>(megabytes: usize) -> Result<usize, AllocationError> {
    let slot_size = mem::size_of::<T>();
    let bytes = megabytes
        .checked_mul(BYTES_PER_MB)
        .ok_or(AllocationError::TooLarge { megabytes })?;
    match bytes.checked_div(slot_size) {
        Some(slots) if slots > 0 => Ok(slots),
        _ => Err(AllocationError::ZeroCapacity {
            megabytes,
            slot_size,
        }),
    }
}

/// Hint the CPU to pull the cache line holding `slot`.
#[inline(always)]
fn prefetch_slot<T>(slot: *const T) {
    #[cfg(target_arch = "x86_64")]
    unsafe {
        use std::arch::x86_64::{_mm_prefetch, _MM_HINT_T0};
        _mm_prefetch(slot as *const i8, _MM_HINT_T0);
    }
    #[cfg(not(target_arch = "x86_64"))]
    let _ = slot;
}

/// Hash table over page-aligned, huge-page-advised memory.
///
/// Slots are plain-old-data so that zeroed memory is a valid empty table.
pub struct AlignedHashTable<T, I = MulHiIndexer> {
    slots: HugePageBuffer<T>,
    indexer: I,
}

impl<T: Pod> AlignedHashTable<T> {
    /// Allocate a table of `megabytes`.
    ///
    /// # Panics
    /// On `megabytes == 0` or if the allocation fails. A missing cache is
    /// not a state the engine can run in.
    pub fn new(megabytes: usize) -> Self {
        Self::with_indexer(megabytes, MulHiIndexer)
    }

    pub fn try_new(megabytes: usize) -> Result<Self, AllocationError> {
        Self::try_with_indexer(megabytes, MulHiIndexer)
    }
}

impl<T: Pod, I: Indexer> AlignedHashTable<T, I> {
    pub fn with_indexer(megabytes: usize, indexer: I) -> Self {
        assert!(megabytes > 0, "hash table size must be positive");
        match Self::try_with_indexer(megabytes, indexer) {
            Ok(table) => table,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn try_with_indexer(megabytes: usize, indexer: I) -> Result<Self, AllocationError> {
        let slots = HugePageBuffer::zeroed(slots_for::<T>(megabytes)?)?;
        info!(megabytes, slots = slots.len(), "allocated aligned hash table");
        Ok(Self { slots, indexer })
    }

    /// Reallocate to `megabytes`, discarding all contents.
    ///
    /// # Panics
    /// Same conditions as [`AlignedHashTable::new`].
    pub fn resize(&mut self, megabytes: usize) {
        assert!(megabytes > 0, "hash table size must be positive");
        if let Err(err) = self.try_resize(megabytes) {
            panic!("{err}");
        }
    }

    /// The old buffer is released only once the new one is in place. On
    /// error the table keeps its previous buffer.
    pub fn try_resize(&mut self, megabytes: usize) -> Result<(), AllocationError> {
        let fresh = HugePageBuffer::zeroed(slots_for::<T>(megabytes)?)?;
        self.slots = fresh;
        info!(megabytes, slots = self.slots.len(), "resized aligned hash table");
        Ok(())
    }

    /// Reset every slot to all-zero.
    pub fn clear(&mut self) {
        self.slots.as_mut_slice().fill(T::zeroed());
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[inline]
    pub fn index(&self, key: u64) -> usize {
        self.indexer.index(key, self.slots.len())
    }

    #[inline]
    pub fn get(&self, key: u64) -> &T {
        &self.slots.as_slice()[self.index(key)]
    }

    /// Slot for `key`. The caller validates whatever key the slot embeds.
    #[inline]
    pub fn get_mut(&mut self, key: u64) -> &mut T {
        let idx = self.index(key);
        &mut self.slots.as_mut_slice()[idx]
    }

    /// Slot by position, for scans over the raw table.
    #[inline]
    pub fn slots(&self) -> &[T] {
        self.slots.as_slice()
    }

    #[inline]
    pub fn prefetch(&self, key: u64) {
        prefetch_slot(self.get(key));
    }
}

/// Hash table over an ordinary `Vec`, for slot types that need no special
/// alignment or are not plain-old-data.
pub struct UnalignedHashTable<T, I = MulHiIndexer> {
    slots: Vec<T>,
    indexer: I,
}

impl<T: Clone + Default> UnalignedHashTable<T> {
    pub fn new(megabytes: usize) -> Self {
        Self::with_indexer(megabytes, MulHiIndexer)
    }
}

impl<T: Clone + Default, I: Indexer> UnalignedHashTable<T, I> {
    pub fn with_indexer(megabytes: usize, indexer: I) -> Self {
        let mut table = Self {
            slots: Vec::new(),
            indexer,
        };
        table.resize(megabytes);
        table
    }

    /// # Panics
    /// On `megabytes == 0` or if the allocation fails.
    pub fn resize(&mut self, megabytes: usize) {
        assert!(megabytes > 0, "hash table size must be positive");
        if let Err(err) = self.try_resize(megabytes) {
            panic!("{err}");
        }
    }

    pub fn try_resize(&mut self, megabytes: usize) -> Result<(), AllocationError> {
        let slots = slots_for::<T>(megabytes)?;
        let mut fresh = Vec::new();
        fresh
            .try_reserve_exact(slots)
            .map_err(|source| AllocationError::Reserve { slots, source })?;
        fresh.resize(slots, T::default());
        self.slots = fresh;
        info!(megabytes, slots, "resized hash table");
        Ok(())
    }

    /// Reset every slot to its default value.
    pub fn clear(&mut self) {
        self.slots.fill(T::default());
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[inline]
    pub fn index(&self, key: u64) -> usize {
        self.indexer.index(key, self.slots.len())
    }

    #[inline]
    pub fn get(&self, key: u64) -> &T {
        &self.slots[self.index(key)]
    }

    #[inline]
    pub fn get_mut(&mut self, key: u64) -> &mut T {
        let idx = self.index(key);
        &mut self.slots[idx]
    }

    #[inline]
    pub fn prefetch(&self, key: u64) {
        prefetch_slot(self.get(key));
    }
}
