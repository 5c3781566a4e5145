//! Page-aligned slot storage.
//!
//! Memory comes from an anonymous mapping, so it starts zeroed and is aligned
//! to at least the page size (4096 bytes). On Linux the region is advised to
//! use transparent huge pages. The advice is a hint only: when the kernel
//! rejects it the buffer still works, just without the TLB savings.

use crate::error::AllocationError;
use bytemuck::Pod;
use memmap2::MmapMut;
use std::marker::PhantomData;
use std::mem;
use tracing::debug;

/// Minimum alignment of the buffer's first slot.
pub const PAGE_ALIGN: usize = 4096;

/// Fixed number of zero-initialised `T` slots in page-aligned memory.
pub struct HugePageBuffer<T> {
    map: MmapMut,
    len: usize,
    _slot: PhantomData<T>,
}

impl<T: Pod> HugePageBuffer<T> {
    pub fn zeroed(len: usize) -> Result<Self, AllocationError> {
        let slot = mem::size_of::<T>();
        assert!(slot > 0, "zero-sized slots cannot be tabled");
        assert!(mem::align_of::<T>() <= PAGE_ALIGN);

        let bytes = len
            .checked_mul(slot)
            .ok_or(AllocationError::Overflow { slots: len, slot_size: slot })?;
        let map =
            MmapMut::map_anon(bytes).map_err(|source| AllocationError::Map { bytes, source })?;
        advise_huge_pages(&map);

        debug!(slots = len, bytes, "mapped hash table buffer");
        Ok(Self {
            map,
            len,
            _slot: PhantomData,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        bytemuck::cast_slice(&self.map[..])
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        bytemuck::cast_slice_mut(&mut self.map[..])
    }
}

#[cfg(target_os = "linux")]
fn advise_huge_pages(map: &MmapMut) {
    if let Err(err) = map.advise(memmap2::Advice::HugePage) {
        debug!(%err, "huge page advice rejected");
    }
}

#[cfg(not(target_os = "linux"))]
fn advise_huge_pages(_map: &MmapMut) {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeroed_and_aligned() {
        let buffer = HugePageBuffer::<u64>::zeroed(4096).expect("mapping succeeds");
        assert_eq!(buffer.len(), 4096);
        assert!(buffer.as_slice().iter().all(|&slot| slot == 0));
        assert_eq!(buffer.as_slice().as_ptr() as usize % PAGE_ALIGN, 0);
    }

    #[test]
    fn test_writes_stick() {
        let mut buffer = HugePageBuffer::<[u32; 4]>::zeroed(16).expect("mapping succeeds");
        buffer.as_mut_slice()[3] = [1, 2, 3, 4];
        assert_eq!(buffer.as_slice()[3], [1, 2, 3, 4]);
        assert_eq!(buffer.as_slice()[2], [0; 4]);
    }
}
