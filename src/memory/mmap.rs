// Thu Oct 15 2026 - Alex

use crate::memory::{
    Address, HeapRegion, MemoryError, MemoryManager, MemoryRange, MemoryReader, SpaceKind,
};
use memmap2::Mmap;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

/// Heap image file mapped read-only at its original load address.
pub struct MappedHeap {
    mmap: Arc<Mmap>,
    base_address: Address,
    spaces: Vec<HeapRegion>,
}

impl MappedHeap {
    pub fn open<P: AsRef<Path>>(path: P, base_address: Address) -> Result<Self, MemoryError> {
        if !base_address.is_word_aligned() {
            return Err(MemoryError::AlignmentError(base_address.as_u64(), 8));
        }
        let file = File::open(path.as_ref())?;
        // The image is opened read-only and never written through this mapping.
        let mmap = unsafe { Mmap::map(&file) }?;
        log::debug!(
            "mapped heap image {} ({} bytes) at {}",
            path.as_ref().display(),
            mmap.len(),
            base_address
        );
        Ok(Self {
            mmap: Arc::new(mmap),
            base_address,
            spaces: Vec::new(),
        })
    }

    /// Split the image into named spaces. Each region must lie inside the mapping.
    pub fn with_spaces(mut self, spaces: Vec<HeapRegion>) -> Result<Self, MemoryError> {
        let whole = self.mapped_range()?;
        for space in &spaces {
            if !whole.contains_span(space.start(), space.size()) {
                return Err(MemoryError::Image(format!(
                    "space {} lies outside the mapping {}",
                    space, whole
                )));
            }
        }
        self.spaces = spaces;
        Ok(self)
    }

    pub fn base_address(&self) -> Address {
        self.base_address
    }

    pub fn size(&self) -> usize {
        self.mmap.len()
    }

    pub fn mapped_range(&self) -> Result<MemoryRange, MemoryError> {
        MemoryRange::from_start_size(self.base_address, self.mmap.len() as u64)
    }

    fn offset(&self, addr: Address, len: usize) -> Result<usize, MemoryError> {
        if addr < self.base_address {
            return Err(MemoryError::OutOfBounds(addr.as_u64()));
        }
        let offset = (addr.as_u64() - self.base_address.as_u64()) as usize;
        if offset >= self.mmap.len() {
            return Err(MemoryError::OutOfBounds(addr.as_u64()));
        }
        if offset.checked_add(len).map_or(true, |last| last > self.mmap.len()) {
            return Err(MemoryError::ShortRead(addr.as_u64(), len));
        }
        Ok(offset)
    }
}

impl MemoryReader for MappedHeap {
    fn read_bytes(&self, addr: Address, len: usize) -> Result<Vec<u8>, MemoryError> {
        if len == 0 {
            return Ok(Vec::new());
        }
        let offset = self.offset(addr, len)?;
        Ok(self.mmap[offset..offset + len].to_vec())
    }

    fn read_u64(&self, addr: Address) -> Result<u64, MemoryError> {
        let offset = self.offset(addr, 8)?;
        let mut buf = [0u8; 8];
        buf.copy_from_slice(&self.mmap[offset..offset + 8]);
        Ok(u64::from_le_bytes(buf))
    }
}

impl MemoryManager for MappedHeap {
    fn spaces(&self) -> Vec<HeapRegion> {
        if !self.spaces.is_empty() {
            return self.spaces.clone();
        }
        match self.mapped_range() {
            Ok(range) => vec![HeapRegion::new(range, SpaceKind::Dynamic { generation: 0 })],
            Err(_) => Vec::new(),
        }
    }
}
