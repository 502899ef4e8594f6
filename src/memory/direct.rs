// Thu Oct 15 2026 - Alex

use crate::memory::{Address, HeapRegion, MemoryError, MemoryManager, MemoryReader};
use std::sync::Arc;

/// Reads the current process's own heap through raw pointers.
///
/// Every read is checked against the spaces reported by the memory manager
/// at the time of the read, so a corrupted header can never steer a read
/// outside memory the runtime owns. The caller must keep the heap quiescent
/// (no collection, no relocation) for as long as reads are in flight.
pub struct DirectMemory {
    manager: Arc<dyn MemoryManager>,
}

impl DirectMemory {
    pub fn new(manager: Arc<dyn MemoryManager>) -> Self {
        Self { manager }
    }

    fn owning_space(&self, addr: Address, len: usize) -> Result<HeapRegion, MemoryError> {
        if addr.is_null() {
            return Err(MemoryError::NullAddress);
        }
        let space = self
            .manager
            .space_containing(addr)
            .ok_or(MemoryError::OutOfBounds(addr.as_u64()))?;
        if !space.range().contains_span(addr, len as u64) {
            return Err(MemoryError::ShortRead(addr.as_u64(), len));
        }
        Ok(space)
    }
}

impl MemoryReader for DirectMemory {
    fn read_bytes(&self, addr: Address, len: usize) -> Result<Vec<u8>, MemoryError> {
        if len == 0 {
            return Ok(Vec::new());
        }
        self.owning_space(addr, len)?;
        let mut out = vec![0u8; len];
        // SAFETY: the span lies inside a space the memory manager reports as
        // mapped, and the caller guarantees the heap is not being mutated.
        unsafe {
            std::ptr::copy_nonoverlapping(addr.as_ptr::<u8>(), out.as_mut_ptr(), len);
        }
        Ok(out)
    }

    fn read_u64(&self, addr: Address) -> Result<u64, MemoryError> {
        self.owning_space(addr, 8)?;
        // SAFETY: as above; read_unaligned tolerates byte-aligned callers.
        Ok(unsafe { std::ptr::read_unaligned(addr.as_ptr::<u64>()) })
    }
}
