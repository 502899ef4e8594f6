// Wed Oct 14 2026 - Alex

use crate::layout::{LispObj, WORD_BYTES};
use crate::memory::{Address, HeapRegion, MemoryError};

pub trait MemoryReader: Send + Sync {
    fn read_bytes(&self, addr: Address, len: usize) -> Result<Vec<u8>, MemoryError>;

    fn read_u64(&self, addr: Address) -> Result<u64, MemoryError> {
        let bytes = self.read_bytes(addr, 8)?;
        let mut buf = [0u8; 8];
        buf.copy_from_slice(&bytes);
        Ok(u64::from_le_bytes(buf))
    }

    fn read_u32(&self, addr: Address) -> Result<u32, MemoryError> {
        let bytes = self.read_bytes(addr, 4)?;
        let mut buf = [0u8; 4];
        buf.copy_from_slice(&bytes);
        Ok(u32::from_le_bytes(buf))
    }

    fn read_u8(&self, addr: Address) -> Result<u8, MemoryError> {
        Ok(self.read_bytes(addr, 1)?[0])
    }

    fn read_word(&self, addr: Address) -> Result<LispObj, MemoryError> {
        if !addr.is_word_aligned() {
            return Err(MemoryError::AlignmentError(addr.as_u64(), WORD_BYTES as usize));
        }
        self.read_u64(addr).map(LispObj::new)
    }
}

/// Source of current heap space bounds. Queried again before every
/// multi-space scan because spaces may move or grow between calls.
pub trait MemoryManager: Send + Sync {
    fn spaces(&self) -> Vec<HeapRegion>;

    fn space_containing(&self, addr: Address) -> Option<HeapRegion> {
        self.spaces().into_iter().find(|r| r.contains(addr))
    }
}

/// Static list of spaces, for callers that already know the layout.
#[derive(Debug, Clone, Default)]
pub struct FixedSpaces {
    regions: Vec<HeapRegion>,
}

impl FixedSpaces {
    pub fn new(regions: Vec<HeapRegion>) -> Self {
        Self { regions }
    }

    pub fn push(&mut self, region: HeapRegion) {
        self.regions.push(region);
    }
}

impl MemoryManager for FixedSpaces {
    fn spaces(&self) -> Vec<HeapRegion> {
        self.regions.clone()
    }
}
