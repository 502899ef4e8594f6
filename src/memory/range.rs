// Wed Oct 14 2026 - Alex

use crate::memory::{Address, MemoryError};
use std::fmt;

/// Half-open `[start, end)` span of heap memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemoryRange {
    start: Address,
    end: Address,
}

impl MemoryRange {
    pub fn new(start: Address, end: Address) -> Result<Self, MemoryError> {
        if end < start {
            return Err(MemoryError::InvalidRange(start.as_u64(), end.as_u64()));
        }
        Ok(Self { start, end })
    }

    pub fn from_start_size(start: Address, size: u64) -> Result<Self, MemoryError> {
        let end = start
            .checked_add(size)
            .ok_or(MemoryError::InvalidRange(start.as_u64(), u64::MAX))?;
        Self::new(start, end)
    }

    pub fn start(&self) -> Address {
        self.start
    }

    pub fn end(&self) -> Address {
        self.end
    }

    pub fn size(&self) -> u64 {
        self.end.as_u64() - self.start.as_u64()
    }

    pub fn contains(&self, addr: Address) -> bool {
        addr >= self.start && addr < self.end
    }

    /// True when `[addr, addr + len)` lies entirely inside the range.
    pub fn contains_span(&self, addr: Address, len: u64) -> bool {
        match addr.checked_add(len) {
            Some(last) => addr >= self.start && last <= self.end,
            None => false,
        }
    }

    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && self.end > other.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn is_word_aligned(&self) -> bool {
        self.start.is_word_aligned() && self.end.is_word_aligned()
    }
}

impl fmt::Display for MemoryRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_rejects_inverted_bounds() {
        assert!(MemoryRange::new(Address::new(0x2000), Address::new(0x1000)).is_err());
        assert!(MemoryRange::new(Address::new(0x1000), Address::new(0x1000)).unwrap().is_empty());
    }

    #[test]
    fn test_contains_span() {
        let range = MemoryRange::new(Address::new(0x1000), Address::new(0x1040)).unwrap();
        assert!(range.contains_span(Address::new(0x1000), 0x40));
        assert!(!range.contains_span(Address::new(0x1038), 0x10));
        assert!(!range.contains_span(Address::new(u64::MAX - 2), 8));
        assert!(range.contains(Address::new(0x1038)));
        assert!(!range.contains(Address::new(0x1040)));
    }
}
