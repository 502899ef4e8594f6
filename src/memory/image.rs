// Thu Oct 15 2026 - Alex

use crate::layout::WORD_BYTES;
use crate::memory::{Address, HeapRegion, MemoryError, MemoryManager, MemoryReader};

#[derive(Debug, Clone)]
struct ImageSpace {
    region: HeapRegion,
    words: Vec<u64>,
}

/// In-memory heap made of word vectors, one per space. Built by
/// `HeapBuilder`, or directly from words captured elsewhere.
#[derive(Debug, Clone, Default)]
pub struct HeapImage {
    spaces: Vec<ImageSpace>,
}

impl HeapImage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_space(&mut self, region: HeapRegion, words: Vec<u64>) -> Result<(), MemoryError> {
        if !region.range().is_word_aligned() {
            return Err(MemoryError::AlignmentError(region.start().as_u64(), WORD_BYTES as usize));
        }
        if region.size() != words.len() as u64 * WORD_BYTES {
            return Err(MemoryError::Image(format!(
                "space {} holds {} words but spans {} bytes",
                region.name(),
                words.len(),
                region.size()
            )));
        }
        if self.spaces.iter().any(|s| s.region.range().overlaps(region.range())) {
            return Err(MemoryError::Image(format!("space {} overlaps another space", region)));
        }
        self.spaces.push(ImageSpace { region, words });
        Ok(())
    }

    pub fn space_count(&self) -> usize {
        self.spaces.len()
    }

    pub fn word_count(&self) -> usize {
        self.spaces.iter().map(|s| s.words.len()).sum()
    }

    fn locate(&self, addr: Address) -> Result<(&ImageSpace, usize), MemoryError> {
        let space = self
            .spaces
            .iter()
            .find(|s| s.region.contains(addr))
            .ok_or(MemoryError::OutOfBounds(addr.as_u64()))?;
        let offset = (addr.as_u64() - space.region.start().as_u64()) as usize;
        Ok((space, offset))
    }
}

impl MemoryReader for HeapImage {
    fn read_bytes(&self, addr: Address, len: usize) -> Result<Vec<u8>, MemoryError> {
        if len == 0 {
            return Ok(Vec::new());
        }
        let (space, offset) = self.locate(addr)?;
        if !space.region.range().contains_span(addr, len as u64) {
            return Err(MemoryError::ShortRead(addr.as_u64(), len));
        }
        let first = offset / WORD_BYTES as usize;
        let last = (offset + len + WORD_BYTES as usize - 1) / WORD_BYTES as usize;
        let bytes: Vec<u8> = space.words[first..last]
            .iter()
            .flat_map(|w| w.to_le_bytes())
            .collect();
        let skip = offset % WORD_BYTES as usize;
        Ok(bytes[skip..skip + len].to_vec())
    }

    fn read_u64(&self, addr: Address) -> Result<u64, MemoryError> {
        if !addr.is_word_aligned() {
            let bytes = self.read_bytes(addr, 8)?;
            let mut buf = [0u8; 8];
            buf.copy_from_slice(&bytes);
            return Ok(u64::from_le_bytes(buf));
        }
        let (space, offset) = self.locate(addr)?;
        Ok(space.words[offset / WORD_BYTES as usize])
    }
}

impl MemoryManager for HeapImage {
    fn spaces(&self) -> Vec<HeapRegion> {
        self.spaces.iter().map(|s| s.region.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryRange, SpaceKind};

    fn region(start: u64, words: u64, space: SpaceKind) -> HeapRegion {
        HeapRegion::new(
            MemoryRange::from_start_size(Address::new(start), words * 8).unwrap(),
            space,
        )
    }

    #[test]
    fn test_reads_across_spaces() {
        let mut image = HeapImage::new();
        image.add_space(region(0x1000, 2, SpaceKind::Static), vec![1, 2]).unwrap();
        image
            .add_space(region(0x8000, 1, SpaceKind::Dynamic { generation: 0 }), vec![0x0102_0304_0506_0708])
            .unwrap();

        assert_eq!(image.read_u64(Address::new(0x1008)).unwrap(), 2);
        assert_eq!(image.read_u64(Address::new(0x8000)).unwrap(), 0x0102_0304_0506_0708);
        assert_eq!(image.read_bytes(Address::new(0x8001), 2).unwrap(), vec![0x07, 0x06]);
        assert_eq!(image.read_u32(Address::new(0x8004)).unwrap(), 0x0102_0304);
        assert!(matches!(image.read_u64(Address::new(0x1010)), Err(MemoryError::OutOfBounds(_))));
        assert!(matches!(image.read_bytes(Address::new(0x1008), 16), Err(MemoryError::ShortRead(..))));
        assert_eq!(image.spaces().len(), 2);
        assert_eq!(image.word_count(), 3);
    }

    #[test]
    fn test_empty_read_at_space_end() {
        let mut image = HeapImage::new();
        image.add_space(region(0x1000, 2, SpaceKind::Static), vec![1, 2]).unwrap();

        assert_eq!(image.read_bytes(Address::new(0x1010), 0).unwrap(), Vec::<u8>::new());
        assert!(matches!(image.read_bytes(Address::new(0x1010), 1), Err(MemoryError::OutOfBounds(_))));
    }

    #[test]
    fn test_add_space_validates_shape() {
        let mut image = HeapImage::new();
        assert!(image.add_space(region(0x1000, 2, SpaceKind::Static), vec![1]).is_err());
        image.add_space(region(0x1000, 2, SpaceKind::Static), vec![1, 2]).unwrap();
        assert!(image.add_space(region(0x1008, 1, SpaceKind::ReadOnly), vec![3]).is_err());
    }
}
