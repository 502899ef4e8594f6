// Thu Oct 15 2026 - Alex

use crate::layout::{
    symbol_slots, LispObj, Lowtag, Widetag, OBJECT_ALIGN_BYTES, OBJECT_ALIGN_WORDS, WORD_BYTES,
};
use crate::memory::{Address, HeapImage, HeapRegion, MemoryError, MemoryRange, SpaceKind};
use crate::symbol::PackageTable;
use std::collections::HashMap;

/// Lays out objects word by word into a synthetic space.
///
/// Objects are placed back to back in call order, so their addresses
/// ascend in the order they were added. Each object is zero-padded to a
/// whole number of two-word units.
pub struct HeapBuilder {
    base: Address,
    words: Vec<u64>,
    package_names: HashMap<String, Address>,
    interned: Vec<(String, String, Address)>,
}

impl HeapBuilder {
    pub fn new(base: Address) -> Self {
        Self {
            base: base.align_up(OBJECT_ALIGN_BYTES as usize),
            words: Vec::new(),
            package_names: HashMap::new(),
            interned: Vec::new(),
        }
    }

    pub fn base(&self) -> Address {
        self.base
    }

    /// Address the next object will be placed at.
    pub fn cursor(&self) -> Address {
        self.base.word(self.words.len() as u64)
    }

    fn push(&mut self, words: &[u64]) -> Address {
        let at = self.cursor();
        self.words.extend_from_slice(words);
        let unit = OBJECT_ALIGN_WORDS as usize;
        let padded = (self.words.len() + unit - 1) / unit * unit;
        self.words.resize(padded, 0);
        at
    }

    pub fn raw(&mut self, words: &[u64]) -> Address {
        self.push(words)
    }

    pub fn cons(&mut self, car: LispObj, cdr: LispObj) -> Address {
        self.push(&[car.raw(), cdr.raw()])
    }

    pub fn vector(&mut self, elements: &[LispObj]) -> Address {
        let mut words = vec![
            LispObj::header(Widetag::SimpleVector, 0).raw(),
            LispObj::fixnum(elements.len() as i64).raw(),
        ];
        words.extend(elements.iter().map(|e| e.raw()));
        self.push(&words)
    }

    pub fn base_string(&mut self, text: &str) -> Address {
        let bytes: Vec<u8> = text.chars().map(|c| c as u32 as u8).collect();
        let mut words = vec![
            LispObj::header(Widetag::SimpleBaseString, 0).raw(),
            LispObj::fixnum(bytes.len() as i64).raw(),
        ];
        // Trailing NUL is implied by the zero padding.
        let data_words = (bytes.len() + WORD_BYTES as usize) / WORD_BYTES as usize;
        words.extend(pack_bytes(&bytes, data_words));
        self.push(&words)
    }

    pub fn character_string(&mut self, text: &str) -> Address {
        let codes: Vec<u8> = text.chars().flat_map(|c| (c as u32).to_le_bytes()).collect();
        let length = text.chars().count();
        let mut words = vec![
            LispObj::header(Widetag::SimpleCharacterString, 0).raw(),
            LispObj::fixnum(length as i64).raw(),
        ];
        let data_words = (codes.len() + WORD_BYTES as usize - 1) / WORD_BYTES as usize;
        words.extend(pack_bytes(&codes, data_words));
        self.push(&words)
    }

    pub fn bignum(&mut self, digits: &[u64]) -> Address {
        let mut words = vec![LispObj::header(Widetag::Bignum, digits.len() as u64).raw()];
        words.extend_from_slice(digits);
        self.push(&words)
    }

    pub fn instance(&mut self, slots: &[LispObj]) -> Address {
        let mut words = vec![LispObj::header(Widetag::Instance, slots.len() as u64).raw()];
        words.extend(slots.iter().map(|s| s.raw()));
        self.push(&words)
    }

    pub fn double_float(&mut self, value: f64) -> Address {
        self.push(&[LispObj::header(Widetag::DoubleFloat, 0).raw(), value.to_bits()])
    }

    pub fn filler(&mut self, total_words: u64) -> Address {
        let mut words = vec![LispObj::header(Widetag::Filler, total_words).raw()];
        words.resize(total_words.max(1) as usize, 0);
        self.push(&words)
    }

    /// Symbol with explicit slot contents, for layouts the helpers below
    /// refuse to produce.
    pub fn symbol_raw(&mut self, name: LispObj, package: LispObj, tls_index: LispObj) -> Address {
        let unbound = LispObj::immediate(Widetag::UnboundMarker).raw();
        self.push(&[
            LispObj::header(Widetag::Symbol, 0).raw(),
            unbound,
            unbound,
            name.raw(),
            package.raw(),
            tls_index.raw(),
        ])
    }

    /// Symbol followed by its name string. Package names are shared
    /// between symbols and placed before the first symbol that uses them.
    pub fn symbol(&mut self, name: &str, package: Option<&str>, tls_index: u32) -> Address {
        let package_obj = match package {
            Some(package) => {
                let address = match self.package_names.get(package) {
                    Some(address) => *address,
                    None => {
                        let address = self.base_string(package);
                        self.package_names.insert(package.to_string(), address);
                        address
                    }
                };
                LispObj::pointer(address, Lowtag::OtherPointer)
            }
            None => LispObj::fixnum(0),
        };

        let symbol = self.symbol_raw(LispObj::fixnum(0), package_obj, LispObj::fixnum(tls_index as i64));
        let name_at = self.base_string(name);
        let slot = ((symbol.as_u64() - self.base.as_u64()) / WORD_BYTES + symbol_slots::NAME) as usize;
        self.words[slot] = LispObj::pointer(name_at, Lowtag::OtherPointer).raw();
        symbol
    }

    /// Like [`symbol`](Self::symbol), and records the symbol so it shows up
    /// in [`package_table`](Self::package_table).
    pub fn intern(&mut self, package: &str, name: &str, tls_index: u32) -> Address {
        let address = self.symbol(name, Some(package), tls_index);
        self.interned.push((package.to_string(), name.to_string(), address));
        address
    }

    pub fn package_table(&self) -> PackageTable {
        let mut table = PackageTable::new();
        for (package, name, address) in &self.interned {
            table.intern(package, name, *address);
        }
        table
    }

    pub fn finish(self, space: SpaceKind) -> Result<(HeapRegion, Vec<u64>), MemoryError> {
        let range = MemoryRange::from_start_size(self.base, self.words.len() as u64 * WORD_BYTES)?;
        Ok((HeapRegion::new(range, space), self.words))
    }

    pub fn build(self, space: SpaceKind) -> Result<HeapImage, MemoryError> {
        let (region, words) = self.finish(space)?;
        let mut image = HeapImage::new();
        image.add_space(region, words)?;
        Ok(image)
    }

    /// Single dynamic space, returned with its bounds.
    pub fn build_single(self) -> Result<(HeapImage, MemoryRange), MemoryError> {
        let (region, words) = self.finish(SpaceKind::Dynamic { generation: 0 })?;
        let range = *region.range();
        let mut image = HeapImage::new();
        image.add_space(region, words)?;
        Ok((image, range))
    }
}

fn pack_bytes(bytes: &[u8], words: usize) -> Vec<u64> {
    let mut padded = bytes.to_vec();
    padded.resize(words * WORD_BYTES as usize, 0);
    padded
        .chunks_exact(WORD_BYTES as usize)
        .map(|chunk| {
            let mut buf = [0u8; 8];
            buf.copy_from_slice(chunk);
            u64::from_le_bytes(buf)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryReader;

    #[test]
    fn test_objects_are_contiguous() {
        let mut builder = HeapBuilder::new(Address::new(0x4000));
        let a = builder.cons(LispObj::fixnum(1), LispObj::fixnum(2));
        let b = builder.double_float(1.5);
        assert_eq!(a, Address::new(0x4000));
        assert_eq!(b, Address::new(0x4010));
        assert_eq!(builder.cursor(), Address::new(0x4020));
    }

    #[test]
    fn test_symbol_shares_package_name() {
        let mut builder = HeapBuilder::new(Address::new(0x4000));
        let first = builder.intern("CL-USER", "A", 0);
        let second = builder.intern("CL-USER", "B", 0);
        let (image, _) = builder.build_single().unwrap();

        let package_a = image.read_u64(first.word(4)).unwrap();
        let package_b = image.read_u64(second.word(4)).unwrap();
        assert_eq!(package_a, package_b);
        // package name (3 words padded to 4), symbol (6), name (3 padded to 4)
        assert_eq!(first, Address::new(0x4000 + 4 * 8));
        assert_eq!(second, first.word(10));
    }

    #[test]
    fn test_odd_sized_objects_are_padded() {
        let mut builder = HeapBuilder::new(Address::new(0x4008));
        let a = builder.bignum(&[7]);
        let b = builder.raw(&[0x25]);
        let c = builder.base_string("ABC");
        assert_eq!(builder.base(), Address::new(0x4010));
        assert_eq!(a, Address::new(0x4010));
        assert_eq!(b, Address::new(0x4020));
        assert_eq!(c, Address::new(0x4030));
        assert_eq!(builder.cursor(), Address::new(0x4050));
    }
}
