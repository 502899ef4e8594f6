// Thu Oct 15 2026 - Alex

use crate::config::ScanConfig;
use crate::heap::HeapError;
use crate::layout::{
    align_words, symbol_slots, vector_slots, LispObj, Widetag, NO_TLS_INDEX, OBJECT_ALIGN_BYTES,
    WORD_BYTES,
};
use crate::memory::MemoryError;
use crate::memory::{Address, MemoryReader};
use std::sync::Arc;

/// Type and extent of one decoded heap object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectInfo {
    pub address: Address,
    pub widetag: Widetag,
    pub size_words: u64,
}

impl ObjectInfo {
    pub fn size_bytes(&self) -> u64 {
        self.size_words * WORD_BYTES
    }

    /// First address past the object.
    pub fn next(&self) -> Address {
        self.address.word(self.size_words)
    }
}

/// Decoded slots of a symbol object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolView {
    pub address: Address,
    pub name: String,
    pub package: Option<String>,
    pub tls_index: u32,
    pub value: LispObj,
    pub function: LispObj,
}

impl SymbolView {
    pub fn has_tls_index(&self) -> bool {
        self.tls_index != NO_TLS_INDEX
    }

    pub fn qualified_name(&self) -> String {
        match &self.package {
            Some(package) => format!("{}::{}", package, self.name),
            None => format!("#:{}", self.name),
        }
    }
}

/// Reads object headers and turns them into [`ObjectInfo`] values.
///
/// Every decode is checked against a caller-supplied bound; a header that
/// cannot be sized within it is reported as corruption instead of trusted.
#[derive(Clone)]
pub struct ObjectDescriptor {
    reader: Arc<dyn MemoryReader>,
    max_string_length: u64,
}

impl ObjectDescriptor {
    pub fn new(reader: Arc<dyn MemoryReader>) -> Self {
        Self::with_config(reader, &ScanConfig::default())
    }

    pub fn with_config(reader: Arc<dyn MemoryReader>, config: &ScanConfig) -> Self {
        Self {
            reader,
            max_string_length: config.max_string_length,
        }
    }

    pub fn reader(&self) -> &Arc<dyn MemoryReader> {
        &self.reader
    }

    pub fn decode(&self, address: Address, end: Address) -> Result<ObjectInfo, HeapError> {
        if !address.is_aligned(OBJECT_ALIGN_BYTES as usize) {
            return Err(HeapError::corruption(address, "object address is not two-word aligned"));
        }
        if address >= end {
            return Err(HeapError::corruption(address, format!("object starts at or past bound {}", end)));
        }

        let header = self.reader.read_word(address)?;
        let widetag = if header.is_header() {
            Widetag::from_u8(header.widetag_bits())
        } else if header.raw() & 3 == 1 && !header.is_immediate() {
            return Err(HeapError::corruption(
                address,
                format!("unknown widetag 0x{:02x}", header.widetag_bits()),
            ));
        } else {
            Widetag::Cons
        };

        let size_words = self.size_of(address, widetag, header, end)?;
        if size_words == 0 {
            return Err(HeapError::corruption(address, format!("{} has zero size", widetag)));
        }
        match address.checked_add_words(size_words) {
            Some(last) if last <= end => {}
            _ => {
                return Err(HeapError::corruption(
                    address,
                    format!("{} of {} words crosses bound {}", widetag, size_words, end),
                ))
            }
        }

        Ok(ObjectInfo {
            address,
            widetag,
            size_words,
        })
    }

    /// Object size rounded up to the two-word allocation unit.
    fn size_of(
        &self,
        address: Address,
        widetag: Widetag,
        header: LispObj,
        end: Address,
    ) -> Result<u64, HeapError> {
        let words = self.unaligned_size(address, widetag, header, end)?;
        align_words(words).ok_or_else(|| HeapError::corruption(address, format!("{} size overflows", widetag)))
    }

    fn unaligned_size(
        &self,
        address: Address,
        widetag: Widetag,
        header: LispObj,
        end: Address,
    ) -> Result<u64, HeapError> {
        if let Some(words) = widetag.fixed_size() {
            return Ok(words);
        }
        let data = header.header_data();
        let words = match widetag {
            Widetag::Bignum | Widetag::Instance | Widetag::Closure => data.checked_add(1),
            Widetag::Filler => Some(data),
            Widetag::SimpleVector => {
                let length = self.vector_length(address, end)?;
                length.checked_add(vector_slots::DATA)
            }
            Widetag::SimpleBaseString => {
                let length = self.vector_length(address, end)?;
                // Base strings keep a trailing NUL.
                length
                    .checked_add(WORD_BYTES)
                    .map(|bytes| bytes / WORD_BYTES)
                    .and_then(|words| words.checked_add(vector_slots::DATA))
            }
            Widetag::SimpleCharacterString => {
                let length = self.vector_length(address, end)?;
                length
                    .checked_mul(4)
                    .and_then(|bytes| bytes.checked_add(WORD_BYTES - 1))
                    .map(|bytes| bytes / WORD_BYTES)
                    .and_then(|words| words.checked_add(vector_slots::DATA))
            }
            other => {
                return Err(HeapError::corruption(address, format!("cannot size {}", other)));
            }
        };
        words.ok_or_else(|| HeapError::corruption(address, format!("{} size overflows", widetag)))
    }

    /// Length slot of a vector-like object, read only after checking the
    /// slot itself lies inside the bound.
    fn vector_length(&self, address: Address, end: Address) -> Result<u64, HeapError> {
        match address.checked_add_words(vector_slots::DATA) {
            Some(last) if last <= end => {}
            _ => return Err(HeapError::corruption(address, "length slot crosses bound")),
        }
        let word = self.reader.read_word(address.word(vector_slots::LENGTH))?;
        match word.fixnum_value() {
            Some(length) if length >= 0 => Ok(length as u64),
            _ => Err(HeapError::corruption(address, format!("bad vector length {:?}", word))),
        }
    }

    pub fn symbol(&self, address: Address) -> Result<SymbolView, HeapError> {
        self.expect_symbol(address)?;

        let name_obj = self.reader.read_word(address.word(symbol_slots::NAME))?;
        let name = self
            .read_string(name_obj)?
            .ok_or_else(|| HeapError::corruption(address, "symbol name is not a string"))?;

        let package_obj = self.reader.read_word(address.word(symbol_slots::PACKAGE))?;
        let package = if package_obj.fixnum_value() == Some(0) {
            None
        } else {
            Some(
                self.read_string(package_obj)?
                    .ok_or_else(|| HeapError::corruption(address, "symbol package is not a name"))?,
            )
        };

        Ok(SymbolView {
            address,
            name,
            package,
            tls_index: self.tls_index(address)?,
            value: self.reader.read_word(address.word(symbol_slots::VALUE))?,
            function: self.reader.read_word(address.word(symbol_slots::FUNCTION))?,
        })
    }

    pub fn tls_index(&self, address: Address) -> Result<u32, HeapError> {
        let word = self.reader.read_word(address.word(symbol_slots::TLS_INDEX))?;
        word.fixnum_value()
            .and_then(|index| u32::try_from(index).ok())
            .ok_or_else(|| HeapError::corruption(address, format!("bad TLS index {:?}", word)))
    }

    pub fn symbol_name_obj(&self, address: Address) -> Result<LispObj, HeapError> {
        Ok(self.reader.read_word(address.word(symbol_slots::NAME))?)
    }

    fn expect_symbol(&self, address: Address) -> Result<(), HeapError> {
        if !address.is_aligned(OBJECT_ALIGN_BYTES as usize) {
            return Err(HeapError::corruption(address, "symbol address is not two-word aligned"));
        }
        let header = self.reader.read_word(address)?;
        if !header.is_header() || Widetag::from_u8(header.widetag_bits()) != Widetag::Symbol {
            return Err(HeapError::corruption(address, format!("expected symbol header, found {:?}", header)));
        }
        Ok(())
    }

    /// Header of the string `obj` points to, or `None` when `obj` is not a
    /// pointer to a string.
    fn string_header(&self, obj: LispObj) -> Result<Option<(Address, Widetag, u64)>, HeapError> {
        let address = match obj.native_address() {
            Some(address) if obj.is_other_pointer() => address,
            _ => return Ok(None),
        };
        let header = self.reader.read_word(address).map_err(|e| dangling(address, e))?;
        let widetag = Widetag::from_u8(header.widetag_bits());
        if !header.is_header() || !widetag.is_string() {
            return Ok(None);
        }
        let word = self
            .reader
            .read_word(address.word(vector_slots::LENGTH))
            .map_err(|e| dangling(address, e))?;
        let length = match word.fixnum_value() {
            Some(length) if length >= 0 => length as u64,
            _ => return Err(HeapError::corruption(address, format!("bad string length {:?}", word))),
        };
        if length > self.max_string_length {
            return Err(HeapError::corruption(
                address,
                format!("string length {} exceeds limit {}", length, self.max_string_length),
            ));
        }
        Ok(Some((address, widetag, length)))
    }

    pub fn read_string(&self, obj: LispObj) -> Result<Option<String>, HeapError> {
        let (address, widetag, length) = match self.string_header(obj)? {
            Some(found) => found,
            None => return Ok(None),
        };
        self.decode_chars(address, widetag, length).map(|chars| Some(chars.into_iter().collect()))
    }

    /// Exact, case-sensitive comparison. `None` when `obj` is not a string.
    pub fn string_equals(&self, obj: LispObj, expected: &str) -> Result<Option<bool>, HeapError> {
        let (address, widetag, length) = match self.string_header(obj)? {
            Some(found) => found,
            None => return Ok(None),
        };
        if length != expected.chars().count() as u64 {
            return Ok(Some(false));
        }
        let chars = self.decode_chars(address, widetag, length)?;
        Ok(Some(chars.into_iter().eq(expected.chars())))
    }

    fn decode_chars(&self, address: Address, widetag: Widetag, length: u64) -> Result<Vec<char>, HeapError> {
        if length == 0 {
            return Ok(Vec::new());
        }
        let data = address.word(vector_slots::DATA);
        match widetag {
            Widetag::SimpleBaseString => {
                let bytes = self.reader.read_bytes(data, length as usize).map_err(|e| dangling(address, e))?;
                Ok(bytes.into_iter().map(char::from).collect())
            }
            _ => {
                let bytes = self
                    .reader
                    .read_bytes(data, length as usize * 4)
                    .map_err(|e| dangling(address, e))?;
                bytes
                    .chunks_exact(4)
                    .map(|c| {
                        let code = u32::from_le_bytes([c[0], c[1], c[2], c[3]]);
                        char::from_u32(code).ok_or_else(|| {
                            HeapError::corruption(address, format!("invalid code point 0x{:x}", code))
                        })
                    })
                    .collect()
            }
        }
    }
}

/// A pointer taken from heap data that leads outside every mapped space is
/// a damaged heap, not a reader failure.
fn dangling(target: Address, err: MemoryError) -> HeapError {
    HeapError::corruption(target, format!("pointer leads to unreadable memory: {}", err))
}
