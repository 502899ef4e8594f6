// Wed Oct 14 2026 - Alex

//! Heap object layout for a 64-bit, little-endian image.
//!
//! Nothing outside this module looks at raw header or pointer bits.

pub mod builder;
pub mod descriptor;
pub mod lispobj;
pub mod widetag;

pub use builder::HeapBuilder;
pub use descriptor::{ObjectDescriptor, ObjectInfo, SymbolView};
pub use lispobj::{LispObj, Lowtag};
pub use widetag::Widetag;

pub const WORD_BYTES: u64 = 8;
pub const N_WIDETAG_BITS: u32 = 8;
pub const WIDETAG_MASK: u64 = 0xff;
pub const N_LOWTAG_BITS: u32 = 4;
pub const LOWTAG_MASK: u64 = 0xf;

/// Objects start on a two-word boundary, which keeps the lowtag bits of a
/// pointer clear of the address.
pub const OBJECT_ALIGN_WORDS: u64 = 2;
pub const OBJECT_ALIGN_BYTES: u64 = OBJECT_ALIGN_WORDS * WORD_BYTES;

/// `words` rounded up to a whole number of two-word units.
pub fn align_words(words: u64) -> Option<u64> {
    words
        .checked_add(OBJECT_ALIGN_WORDS - 1)
        .map(|w| w & !(OBJECT_ALIGN_WORDS - 1))
}

/// TLS index stored in a symbol that has no thread-local slot.
pub const NO_TLS_INDEX: u32 = 0;

pub mod symbol_slots {
    pub const VALUE: u64 = 1;
    pub const FUNCTION: u64 = 2;
    pub const NAME: u64 = 3;
    pub const PACKAGE: u64 = 4;
    pub const TLS_INDEX: u64 = 5;
    pub const SIZE: u64 = 6;
}

pub mod vector_slots {
    pub const LENGTH: u64 = 1;
    pub const DATA: u64 = 2;
}
