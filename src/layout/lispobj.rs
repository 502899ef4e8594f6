// Wed Oct 14 2026 - Alex

use crate::layout::{Widetag, LOWTAG_MASK, N_WIDETAG_BITS, WIDETAG_MASK};
use crate::memory::Address;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lowtag {
    InstancePointer,
    ListPointer,
    FunPointer,
    OtherPointer,
}

impl Lowtag {
    pub fn from_bits(bits: u64) -> Option<Self> {
        match bits & LOWTAG_MASK {
            0x3 => Some(Lowtag::InstancePointer),
            0x7 => Some(Lowtag::ListPointer),
            0xB => Some(Lowtag::FunPointer),
            0xF => Some(Lowtag::OtherPointer),
            _ => None,
        }
    }

    pub fn bits(&self) -> u64 {
        match self {
            Lowtag::InstancePointer => 0x3,
            Lowtag::ListPointer => 0x7,
            Lowtag::FunPointer => 0xB,
            Lowtag::OtherPointer => 0xF,
        }
    }
}

/// A tagged machine word: fixnum, pointer, immediate, or header.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct LispObj(u64);

impl LispObj {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }

    pub fn fixnum(value: i64) -> Self {
        Self((value << 1) as u64)
    }

    pub fn pointer(addr: Address, lowtag: Lowtag) -> Self {
        Self(addr.as_u64() | lowtag.bits())
    }

    pub fn header(widetag: Widetag, data: u64) -> Self {
        Self(widetag.to_u8() as u64 | (data << N_WIDETAG_BITS))
    }

    pub fn immediate(widetag: Widetag) -> Self {
        Self(widetag.to_u8() as u64)
    }

    pub fn is_fixnum(&self) -> bool {
        self.0 & 1 == 0
    }

    pub fn fixnum_value(&self) -> Option<i64> {
        if self.is_fixnum() {
            Some((self.0 as i64) >> 1)
        } else {
            None
        }
    }

    pub fn is_pointer(&self) -> bool {
        self.0 & 3 == 3
    }

    pub fn lowtag(&self) -> Option<Lowtag> {
        if self.is_pointer() {
            Lowtag::from_bits(self.0)
        } else {
            None
        }
    }

    pub fn is_other_pointer(&self) -> bool {
        self.lowtag() == Some(Lowtag::OtherPointer)
    }

    pub fn native_address(&self) -> Option<Address> {
        if self.is_pointer() {
            Some(Address::new(self.0 & !LOWTAG_MASK))
        } else {
            None
        }
    }

    pub fn widetag_bits(&self) -> u8 {
        (self.0 & WIDETAG_MASK) as u8
    }

    /// True for header words. Immediates share the `01` low bits but are
    /// not headers.
    pub fn is_header(&self) -> bool {
        self.0 & 3 == 1 && Widetag::from_u8(self.widetag_bits()).is_header()
    }

    pub fn is_immediate(&self) -> bool {
        self.0 & 3 == 1 && Widetag::from_u8(self.widetag_bits()).is_immediate()
    }

    pub fn header_data(&self) -> u64 {
        self.0 >> N_WIDETAG_BITS
    }
}

impl fmt::Debug for LispObj {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(value) = self.fixnum_value() {
            write!(f, "LispObj(fixnum {})", value)
        } else if let Some(lowtag) = self.lowtag() {
            write!(f, "LispObj({:?} 0x{:x})", lowtag, self.0)
        } else {
            write!(f, "LispObj({} 0x{:x})", Widetag::from_u8(self.widetag_bits()).name(), self.0)
        }
    }
}
