// Wed Oct 14 2026 - Alex

use serde::{Deserialize, Serialize};
use std::fmt;

/// Runtime type discriminator found in the low byte of a header word.
///
/// `Cons` has no header of its own; it reuses the list-pointer lowtag so
/// conses can be requested from the type scanner like any other type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Widetag {
    Cons,
    Bignum,
    Ratio,
    DoubleFloat,
    Complex,
    Symbol,
    Instance,
    Closure,
    Sap,
    ValueCell,
    WeakPointer,
    Fdefn,
    Filler,
    SimpleVector,
    SimpleBaseString,
    SimpleCharacterString,
    Character,
    UnboundMarker,
    Unknown(u8),
}

impl Widetag {
    pub fn from_u8(value: u8) -> Self {
        match value {
            0x07 => Widetag::Cons,
            0x11 => Widetag::Bignum,
            0x15 => Widetag::Ratio,
            0x19 => Widetag::DoubleFloat,
            0x1D => Widetag::Complex,
            0x2D => Widetag::Symbol,
            0x31 => Widetag::Instance,
            0x39 => Widetag::Closure,
            0x41 => Widetag::Sap,
            0x49 => Widetag::ValueCell,
            0x4D => Widetag::WeakPointer,
            0x55 => Widetag::Fdefn,
            0x59 => Widetag::Filler,
            0x89 => Widetag::SimpleVector,
            0xE1 => Widetag::SimpleBaseString,
            0xE5 => Widetag::SimpleCharacterString,
            0x61 => Widetag::Character,
            0x65 => Widetag::UnboundMarker,
            _ => Widetag::Unknown(value),
        }
    }

    pub fn to_u8(&self) -> u8 {
        match self {
            Widetag::Cons => 0x07,
            Widetag::Bignum => 0x11,
            Widetag::Ratio => 0x15,
            Widetag::DoubleFloat => 0x19,
            Widetag::Complex => 0x1D,
            Widetag::Symbol => 0x2D,
            Widetag::Instance => 0x31,
            Widetag::Closure => 0x39,
            Widetag::Sap => 0x41,
            Widetag::ValueCell => 0x49,
            Widetag::WeakPointer => 0x4D,
            Widetag::Fdefn => 0x55,
            Widetag::Filler => 0x59,
            Widetag::SimpleVector => 0x89,
            Widetag::SimpleBaseString => 0xE1,
            Widetag::SimpleCharacterString => 0xE5,
            Widetag::Character => 0x61,
            Widetag::UnboundMarker => 0x65,
            Widetag::Unknown(v) => *v,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Widetag::Cons => "cons",
            Widetag::Bignum => "bignum",
            Widetag::Ratio => "ratio",
            Widetag::DoubleFloat => "double-float",
            Widetag::Complex => "complex",
            Widetag::Symbol => "symbol",
            Widetag::Instance => "instance",
            Widetag::Closure => "closure",
            Widetag::Sap => "sap",
            Widetag::ValueCell => "value-cell",
            Widetag::WeakPointer => "weak-pointer",
            Widetag::Fdefn => "fdefn",
            Widetag::Filler => "filler",
            Widetag::SimpleVector => "simple-vector",
            Widetag::SimpleBaseString => "simple-base-string",
            Widetag::SimpleCharacterString => "simple-character-string",
            Widetag::Character => "character",
            Widetag::UnboundMarker => "unbound-marker",
            Widetag::Unknown(_) => "unknown",
        }
    }

    pub fn is_header(&self) -> bool {
        !matches!(
            self,
            Widetag::Cons | Widetag::Character | Widetag::UnboundMarker | Widetag::Unknown(_)
        )
    }

    pub fn is_immediate(&self) -> bool {
        matches!(self, Widetag::Character | Widetag::UnboundMarker)
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Widetag::SimpleBaseString | Widetag::SimpleCharacterString)
    }

    /// Whole-object size in words when it does not depend on header data
    /// or a length slot.
    pub fn fixed_size(&self) -> Option<u64> {
        match self {
            Widetag::Cons => Some(2),
            Widetag::Ratio | Widetag::Complex => Some(3),
            Widetag::DoubleFloat | Widetag::Sap | Widetag::ValueCell | Widetag::WeakPointer => {
                Some(2)
            }
            Widetag::Fdefn => Some(4),
            Widetag::Symbol => Some(crate::layout::symbol_slots::SIZE),
            _ => None,
        }
    }
}

impl fmt::Display for Widetag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Widetag::Unknown(v) => write!(f, "unknown(0x{:02x})", v),
            other => write!(f, "{}", other.name()),
        }
    }
}
