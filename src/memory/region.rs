// Wed Oct 14 2026 - Alex

use crate::memory::{Address, MemoryRange};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpaceKind {
    ReadOnly,
    Static,
    Dynamic { generation: u8 },
}

impl SpaceKind {
    pub fn name(&self) -> &'static str {
        match self {
            SpaceKind::ReadOnly => "read-only",
            SpaceKind::Static => "static",
            SpaceKind::Dynamic { .. } => "dynamic",
        }
    }
}

/// One contiguous heap space as reported by the memory manager.
#[derive(Debug, Clone)]
pub struct HeapRegion {
    range: MemoryRange,
    space: SpaceKind,
    name: String,
}

impl HeapRegion {
    pub fn new(range: MemoryRange, space: SpaceKind) -> Self {
        Self {
            range,
            space,
            name: space.name().to_string(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn range(&self) -> &MemoryRange {
        &self.range
    }

    pub fn space(&self) -> SpaceKind {
        self.space
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start(&self) -> Address {
        self.range.start()
    }

    pub fn end(&self) -> Address {
        self.range.end()
    }

    pub fn size(&self) -> u64 {
        self.range.size()
    }

    pub fn contains(&self, addr: Address) -> bool {
        self.range.contains(addr)
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self.space, SpaceKind::Dynamic { .. })
    }
}

impl fmt::Display for HeapRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.space {
            SpaceKind::Dynamic { generation } => {
                write!(f, "{} {} gen{}", self.range, self.name, generation)
            }
            _ => write!(f, "{} {}", self.range, self.name),
        }
    }
}
