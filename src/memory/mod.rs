// Wed Oct 14 2026 - Alex

pub mod address;
pub mod direct;
pub mod error;
pub mod image;
pub mod mmap;
pub mod range;
pub mod region;
pub mod traits;

pub use address::Address;
pub use direct::DirectMemory;
pub use error::MemoryError;
pub use image::HeapImage;
pub use mmap::MappedHeap;
pub use range::MemoryRange;
pub use region::{HeapRegion, SpaceKind};
pub use traits::{FixedSpaces, MemoryManager, MemoryReader};
