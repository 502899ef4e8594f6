// Sat Oct 17 2026 - Alex

//! Symbol resolution and type scanning over a tagged-pointer heap.
//!
//! Lookups go through the namespace table when it can be trusted and fall
//! back to walking the heap's object headers when it cannot.

pub mod config;
pub mod heap;
pub mod layout;
pub mod locate;
pub mod memory;
pub mod symbol;
pub mod utils;

pub use config::ScanConfig;
pub use heap::{HeapError, HeapSymbolScanner, HeapTypeScanner, ScanCursor, ScanStep};
pub use layout::{LispObj, ObjectDescriptor, ObjectInfo, SymbolView, Widetag};
pub use locate::{Located, LookupSource, SymbolLocator};
pub use memory::{Address, HeapRegion, MemoryManager, MemoryReader};
pub use symbol::{NamespaceTable, PackageSymbolResolver, PackageTable, TlsSymbolResolver};
