// Thu Oct 15 2026 - Alex

pub mod cursor;
pub mod error;
pub mod symbol_scanner;
pub mod type_scanner;
pub mod walker;

pub use cursor::ScanCursor;
pub use error::HeapError;
pub use symbol_scanner::HeapSymbolScanner;
pub use type_scanner::{HeapTypeScanner, ScanStep, TypeScan};
pub use walker::ObjectWalker;
