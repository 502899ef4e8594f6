// Thu Oct 15 2026 - Alex

pub mod resolver;
pub mod table;
pub mod tls;

pub use resolver::{PackageLookup, PackageSymbolResolver};
pub use table::{NamespaceEntry, NamespaceTable, Package, PackageTable};
pub use tls::{ThreadLocalArray, TlsBinding, TlsIndexMap, TlsSymbolResolver};
