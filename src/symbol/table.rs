// Thu Oct 15 2026 - Alex

use crate::memory::Address;
use ahash::RandomState;
use indexmap::IndexMap;

/// What a namespace table knows about one interned symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamespaceEntry {
    pub symbol: Address,
    /// Table-specific diagnostic, e.g. the hash bucket the entry lives in.
    pub bucket: Option<u32>,
}

/// Structured `(package, symbol) -> symbol object` mapping owned by the
/// runtime's package system. Lookups are exact and case-sensitive.
pub trait NamespaceTable: Send + Sync {
    fn lookup(&self, package: &str, symbol: &str) -> Option<NamespaceEntry>;

    fn has_package(&self, package: &str) -> bool;
}

#[derive(Debug, Clone)]
pub struct Package {
    name: String,
    symbols: IndexMap<String, Address, RandomState>,
}

impl Package {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbols: IndexMap::with_hasher(RandomState::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbols(&self) -> impl Iterator<Item = (&str, Address)> {
        self.symbols.iter().map(|(name, address)| (name.as_str(), *address))
    }
}

/// In-memory namespace table. Entry indices are stable in insertion order
/// and are reported as the bucket.
#[derive(Debug, Clone, Default)]
pub struct PackageTable {
    packages: IndexMap<String, Package, RandomState>,
}

impl PackageTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_package(&mut self, name: &str) -> &mut Package {
        self.packages
            .entry(name.to_string())
            .or_insert_with(|| Package::new(name))
    }

    /// Record `symbol` as interned in `package`, replacing any previous entry.
    pub fn intern(&mut self, package: &str, symbol: &str, address: Address) {
        self.add_package(package).symbols.insert(symbol.to_string(), address);
    }

    pub fn package(&self, name: &str) -> Option<&Package> {
        self.packages.get(name)
    }

    pub fn packages(&self) -> impl Iterator<Item = &Package> {
        self.packages.values()
    }

    pub fn len(&self) -> usize {
        self.packages.values().map(Package::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl NamespaceTable for PackageTable {
    fn lookup(&self, package: &str, symbol: &str) -> Option<NamespaceEntry> {
        let package = self.packages.get(package)?;
        let (index, _, address) = package.symbols.get_full(symbol)?;
        Some(NamespaceEntry {
            symbol: *address,
            bucket: u32::try_from(index).ok(),
        })
    }

    fn has_package(&self, package: &str) -> bool {
        self.packages.contains_key(package)
    }
}
