// Fri Oct 16 2026 - Alex

use crate::heap::HeapError;
use crate::layout::ObjectDescriptor;
use crate::memory::Address;
use crate::symbol::NamespaceTable;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackageLookup {
    pub symbol: Address,
    /// Diagnostic only; whatever the table reports, if anything.
    pub aux: Option<u32>,
}

/// Fast-path symbol lookup through the runtime's namespace table.
pub struct PackageSymbolResolver {
    table: Arc<dyn NamespaceTable>,
}

impl PackageSymbolResolver {
    pub fn new(table: Arc<dyn NamespaceTable>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &Arc<dyn NamespaceTable> {
        &self.table
    }

    pub fn resolve(&self, package: &str, symbol: &str) -> Result<Option<PackageLookup>, HeapError> {
        if package.is_empty() {
            return Err(HeapError::invalid("package name is empty"));
        }
        if symbol.is_empty() {
            return Err(HeapError::invalid("symbol name is empty"));
        }

        let found = self.table.lookup(package, symbol).map(|entry| PackageLookup {
            symbol: entry.symbol,
            aux: entry.bucket,
        });
        if found.is_none() {
            if self.table.has_package(package) {
                log::debug!("{}::{} not interned", package, symbol);
            } else {
                log::debug!("no package named {}", package);
            }
        }
        Ok(found)
    }

    /// [`resolve`](Self::resolve), then confirm the answer against the heap.
    ///
    /// A table entry that does not point at a symbol named `symbol` is
    /// reported as corruption, which is the signal that the table can no
    /// longer be trusted.
    pub fn resolve_verified(
        &self,
        package: &str,
        symbol: &str,
        descriptor: &ObjectDescriptor,
    ) -> Result<Option<PackageLookup>, HeapError> {
        let found = match self.resolve(package, symbol)? {
            Some(found) => found,
            None => return Ok(None),
        };

        let view = descriptor.symbol(found.symbol).map_err(|e| match e {
            HeapError::Memory(err) => HeapError::corruption(
                found.symbol,
                format!("namespace entry {}::{} is unreadable: {}", package, symbol, err),
            ),
            other => other,
        })?;
        if view.name != symbol {
            return Err(HeapError::corruption(
                found.symbol,
                format!("namespace entry {}::{} points at symbol {:?}", package, symbol, view.name),
            ));
        }
        Ok(Some(found))
    }
}
