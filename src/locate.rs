// Sat Oct 17 2026 - Alex

use crate::config::ScanConfig;
use crate::heap::{HeapError, HeapSymbolScanner};
use crate::layout::ObjectDescriptor;
use crate::memory::{Address, MemoryManager, MemoryReader};
use crate::symbol::{NamespaceTable, PackageSymbolResolver};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupSource {
    Namespace,
    HeapScan,
}

impl fmt::Display for LookupSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupSource::Namespace => write!(f, "namespace"),
            LookupSource::HeapScan => write!(f, "heap scan"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Located {
    pub address: Address,
    pub source: LookupSource,
}

/// Namespace lookup with a heap-scan fallback.
///
/// The heap scan matches on name only, so on fallback the package name is
/// not used and the lowest-addressed symbol with that name wins.
pub struct SymbolLocator {
    packages: Option<PackageSymbolResolver>,
    scanner: HeapSymbolScanner,
    descriptor: ObjectDescriptor,
    manager: Arc<dyn MemoryManager>,
    verify: bool,
}

impl SymbolLocator {
    pub fn new(reader: Arc<dyn MemoryReader>, manager: Arc<dyn MemoryManager>) -> Self {
        Self::with_config(reader, manager, &ScanConfig::default())
    }

    pub fn with_config(
        reader: Arc<dyn MemoryReader>,
        manager: Arc<dyn MemoryManager>,
        config: &ScanConfig,
    ) -> Self {
        let descriptor = ObjectDescriptor::with_config(reader, config);
        Self {
            packages: None,
            scanner: HeapSymbolScanner::from_descriptor(descriptor.clone()),
            descriptor,
            manager,
            verify: config.verify_namespace_hits,
        }
    }

    pub fn with_namespace(mut self, table: Arc<dyn NamespaceTable>) -> Self {
        self.packages = Some(PackageSymbolResolver::new(table));
        self
    }

    pub fn locate(&self, package: &str, name: &str) -> Result<Option<Located>, HeapError> {
        if let Some(packages) = &self.packages {
            let lookup = if self.verify {
                packages.resolve_verified(package, name, &self.descriptor)
            } else {
                packages.resolve(package, name)
            };
            match lookup {
                Ok(Some(found)) => {
                    return Ok(Some(Located {
                        address: found.symbol,
                        source: LookupSource::Namespace,
                    }))
                }
                Ok(None) => log::debug!("{}::{} not in namespace table, scanning heap", package, name),
                Err(HeapError::Corruption { address, reason }) => {
                    log::warn!("namespace table untrusted ({} at {}), scanning heap", reason, address)
                }
                Err(e) => return Err(e),
            }
        } else if name.is_empty() {
            return Err(HeapError::invalid("symbol name is empty"));
        }

        Ok(self
            .scanner
            .find_symbol_in_spaces(name, self.manager.as_ref())?
            .map(|address| Located {
                address,
                source: LookupSource::HeapScan,
            }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{HeapBuilder, LispObj};
    use crate::memory::HeapImage;
    use crate::symbol::PackageTable;

    fn heap() -> (Arc<HeapImage>, PackageTable, Address, Address) {
        let mut builder = HeapBuilder::new(Address::new(0x5_0000));
        let list = builder.intern("CL", "LIST", 0);
        builder.cons(LispObj::fixnum(0), LispObj::fixnum(0));
        let orphan = builder.symbol("DLOPEN", Some("SB-ALIEN"), 0);
        let table = builder.package_table();
        let image = builder.build(crate::memory::SpaceKind::Dynamic { generation: 0 }).unwrap();
        (Arc::new(image), table, list, orphan)
    }

    #[test]
    fn test_prefers_namespace() {
        let (image, table, list, _) = heap();
        let locator = SymbolLocator::new(image.clone(), image).with_namespace(Arc::new(table));

        let found = locator.locate("CL", "LIST").unwrap().unwrap();
        assert_eq!(found, Located { address: list, source: LookupSource::Namespace });
    }

    #[test]
    fn test_falls_back_to_heap_scan() {
        let (image, table, _, orphan) = heap();
        let locator = SymbolLocator::new(image.clone(), image).with_namespace(Arc::new(table));

        let found = locator.locate("SB-ALIEN", "DLOPEN").unwrap().unwrap();
        assert_eq!(found, Located { address: orphan, source: LookupSource::HeapScan });
        assert_eq!(locator.locate("CL", "VECTOR").unwrap(), None);
    }

    #[test]
    fn test_untrusted_table_falls_back() {
        let (image, mut table, list, orphan) = heap();
        table.intern("CL", "LIST", orphan);
        let locator = SymbolLocator::new(image.clone(), image).with_namespace(Arc::new(table));

        let found = locator.locate("CL", "LIST").unwrap().unwrap();
        assert_eq!(found, Located { address: list, source: LookupSource::HeapScan });
    }

    #[test]
    fn test_table_entry_outside_heap_falls_back() {
        let (image, mut table, list, _) = heap();
        table.intern("CL", "LIST", Address::new(0xdead_0000));
        let locator = SymbolLocator::new(image.clone(), image).with_namespace(Arc::new(table));

        let found = locator.locate("CL", "LIST").unwrap().unwrap();
        assert_eq!(found, Located { address: list, source: LookupSource::HeapScan });
    }

    #[test]
    fn test_without_namespace() {
        let (image, _, list, _) = heap();
        let locator = SymbolLocator::new(image.clone(), image);

        assert_eq!(locator.locate("ANY", "LIST").unwrap().unwrap().address, list);
        assert!(locator.locate("CL", "").unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_invalid_argument_is_not_swallowed() {
        let (image, table, _, _) = heap();
        let locator = SymbolLocator::new(image.clone(), image).with_namespace(Arc::new(table));
        assert!(locator.locate("", "LIST").unwrap_err().is_invalid_argument());
    }
}
