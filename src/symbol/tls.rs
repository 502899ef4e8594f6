// Fri Oct 16 2026 - Alex

use crate::config::ScanConfig;
use crate::heap::{HeapError, ObjectWalker};
use crate::layout::{LispObj, ObjectDescriptor, SymbolView, Widetag, NO_TLS_INDEX};
use crate::memory::{Address, MemoryManager, MemoryReader};
use crate::utils::logging::ScopedTimer;
use ahash::AHashMap;
use std::sync::Arc;

/// A thread's dynamic-binding slots, indexed by TLS index. Read only.
pub trait ThreadLocalArray {
    fn len(&self) -> u32;

    fn slot(&self, index: u32) -> Option<LispObj>;
}

impl ThreadLocalArray for [LispObj] {
    fn len(&self) -> u32 {
        u32::try_from(<[LispObj]>::len(self)).unwrap_or(u32::MAX)
    }

    fn slot(&self, index: u32) -> Option<LispObj> {
        self.get(index as usize).copied()
    }
}

impl ThreadLocalArray for Vec<LispObj> {
    fn len(&self) -> u32 {
        u32::try_from(self.as_slice().len()).unwrap_or(u32::MAX)
    }

    fn slot(&self, index: u32) -> Option<LispObj> {
        self.as_slice().get(index as usize).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsBinding {
    pub index: u32,
    pub symbol: SymbolView,
    pub value: LispObj,
}

/// Snapshot of every assigned TLS index, taken in one pass over the heap.
#[derive(Debug, Clone, Default)]
pub struct TlsIndexMap {
    by_index: AHashMap<u32, Address>,
}

impl TlsIndexMap {
    pub fn get(&self, index: u32) -> Option<Address> {
        self.by_index.get(&index).copied()
    }

    pub fn len(&self) -> usize {
        self.by_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_index.is_empty()
    }
}

/// Maps a TLS index back to the symbol it was assigned to.
///
/// Lookups are linear in heap size; this serves debuggers and backtrace
/// printers, not the binding fast path.
pub struct TlsSymbolResolver {
    descriptor: ObjectDescriptor,
    manager: Arc<dyn MemoryManager>,
}

impl TlsSymbolResolver {
    pub fn new(reader: Arc<dyn MemoryReader>, manager: Arc<dyn MemoryManager>) -> Self {
        Self::with_config(reader, manager, &ScanConfig::default())
    }

    pub fn with_config(
        reader: Arc<dyn MemoryReader>,
        manager: Arc<dyn MemoryManager>,
        config: &ScanConfig,
    ) -> Self {
        Self {
            descriptor: ObjectDescriptor::with_config(reader, config),
            manager,
        }
    }

    pub fn resolve_from_tls_index(&self, index: u32) -> Result<Option<SymbolView>, HeapError> {
        if index == NO_TLS_INDEX {
            return Ok(None);
        }
        let _timer = ScopedTimer::new("tls reverse lookup");

        let mut found = None;
        self.for_each_symbol(|address, tls_index| {
            if tls_index == index {
                found = Some(address);
                return false;
            }
            true
        })?;

        match found {
            Some(address) => self.descriptor.symbol(address).map(Some),
            None => {
                log::debug!("no symbol owns TLS index {}", index);
                Ok(None)
            }
        }
    }

    pub fn build_index(&self) -> Result<TlsIndexMap, HeapError> {
        let _timer = ScopedTimer::new("tls index build");
        let mut by_index: AHashMap<u32, Address> = AHashMap::new();
        let mut duplicate = None;

        self.for_each_symbol(|address, tls_index| {
            if tls_index == NO_TLS_INDEX {
                return true;
            }
            if let Some(first) = by_index.insert(tls_index, address) {
                duplicate = Some((tls_index, first, address));
                return false;
            }
            true
        })?;

        if let Some((index, first, second)) = duplicate {
            return Err(HeapError::corruption(
                second,
                format!("TLS index {} already assigned to symbol at {}", index, first),
            ));
        }
        log::debug!("indexed {} thread-local symbols", by_index.len());
        Ok(TlsIndexMap { by_index })
    }

    /// Symbols with a live binding in `thread`, in slot order.
    pub fn dynamic_bindings(&self, thread: &dyn ThreadLocalArray) -> Result<Vec<TlsBinding>, HeapError> {
        let index = self.build_index()?;
        let no_value = LispObj::immediate(Widetag::UnboundMarker);
        let mut bindings = Vec::new();

        for slot in 1..thread.len() {
            let value = match thread.slot(slot) {
                Some(value) if value != no_value => value,
                _ => continue,
            };
            match index.get(slot) {
                Some(address) => bindings.push(TlsBinding {
                    index: slot,
                    symbol: self.descriptor.symbol(address)?,
                    value,
                }),
                None => log::warn!("TLS slot {} holds {:?} but no symbol owns it", slot, value),
            }
        }
        Ok(bindings)
    }

    /// Calls `visit(address, tls_index)` for every symbol in every space
    /// until it returns false.
    fn for_each_symbol<F>(&self, mut visit: F) -> Result<(), HeapError>
    where
        F: FnMut(Address, u32) -> bool,
    {
        for space in self.manager.spaces() {
            for info in ObjectWalker::new(&self.descriptor, space.start(), space.end()) {
                let info = info?;
                if info.widetag != Widetag::Symbol {
                    continue;
                }
                let tls_index = self.descriptor.tls_index(info.address)?;
                if !visit(info.address, tls_index) {
                    return Ok(());
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::HeapBuilder;
    use crate::memory::{HeapImage, SpaceKind};

    fn resolver_for(image: HeapImage) -> TlsSymbolResolver {
        let image = Arc::new(image);
        TlsSymbolResolver::new(image.clone(), image)
    }

    fn two_space_image() -> (HeapImage, Vec<(u32, Address)>) {
        let mut statics = HeapBuilder::new(Address::new(0x1_0000));
        let print = statics.symbol("*PRINT-BASE*", Some("CL"), 4);
        statics.symbol("CAR", Some("CL"), 0);
        let mut dynamic = HeapBuilder::new(Address::new(0x8_0000));
        dynamic.cons(LispObj::fixnum(1), LispObj::fixnum(2));
        let x = dynamic.symbol("*X*", Some("CL-USER"), 3);
        let y = dynamic.symbol("*Y*", None, 9);

        let mut image = HeapImage::new();
        let (region, words) = statics.finish(SpaceKind::Static).unwrap();
        image.add_space(region, words).unwrap();
        let (region, words) = dynamic.finish(SpaceKind::Dynamic { generation: 1 }).unwrap();
        image.add_space(region, words).unwrap();
        (image, vec![(4, print), (3, x), (9, y)])
    }

    #[test]
    fn test_every_assigned_index_resolves() {
        let (image, assigned) = two_space_image();
        let resolver = resolver_for(image);

        for (index, address) in assigned {
            let view = resolver.resolve_from_tls_index(index).unwrap().unwrap();
            assert_eq!(view.address, address);
            assert_eq!(view.tls_index, index);
        }
        let x = resolver.resolve_from_tls_index(3).unwrap().unwrap();
        assert_eq!(x.qualified_name(), "CL-USER::*X*");
    }

    #[test]
    fn test_sentinel_and_stale_indices() {
        let (image, _) = two_space_image();
        let resolver = resolver_for(image);

        assert_eq!(resolver.resolve_from_tls_index(NO_TLS_INDEX).unwrap(), None);
        assert_eq!(resolver.resolve_from_tls_index(77).unwrap(), None);
    }

    #[test]
    fn test_sentinel_reads_no_memory() {
        let resolver = resolver_for(HeapImage::new());
        assert_eq!(resolver.resolve_from_tls_index(0).unwrap(), None);
    }

    #[test]
    fn test_build_index_rejects_duplicates() {
        let mut builder = HeapBuilder::new(Address::new(0x1_0000));
        builder.symbol("A", None, 5);
        let second = builder.symbol("B", None, 5);
        let resolver = resolver_for(builder.build(SpaceKind::Static).unwrap());

        let err = resolver.build_index().unwrap_err();
        assert!(matches!(err, HeapError::Corruption { address, .. } if address == second));
    }

    #[test]
    fn test_dynamic_bindings() {
        let (image, _) = two_space_image();
        let resolver = resolver_for(image);
        let index = resolver.build_index().unwrap();
        assert_eq!(index.len(), 3);

        let unbound = LispObj::immediate(Widetag::UnboundMarker);
        let mut thread = vec![unbound; 12];
        thread[3] = LispObj::fixnum(10);
        thread[4] = LispObj::fixnum(16);
        // no symbol owns slot 7
        thread[7] = LispObj::fixnum(1);

        let bindings = resolver.dynamic_bindings(&thread).unwrap();
        let names: Vec<(u32, &str)> = bindings.iter().map(|b| (b.index, b.symbol.name.as_str())).collect();
        assert_eq!(names, vec![(3, "*X*"), (4, "*PRINT-BASE*")]);
        assert_eq!(bindings[1].value, LispObj::fixnum(16));
    }

    #[test]
    fn test_thread_array_length() {
        let thread = vec![LispObj::fixnum(0); 5];
        assert_eq!(ThreadLocalArray::len(&thread), 5);
        assert_eq!(ThreadLocalArray::len(thread.as_slice()), 5);
        assert_eq!(thread.slot(4), Some(LispObj::fixnum(0)));
        assert_eq!(thread.slot(5), None);
    }

    #[test]
    fn test_empty_name_at_end_of_space_resolves() {
        let base = Address::new(0x1_0000);
        let mut builder = HeapBuilder::new(base);
        let name_at = base.word(crate::layout::symbol_slots::SIZE);
        let sym = builder.symbol_raw(
            LispObj::pointer(name_at, crate::layout::Lowtag::OtherPointer),
            LispObj::fixnum(0),
            LispObj::fixnum(7),
        );
        builder.character_string("");
        let resolver = resolver_for(builder.build(SpaceKind::Static).unwrap());

        let view = resolver.resolve_from_tls_index(7).unwrap().unwrap();
        assert_eq!(view.address, sym);
        assert_eq!(view.name, "");
    }
}
