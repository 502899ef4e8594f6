// Fri Oct 16 2026 - Alex

use crate::config::ScanConfig;
use crate::heap::{HeapError, ObjectWalker};
use crate::layout::{ObjectDescriptor, Widetag, OBJECT_ALIGN_BYTES};
use crate::memory::{Address, MemoryManager, MemoryReader};
use crate::utils::logging::ScopedTimer;
use std::sync::Arc;

/// Finds symbols by reading the heap itself, without a namespace table.
pub struct HeapSymbolScanner {
    descriptor: ObjectDescriptor,
}

impl HeapSymbolScanner {
    pub fn new(reader: Arc<dyn MemoryReader>) -> Self {
        Self::with_config(reader, &ScanConfig::default())
    }

    pub fn with_config(reader: Arc<dyn MemoryReader>, config: &ScanConfig) -> Self {
        Self {
            descriptor: ObjectDescriptor::with_config(reader, config),
        }
    }

    pub fn from_descriptor(descriptor: ObjectDescriptor) -> Self {
        Self { descriptor }
    }

    /// Lowest-addressed symbol in `[start, end)` whose name is exactly `name`.
    ///
    /// Symbols with the same name in different packages always resolve to
    /// the one at the lowest address.
    pub fn find_symbol_by_name(
        &self,
        name: &str,
        start: Address,
        end: Address,
    ) -> Result<Option<Address>, HeapError> {
        check_bounds(name, start, end)?;
        if start == end {
            return Ok(None);
        }
        self.matches(name, start, end, true).map(|found| found.into_iter().next())
    }

    /// Every symbol named `name` in `[start, end)`, ascending.
    pub fn find_all_by_name(
        &self,
        name: &str,
        start: Address,
        end: Address,
    ) -> Result<Vec<Address>, HeapError> {
        check_bounds(name, start, end)?;
        if start == end {
            return Ok(Vec::new());
        }
        self.matches(name, start, end, false)
    }

    /// Search each space the memory manager currently reports, in order.
    pub fn find_symbol_in_spaces(
        &self,
        name: &str,
        manager: &dyn MemoryManager,
    ) -> Result<Option<Address>, HeapError> {
        if name.is_empty() {
            return Err(HeapError::invalid("symbol name is empty"));
        }
        for space in manager.spaces() {
            log::debug!("searching {} for symbol {:?}", space, name);
            if let Some(found) = self.find_symbol_by_name(name, space.start(), space.end())? {
                return Ok(Some(found));
            }
        }
        Ok(None)
    }

    fn matches(
        &self,
        name: &str,
        start: Address,
        end: Address,
        first_only: bool,
    ) -> Result<Vec<Address>, HeapError> {
        let _timer = ScopedTimer::new("symbol scan");
        let mut found = Vec::new();

        for info in ObjectWalker::new(&self.descriptor, start, end) {
            let info = info?;
            if info.widetag != Widetag::Symbol {
                continue;
            }
            let name_obj = self.descriptor.symbol_name_obj(info.address)?;
            match self.descriptor.string_equals(name_obj, name)? {
                Some(true) => {
                    found.push(info.address);
                    if first_only {
                        break;
                    }
                }
                Some(false) => {}
                None => log::debug!("symbol at {} has a non-string name {:?}", info.address, name_obj),
            }
        }

        log::debug!("symbol scan for {:?} in [{}, {}) found {}", name, start, end, found.len());
        Ok(found)
    }
}

fn check_bounds(name: &str, start: Address, end: Address) -> Result<(), HeapError> {
    if name.is_empty() {
        return Err(HeapError::invalid("symbol name is empty"));
    }
    if start > end {
        return Err(HeapError::invalid(format!("start {} is past end {}", start, end)));
    }
    let align = OBJECT_ALIGN_BYTES as usize;
    if !start.is_aligned(align) || !end.is_aligned(align) {
        return Err(HeapError::invalid(format!("bounds [{}, {}) are not two-word aligned", start, end)));
    }
    Ok(())
}
