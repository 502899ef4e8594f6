// Fri Oct 16 2026 - Alex

use crate::config::ScanConfig;
use crate::heap::{HeapError, ScanCursor};
use crate::layout::{ObjectDescriptor, ObjectInfo, Widetag};
use crate::memory::{Address, MemoryReader};
use std::sync::Arc;

/// Outcome of one `find_next_of_type` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanStep {
    pub found: Option<ObjectInfo>,
    pub cursor: ScanCursor,
}

impl ScanStep {
    pub fn found(&self) -> bool {
        self.found.is_some()
    }
}

pub struct HeapTypeScanner {
    descriptor: ObjectDescriptor,
    default_budget: u64,
}

impl HeapTypeScanner {
    pub fn new(reader: Arc<dyn MemoryReader>) -> Self {
        Self::with_config(reader, &ScanConfig::default())
    }

    pub fn with_config(reader: Arc<dyn MemoryReader>, config: &ScanConfig) -> Self {
        Self {
            descriptor: ObjectDescriptor::with_config(reader, config),
            default_budget: config.default_budget,
        }
    }

    pub fn from_descriptor(descriptor: ObjectDescriptor, default_budget: u64) -> Self {
        Self {
            descriptor,
            default_budget,
        }
    }

    pub fn descriptor(&self) -> &ObjectDescriptor {
        &self.descriptor
    }

    /// Fresh cursor at `start` carrying the configured budget.
    pub fn cursor_at(&self, start: Address) -> ScanCursor {
        ScanCursor::new(start, self.default_budget)
    }

    /// Advance from `cursor` to the next object whose widetag is `widetag`.
    ///
    /// On a match the returned cursor still points at the match; resume with
    /// `step.cursor.past(&info)`. Running out of budget or reaching `end`
    /// yields `found: None` and an exhausted cursor, and every later call
    /// with that cursor returns it unchanged.
    pub fn find_next_of_type(
        &self,
        widetag: Widetag,
        cursor: ScanCursor,
        end: Address,
    ) -> Result<ScanStep, HeapError> {
        if cursor.is_exhausted() {
            return Ok(ScanStep { found: None, cursor });
        }

        let mut at = cursor.next_address();
        let mut remaining = cursor.remaining_budget();

        loop {
            if remaining == 0 || at >= end {
                log::debug!("type scan for {} exhausted at {} ({} left)", widetag, at, remaining);
                return Ok(ScanStep {
                    found: None,
                    cursor: cursor.at(at, remaining).exhaust(),
                });
            }

            let info = self.descriptor.decode(at, end)?;
            if info.widetag == widetag {
                return Ok(ScanStep {
                    found: Some(info),
                    cursor: cursor.at(at, remaining),
                });
            }

            log::trace!("skip {} at {} ({} words)", info.widetag, at, info.size_words);
            at = info.next();
            remaining -= 1;
        }
    }

    /// Iterator over every match in `[start, end)`, built on
    /// [`find_next_of_type`](Self::find_next_of_type).
    pub fn scan(&self, widetag: Widetag, start: Address, end: Address) -> TypeScan<'_> {
        self.scan_from(widetag, self.cursor_at(start), end)
    }

    pub fn scan_from(&self, widetag: Widetag, cursor: ScanCursor, end: Address) -> TypeScan<'_> {
        TypeScan {
            scanner: self,
            widetag,
            cursor,
            end,
            done: false,
        }
    }
}

pub struct TypeScan<'a> {
    scanner: &'a HeapTypeScanner,
    widetag: Widetag,
    cursor: ScanCursor,
    end: Address,
    done: bool,
}

impl<'a> TypeScan<'a> {
    pub fn cursor(&self) -> ScanCursor {
        self.cursor
    }
}

impl<'a> Iterator for TypeScan<'a> {
    type Item = Result<ObjectInfo, HeapError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.scanner.find_next_of_type(self.widetag, self.cursor, self.end) {
            Ok(ScanStep { found: Some(info), cursor }) => {
                self.cursor = cursor.past(&info);
                Some(Ok(info))
            }
            Ok(ScanStep { found: None, cursor }) => {
                self.cursor = cursor;
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{HeapBuilder, LispObj};
    use crate::memory::{HeapImage, MemoryError, MemoryRange};

    fn scanner_for(builder: HeapBuilder) -> (HeapTypeScanner, MemoryRange) {
        let (image, range) = builder.build_single().unwrap();
        (HeapTypeScanner::new(Arc::new(image)), range)
    }

    #[test]
    fn test_cons_symbol_vector_scenario() {
        let mut builder = HeapBuilder::new(Address::new(0x20000));
        builder.cons(LispObj::fixnum(1), LispObj::fixnum(2));
        let x = builder.symbol("X", None, 3);
        builder.vector(&[LispObj::fixnum(9)]);
        let (scanner, range) = scanner_for(builder);

        let step = scanner
            .find_next_of_type(Widetag::Symbol, ScanCursor::new(range.start(), 10), range.end())
            .unwrap();
        assert!(step.found());
        assert_eq!(step.cursor.next_address(), x);
        // cons examined and skipped
        assert_eq!(step.cursor.remaining_budget(), 9);

        let info = step.found.unwrap();
        let step = scanner
            .find_next_of_type(Widetag::Symbol, step.cursor.past(&info), range.end())
            .unwrap();
        assert!(!step.found());
        assert!(step.cursor.is_exhausted());
        assert_eq!(step.cursor.next_address(), range.end());
    }

    #[test]
    fn test_enumerates_every_match_once_in_order() {
        let mut builder = HeapBuilder::new(Address::new(0x20000));
        let mut expected = Vec::new();
        for i in 0..5 {
            builder.cons(LispObj::fixnum(i), LispObj::fixnum(i));
            expected.push(builder.vector(&vec![LispObj::fixnum(i); i as usize]));
            builder.double_float(i as f64);
        }
        let (scanner, range) = scanner_for(builder);

        let mut cursor = ScanCursor::unbounded(range.start());
        let mut seen = Vec::new();
        loop {
            let step = scanner.find_next_of_type(Widetag::SimpleVector, cursor, range.end()).unwrap();
            match step.found {
                Some(info) => {
                    seen.push(info.address);
                    cursor = step.cursor.past(&info);
                }
                None => {
                    cursor = step.cursor;
                    break;
                }
            }
        }
        assert_eq!(seen, expected);

        let again = scanner.find_next_of_type(Widetag::SimpleVector, cursor, range.end()).unwrap();
        assert!(!again.found());
        assert_eq!(again.cursor, cursor);
    }

    #[test]
    fn test_zero_budget_reads_nothing() {
        // Nothing is mapped at this address, so any read would fail.
        let scanner = HeapTypeScanner::new(Arc::new(HeapImage::new()));
        let start = Address::new(0x9000);
        let step = scanner
            .find_next_of_type(Widetag::Symbol, ScanCursor::new(start, 0), Address::new(0xA000))
            .unwrap();
        assert!(!step.found());
        assert!(step.cursor.is_exhausted());
        assert_eq!(step.cursor.next_address(), start);
    }

    #[test]
    fn test_budget_limits_objects_examined() {
        let mut builder = HeapBuilder::new(Address::new(0x20000));
        for i in 0..4 {
            builder.cons(LispObj::fixnum(i), LispObj::fixnum(i));
        }
        let sym = builder.symbol_raw(LispObj::fixnum(0), LispObj::fixnum(0), LispObj::fixnum(0));
        let (scanner, range) = scanner_for(builder);

        let short = scanner
            .find_next_of_type(Widetag::Symbol, ScanCursor::new(range.start(), 4), range.end())
            .unwrap();
        assert!(!short.found());
        assert_eq!(short.cursor.next_address(), sym);

        let enough = scanner
            .find_next_of_type(Widetag::Symbol, ScanCursor::new(range.start(), 5), range.end())
            .unwrap();
        assert_eq!(enough.found.map(|i| i.address), Some(sym));
    }

    #[test]
    fn test_corruption_is_distinct_from_exhaustion() {
        let mut builder = HeapBuilder::new(Address::new(0x20000));
        builder.cons(LispObj::fixnum(1), LispObj::fixnum(2));
        builder.raw(&[LispObj::header(Widetag::SimpleVector, 0).raw(), LispObj::fixnum(1000).raw()]);
        builder.symbol_raw(LispObj::fixnum(0), LispObj::fixnum(0), LispObj::fixnum(0));
        let (scanner, range) = scanner_for(builder);

        let err = scanner
            .find_next_of_type(Widetag::Symbol, scanner.cursor_at(range.start()), range.end())
            .unwrap_err();
        assert!(err.is_corruption());

        let results: Vec<_> = scanner.scan(Widetag::Symbol, range.start(), range.end()).collect();
        assert_eq!(results.len(), 1);
        assert!(results[0].is_err());
    }

    #[test]
    fn test_unmapped_cursor_surfaces_memory_error() {
        let scanner = HeapTypeScanner::new(Arc::new(HeapImage::new()));
        let err = scanner
            .find_next_of_type(Widetag::Cons, ScanCursor::new(Address::new(0x9000), 1), Address::new(0xA000))
            .unwrap_err();
        assert!(matches!(err, HeapError::Memory(MemoryError::OutOfBounds(0x9000))));
    }

    #[test]
    fn test_scan_iterator_collects_conses() {
        let mut builder = HeapBuilder::new(Address::new(0x20000));
        let a = builder.cons(LispObj::fixnum(1), LispObj::fixnum(2));
        builder.base_string("skip me");
        let b = builder.cons(LispObj::immediate(Widetag::Character), LispObj::fixnum(0));
        builder.filler(3);
        let (scanner, range) = scanner_for(builder);

        let found: Vec<Address> = scanner
            .scan(Widetag::Cons, range.start(), range.end())
            .map(|r| r.unwrap().address)
            .collect();
        assert_eq!(found, vec![a, b]);
    }
}
