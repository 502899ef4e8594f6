// Thu Oct 15 2026 - Alex

use crate::heap::HeapError;
use crate::layout::{ObjectDescriptor, ObjectInfo};
use crate::memory::Address;

/// Visits every object in `[start, end)` in ascending address order.
/// Yields at most one error, after which it is fused.
pub struct ObjectWalker<'a> {
    descriptor: &'a ObjectDescriptor,
    next: Address,
    end: Address,
    failed: bool,
}

impl<'a> ObjectWalker<'a> {
    pub fn new(descriptor: &'a ObjectDescriptor, start: Address, end: Address) -> Self {
        Self {
            descriptor,
            next: start,
            end,
            failed: false,
        }
    }

    pub fn position(&self) -> Address {
        self.next
    }
}

impl<'a> Iterator for ObjectWalker<'a> {
    type Item = Result<ObjectInfo, HeapError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.next >= self.end {
            return None;
        }
        match self.descriptor.decode(self.next, self.end) {
            Ok(info) => {
                self.next = info.next();
                Some(Ok(info))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

impl<'a> std::iter::FusedIterator for ObjectWalker<'a> {}
