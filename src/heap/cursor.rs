// Thu Oct 15 2026 - Alex

use crate::layout::ObjectInfo;
use crate::memory::Address;
use std::fmt;

/// Resumable position of a type scan. Passed in and handed back by value,
/// so two scans never share mutable state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanCursor {
    next_address: Address,
    remaining_budget: u64,
    exhausted: bool,
}

impl ScanCursor {
    pub fn new(start: Address, budget: u64) -> Self {
        Self {
            next_address: start,
            remaining_budget: budget,
            exhausted: false,
        }
    }

    pub fn unbounded(start: Address) -> Self {
        Self::new(start, u64::MAX)
    }

    pub fn next_address(&self) -> Address {
        self.next_address
    }

    pub fn remaining_budget(&self) -> u64 {
        self.remaining_budget
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Cursor just past `info`, one object of budget spent. Used to resume
    /// after a match.
    pub fn past(self, info: &ObjectInfo) -> Self {
        Self {
            next_address: info.next(),
            remaining_budget: self.remaining_budget.saturating_sub(1),
            exhausted: self.exhausted,
        }
    }

    pub(crate) fn at(self, next_address: Address, remaining_budget: u64) -> Self {
        Self {
            next_address,
            remaining_budget,
            exhausted: false,
        }
    }

    pub(crate) fn exhaust(self) -> Self {
        Self {
            exhausted: true,
            ..self
        }
    }
}

impl fmt::Display for ScanCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.exhausted {
            write!(f, "{} (exhausted)", self.next_address)
        } else {
            write!(f, "{} ({} left)", self.next_address, self.remaining_budget)
        }
    }
}
