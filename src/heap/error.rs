// Wed Oct 14 2026 - Alex

use crate::memory::{Address, MemoryError};
use thiserror::Error;

/// Failures of a lookup or scan. An absent symbol or an exhausted scan is
/// `Ok(None)` / `found: None`, never one of these.
#[derive(Error, Debug)]
pub enum HeapError {
    #[error("Heap corruption at {address}: {reason}")]
    Corruption { address: Address, reason: String },
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Memory error: {0}")]
    Memory(#[from] MemoryError),
}

impl HeapError {
    pub fn corruption(address: Address, reason: impl Into<String>) -> Self {
        HeapError::Corruption {
            address,
            reason: reason.into(),
        }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        HeapError::InvalidArgument(reason.into())
    }

    pub fn is_corruption(&self) -> bool {
        matches!(self, HeapError::Corruption { .. })
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, HeapError::InvalidArgument(_))
    }
}
