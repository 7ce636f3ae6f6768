//! Aggregate counters kept in memory alongside the store.
//!
//! The counters are maintained incrementally under the same write
//! transaction that mutates the tables, and rebuilt from a full table scan
//! when the ledger is opened.

use std::sync::atomic::AtomicU64;

/// Ledger-wide counters, cheap to read from any thread.
///
/// `block_count` includes pruned blocks; the number of block bodies actually
/// resident in the store is `block_count - pruned_count`.
#[derive(Debug, Default)]
pub struct LedgerCache {
    pub block_count: AtomicU64,
    pub account_count: AtomicU64,
    pub cemented_count: AtomicU64,
    pub pruned_count: AtomicU64,
}

/// Selects which caches to rebuild when opening the ledger.
///
/// Skipping a scan leaves the corresponding counter at zero, which is only
/// useful for tools that never consult it.
#[derive(Clone, Debug)]
pub struct GenerateCacheFlags {
    pub reps: bool,
    pub block_count: bool,
    pub account_count: bool,
    pub cemented_count: bool,
    pub pruned_count: bool,
}

impl GenerateCacheFlags {
    pub fn new() -> Self {
        Self {
            reps: true,
            block_count: true,
            account_count: true,
            cemented_count: true,
            pruned_count: true,
        }
    }

    pub fn all_disabled() -> Self {
        Self {
            reps: false,
            block_count: false,
            account_count: false,
            cemented_count: false,
            pruned_count: false,
        }
    }
}

impl Default for GenerateCacheFlags {
    fn default() -> Self {
        Self::new()
    }
}
