//! The Lattica ledger: one chain per account, one writer for all of them.
//!
//! [`Ledger`] owns the rules of the block lattice. It validates and applies
//! blocks ([`Ledger::process`]), undoes them when consensus demands it
//! ([`Ledger::rollback`]), cements them once they are final
//! ([`Ledger::confirm`]) and discards cemented history
//! ([`Ledger::pruning_action`]). Everything else in this crate exists in
//! service of those four entry points: per-network constants, the in-memory
//! caches rebuilt at startup, and the error types the operations return.

pub mod cache;
pub mod constants;
pub mod error;
pub mod ledger;
pub mod rep_weight_cache;

mod pruning;
mod rollback;
mod validation;

#[cfg(test)]
mod test_utils;

pub use cache::{GenerateCacheFlags, LedgerCache};
pub use constants::{genesis_key, LedgerConstants};
pub use error::{ProcessError, RollbackError};
pub use ledger::Ledger;
pub use rep_weight_cache::RepWeightCache;
