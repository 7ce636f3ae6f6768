//! Per-account chain summary record.

use serde::{Deserialize, Serialize};

use crate::account::Account;
use crate::amount::Amount;
use crate::epoch::Epoch;
use crate::hash::BlockHash;
use crate::time::Timestamp;

/// Everything the ledger tracks about an opened account.
///
/// `head` is the frontier: the hash of the newest block in the account's
/// chain. An account row exists exactly while the account is opened; rolling
/// back the open block deletes it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    /// Hash of the newest block in the chain (the frontier).
    pub head: BlockHash,
    /// Representative the account's balance currently counts toward.
    pub representative: Account,
    /// Hash of the first block in the chain.
    pub open_block: BlockHash,
    /// Balance as of `head`.
    pub balance: Amount,
    /// When this record was last written (local observation).
    pub modified: Timestamp,
    /// Number of blocks in the chain, so `head` has height `block_count`.
    pub block_count: u64,
    /// Format version of the chain; only ever increases.
    pub epoch: Epoch,
}
