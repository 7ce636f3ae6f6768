//! Receivable (pending) entry types.
//!
//! A send block creates a pending entry keyed by the receiving account and
//! the send's hash; the matching receive block consumes it. The two-part key
//! keeps all of an account's receivables adjacent under byte-wise key
//! ordering, which the store's range scans rely on.

use serde::{Deserialize, Serialize};

use crate::account::Account;
use crate::amount::Amount;
use crate::epoch::Epoch;
use crate::hash::BlockHash;

/// Key of a receivable entry: who may receive it, created by which send.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PendingKey {
    pub receiver: Account,
    pub send_hash: BlockHash,
}

impl PendingKey {
    pub fn new(receiver: Account, send_hash: BlockHash) -> Self {
        Self {
            receiver,
            send_hash,
        }
    }

    /// Concatenated fixed-width key: receiver then send hash. Byte-wise
    /// comparison of the result matches the derived `Ord` on the struct.
    pub fn to_bytes(&self) -> [u8; 64] {
        let mut bytes = [0u8; 64];
        bytes[..32].copy_from_slice(self.receiver.as_bytes());
        bytes[32..].copy_from_slice(self.send_hash.as_bytes());
        bytes
    }

    pub fn from_bytes(bytes: &[u8; 64]) -> Self {
        let mut receiver = [0u8; 32];
        let mut send_hash = [0u8; 32];
        receiver.copy_from_slice(&bytes[..32]);
        send_hash.copy_from_slice(&bytes[32..]);
        Self {
            receiver: Account::new(receiver),
            send_hash: BlockHash::new(send_hash),
        }
    }
}

/// Value of a receivable entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingInfo {
    /// Account that sent the funds. `Account::ZERO` when the send block has
    /// been pruned and the sender can no longer be derived.
    pub source: Account,
    pub amount: Amount,
    /// Epoch of the send block. Receiving an entry with an epoch newer than
    /// the receiver's chain upgrades the chain to it.
    pub epoch: Epoch,
}

impl PendingInfo {
    pub fn new(source: Account, amount: Amount, epoch: Epoch) -> Self {
        Self {
            source,
            amount,
            epoch,
        }
    }
}
