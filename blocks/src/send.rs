//! Legacy send block: debit the sender's chain.

use lattica_crypto::blake2b_256_multi;
use lattica_types::{Account, Amount, BlockHash, Root, Signature};

use crate::sideband::BlockSideband;

/// The hashed fields of a send block.
///
/// `balance` is the sender's balance *after* the send; the amount moved is
/// the difference from the previous block's balance.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SendHashables {
    pub previous: BlockHash,
    pub destination: Account,
    pub balance: Amount,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SendBlock {
    pub hashables: SendHashables,
    pub signature: Signature,
    pub work: u64,
    pub(crate) sideband: Option<BlockSideband>,
}

impl SendBlock {
    pub fn new(hashables: SendHashables, signature: Signature, work: u64) -> Self {
        Self {
            hashables,
            signature,
            work,
            sideband: None,
        }
    }

    pub fn hash(&self) -> BlockHash {
        BlockHash::new(blake2b_256_multi(&[
            self.hashables.previous.as_bytes(),
            self.hashables.destination.as_bytes(),
            &self.hashables.balance.to_be_bytes(),
        ]))
    }

    pub fn root(&self) -> Root {
        self.hashables.previous.into_root()
    }
}
