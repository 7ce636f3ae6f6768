//! Legacy change block: switch the account's representative.

use lattica_crypto::blake2b_256_multi;
use lattica_types::{Account, BlockHash, Root, Signature};

use crate::sideband::BlockSideband;

/// The hashed fields of a change block. Moves no funds.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChangeHashables {
    pub previous: BlockHash,
    pub representative: Account,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChangeBlock {
    pub hashables: ChangeHashables,
    pub signature: Signature,
    pub work: u64,
    pub(crate) sideband: Option<BlockSideband>,
}

impl ChangeBlock {
    pub fn new(hashables: ChangeHashables, signature: Signature, work: u64) -> Self {
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
            self.hashables.representative.as_bytes(),
        ]))
    }

    pub fn root(&self) -> Root {
        self.hashables.previous.into_root()
    }
}
