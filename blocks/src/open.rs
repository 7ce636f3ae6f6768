//! Legacy open block: the first block of an account's chain.

use lattica_crypto::blake2b_256_multi;
use lattica_types::{Account, BlockHash, Root, Signature};

use crate::sideband::BlockSideband;

/// The hashed fields of an open block. Unlike other legacy blocks an open
/// names its own account, because there is no previous block to derive it
/// from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OpenHashables {
    pub source: BlockHash,
    pub representative: Account,
    pub account: Account,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpenBlock {
    pub hashables: OpenHashables,
    pub signature: Signature,
    pub work: u64,
    pub(crate) sideband: Option<BlockSideband>,
}

impl OpenBlock {
    pub fn new(hashables: OpenHashables, signature: Signature, work: u64) -> Self {
        Self {
            hashables,
            signature,
            work,
            sideband: None,
        }
    }

    pub fn hash(&self) -> BlockHash {
        BlockHash::new(blake2b_256_multi(&[
            self.hashables.source.as_bytes(),
            self.hashables.representative.as_bytes(),
            self.hashables.account.as_bytes(),
        ]))
    }

    /// An open block has no previous, so its work root is the account.
    pub fn root(&self) -> Root {
        self.hashables.account.into_root()
    }
}
