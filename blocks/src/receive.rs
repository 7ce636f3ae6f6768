//! Legacy receive block: credit a previously sent amount.

use lattica_crypto::blake2b_256_multi;
use lattica_types::{BlockHash, Root, Signature};

use crate::sideband::BlockSideband;

/// The hashed fields of a receive block. `source` is the hash of the send
/// block whose receivable entry this block consumes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReceiveHashables {
    pub previous: BlockHash,
    pub source: BlockHash,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReceiveBlock {
    pub hashables: ReceiveHashables,
    pub signature: Signature,
    pub work: u64,
    pub(crate) sideband: Option<BlockSideband>,
}

impl ReceiveBlock {
    pub fn new(hashables: ReceiveHashables, signature: Signature, work: u64) -> Self {
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
            self.hashables.source.as_bytes(),
        ]))
    }

    pub fn root(&self) -> Root {
        self.hashables.previous.into_root()
    }
}
