//! Unified state block: one format for send, receive, open, change, and
//! epoch operations.

use lattica_crypto::blake2b_256_multi;
use lattica_types::{Account, Amount, BlockHash, Link, Root, Signature};

use crate::sideband::BlockSideband;

/// Domain-separation preamble mixed into every state block hash, so a state
/// block can never collide with a legacy block over the same field bytes.
const STATE_HASH_PREAMBLE: [u8; 32] = {
    let mut bytes = [0u8; 32];
    bytes[31] = 6;
    bytes
};

/// The hashed fields of a state block.
///
/// Every state block restates the full account state: owner, predecessor,
/// representative, and resulting balance. `link` carries the operation's
/// counterparty and is interpreted by the ledger from the balance change
/// (source hash, destination account, epoch marker, or zero).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StateHashables {
    pub account: Account,
    pub previous: BlockHash,
    pub representative: Account,
    pub balance: Amount,
    pub link: Link,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateBlock {
    pub hashables: StateHashables,
    pub signature: Signature,
    pub work: u64,
    pub(crate) sideband: Option<BlockSideband>,
}

impl StateBlock {
    pub fn new(hashables: StateHashables, signature: Signature, work: u64) -> Self {
        Self {
            hashables,
            signature,
            work,
            sideband: None,
        }
    }

    pub fn hash(&self) -> BlockHash {
        BlockHash::new(blake2b_256_multi(&[
            &STATE_HASH_PREAMBLE,
            self.hashables.account.as_bytes(),
            self.hashables.previous.as_bytes(),
            self.hashables.representative.as_bytes(),
            &self.hashables.balance.to_be_bytes(),
            self.hashables.link.as_bytes(),
        ]))
    }

    pub fn root(&self) -> Root {
        if self.hashables.previous.is_zero() {
            self.hashables.account.into_root()
        } else {
            self.hashables.previous.into_root()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> StateHashables {
        StateHashables {
            account: Account::new([1u8; 32]),
            previous: BlockHash::new([2u8; 32]),
            representative: Account::new([3u8; 32]),
            balance: Amount::new(4),
            link: Link::new([5u8; 32]),
        }
    }

    #[test]
    fn hash_covers_every_field() {
        let reference = StateBlock::new(base(), Signature::ZERO, 0).hash();

        let mut h = base();
        h.account = Account::new([9u8; 32]);
        assert_ne!(reference, StateBlock::new(h, Signature::ZERO, 0).hash());

        let mut h = base();
        h.previous = BlockHash::new([9u8; 32]);
        assert_ne!(reference, StateBlock::new(h, Signature::ZERO, 0).hash());

        let mut h = base();
        h.representative = Account::new([9u8; 32]);
        assert_ne!(reference, StateBlock::new(h, Signature::ZERO, 0).hash());

        let mut h = base();
        h.balance = Amount::new(9);
        assert_ne!(reference, StateBlock::new(h, Signature::ZERO, 0).hash());

        let mut h = base();
        h.link = Link::new([9u8; 32]);
        assert_ne!(reference, StateBlock::new(h, Signature::ZERO, 0).hash());
    }

    #[test]
    fn root_falls_back_to_account_for_first_block() {
        let mut h = base();
        h.previous = BlockHash::ZERO;
        let block = StateBlock::new(h, Signature::ZERO, 0);
        assert_eq!(block.root(), Account::new([1u8; 32]).into_root());

        let chained = StateBlock::new(base(), Signature::ZERO, 0);
        assert_eq!(chained.root(), BlockHash::new([2u8; 32]).into_root());
    }

    #[test]
    fn preamble_separates_state_hashes_from_legacy() {
        // A receive block hashes (previous, source); a state block over the
        // same two 32-byte values must not produce the same digest.
        let receive = crate::ReceiveBlock::new(
            crate::ReceiveHashables {
                previous: BlockHash::new([1u8; 32]),
                source: BlockHash::new([2u8; 32]),
            },
            Signature::ZERO,
            0,
        );
        let digest_without_preamble = blake2b_256_multi(&[
            BlockHash::new([1u8; 32]).as_bytes(),
            BlockHash::new([2u8; 32]).as_bytes(),
        ]);
        assert_eq!(receive.hash().as_bytes(), &digest_without_preamble);

        let state_digest = blake2b_256_multi(&[
            &STATE_HASH_PREAMBLE,
            BlockHash::new([1u8; 32]).as_bytes(),
            BlockHash::new([2u8; 32]).as_bytes(),
        ]);
        assert_ne!(state_digest, digest_without_preamble);
    }
}
