//! All Lattica block types and the canonical block codec.
//!
//! Block types:
//! - **Send**: debit the sender's chain, creating a receivable entry
//! - **Receive**: credit a previously sent amount onto the receiver's chain
//! - **Open**: first block of an account's chain, receiving its first funds
//! - **Change**: switch the account's representative
//! - **State**: unified format subsuming all of the above, one per operation
//!
//! A block that has been accepted into the ledger additionally carries a
//! [`BlockSideband`]: metadata derived during processing (height, successor,
//! settled balance, classification) that is stored with the block but never
//! hashed or signed.

pub mod builder;
pub mod change;
pub mod codec;
pub mod open;
pub mod receive;
pub mod send;
pub mod sideband;
pub mod state;

use lattica_types::{Account, Amount, BlockHash, Link, Root, Signature};

pub use builder::BlockBuilder;
pub use change::{ChangeBlock, ChangeHashables};
pub use codec::BlockCodecError;
pub use open::{OpenBlock, OpenHashables};
pub use receive::{ReceiveBlock, ReceiveHashables};
pub use send::{SendBlock, SendHashables};
pub use sideband::{BlockDetails, BlockSideband};
pub use state::{StateBlock, StateHashables};

/// Discriminates the five block layouts on the wire and in storage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockType {
    Send,
    Receive,
    Open,
    Change,
    State,
}

impl BlockType {
    pub fn as_u8(self) -> u8 {
        match self {
            Self::Send => 2,
            Self::Receive => 3,
            Self::Open => 4,
            Self::Change => 5,
            Self::State => 6,
        }
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            2 => Some(Self::Send),
            3 => Some(Self::Receive),
            4 => Some(Self::Open),
            5 => Some(Self::Change),
            6 => Some(Self::State),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Send => "send",
            Self::Receive => "receive",
            Self::Open => "open",
            Self::Change => "change",
            Self::State => "state",
        }
    }
}

/// The unified block enum wrapping all Lattica block types.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Block {
    Send(SendBlock),
    Receive(ReceiveBlock),
    Open(OpenBlock),
    Change(ChangeBlock),
    State(StateBlock),
}

impl Block {
    /// Compute the hash of this block from its hashed fields.
    pub fn hash(&self) -> BlockHash {
        match self {
            Self::Send(b) => b.hash(),
            Self::Receive(b) => b.hash(),
            Self::Open(b) => b.hash(),
            Self::Change(b) => b.hash(),
            Self::State(b) => b.hash(),
        }
    }

    pub fn block_type(&self) -> BlockType {
        match self {
            Self::Send(_) => BlockType::Send,
            Self::Receive(_) => BlockType::Receive,
            Self::Open(_) => BlockType::Open,
            Self::Change(_) => BlockType::Change,
            Self::State(_) => BlockType::State,
        }
    }

    /// The value the block's proof-of-work is computed over: the previous
    /// hash, or the account itself for the first block of a chain.
    pub fn root(&self) -> Root {
        match self {
            Self::Send(b) => b.root(),
            Self::Receive(b) => b.root(),
            Self::Open(b) => b.root(),
            Self::Change(b) => b.root(),
            Self::State(b) => b.root(),
        }
    }

    /// Hash of the predecessor in the account chain; zero for a first block.
    pub fn previous(&self) -> BlockHash {
        match self {
            Self::Send(b) => b.hashables.previous,
            Self::Receive(b) => b.hashables.previous,
            Self::Open(_) => BlockHash::ZERO,
            Self::Change(b) => b.hashables.previous,
            Self::State(b) => b.hashables.previous,
        }
    }

    pub fn work(&self) -> u64 {
        match self {
            Self::Send(b) => b.work,
            Self::Receive(b) => b.work,
            Self::Open(b) => b.work,
            Self::Change(b) => b.work,
            Self::State(b) => b.work,
        }
    }

    pub fn signature(&self) -> &Signature {
        match self {
            Self::Send(b) => &b.signature,
            Self::Receive(b) => &b.signature,
            Self::Open(b) => &b.signature,
            Self::Change(b) => &b.signature,
            Self::State(b) => &b.signature,
        }
    }

    /// The account field, for block types that carry one.
    pub fn account_field(&self) -> Option<Account> {
        match self {
            Self::Open(b) => Some(b.hashables.account),
            Self::State(b) => Some(b.hashables.account),
            _ => None,
        }
    }

    /// The representative field, for block types that carry one.
    pub fn representative_field(&self) -> Option<Account> {
        match self {
            Self::Open(b) => Some(b.hashables.representative),
            Self::Change(b) => Some(b.hashables.representative),
            Self::State(b) => Some(b.hashables.representative),
            _ => None,
        }
    }

    /// The declared balance field, for block types that carry one.
    pub fn balance_field(&self) -> Option<Amount> {
        match self {
            Self::Send(b) => Some(b.hashables.balance),
            Self::State(b) => Some(b.hashables.balance),
            _ => None,
        }
    }

    /// The state-block link field.
    pub fn link_field(&self) -> Option<Link> {
        match self {
            Self::State(b) => Some(b.hashables.link),
            _ => None,
        }
    }

    /// The legacy source field (receive and open blocks).
    pub fn source_field(&self) -> Option<BlockHash> {
        match self {
            Self::Receive(b) => Some(b.hashables.source),
            Self::Open(b) => Some(b.hashables.source),
            _ => None,
        }
    }

    /// The legacy destination field (send blocks).
    pub fn destination_field(&self) -> Option<Account> {
        match self {
            Self::Send(b) => Some(b.hashables.destination),
            _ => None,
        }
    }

    /// The hash of the send this block receives, if it receives one.
    ///
    /// For state blocks the answer depends on the stored classification, so
    /// this requires the sideband and panics without it.
    pub fn source(&self) -> Option<BlockHash> {
        match self {
            Self::Receive(b) => Some(b.hashables.source),
            Self::Open(b) => Some(b.hashables.source),
            Self::State(b) => {
                if self.sideband().details.is_receive {
                    Some(b.hashables.link.into_hash())
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// The account this block sends funds to, if it sends any.
    ///
    /// For state blocks the answer depends on the stored classification, so
    /// this requires the sideband and panics without it.
    pub fn destination(&self) -> Option<Account> {
        match self {
            Self::Send(b) => Some(b.hashables.destination),
            Self::State(b) => {
                if self.sideband().details.is_send {
                    Some(b.hashables.link.into_account())
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    pub fn has_sideband(&self) -> bool {
        self.sideband_field().is_some()
    }

    /// Metadata attached when the block was accepted into the ledger.
    ///
    /// # Panics
    /// Panics if no sideband has been attached; only blocks read back from
    /// the store or just processed carry one.
    pub fn sideband(&self) -> &BlockSideband {
        self.sideband_field()
            .expect("block sideband accessed before the block was processed")
    }

    pub fn sideband_set(&mut self, sideband: BlockSideband) {
        *self.sideband_field_mut() = Some(sideband);
    }

    /// Update the stored successor pointer.
    ///
    /// # Panics
    /// Panics if no sideband has been attached.
    pub fn set_successor(&mut self, successor: BlockHash) {
        self.sideband_field_mut()
            .as_mut()
            .expect("block sideband accessed before the block was processed")
            .successor = successor;
    }

    fn sideband_field(&self) -> Option<&BlockSideband> {
        match self {
            Self::Send(b) => b.sideband.as_ref(),
            Self::Receive(b) => b.sideband.as_ref(),
            Self::Open(b) => b.sideband.as_ref(),
            Self::Change(b) => b.sideband.as_ref(),
            Self::State(b) => b.sideband.as_ref(),
        }
    }

    fn sideband_field_mut(&mut self) -> &mut Option<BlockSideband> {
        match self {
            Self::Send(b) => &mut b.sideband,
            Self::Receive(b) => &mut b.sideband,
            Self::Open(b) => &mut b.sideband,
            Self::Change(b) => &mut b.sideband,
            Self::State(b) => &mut b.sideband,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lattica_crypto::keypair_from_seed;

    #[test]
    fn previous_is_zero_for_open_blocks() {
        let key = keypair_from_seed(&[1u8; 32]);
        let open = BlockBuilder::open()
            .source(BlockHash::new([7u8; 32]))
            .representative(Account::new([8u8; 32]))
            .account(Account::from(key.public))
            .sign(&key)
            .build();
        assert!(open.previous().is_zero());
        assert_eq!(open.root(), Account::from(key.public).into_root());
    }

    #[test]
    fn sideband_starts_absent() {
        let block = BlockBuilder::send()
            .previous(BlockHash::new([1u8; 32]))
            .destination(Account::new([2u8; 32]))
            .balance(Amount::new(10))
            .build();
        assert!(!block.has_sideband());
    }

    #[test]
    #[should_panic(expected = "sideband accessed")]
    fn sideband_panics_when_unset() {
        let block = BlockBuilder::change()
            .previous(BlockHash::new([1u8; 32]))
            .representative(Account::new([2u8; 32]))
            .build();
        block.sideband();
    }

    #[test]
    fn block_type_tags_roundtrip() {
        for ty in [
            BlockType::Send,
            BlockType::Receive,
            BlockType::Open,
            BlockType::Change,
            BlockType::State,
        ] {
            assert_eq!(BlockType::from_u8(ty.as_u8()), Some(ty));
        }
        assert_eq!(BlockType::from_u8(0), None);
        assert_eq!(BlockType::from_u8(7), None);
    }
}
