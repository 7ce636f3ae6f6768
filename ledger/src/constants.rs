//! Per-network ledger parameters.
//!
//! Every network gets its own genesis block, and therefore its own disjoint
//! block space. The dev and test genesis keys are derived from fixed seeds so
//! that tooling can sign as the genesis account; a real live deployment
//! replaces the live genesis with a hardcoded block whose key was discarded
//! at creation.

use lattica_blocks::{Block, BlockBuilder};
use lattica_crypto::keypair_from_seed;
use lattica_types::{
    Account, Amount, BlockHash, Epoch, Epochs, KeyPair, Link, NetworkId,
};
use lattica_work::WorkThresholds;

/// Everything about a network the ledger needs to know up front.
#[derive(Clone)]
pub struct LedgerConstants {
    pub network: NetworkId,
    pub genesis_block: Block,
    pub genesis_account: Account,
    pub genesis_amount: Amount,
    pub burn_account: Account,
    pub epochs: Epochs,
    pub work: WorkThresholds,
}

impl LedgerConstants {
    pub fn live() -> Self {
        Self::with_network(NetworkId::Live, WorkThresholds::new())
    }

    pub fn test() -> Self {
        Self::with_network(NetworkId::Test, WorkThresholds::with_base(0xFFF0_0000_0000_0000))
    }

    pub fn dev() -> Self {
        Self::with_network(NetworkId::Dev, WorkThresholds::with_base(0))
    }

    /// Dev network with proof of work disabled, for ledger tests.
    pub fn unit_test() -> Self {
        Self::dev()
    }

    fn with_network(network: NetworkId, work: WorkThresholds) -> Self {
        let key = genesis_key(network);
        let genesis_account = Account::from(key.public);
        let genesis_block = BlockBuilder::open()
            .source(BlockHash::new(*genesis_account.as_bytes()))
            .representative(genesis_account)
            .account(genesis_account)
            .sign(&key)
            .build();

        let mut epochs = Epochs::new();
        epochs.add(Epoch::Epoch1, key.public, epoch_link(b"epoch v1 block"));
        epochs.add(Epoch::Epoch2, key.public, epoch_link(b"epoch v2 block"));

        Self {
            network,
            genesis_block,
            genesis_account,
            genesis_amount: Amount::MAX,
            burn_account: Account::ZERO,
            epochs,
            work,
        }
    }
}

/// The genesis keypair for a network, derived from a fixed seed.
pub fn genesis_key(network: NetworkId) -> KeyPair {
    let seed = lattica_crypto::blake2b_256(
        format!("lattica {} genesis", network.as_str()).as_bytes(),
    );
    keypair_from_seed(&seed)
}

/// Epoch marker links are ASCII text zero padded to 32 bytes.
fn epoch_link(text: &[u8]) -> Link {
    let mut bytes = [0u8; 32];
    bytes[..text.len()].copy_from_slice(text);
    Link::new(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lattica_crypto::verify_signature;

    #[test]
    fn genesis_is_deterministic() {
        let a = LedgerConstants::dev();
        let b = LedgerConstants::dev();
        assert_eq!(a.genesis_block.hash(), b.genesis_block.hash());
        assert!(!a.genesis_block.hash().is_zero());
    }

    #[test]
    fn each_network_has_its_own_genesis() {
        let live = LedgerConstants::live();
        let test = LedgerConstants::test();
        let dev = LedgerConstants::dev();
        assert_ne!(live.genesis_block.hash(), test.genesis_block.hash());
        assert_ne!(test.genesis_block.hash(), dev.genesis_block.hash());
        assert_ne!(live.genesis_account, dev.genesis_account);
    }

    #[test]
    fn genesis_block_is_signed_by_the_genesis_key() {
        let constants = LedgerConstants::dev();
        let key = genesis_key(NetworkId::Dev);
        let block = &constants.genesis_block;
        assert!(verify_signature(
            block.hash().as_bytes(),
            block.signature(),
            &key.public,
        ));
        assert_eq!(constants.genesis_account, Account::from(key.public));
    }

    #[test]
    fn epoch_links_are_registered_and_distinct() {
        let constants = LedgerConstants::dev();
        let v1 = *constants.epochs.link(Epoch::Epoch1).unwrap();
        let v2 = *constants.epochs.link(Epoch::Epoch2).unwrap();
        assert_ne!(v1, v2);
        assert_eq!(constants.epochs.epoch(&v1), Some(Epoch::Epoch1));
        assert_eq!(constants.epochs.epoch(&v2), Some(Epoch::Epoch2));
        assert!(constants.epochs.is_epoch_link(&v1));
    }

    #[test]
    fn unit_test_constants_disable_work() {
        let constants = LedgerConstants::unit_test();
        assert_eq!(
            constants.work.threshold_for(lattica_work::WorkBlockKind::Base),
            0
        );
    }
}
