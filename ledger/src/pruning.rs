//! Removing cemented block bodies.
//!
//! Pruning trades history for disk space: the body goes, a tombstone hash
//! stays so the block still counts as existing. Only cemented blocks may be
//! pruned, and the genesis block never is.

use lattica_store_lmdb::{RwTxn, StoreError};
use lattica_types::BlockHash;

use crate::ledger::Ledger;

impl Ledger {
    /// Prunes up to `batch_size` block bodies, walking from `hash` toward
    /// the open block and stopping at the genesis block, an already pruned
    /// block, or the batch limit. Returns how many bodies were removed.
    ///
    /// # Panics
    /// Panics if the walk reaches an uncemented block; callers prune only at
    /// or below the confirmed frontier.
    pub fn pruning_action(
        &self,
        txn: &mut RwTxn,
        hash: &BlockHash,
        batch_size: u64,
    ) -> Result<u64, StoreError> {
        let genesis_hash = self.constants.genesis_block.hash();
        let mut pruned = 0u64;
        let mut current = *hash;
        while pruned < batch_size && !current.is_zero() && current != genesis_hash {
            if self.store.pruned.exists(txn, &current)? {
                break;
            }
            let Some(block) = self.store.block.get(txn, &current)? else {
                break;
            };
            let account = block.sideband().account;
            let conf = self
                .store
                .confirmation_height
                .get(txn, &account)?
                .unwrap_or_default();
            if block.sideband().height > conf.height {
                panic!(
                    "pruning uncemented block {} at height {} (confirmed to {})",
                    current,
                    block.sideband().height,
                    conf.height
                );
            }
            self.store.block.del(txn, &current)?;
            self.store.pruned.put(txn, &current)?;
            self.cache
                .pruned_count
                .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            pruned += 1;
            current = block.previous();
        }
        if pruned > 0 {
            tracing::debug!(start = %hash, count = pruned, "pruned block bodies");
        }
        Ok(pruned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::LedgerContext;
    use lattica_crypto::generate_keypair;
    use lattica_types::{Account, Amount};
    use std::sync::atomic::Ordering;

    #[test]
    fn pruning_replaces_bodies_with_tombstones() {
        let ctx = LedgerContext::unit_test();
        let genesis_key = ctx.genesis_key();
        let key = generate_keypair();
        let account = Account::from(key.public);

        let mut s1 = ctx.legacy_send(&genesis_key, account, Amount::new(1));
        ctx.process(&mut s1).unwrap();
        let mut s2 = ctx.legacy_send(&genesis_key, account, Amount::new(2));
        ctx.process(&mut s2).unwrap();
        ctx.confirm(s2.hash());

        assert_eq!(ctx.prune(&s2.hash(), 10), 2);

        let txn = ctx.ledger.store.begin_read().unwrap();
        for hash in [s1.hash(), s2.hash()] {
            assert!(!ctx.ledger.block_exists(&txn, &hash).unwrap());
            assert!(ctx.ledger.block_or_pruned_exists(&txn, &hash).unwrap());
            assert!(ctx.ledger.block_confirmed(&txn, &hash).unwrap());
        }
        // The genesis body survives pruning.
        assert!(ctx
            .ledger
            .block_exists(&txn, &ctx.ledger.constants.genesis_block.hash())
            .unwrap());

        // Counters still account for pruned blocks; live rows do not.
        let block_count = ctx.ledger.cache.block_count.load(Ordering::SeqCst);
        let pruned_count = ctx.ledger.cache.pruned_count.load(Ordering::SeqCst);
        assert_eq!(block_count, 3);
        assert_eq!(pruned_count, 2);
        assert_eq!(
            ctx.ledger.store.block.count(&txn).unwrap(),
            block_count - pruned_count
        );
    }

    #[test]
    fn pruning_respects_the_batch_limit() {
        let ctx = LedgerContext::unit_test();
        let genesis_key = ctx.genesis_key();
        let key = generate_keypair();
        let account = Account::from(key.public);

        let mut hashes = Vec::new();
        for i in 1..=4u128 {
            let mut send = ctx.legacy_send(&genesis_key, account, Amount::new(i));
            ctx.process(&mut send).unwrap();
            hashes.push(send.hash());
        }
        ctx.confirm(hashes[3]);

        assert_eq!(ctx.prune(&hashes[3], 2), 2);
        let txn = ctx.ledger.store.begin_read().unwrap();
        assert!(!ctx.ledger.block_exists(&txn, &hashes[3]).unwrap());
        assert!(!ctx.ledger.block_exists(&txn, &hashes[2]).unwrap());
        assert!(ctx.ledger.block_exists(&txn, &hashes[1]).unwrap());
        drop(txn);

        // The next batch continues from where the walk stopped.
        assert_eq!(ctx.prune(&hashes[1], 10), 2);
        assert_eq!(ctx.ledger.cache.pruned_count.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn pruning_stops_at_already_pruned_blocks() {
        let ctx = LedgerContext::unit_test();
        let genesis_key = ctx.genesis_key();
        let key = generate_keypair();
        let account = Account::from(key.public);

        let mut s1 = ctx.legacy_send(&genesis_key, account, Amount::new(1));
        ctx.process(&mut s1).unwrap();
        ctx.confirm(s1.hash());
        assert_eq!(ctx.prune(&s1.hash(), 10), 1);

        let mut s2 = ctx.legacy_send(&genesis_key, account, Amount::new(2));
        ctx.process(&mut s2).unwrap();
        let mut s3 = ctx.legacy_send(&genesis_key, account, Amount::new(3));
        ctx.process(&mut s3).unwrap();
        ctx.confirm(s3.hash());

        // Walks s3 and s2, then halts on the s1 tombstone.
        assert_eq!(ctx.prune(&s3.hash(), 10), 2);
        assert_eq!(ctx.ledger.cache.pruned_count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn pruning_an_unknown_hash_does_nothing() {
        let ctx = LedgerContext::unit_test();
        assert_eq!(ctx.prune(&BlockHash::new([3; 32]), 10), 0);
        assert_eq!(ctx.prune(&ctx.ledger.constants.genesis_block.hash(), 10), 0);
    }

    #[test]
    #[should_panic(expected = "pruning uncemented block")]
    fn pruning_an_uncemented_block_panics() {
        let ctx = LedgerContext::unit_test();
        let genesis_key = ctx.genesis_key();
        let key = generate_keypair();

        let mut send = ctx.legacy_send(&genesis_key, Account::from(key.public), Amount::new(1));
        ctx.process(&mut send).unwrap();
        let _ = ctx.prune(&send.hash(), 10);
    }

    #[test]
    fn whole_account_chains_can_be_pruned() {
        let ctx = LedgerContext::unit_test();
        let genesis_key = ctx.genesis_key();
        let key = generate_keypair();
        let account = Account::from(key.public);

        let mut send = ctx.legacy_send(&genesis_key, account, Amount::new(5));
        ctx.process(&mut send).unwrap();
        let mut open = ctx.legacy_open(&key, send.hash());
        ctx.process(&mut open).unwrap();
        ctx.confirm(open.hash());

        // The open's predecessor is zero, so the walk ends after one block.
        assert_eq!(ctx.prune(&open.hash(), 10), 1);
        let txn = ctx.ledger.store.begin_read().unwrap();
        assert!(!ctx.ledger.block_exists(&txn, &open.hash()).unwrap());
        assert_eq!(
            ctx.ledger.latest(&txn, &account).unwrap(),
            Some(open.hash())
        );
        // The account row keeps working against the tombstoned frontier.
        assert_eq!(
            ctx.ledger.account_balance(&txn, &account).unwrap(),
            Some(Amount::new(5))
        );
    }
}
