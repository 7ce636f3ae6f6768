//! Shared fixture for ledger tests.
//!
//! `LedgerContext` wraps a ledger over a temporary LMDB store together with
//! block factories that read the current ledger state, so tests describe
//! intent (send 50 from genesis) instead of block plumbing. Every helper
//! commits on success and unwraps storage errors; the tests own the
//! temporary directory for as long as the context lives.

use std::collections::HashMap;

use tempfile::TempDir;

use lattica_blocks::{Block, BlockBuilder, BlockDetails};
use lattica_store_lmdb::LmdbStore;
use lattica_types::{
    Account, AccountInfo, Amount, BlockHash, Epoch, KeyPair, Link, PendingInfo, PendingKey,
};

use crate::cache::GenerateCacheFlags;
use crate::constants::{genesis_key, LedgerConstants};
use crate::error::{ProcessError, RollbackError};
use crate::ledger::Ledger;

const TEST_MAP_SIZE: usize = 10 * 1024 * 1024;

pub(crate) struct LedgerContext {
    pub ledger: Ledger,
    dir: TempDir,
}

impl LedgerContext {
    /// A fresh dev-network ledger with proof of work disabled.
    pub fn unit_test() -> Self {
        Self::with_constants(LedgerConstants::unit_test())
    }

    pub fn with_constants(constants: LedgerConstants) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let store = LmdbStore::open(dir.path(), TEST_MAP_SIZE).unwrap();
        let ledger = Ledger::new(store, constants).unwrap();
        Self { ledger, dir }
    }

    /// Closes the ledger and opens a new one over the same files.
    pub fn reopen(self) -> Self {
        self.reopen_with_flags(&GenerateCacheFlags::new())
    }

    pub fn reopen_with_flags(self, flags: &GenerateCacheFlags) -> Self {
        let Self { ledger, dir } = self;
        let constants = ledger.constants.clone();
        drop(ledger);
        let store = LmdbStore::open(dir.path(), TEST_MAP_SIZE).unwrap();
        let ledger = Ledger::with_cache_flags(store, constants, flags).unwrap();
        Self { ledger, dir }
    }

    pub fn genesis_key(&self) -> KeyPair {
        genesis_key(self.ledger.constants.network)
    }

    pub fn process(&self, block: &mut Block) -> Result<BlockDetails, ProcessError> {
        let mut txn = self.ledger.store.begin_write().unwrap();
        let details = self.ledger.process(&mut txn, block)?;
        txn.commit().unwrap();
        Ok(details)
    }

    pub fn rollback(&self, hash: &BlockHash) -> Result<Vec<Block>, RollbackError> {
        let mut txn = self.ledger.store.begin_write().unwrap();
        let rolled = self.ledger.rollback(&mut txn, hash)?;
        txn.commit().unwrap();
        Ok(rolled)
    }

    pub fn confirm(&self, target: BlockHash) -> Vec<Block> {
        let mut txn = self.ledger.store.begin_write().unwrap();
        let cemented = self.ledger.confirm(&mut txn, target).unwrap();
        txn.commit().unwrap();
        cemented
    }

    pub fn prune(&self, hash: &BlockHash, batch_size: u64) -> u64 {
        let mut txn = self.ledger.store.begin_write().unwrap();
        let count = self
            .ledger
            .pruning_action(&mut txn, hash, batch_size)
            .unwrap();
        txn.commit().unwrap();
        count
    }

    pub fn latest(&self, account: &Account) -> Option<BlockHash> {
        let txn = self.ledger.store.begin_read().unwrap();
        self.ledger.latest(&txn, account).unwrap()
    }

    pub fn balance(&self, account: &Account) -> Option<Amount> {
        let txn = self.ledger.store.begin_read().unwrap();
        self.ledger.account_balance(&txn, account).unwrap()
    }

    pub fn account_info(&self, account: &Account) -> Option<AccountInfo> {
        let txn = self.ledger.store.begin_read().unwrap();
        self.ledger.account_info(&txn, account).unwrap()
    }

    pub fn pending(&self, key: &PendingKey) -> Option<PendingInfo> {
        let txn = self.ledger.store.begin_read().unwrap();
        self.ledger.store.pending.get(&txn, key).unwrap()
    }

    pub fn block_exists(&self, hash: &BlockHash) -> bool {
        let txn = self.ledger.store.begin_read().unwrap();
        self.ledger.block_exists(&txn, hash).unwrap()
    }

    /// A legacy send built on the signer's current frontier.
    pub fn legacy_send(&self, key: &KeyPair, destination: Account, amount: Amount) -> Block {
        let info = self.opened_info(key);
        BlockBuilder::send()
            .previous(info.head)
            .destination(destination)
            .balance(info.balance - amount)
            .sign(key)
            .build()
    }

    /// A legacy open receiving `source`, representing to the account itself.
    pub fn legacy_open(&self, key: &KeyPair, source: BlockHash) -> Block {
        let account = Account::from(key.public);
        BlockBuilder::open()
            .source(source)
            .representative(account)
            .account(account)
            .sign(key)
            .build()
    }

    pub fn legacy_receive(&self, key: &KeyPair, source: BlockHash) -> Block {
        let info = self.opened_info(key);
        BlockBuilder::receive()
            .previous(info.head)
            .source(source)
            .sign(key)
            .build()
    }

    pub fn legacy_change(&self, key: &KeyPair, representative: Account) -> Block {
        let info = self.opened_info(key);
        BlockBuilder::change()
            .previous(info.head)
            .representative(representative)
            .sign(key)
            .build()
    }

    pub fn state_send(&self, key: &KeyPair, destination: Account, amount: Amount) -> Block {
        let account = Account::from(key.public);
        let info = self.opened_info(key);
        BlockBuilder::state()
            .account(account)
            .previous(info.head)
            .representative(info.representative)
            .balance(info.balance - amount)
            .link(destination.into_link())
            .sign(key)
            .build()
    }

    /// A state receive of `source`, opening the account if needed.
    pub fn state_receive(&self, key: &KeyPair, source: BlockHash) -> Block {
        let account = Account::from(key.public);
        let amount = self
            .pending(&PendingKey::new(account, source))
            .unwrap_or_else(|| panic!("no receivable entry for {source}"))
            .amount;
        let (previous, representative, balance) = match self.account_info(&account) {
            Some(info) => (info.head, info.representative, info.balance + amount),
            None => (BlockHash::ZERO, account, amount),
        };
        BlockBuilder::state()
            .account(account)
            .previous(previous)
            .representative(representative)
            .balance(balance)
            .link(source.into_link())
            .sign(key)
            .build()
    }

    pub fn state_change(&self, key: &KeyPair, representative: Account) -> Block {
        let account = Account::from(key.public);
        let info = self.opened_info(key);
        BlockBuilder::state()
            .account(account)
            .previous(info.head)
            .representative(representative)
            .balance(info.balance)
            .link(Link::ZERO)
            .sign(key)
            .build()
    }

    /// An epoch marker for `account`, signed by the network's epoch signer.
    pub fn epoch_block(&self, account: Account, epoch: Epoch) -> Block {
        let link = *self
            .ledger
            .constants
            .epochs
            .link(epoch)
            .unwrap_or_else(|| panic!("{epoch:?} has no registered link"));
        let (previous, representative, balance) = match self.account_info(&account) {
            Some(info) => (info.head, info.representative, info.balance),
            None => (BlockHash::ZERO, Account::ZERO, Amount::ZERO),
        };
        BlockBuilder::state()
            .account(account)
            .previous(previous)
            .representative(representative)
            .balance(balance)
            .link(link)
            .sign(&self.genesis_key())
            .build()
    }

    /// Every unit of the genesis amount is in an account or receivable, the
    /// weight table mirrors the balances, and the weight cache mirrors the
    /// weight table.
    pub fn assert_conservation(&self) {
        let txn = self.ledger.store.begin_read().unwrap();

        let mut balances = Amount::ZERO;
        for (_, info) in self.ledger.store.account.iter(&txn).unwrap() {
            balances = balances.checked_add(info.balance).unwrap();
        }
        let mut receivable = Amount::ZERO;
        for (_, pending) in self.ledger.store.pending.iter(&txn).unwrap() {
            receivable = receivable.checked_add(pending.amount).unwrap();
        }
        assert_eq!(
            balances.checked_add(receivable).unwrap(),
            self.ledger.constants.genesis_amount,
            "account balances plus receivables must equal the genesis amount"
        );

        let weights: HashMap<Account, Amount> = self
            .ledger
            .store
            .rep_weight
            .iter(&txn)
            .unwrap()
            .into_iter()
            .collect();
        let mut delegated = Amount::ZERO;
        for weight in weights.values() {
            delegated = delegated.checked_add(*weight).unwrap();
        }
        assert_eq!(
            delegated, balances,
            "voting weight must equal the sum of account balances"
        );
        assert_eq!(
            self.ledger.rep_weights.snapshot(),
            weights,
            "weight cache out of sync with the weight table"
        );
    }

    fn opened_info(&self, key: &KeyPair) -> AccountInfo {
        let account = Account::from(key.public);
        self.account_info(&account)
            .unwrap_or_else(|| panic!("account {account} is not open"))
    }
}
