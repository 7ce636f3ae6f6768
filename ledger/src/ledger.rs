//! The ledger proper: the only writer of ledger state.
//!
//! All mutations go through [`Ledger::process`], [`Ledger::rollback`],
//! [`Ledger::confirm`] and [`Ledger::pruning_action`], each under a single
//! write transaction so every block application is all or nothing. Reads can
//! run concurrently on their own transactions.

use std::collections::HashMap;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use lattica_blocks::{Block, BlockDetails, BlockSideband};
use lattica_store_lmdb::{LmdbStore, RoTxn, RwTxn, StoreError};
use lattica_types::{
    Account, AccountInfo, Amount, BlockHash, ConfirmationHeightInfo, Epoch, Timestamp,
};

use crate::cache::{GenerateCacheFlags, LedgerCache};
use crate::constants::LedgerConstants;
use crate::error::ProcessError;
use crate::rep_weight_cache::RepWeightCache;
use crate::validation::{BlockInstructions, BlockValidator};

pub struct Ledger {
    pub store: LmdbStore,
    pub constants: LedgerConstants,
    pub cache: LedgerCache,
    pub rep_weights: Arc<RepWeightCache>,
}

impl Ledger {
    /// Opens the ledger, seeding the genesis block into an empty store and
    /// rebuilding the in-memory caches from the tables.
    pub fn new(store: LmdbStore, constants: LedgerConstants) -> Result<Self, StoreError> {
        Self::with_cache_flags(store, constants, &GenerateCacheFlags::new())
    }

    pub fn with_cache_flags(
        store: LmdbStore,
        constants: LedgerConstants,
        flags: &GenerateCacheFlags,
    ) -> Result<Self, StoreError> {
        let ledger = Self {
            store,
            constants,
            cache: LedgerCache::default(),
            rep_weights: Arc::new(RepWeightCache::new()),
        };
        ledger.initialize(flags)?;
        Ok(ledger)
    }

    fn initialize(&self, flags: &GenerateCacheFlags) -> Result<(), StoreError> {
        let needs_genesis = {
            let txn = self.store.begin_read()?;
            self.store.account.count(&txn)? == 0
        };
        if needs_genesis {
            let mut txn = self.store.begin_write()?;
            self.add_genesis_block(&mut txn)?;
            txn.commit()?;
            tracing::info!(
                network = self.constants.network.as_str(),
                genesis = %self.constants.genesis_block.hash(),
                "seeded empty store with genesis block"
            );
        }

        let txn = self.store.begin_read()?;
        if flags.reps || flags.block_count || flags.account_count {
            let mut block_count = 0u64;
            let mut account_count = 0u64;
            let mut weights: HashMap<Account, Amount> = HashMap::new();
            for (_, info) in self.store.account.iter(&txn)? {
                block_count += info.block_count;
                account_count += 1;
                if !info.balance.is_zero() {
                    let entry = weights.entry(info.representative).or_insert(Amount::ZERO);
                    *entry = entry.checked_add(info.balance).unwrap_or_else(|| {
                        panic!("weight overflow for representative {}", info.representative)
                    });
                }
            }
            if flags.block_count {
                self.cache.block_count.store(block_count, Ordering::SeqCst);
            }
            if flags.account_count {
                self.cache
                    .account_count
                    .store(account_count, Ordering::SeqCst);
            }
            if flags.reps {
                self.rep_weights.copy_from(weights);
            }
        }
        if flags.cemented_count {
            let mut cemented = 0u64;
            for (_, info) in self.store.confirmation_height.iter(&txn)? {
                cemented += info.height;
            }
            self.cache.cemented_count.store(cemented, Ordering::SeqCst);
        }
        if flags.pruned_count {
            self.cache
                .pruned_count
                .store(self.store.pruned.count(&txn)?, Ordering::SeqCst);
        }
        tracing::info!(
            blocks = self.cache.block_count.load(Ordering::SeqCst),
            accounts = self.cache.account_count.load(Ordering::SeqCst),
            cemented = self.cache.cemented_count.load(Ordering::SeqCst),
            pruned = self.cache.pruned_count.load(Ordering::SeqCst),
            "rebuilt ledger caches"
        );
        Ok(())
    }

    /// The genesis block is installed directly, not processed: it mints the
    /// entire supply and is cemented from the start.
    fn add_genesis_block(&self, txn: &mut RwTxn) -> Result<(), StoreError> {
        let mut genesis = self.constants.genesis_block.clone();
        let account = self.constants.genesis_account;
        let hash = genesis.hash();
        genesis.sideband_set(BlockSideband {
            height: 1,
            timestamp: Timestamp::EPOCH,
            successor: BlockHash::ZERO,
            account,
            balance: self.constants.genesis_amount,
            details: BlockDetails::new(Epoch::Epoch0, false, false, false),
            source_epoch: Epoch::Epoch0,
        });
        self.store.block.put(txn, &genesis)?;
        self.store.confirmation_height.put(
            txn,
            &account,
            &ConfirmationHeightInfo::new(1, hash),
        )?;
        self.store.account.put(
            txn,
            &account,
            &AccountInfo {
                head: hash,
                representative: account,
                open_block: hash,
                balance: self.constants.genesis_amount,
                modified: Timestamp::EPOCH,
                block_count: 1,
                epoch: Epoch::Epoch0,
            },
        )?;
        self.store
            .rep_weight
            .put(txn, &account, self.constants.genesis_amount)?;
        Ok(())
    }

    /// Validates `block` against the current state and appends it to its
    /// account chain, attaching the derived sideband to the caller's block.
    ///
    /// Returns how the block was classified, or why it was rejected. On any
    /// error the transaction is untouched.
    pub fn process(
        &self,
        txn: &mut RwTxn,
        block: &mut Block,
    ) -> Result<BlockDetails, ProcessError> {
        let instructions = BlockValidator::new(self, txn, block).validate()?;
        let details = instructions.sideband.details;
        self.apply(txn, block, &instructions)?;
        Ok(details)
    }

    fn apply(
        &self,
        txn: &mut RwTxn,
        block: &mut Block,
        instructions: &BlockInstructions,
    ) -> Result<(), StoreError> {
        let hash = block.hash();
        block.sideband_set(instructions.sideband.clone());
        self.store.block.put(txn, block)?;
        let previous = block.previous();
        // A pruned predecessor has no body to link the successor into.
        if !previous.is_zero() && self.store.block.exists(txn, &previous)? {
            self.store.block.successor_set(txn, &previous, hash)?;
        }
        if let Some(key) = &instructions.pending_erase {
            self.store.pending.del(txn, key)?;
        }
        if let Some((key, info)) = &instructions.pending_insert {
            self.store.pending.put(txn, key, info)?;
        }
        if instructions.old_info.is_none() {
            self.store.confirmation_height.put(
                txn,
                &instructions.account,
                &ConfirmationHeightInfo::new(0, BlockHash::ZERO),
            )?;
            self.cache.account_count.fetch_add(1, Ordering::SeqCst);
        }
        self.store
            .account
            .put(txn, &instructions.account, &instructions.new_info)?;
        if let Some(old) = &instructions.old_info {
            self.weight_debit(txn, &old.representative, old.balance)?;
        }
        self.weight_credit(
            txn,
            &instructions.new_info.representative,
            instructions.new_info.balance,
        )?;
        self.cache.block_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    /// Cements `target` and every uncemented block it depends on, oldest
    /// first. Returns the newly cemented blocks; already cemented targets
    /// yield an empty list.
    pub fn confirm(
        &self,
        txn: &mut RwTxn,
        target: BlockHash,
    ) -> Result<Vec<Block>, StoreError> {
        let mut cemented = Vec::new();
        let mut stack = vec![target];
        while let Some(&hash) = stack.last() {
            let Some(block) = self.store.block.get(txn, &hash)? else {
                // Missing bodies are pruned and therefore already cemented.
                stack.pop();
                continue;
            };
            let account = block.sideband().account;
            let conf = self
                .store
                .confirmation_height
                .get(txn, &account)?
                .unwrap_or_default();
            if block.sideband().height <= conf.height {
                stack.pop();
                continue;
            }

            let mut missing_deps = false;
            let previous = block.previous();
            if !previous.is_zero() && !self.block_confirmed(txn, &previous)? {
                stack.push(previous);
                missing_deps = true;
            }
            if let Some(source) = block.source() {
                if !source.is_zero() && !self.block_confirmed(txn, &source)? {
                    stack.push(source);
                    missing_deps = true;
                }
            }
            if missing_deps {
                continue;
            }

            self.store.confirmation_height.put(
                txn,
                &account,
                &ConfirmationHeightInfo::new(block.sideband().height, hash),
            )?;
            self.cache.cemented_count.fetch_add(1, Ordering::SeqCst);
            stack.pop();
            cemented.push(block);
        }
        if !cemented.is_empty() {
            tracing::debug!(frontier = %target, count = cemented.len(), "cemented blocks");
        }
        Ok(cemented)
    }

    pub(crate) fn weight_credit(
        &self,
        txn: &mut RwTxn,
        representative: &Account,
        amount: Amount,
    ) -> Result<(), StoreError> {
        if amount.is_zero() {
            return Ok(());
        }
        let current = self
            .store
            .rep_weight
            .get(txn, representative)?
            .unwrap_or(Amount::ZERO);
        let updated = current.checked_add(amount).unwrap_or_else(|| {
            panic!("weight overflow for representative {representative}")
        });
        self.store.rep_weight.put(txn, representative, updated)?;
        self.rep_weights.credit(representative, amount);
        Ok(())
    }

    pub(crate) fn weight_debit(
        &self,
        txn: &mut RwTxn,
        representative: &Account,
        amount: Amount,
    ) -> Result<(), StoreError> {
        if amount.is_zero() {
            return Ok(());
        }
        let current = self
            .store
            .rep_weight
            .get(txn, representative)?
            .unwrap_or(Amount::ZERO);
        let updated = current.checked_sub(amount).unwrap_or_else(|| {
            panic!("weight underflow for representative {representative}")
        });
        if updated.is_zero() {
            self.store.rep_weight.del(txn, representative)?;
        } else {
            self.store.rep_weight.put(txn, representative, updated)?;
        }
        self.rep_weights.debit(representative, amount);
        Ok(())
    }

    /// Voting weight delegated to `representative`, from the cache.
    pub fn weight(&self, representative: &Account) -> Amount {
        self.rep_weights.weight(representative)
    }

    /// Frontier of `account`, if it is opened.
    pub fn latest(&self, txn: &RoTxn, account: &Account) -> Result<Option<BlockHash>, StoreError> {
        Ok(self.store.account.get(txn, account)?.map(|info| info.head))
    }

    pub fn account_info(
        &self,
        txn: &RoTxn,
        account: &Account,
    ) -> Result<Option<AccountInfo>, StoreError> {
        self.store.account.get(txn, account)
    }

    /// Confirmed-plus-unconfirmed balance of `account`, if it is opened.
    pub fn account_balance(
        &self,
        txn: &RoTxn,
        account: &Account,
    ) -> Result<Option<Amount>, StoreError> {
        Ok(self
            .store
            .account
            .get(txn, account)?
            .map(|info| info.balance))
    }

    /// Total amount waiting to be received by `account`.
    pub fn account_receivable(
        &self,
        txn: &RoTxn,
        account: &Account,
    ) -> Result<Amount, StoreError> {
        let mut total = Amount::ZERO;
        for (_, info) in self.store.pending.iter_account(txn, account)? {
            total = total
                .checked_add(info.amount)
                .ok_or_else(|| StoreError::Corruption("receivable total overflow".into()))?;
        }
        Ok(total)
    }

    pub fn block(&self, txn: &RoTxn, hash: &BlockHash) -> Result<Option<Block>, StoreError> {
        self.store.block.get(txn, hash)
    }

    pub fn block_exists(&self, txn: &RoTxn, hash: &BlockHash) -> Result<bool, StoreError> {
        self.store.block.exists(txn, hash)
    }

    /// Whether `hash` was ever accepted, even if its body was pruned away.
    pub fn block_or_pruned_exists(
        &self,
        txn: &RoTxn,
        hash: &BlockHash,
    ) -> Result<bool, StoreError> {
        if self.store.pruned.exists(txn, hash)? {
            return Ok(true);
        }
        self.store.block.exists(txn, hash)
    }

    /// Hash of the block following `hash` in its chain, if any.
    pub fn successor(&self, txn: &RoTxn, hash: &BlockHash) -> Result<Option<BlockHash>, StoreError> {
        Ok(self.store.block.get(txn, hash)?.and_then(|block| {
            let successor = block.sideband().successor;
            (!successor.is_zero()).then_some(successor)
        }))
    }

    /// Account owning `hash`, if the block body is present.
    pub fn block_account(
        &self,
        txn: &RoTxn,
        hash: &BlockHash,
    ) -> Result<Option<Account>, StoreError> {
        Ok(self
            .store
            .block
            .get(txn, hash)?
            .map(|block| block.sideband().account))
    }

    /// A block is confirmed once its height is at or below its account's
    /// confirmation height. Pruned blocks are confirmed by construction.
    pub fn block_confirmed(&self, txn: &RoTxn, hash: &BlockHash) -> Result<bool, StoreError> {
        if self.store.pruned.exists(txn, hash)? {
            return Ok(true);
        }
        let Some(block) = self.store.block.get(txn, hash)? else {
            return Ok(false);
        };
        let conf = self
            .store
            .confirmation_height
            .get(txn, &block.sideband().account)?
            .unwrap_or_default();
        Ok(block.sideband().height <= conf.height)
    }

    /// Whether everything `block` depends on is already confirmed.
    ///
    /// `block` must carry its sideband, i.e. come from the store.
    pub fn dependents_confirmed(&self, txn: &RoTxn, block: &Block) -> Result<bool, StoreError> {
        let previous = block.previous();
        if !previous.is_zero() && !self.block_confirmed(txn, &previous)? {
            return Ok(false);
        }
        if let Some(source) = block.source() {
            if !source.is_zero() && !self.block_confirmed(txn, &source)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Representative in effect at `hash`, walking back to the nearest block
    /// that names one.
    ///
    /// # Panics
    /// Panics if the walk hits a missing or pruned body; callers only walk
    /// chains above the pruning horizon.
    pub(crate) fn representative_calculated(
        &self,
        txn: &RoTxn,
        hash: &BlockHash,
    ) -> Result<Account, StoreError> {
        let mut current = *hash;
        loop {
            let Some(block) = self.store.block.get(txn, &current)? else {
                panic!("representative walk hit a missing or pruned block {current}");
            };
            match &block {
                Block::State(b) => return Ok(b.hashables.representative),
                Block::Open(b) => return Ok(b.hashables.representative),
                Block::Change(b) => return Ok(b.hashables.representative),
                Block::Send(_) | Block::Receive(_) => current = block.previous(),
            }
        }
    }
}
