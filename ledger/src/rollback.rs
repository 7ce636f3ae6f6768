//! Undoing blocks from the top of their account chains.
//!
//! Rollback is forced work, not a convenience: it happens when consensus
//! picks a different fork than the one applied locally. Only frontiers can
//! be removed, so rolling back a buried block removes everything above it,
//! and rolling back a send whose funds were already received drags the
//! receiving chain down first. Cemented blocks are never rolled back;
//! trying is a caller bug and panics.

use lattica_blocks::Block;
use lattica_store_lmdb::{RwTxn, StoreError};
use lattica_types::{
    Account, AccountInfo, Amount, BlockHash, PendingInfo, PendingKey, Timestamp,
};

use crate::error::RollbackError;
use crate::ledger::Ledger;

impl Ledger {
    /// Removes `hash` from the ledger along with every block that depends
    /// on it, in any account. Returns the removed blocks, the most recently
    /// applied first.
    pub fn rollback(
        &self,
        txn: &mut RwTxn,
        hash: &BlockHash,
    ) -> Result<Vec<Block>, RollbackError> {
        tracing::debug!(block = %hash, "rolling back");
        RollbackPerformer::new(self, txn).roll_back(hash)
    }
}

pub(crate) struct RollbackPerformer<'a, 'txn> {
    ledger: &'a Ledger,
    txn: &'a mut RwTxn<'txn>,
    rolled_back: Vec<Block>,
}

impl<'a, 'txn> RollbackPerformer<'a, 'txn> {
    pub fn new(ledger: &'a Ledger, txn: &'a mut RwTxn<'txn>) -> Self {
        Self {
            ledger,
            txn,
            rolled_back: Vec::new(),
        }
    }

    pub fn roll_back(mut self, target: &BlockHash) -> Result<Vec<Block>, RollbackError> {
        if !self.ledger.store.block.exists(self.txn, target)? {
            return Err(RollbackError::BlockNotFound(*target));
        }
        // Each entry is a block that must end up removed; heads are popped
        // one at a time until the entry itself goes.
        let mut stack = vec![*target];
        while let Some(current) = stack.last().copied() {
            let Some(current_block) = self.ledger.store.block.get(self.txn, &current)? else {
                // Already removed while unwinding a dependent chain.
                stack.pop();
                continue;
            };
            let account = current_block.sideband().account;
            let Some(info) = self.ledger.store.account.get(self.txn, &account)? else {
                return Err(StoreError::Corruption(format!(
                    "block {current} has no account row for {account}"
                ))
                .into());
            };
            let head_hash = info.head;
            let head_block = if head_hash == current {
                current_block
            } else {
                self.ledger
                    .store
                    .block
                    .get(self.txn, &head_hash)?
                    .ok_or_else(|| {
                        StoreError::Corruption(format!("frontier {head_hash} has no body"))
                    })?
            };
            let conf = self
                .ledger
                .store
                .confirmation_height
                .get(self.txn, &account)?
                .unwrap_or_default();
            if head_block.sideband().height <= conf.height {
                panic!(
                    "rollback of cemented block {} at height {} (confirmed to {})",
                    head_hash,
                    head_block.sideband().height,
                    conf.height
                );
            }
            if let Some(destination) = head_block.destination() {
                if !self
                    .ledger
                    .store
                    .pending
                    .exists(self.txn, &PendingKey::new(destination, head_hash))?
                {
                    // The send was received; the receive must go first.
                    let receive = self.find_receive(&destination, &head_hash)?;
                    stack.push(receive);
                    continue;
                }
            }
            self.pop_head(account, &info, head_block)?;
        }
        Ok(self.rolled_back)
    }

    /// Removes the frontier block of `account` and rewinds the account to
    /// its predecessor. The caller has established that no other chain
    /// depends on the block.
    fn pop_head(
        &mut self,
        account: Account,
        info: &AccountInfo,
        block: Block,
    ) -> Result<(), RollbackError> {
        let hash = block.hash();
        let previous_hash = block.previous();
        let previous = if previous_hash.is_zero() {
            None
        } else {
            let Some(body) = self.ledger.store.block.get(self.txn, &previous_hash)? else {
                panic!("rollback onto pruned or missing predecessor {previous_hash}");
            };
            Some(body)
        };

        if let Some(destination) = block.destination() {
            self.ledger
                .store
                .pending
                .del(self.txn, &PendingKey::new(destination, hash))?;
        }
        if let Some(source) = block.source() {
            let prev_balance = previous
                .as_ref()
                .map(|b| b.sideband().balance)
                .unwrap_or(Amount::ZERO);
            let amount = block
                .sideband()
                .balance
                .checked_sub(prev_balance)
                .unwrap_or_else(|| panic!("receive amount underflow rolling back {hash}"));
            // A pruned source leaves the sender unknowable; record the burn
            // account as a stand-in.
            let source_account = self
                .ledger
                .block_account(self.txn, &source)?
                .unwrap_or(Account::ZERO);
            self.ledger.store.pending.put(
                self.txn,
                &PendingKey::new(account, source),
                &PendingInfo::new(source_account, amount, block.sideband().source_epoch),
            )?;
        }

        self.ledger
            .weight_debit(self.txn, &info.representative, info.balance)?;
        match &previous {
            None => {
                self.ledger.store.account.del(self.txn, &account)?;
                self.ledger
                    .store
                    .confirmation_height
                    .del(self.txn, &account)?;
                self.ledger
                    .cache
                    .account_count
                    .fetch_sub(1, std::sync::atomic::Ordering::SeqCst);
            }
            Some(previous) => {
                let representative = self
                    .ledger
                    .representative_calculated(self.txn, &previous_hash)?;
                let new_info = AccountInfo {
                    head: previous_hash,
                    representative,
                    open_block: info.open_block,
                    balance: previous.sideband().balance,
                    modified: Timestamp::now(),
                    block_count: info.block_count - 1,
                    epoch: previous.sideband().details.epoch,
                };
                self.ledger
                    .weight_credit(self.txn, &new_info.representative, new_info.balance)?;
                self.ledger.store.account.put(self.txn, &account, &new_info)?;
            }
        }

        self.ledger.store.block.del(self.txn, &hash)?;
        if !previous_hash.is_zero() {
            self.ledger
                .store
                .block
                .successor_set(self.txn, &previous_hash, BlockHash::ZERO)?;
        }
        self.ledger
            .cache
            .block_count
            .fetch_sub(1, std::sync::atomic::Ordering::SeqCst);
        self.rolled_back.push(block);
        Ok(())
    }

    /// Finds the block in `destination`'s chain that received `send_hash`.
    ///
    /// # Panics
    /// The caller has established the receivable entry was consumed, so a
    /// missing receive means the ledger is corrupt.
    fn find_receive(
        &self,
        destination: &Account,
        send_hash: &BlockHash,
    ) -> Result<BlockHash, RollbackError> {
        let Some(info) = self.ledger.store.account.get(self.txn, destination)? else {
            panic!("no receive block found for consumed send {send_hash}");
        };
        let mut current = info.head;
        while !current.is_zero() {
            let Some(block) = self.ledger.store.block.get(self.txn, &current)? else {
                panic!("missing body at {current} while searching for the receive of {send_hash}");
            };
            if block.source() == Some(*send_hash) {
                return Ok(current);
            }
            current = block.previous();
        }
        panic!("no receive block found for consumed send {send_hash}");
    }
}
