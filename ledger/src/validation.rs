//! Block validation.
//!
//! `BlockValidator` checks a block against the current ledger state and, if
//! it is acceptable, produces the exact set of writes needed to apply it.
//! Nothing here touches the store mutably; applying the instructions is the
//! ledger's job.
//!
//! Checks run in a fixed order and stop at the first failure: signature and
//! position checks before balance arithmetic, proof of work last. Resolving
//! a legacy block's account requires its predecessor, so a missing
//! predecessor reports `GapPrevious` before the signature can be judged.

use lattica_blocks::{Block, BlockDetails, BlockSideband, BlockType, OpenBlock, StateBlock};
use lattica_crypto::verify_signature;
use lattica_store_lmdb::RoTxn;
use lattica_types::{
    Account, AccountInfo, Amount, BlockHash, Epoch, PendingInfo, PendingKey, Timestamp,
};
use lattica_work::{validate_work, WorkBlockKind};

use crate::error::ProcessError;
use crate::ledger::Ledger;

/// The writes that applying a validated block comes down to.
pub(crate) struct BlockInstructions {
    pub account: Account,
    pub old_info: Option<AccountInfo>,
    pub new_info: AccountInfo,
    pub sideband: BlockSideband,
    pub pending_insert: Option<(PendingKey, PendingInfo)>,
    pub pending_erase: Option<PendingKey>,
}

pub(crate) struct BlockValidator<'a, 'txn> {
    ledger: &'a Ledger,
    txn: &'a RoTxn<'txn>,
    block: &'a Block,
}

impl<'a, 'txn> BlockValidator<'a, 'txn> {
    pub fn new(ledger: &'a Ledger, txn: &'a RoTxn<'txn>, block: &'a Block) -> Self {
        Self { ledger, txn, block }
    }

    pub fn validate(&self) -> Result<BlockInstructions, ProcessError> {
        let hash = self.block.hash();
        if self.ledger.block_or_pruned_exists(self.txn, &hash)? {
            return Err(ProcessError::Old);
        }
        let now = Timestamp::now();
        match self.block {
            Block::State(state) => self.validate_state(state, hash, now),
            Block::Open(open) => self.validate_open(open, hash, now),
            Block::Send(_) | Block::Receive(_) | Block::Change(_) => {
                self.validate_legacy(hash, now)
            }
        }
    }

    fn validate_state(
        &self,
        state: &StateBlock,
        hash: BlockHash,
        now: Timestamp,
    ) -> Result<BlockInstructions, ProcessError> {
        let h = &state.hashables;
        let account = h.account;
        if account == self.ledger.constants.burn_account && h.previous.is_zero() {
            return Err(ProcessError::OpenedBurnAccount);
        }

        let info = self.ledger.store.account.get(self.txn, &account)?;
        match (&info, h.previous.is_zero()) {
            // The position at the head of a fresh chain is already taken.
            (Some(_), true) => return Err(ProcessError::Fork),
            (None, false) => return Err(ProcessError::GapPrevious),
            (Some(info), false) => {
                if !self.ledger.block_or_pruned_exists(self.txn, &h.previous)? {
                    return Err(ProcessError::GapPrevious);
                }
                if h.previous != info.head {
                    return Err(ProcessError::Fork);
                }
            }
            (None, true) => {}
        }

        let prev_balance = info.as_ref().map(|i| i.balance).unwrap_or(Amount::ZERO);
        if let Some(target) = self.ledger.constants.epochs.epoch(&h.link) {
            // A transfer may not piggyback on an epoch marker.
            if h.balance != prev_balance {
                return Err(ProcessError::BlockPosition);
            }
            return self.validate_epoch(state, info, target, hash, now);
        }

        if !verify_signature(hash.as_bytes(), &state.signature, &account.as_key()) {
            return Err(ProcessError::BadSignature);
        }

        let account_epoch = info.as_ref().map(|i| i.epoch).unwrap_or(Epoch::Epoch0);
        let mut pending_insert = None;
        let mut pending_erase = None;

        let (details, source_epoch) = if h.balance < prev_balance {
            let amount = prev_balance - h.balance;
            pending_insert = Some((
                PendingKey::new(h.link.into_account(), hash),
                PendingInfo::new(account, amount, account_epoch),
            ));
            (
                BlockDetails::new(account_epoch, true, false, false),
                Epoch::Epoch0,
            )
        } else if h.link.is_zero() {
            if h.balance > prev_balance {
                // Claims funds with no source to take them from.
                return Err(ProcessError::BalanceMismatch);
            }
            if info.is_none() {
                // An account cannot come into existence without receiving.
                return Err(ProcessError::GapSource);
            }
            (
                BlockDetails::new(account_epoch, false, false, false),
                Epoch::Epoch0,
            )
        } else {
            let source = h.link.into_hash();
            if !self.ledger.block_or_pruned_exists(self.txn, &source)? {
                return Err(ProcessError::GapSource);
            }
            let key = PendingKey::new(account, source);
            let Some(pending) = self.ledger.store.pending.get(self.txn, &key)? else {
                return Err(ProcessError::Unreceivable);
            };
            let computed = prev_balance
                .checked_add(pending.amount)
                .ok_or(ProcessError::BalanceMismatch)?;
            if h.balance != computed {
                return Err(ProcessError::BalanceMismatch);
            }
            pending_erase = Some(key);
            let epoch = account_epoch.max(pending.epoch);
            (BlockDetails::new(epoch, false, true, false), pending.epoch)
        };
        self.check_work(&details)?;

        let height = info.as_ref().map(|i| i.block_count).unwrap_or(0) + 1;
        let open_block = info.as_ref().map(|i| i.open_block).unwrap_or(hash);
        Ok(BlockInstructions {
            account,
            new_info: AccountInfo {
                head: hash,
                representative: h.representative,
                open_block,
                balance: h.balance,
                modified: now,
                block_count: height,
                epoch: details.epoch,
            },
            sideband: BlockSideband {
                height,
                timestamp: now,
                successor: BlockHash::ZERO,
                account,
                balance: h.balance,
                details,
                source_epoch,
            },
            pending_insert,
            pending_erase,
            old_info: info,
        })
    }

    fn validate_epoch(
        &self,
        state: &StateBlock,
        info: Option<AccountInfo>,
        target: Epoch,
        hash: BlockHash,
        now: Timestamp,
    ) -> Result<BlockInstructions, ProcessError> {
        let h = &state.hashables;
        let account = h.account;
        let Some(signer) = self.ledger.constants.epochs.signer(target) else {
            return Err(ProcessError::BadSignature);
        };
        if !verify_signature(hash.as_bytes(), &state.signature, signer) {
            return Err(ProcessError::BadSignature);
        }

        match &info {
            Some(info) => {
                if info.epoch.successor() != Some(target) {
                    return Err(ProcessError::BlockPosition);
                }
                if h.representative != info.representative {
                    return Err(ProcessError::RepresentativeMismatch);
                }
            }
            None => {
                // Epoch-open: reserves the account before its first receive.
                if !h.representative.is_zero() {
                    return Err(ProcessError::RepresentativeMismatch);
                }
                if !self.ledger.store.pending.any(self.txn, &account)? {
                    return Err(ProcessError::GapEpochOpenPending);
                }
            }
        }

        let details = BlockDetails::new(target, false, false, true);
        self.check_work(&details)?;

        let height = info.as_ref().map(|i| i.block_count).unwrap_or(0) + 1;
        let open_block = info.as_ref().map(|i| i.open_block).unwrap_or(hash);
        Ok(BlockInstructions {
            account,
            new_info: AccountInfo {
                head: hash,
                representative: h.representative,
                open_block,
                balance: h.balance,
                modified: now,
                block_count: height,
                epoch: target,
            },
            sideband: BlockSideband {
                height,
                timestamp: now,
                successor: BlockHash::ZERO,
                account,
                balance: h.balance,
                details,
                source_epoch: Epoch::Epoch0,
            },
            pending_insert: None,
            pending_erase: None,
            old_info: info,
        })
    }

    fn validate_open(
        &self,
        open: &OpenBlock,
        hash: BlockHash,
        now: Timestamp,
    ) -> Result<BlockInstructions, ProcessError> {
        let h = &open.hashables;
        let account = h.account;
        if account == self.ledger.constants.burn_account {
            return Err(ProcessError::OpenedBurnAccount);
        }
        if !verify_signature(hash.as_bytes(), &open.signature, &account.as_key()) {
            return Err(ProcessError::BadSignature);
        }
        if self.ledger.store.account.get(self.txn, &account)?.is_some() {
            return Err(ProcessError::Fork);
        }
        if !self.ledger.block_or_pruned_exists(self.txn, &h.source)? {
            return Err(ProcessError::GapSource);
        }
        let key = PendingKey::new(account, h.source);
        let Some(pending) = self.ledger.store.pending.get(self.txn, &key)? else {
            return Err(ProcessError::Unreceivable);
        };
        // Funds sent under a newer epoch need a state block to receive.
        if pending.epoch > Epoch::Epoch0 {
            return Err(ProcessError::Unreceivable);
        }
        let details = BlockDetails::new(Epoch::Epoch0, false, true, false);
        self.check_work(&details)?;

        Ok(BlockInstructions {
            account,
            old_info: None,
            new_info: AccountInfo {
                head: hash,
                representative: h.representative,
                open_block: hash,
                balance: pending.amount,
                modified: now,
                block_count: 1,
                epoch: Epoch::Epoch0,
            },
            sideband: BlockSideband {
                height: 1,
                timestamp: now,
                successor: BlockHash::ZERO,
                account,
                balance: pending.amount,
                details,
                source_epoch: pending.epoch,
            },
            pending_insert: None,
            pending_erase: Some(key),
        })
    }

    fn validate_legacy(
        &self,
        hash: BlockHash,
        now: Timestamp,
    ) -> Result<BlockInstructions, ProcessError> {
        let previous_hash = self.block.previous();
        let Some(previous) = self.ledger.store.block.get(self.txn, &previous_hash)? else {
            return Err(ProcessError::GapPrevious);
        };
        let account = previous.sideband().account;
        if !verify_signature(hash.as_bytes(), self.block.signature(), &account.as_key()) {
            return Err(ProcessError::BadSignature);
        }
        let Some(info) = self.ledger.store.account.get(self.txn, &account)? else {
            return Err(ProcessError::GapPrevious);
        };
        if previous_hash != info.head {
            return Err(ProcessError::Fork);
        }
        // Once a chain carries state blocks it never goes back.
        if previous.block_type() == BlockType::State || info.epoch != Epoch::Epoch0 {
            return Err(ProcessError::BlockPosition);
        }

        let mut pending_insert = None;
        let mut pending_erase = None;
        let (balance, representative, details, source_epoch) = match self.block {
            Block::Send(send) => {
                let balance = send.hashables.balance;
                if balance > info.balance {
                    return Err(ProcessError::NegativeSpend);
                }
                let amount = info.balance - balance;
                pending_insert = Some((
                    PendingKey::new(send.hashables.destination, hash),
                    PendingInfo::new(account, amount, Epoch::Epoch0),
                ));
                (
                    balance,
                    info.representative,
                    BlockDetails::new(Epoch::Epoch0, true, false, false),
                    Epoch::Epoch0,
                )
            }
            Block::Receive(receive) => {
                let source = receive.hashables.source;
                if !self.ledger.block_or_pruned_exists(self.txn, &source)? {
                    return Err(ProcessError::GapSource);
                }
                let key = PendingKey::new(account, source);
                let Some(pending) = self.ledger.store.pending.get(self.txn, &key)? else {
                    return Err(ProcessError::Unreceivable);
                };
                if pending.epoch > Epoch::Epoch0 {
                    return Err(ProcessError::Unreceivable);
                }
                let balance = info
                    .balance
                    .checked_add(pending.amount)
                    .ok_or(ProcessError::BalanceMismatch)?;
                pending_erase = Some(key);
                (
                    balance,
                    info.representative,
                    BlockDetails::new(Epoch::Epoch0, false, true, false),
                    pending.epoch,
                )
            }
            Block::Change(change) => (
                info.balance,
                change.hashables.representative,
                BlockDetails::new(Epoch::Epoch0, false, false, false),
                Epoch::Epoch0,
            ),
            _ => unreachable!("legacy validation dispatched a non-legacy block"),
        };
        self.check_work(&details)?;

        let height = info.block_count + 1;
        Ok(BlockInstructions {
            account,
            new_info: AccountInfo {
                head: hash,
                representative,
                open_block: info.open_block,
                balance,
                modified: now,
                block_count: height,
                epoch: Epoch::Epoch0,
            },
            sideband: BlockSideband {
                height,
                timestamp: now,
                successor: BlockHash::ZERO,
                account,
                balance,
                details,
                source_epoch,
            },
            pending_insert,
            pending_erase,
            old_info: Some(info),
        })
    }

    fn check_work(&self, details: &BlockDetails) -> Result<(), ProcessError> {
        let kind = if details.is_epoch {
            WorkBlockKind::Epoch
        } else if details.is_receive {
            WorkBlockKind::ReceiveOrOpen
        } else {
            WorkBlockKind::Base
        };
        let threshold = self.ledger.constants.work.threshold_for(kind);
        if !validate_work(&self.block.root(), self.block.work(), threshold) {
            return Err(ProcessError::InsufficientWork);
        }
        Ok(())
    }
}
