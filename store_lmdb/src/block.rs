//! Block table: hash to block bytes in the storage form (block + sideband).

use heed::types::Bytes;
use heed::{Database, RoTxn, RwTxn};

use lattica_blocks::{codec, Block};
use lattica_types::BlockHash;

use crate::StoreError;

#[derive(Clone, Copy)]
pub struct LmdbBlockStore {
    db: Database<Bytes, Bytes>,
}

impl LmdbBlockStore {
    pub(crate) fn new(db: Database<Bytes, Bytes>) -> Self {
        Self { db }
    }

    /// Store a processed block under its hash.
    ///
    /// # Panics
    /// Panics if the block has no sideband attached; only processed blocks
    /// belong in the store.
    pub fn put(&self, txn: &mut RwTxn, block: &Block) -> Result<(), StoreError> {
        let bytes = codec::serialize_with_sideband(block);
        self.db.put(txn, block.hash().as_bytes(), &bytes)?;
        Ok(())
    }

    pub fn get(&self, txn: &RoTxn, hash: &BlockHash) -> Result<Option<Block>, StoreError> {
        match self.db.get(txn, hash.as_bytes())? {
            Some(bytes) => Ok(Some(codec::deserialize_with_sideband(bytes)?)),
            None => Ok(None),
        }
    }

    pub fn exists(&self, txn: &RoTxn, hash: &BlockHash) -> Result<bool, StoreError> {
        Ok(self.db.get(txn, hash.as_bytes())?.is_some())
    }

    pub fn del(&self, txn: &mut RwTxn, hash: &BlockHash) -> Result<(), StoreError> {
        self.db.delete(txn, hash.as_bytes())?;
        Ok(())
    }

    /// Rewrite the stored successor pointer of `hash`.
    pub fn successor_set(
        &self,
        txn: &mut RwTxn,
        hash: &BlockHash,
        successor: BlockHash,
    ) -> Result<(), StoreError> {
        let mut block = self
            .get(txn, hash)?
            .ok_or_else(|| StoreError::NotFound(format!("block {hash}")))?;
        block.set_successor(successor);
        self.put(txn, &block)
    }

    pub fn count(&self, txn: &RoTxn) -> Result<u64, StoreError> {
        Ok(self.db.len(txn)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LmdbStore;
    use lattica_blocks::{BlockBuilder, BlockDetails, BlockSideband};
    use lattica_types::{Account, Amount, Epoch, Timestamp};

    fn open_test_store() -> (LmdbStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = LmdbStore::open(dir.path(), 10 * 1024 * 1024).unwrap();
        (store, dir)
    }

    fn test_block(tag: u8) -> Block {
        let mut block = BlockBuilder::send()
            .previous(BlockHash::new([tag; 32]))
            .destination(Account::new([2u8; 32]))
            .balance(Amount::new(1000))
            .build();
        block.sideband_set(BlockSideband {
            height: 2,
            timestamp: Timestamp::new(1_700_000_000),
            successor: BlockHash::ZERO,
            account: Account::new([9u8; 32]),
            balance: Amount::new(1000),
            details: BlockDetails::new(Epoch::Epoch0, true, false, false),
            source_epoch: Epoch::Epoch0,
        });
        block
    }

    #[test]
    fn put_get_roundtrip() {
        let (store, _dir) = open_test_store();
        let block = test_block(1);

        let mut txn = store.begin_write().unwrap();
        store.block.put(&mut txn, &block).unwrap();
        txn.commit().unwrap();

        let txn = store.begin_read().unwrap();
        let loaded = store.block.get(&txn, &block.hash()).unwrap().unwrap();
        assert_eq!(loaded, block);
        assert_eq!(store.block.count(&txn).unwrap(), 1);
    }

    #[test]
    fn missing_block_is_none() {
        let (store, _dir) = open_test_store();
        let txn = store.begin_read().unwrap();
        assert_eq!(store.block.get(&txn, &BlockHash::new([7u8; 32])).unwrap(), None);
        assert!(!store.block.exists(&txn, &BlockHash::new([7u8; 32])).unwrap());
    }

    #[test]
    fn delete_removes_block() {
        let (store, _dir) = open_test_store();
        let block = test_block(3);

        let mut txn = store.begin_write().unwrap();
        store.block.put(&mut txn, &block).unwrap();
        store.block.del(&mut txn, &block.hash()).unwrap();
        txn.commit().unwrap();

        let txn = store.begin_read().unwrap();
        assert!(!store.block.exists(&txn, &block.hash()).unwrap());
    }

    #[test]
    fn successor_set_updates_sideband() {
        let (store, _dir) = open_test_store();
        let block = test_block(4);
        let successor = BlockHash::new([8u8; 32]);

        let mut txn = store.begin_write().unwrap();
        store.block.put(&mut txn, &block).unwrap();
        store
            .block
            .successor_set(&mut txn, &block.hash(), successor)
            .unwrap();
        txn.commit().unwrap();

        let txn = store.begin_read().unwrap();
        let loaded = store.block.get(&txn, &block.hash()).unwrap().unwrap();
        assert_eq!(loaded.sideband().successor, successor);
    }

    #[test]
    fn successor_set_missing_block_errors() {
        let (store, _dir) = open_test_store();
        let mut txn = store.begin_write().unwrap();
        let err = store
            .block
            .successor_set(&mut txn, &BlockHash::new([1u8; 32]), BlockHash::ZERO)
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }
}
