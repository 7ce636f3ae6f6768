//! Pruned table: tombstones for blocks whose bodies have been deleted.

use std::ops::Bound;

use heed::types::Bytes;
use heed::{Database, RoTxn, RwTxn};

use lattica_types::BlockHash;

use crate::StoreError;

#[derive(Clone, Copy)]
pub struct LmdbPrunedStore {
    db: Database<Bytes, Bytes>,
}

impl LmdbPrunedStore {
    pub(crate) fn new(db: Database<Bytes, Bytes>) -> Self {
        Self { db }
    }

    pub fn put(&self, txn: &mut RwTxn, hash: &BlockHash) -> Result<(), StoreError> {
        self.db.put(txn, hash.as_bytes(), &[])?;
        Ok(())
    }

    pub fn exists(&self, txn: &RoTxn, hash: &BlockHash) -> Result<bool, StoreError> {
        Ok(self.db.get(txn, hash.as_bytes())?.is_some())
    }

    pub fn count(&self, txn: &RoTxn) -> Result<u64, StoreError> {
        Ok(self.db.len(txn)?)
    }

    /// Uniform sample: the first tombstone at or after `seed`, wrapping to the
    /// start of the table. `None` only when the table is empty.
    pub fn random(&self, txn: &RoTxn, seed: &BlockHash) -> Result<Option<BlockHash>, StoreError> {
        let range = (Bound::Included(&seed.as_bytes()[..]), Bound::Unbounded);
        let mut iter = self.db.range(txn, &range)?;
        let entry = match iter.next().transpose()? {
            Some(entry) => Some(entry),
            None => self.db.first(txn)?,
        };
        match entry {
            Some((key, _)) => {
                let key: [u8; 32] = key
                    .try_into()
                    .map_err(|_| StoreError::Corruption("pruned key is not 32 bytes".into()))?;
                Ok(Some(BlockHash::new(key)))
            }
            None => Ok(None),
        }
    }
}
