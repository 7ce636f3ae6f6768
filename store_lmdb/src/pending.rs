//! Pending table: (receiver, send hash) to receivable amount and source.

use std::ops::Bound;

use heed::types::Bytes;
use heed::{Database, RoTxn, RwTxn};

use lattica_types::{Account, PendingInfo, PendingKey};

use crate::StoreError;

#[derive(Clone, Copy)]
pub struct LmdbPendingStore {
    db: Database<Bytes, Bytes>,
}

impl LmdbPendingStore {
    pub(crate) fn new(db: Database<Bytes, Bytes>) -> Self {
        Self { db }
    }

    pub fn put(
        &self,
        txn: &mut RwTxn,
        key: &PendingKey,
        info: &PendingInfo,
    ) -> Result<(), StoreError> {
        let bytes = bincode::serialize(info)?;
        self.db.put(txn, &key.to_bytes(), &bytes)?;
        Ok(())
    }

    pub fn get(&self, txn: &RoTxn, key: &PendingKey) -> Result<Option<PendingInfo>, StoreError> {
        match self.db.get(txn, &key.to_bytes())? {
            Some(bytes) => Ok(Some(bincode::deserialize(bytes)?)),
            None => Ok(None),
        }
    }

    pub fn exists(&self, txn: &RoTxn, key: &PendingKey) -> Result<bool, StoreError> {
        Ok(self.db.get(txn, &key.to_bytes())?.is_some())
    }

    pub fn del(&self, txn: &mut RwTxn, key: &PendingKey) -> Result<(), StoreError> {
        self.db.delete(txn, &key.to_bytes())?;
        Ok(())
    }

    /// Whether any entry is receivable by `receiver`.
    pub fn any(&self, txn: &RoTxn, receiver: &Account) -> Result<bool, StoreError> {
        let (lo, hi) = Self::receiver_bounds(receiver);
        let range = (Bound::Included(&lo[..]), Bound::Included(&hi[..]));
        let mut iter = self.db.range(txn, &range)?;
        Ok(iter.next().transpose()?.is_some())
    }

    /// All entries receivable by `receiver`, ordered by send hash.
    pub fn iter_account(
        &self,
        txn: &RoTxn,
        receiver: &Account,
    ) -> Result<Vec<(PendingKey, PendingInfo)>, StoreError> {
        let (lo, hi) = Self::receiver_bounds(receiver);
        let range = (Bound::Included(&lo[..]), Bound::Included(&hi[..]));
        let mut out = Vec::new();
        for entry in self.db.range(txn, &range)? {
            let (key, value) = entry?;
            out.push((Self::parse_key(key)?, bincode::deserialize(value)?));
        }
        Ok(out)
    }

    pub fn iter(&self, txn: &RoTxn) -> Result<Vec<(PendingKey, PendingInfo)>, StoreError> {
        let mut out = Vec::new();
        for entry in self.db.iter(txn)? {
            let (key, value) = entry?;
            out.push((Self::parse_key(key)?, bincode::deserialize(value)?));
        }
        Ok(out)
    }

    pub fn count(&self, txn: &RoTxn) -> Result<u64, StoreError> {
        Ok(self.db.len(txn)?)
    }

    // Keys are fixed width, so the receiver's slice of the table is exactly
    // receiver || 00..00 through receiver || ff..ff inclusive.
    fn receiver_bounds(receiver: &Account) -> ([u8; 64], [u8; 64]) {
        let mut lo = [0u8; 64];
        let mut hi = [0xffu8; 64];
        lo[..32].copy_from_slice(receiver.as_bytes());
        hi[..32].copy_from_slice(receiver.as_bytes());
        (lo, hi)
    }

    fn parse_key(bytes: &[u8]) -> Result<PendingKey, StoreError> {
        let bytes: [u8; 64] = bytes
            .try_into()
            .map_err(|_| StoreError::Corruption("pending key is not 64 bytes".into()))?;
        Ok(PendingKey::from_bytes(&bytes))
    }
}
