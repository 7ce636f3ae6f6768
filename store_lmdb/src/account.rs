//! Account table: account to head-of-chain metadata.

use heed::types::Bytes;
use heed::{Database, RoTxn, RwTxn};

use lattica_types::{Account, AccountInfo};

use crate::StoreError;

#[derive(Clone, Copy)]
pub struct LmdbAccountStore {
    db: Database<Bytes, Bytes>,
}

impl LmdbAccountStore {
    pub(crate) fn new(db: Database<Bytes, Bytes>) -> Self {
        Self { db }
    }

    pub fn put(
        &self,
        txn: &mut RwTxn,
        account: &Account,
        info: &AccountInfo,
    ) -> Result<(), StoreError> {
        let bytes = bincode::serialize(info)?;
        self.db.put(txn, account.as_bytes(), &bytes)?;
        Ok(())
    }

    pub fn get(&self, txn: &RoTxn, account: &Account) -> Result<Option<AccountInfo>, StoreError> {
        match self.db.get(txn, account.as_bytes())? {
            Some(bytes) => Ok(Some(bincode::deserialize(bytes)?)),
            None => Ok(None),
        }
    }

    pub fn del(&self, txn: &mut RwTxn, account: &Account) -> Result<(), StoreError> {
        self.db.delete(txn, account.as_bytes())?;
        Ok(())
    }

    pub fn count(&self, txn: &RoTxn) -> Result<u64, StoreError> {
        Ok(self.db.len(txn)?)
    }

    /// All accounts with an open chain, in key order.
    pub fn iter(&self, txn: &RoTxn) -> Result<Vec<(Account, AccountInfo)>, StoreError> {
        let mut out = Vec::new();
        for entry in self.db.iter(txn)? {
            let (key, value) = entry?;
            let key: [u8; 32] = key
                .try_into()
                .map_err(|_| StoreError::Corruption("account key is not 32 bytes".into()))?;
            out.push((Account::new(key), bincode::deserialize(value)?));
        }
        Ok(out)
    }
}
