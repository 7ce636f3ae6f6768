//! Confirmation height table: account to highest cemented block.

use heed::types::Bytes;
use heed::{Database, RoTxn, RwTxn};

use lattica_types::{Account, ConfirmationHeightInfo};

use crate::StoreError;

#[derive(Clone, Copy)]
pub struct LmdbConfirmationHeightStore {
    db: Database<Bytes, Bytes>,
}

impl LmdbConfirmationHeightStore {
    pub(crate) fn new(db: Database<Bytes, Bytes>) -> Self {
        Self { db }
    }

    pub fn put(
        &self,
        txn: &mut RwTxn,
        account: &Account,
        info: &ConfirmationHeightInfo,
    ) -> Result<(), StoreError> {
        let bytes = bincode::serialize(info)?;
        self.db.put(txn, account.as_bytes(), &bytes)?;
        Ok(())
    }

    pub fn get(
        &self,
        txn: &RoTxn,
        account: &Account,
    ) -> Result<Option<ConfirmationHeightInfo>, StoreError> {
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

    pub fn iter(&self, txn: &RoTxn) -> Result<Vec<(Account, ConfirmationHeightInfo)>, StoreError> {
        let mut out = Vec::new();
        for entry in self.db.iter(txn)? {
            let (key, value) = entry?;
            let key: [u8; 32] = key.try_into().map_err(|_| {
                StoreError::Corruption("confirmation height key is not 32 bytes".into())
            })?;
            out.push((Account::new(key), bincode::deserialize(value)?));
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LmdbStore;
    use lattica_types::BlockHash;

    fn open_test_store() -> (LmdbStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = LmdbStore::open(dir.path(), 10 * 1024 * 1024).unwrap();
        (store, dir)
    }

    #[test]
    fn put_get_roundtrip() {
        let (store, _dir) = open_test_store();
        let account = Account::new([1u8; 32]);
        let info = ConfirmationHeightInfo::new(5, BlockHash::new([2u8; 32]));

        let mut txn = store.begin_write().unwrap();
        store
            .confirmation_height
            .put(&mut txn, &account, &info)
            .unwrap();
        txn.commit().unwrap();

        let txn = store.begin_read().unwrap();
        assert_eq!(
            store.confirmation_height.get(&txn, &account).unwrap(),
            Some(info)
        );
        assert_eq!(store.confirmation_height.count(&txn).unwrap(), 1);
    }

    #[test]
    fn delete_removes_row() {
        let (store, _dir) = open_test_store();
        let account = Account::new([1u8; 32]);

        let mut txn = store.begin_write().unwrap();
        store
            .confirmation_height
            .put(&mut txn, &account, &ConfirmationHeightInfo::default())
            .unwrap();
        store.confirmation_height.del(&mut txn, &account).unwrap();
        txn.commit().unwrap();

        let txn = store.begin_read().unwrap();
        assert_eq!(store.confirmation_height.get(&txn, &account).unwrap(), None);
    }

    #[test]
    fn iter_lists_every_row() {
        let (store, _dir) = open_test_store();
        let mut txn = store.begin_write().unwrap();
        for tag in [2u8, 1] {
            store
                .confirmation_height
                .put(
                    &mut txn,
                    &Account::new([tag; 32]),
                    &ConfirmationHeightInfo::new(tag as u64, BlockHash::new([tag; 32])),
                )
                .unwrap();
        }
        txn.commit().unwrap();

        let txn = store.begin_read().unwrap();
        let all = store.confirmation_height.iter(&txn).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].0, Account::new([1u8; 32]));
        assert_eq!(all[0].1.height, 1);
    }
}
