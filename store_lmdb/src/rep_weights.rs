//! Representative weight table: representative to summed voting weight.
//!
//! Values are 16-byte big-endian amounts so the table stays readable in raw
//! LMDB dumps.

use heed::types::Bytes;
use heed::{Database, RoTxn, RwTxn};

use lattica_types::{Account, Amount};

use crate::StoreError;

#[derive(Clone, Copy)]
pub struct LmdbRepWeightStore {
    db: Database<Bytes, Bytes>,
}

impl LmdbRepWeightStore {
    pub(crate) fn new(db: Database<Bytes, Bytes>) -> Self {
        Self { db }
    }

    pub fn get(&self, txn: &RoTxn, representative: &Account) -> Result<Option<Amount>, StoreError> {
        match self.db.get(txn, representative.as_bytes())? {
            Some(bytes) => Ok(Some(Self::parse_amount(bytes)?)),
            None => Ok(None),
        }
    }

    pub fn put(
        &self,
        txn: &mut RwTxn,
        representative: &Account,
        weight: Amount,
    ) -> Result<(), StoreError> {
        self.db
            .put(txn, representative.as_bytes(), &weight.to_be_bytes())?;
        Ok(())
    }

    pub fn del(&self, txn: &mut RwTxn, representative: &Account) -> Result<(), StoreError> {
        self.db.delete(txn, representative.as_bytes())?;
        Ok(())
    }

    pub fn count(&self, txn: &RoTxn) -> Result<u64, StoreError> {
        Ok(self.db.len(txn)?)
    }

    pub fn iter(&self, txn: &RoTxn) -> Result<Vec<(Account, Amount)>, StoreError> {
        let mut out = Vec::new();
        for entry in self.db.iter(txn)? {
            let (key, value) = entry?;
            let key: [u8; 32] = key
                .try_into()
                .map_err(|_| StoreError::Corruption("rep weight key is not 32 bytes".into()))?;
            out.push((Account::new(key), Self::parse_amount(value)?));
        }
        Ok(out)
    }

    fn parse_amount(bytes: &[u8]) -> Result<Amount, StoreError> {
        let bytes: [u8; 16] = bytes
            .try_into()
            .map_err(|_| StoreError::Corruption("rep weight value is not 16 bytes".into()))?;
        Ok(Amount::from_be_bytes(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LmdbStore;

    fn open_test_store() -> (LmdbStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = LmdbStore::open(dir.path(), 10 * 1024 * 1024).unwrap();
        (store, dir)
    }

    #[test]
    fn put_get_roundtrip() {
        let (store, _dir) = open_test_store();
        let rep = Account::new([1u8; 32]);

        let mut txn = store.begin_write().unwrap();
        store.rep_weight.put(&mut txn, &rep, Amount::new(12345)).unwrap();
        txn.commit().unwrap();

        let txn = store.begin_read().unwrap();
        assert_eq!(store.rep_weight.get(&txn, &rep).unwrap(), Some(Amount::new(12345)));
    }

    #[test]
    fn put_overwrites_previous_weight() {
        let (store, _dir) = open_test_store();
        let rep = Account::new([1u8; 32]);

        let mut txn = store.begin_write().unwrap();
        store.rep_weight.put(&mut txn, &rep, Amount::new(10)).unwrap();
        store.rep_weight.put(&mut txn, &rep, Amount::new(20)).unwrap();
        txn.commit().unwrap();

        let txn = store.begin_read().unwrap();
        assert_eq!(store.rep_weight.get(&txn, &rep).unwrap(), Some(Amount::new(20)));
        assert_eq!(store.rep_weight.count(&txn).unwrap(), 1);
    }

    #[test]
    fn delete_removes_representative() {
        let (store, _dir) = open_test_store();
        let rep = Account::new([1u8; 32]);

        let mut txn = store.begin_write().unwrap();
        store.rep_weight.put(&mut txn, &rep, Amount::new(10)).unwrap();
        store.rep_weight.del(&mut txn, &rep).unwrap();
        txn.commit().unwrap();

        let txn = store.begin_read().unwrap();
        assert_eq!(store.rep_weight.get(&txn, &rep).unwrap(), None);
    }

    #[test]
    fn iter_lists_all_weights() {
        let (store, _dir) = open_test_store();
        let mut txn = store.begin_write().unwrap();
        store
            .rep_weight
            .put(&mut txn, &Account::new([2u8; 32]), Amount::new(2))
            .unwrap();
        store
            .rep_weight
            .put(&mut txn, &Account::new([1u8; 32]), Amount::new(1))
            .unwrap();
        txn.commit().unwrap();

        let txn = store.begin_read().unwrap();
        let all = store.rep_weight.iter(&txn).unwrap();
        assert_eq!(
            all,
            vec![
                (Account::new([1u8; 32]), Amount::new(1)),
                (Account::new([2u8; 32]), Amount::new(2))
            ]
        );
    }
}
