//! Meta table: store-level key/value pairs, currently just the schema version.

use heed::types::Bytes;
use heed::{Database, RoTxn, RwTxn};

use crate::StoreError;

const SCHEMA_VERSION_KEY: &[u8] = b"schema_version";

#[derive(Clone, Copy)]
pub struct LmdbMetaStore {
    db: Database<Bytes, Bytes>,
}

impl LmdbMetaStore {
    pub(crate) fn new(db: Database<Bytes, Bytes>) -> Self {
        Self { db }
    }

    pub fn version_get(&self, txn: &RoTxn) -> Result<Option<u32>, StoreError> {
        match self.db.get(txn, SCHEMA_VERSION_KEY)? {
            Some(bytes) => {
                let bytes: [u8; 4] = bytes.try_into().map_err(|_| {
                    StoreError::Serialization("schema version is not 4 bytes".into())
                })?;
                Ok(Some(u32::from_le_bytes(bytes)))
            }
            None => Ok(None),
        }
    }

    pub fn version_put(&self, txn: &mut RwTxn, version: u32) -> Result<(), StoreError> {
        self.db
            .put(txn, SCHEMA_VERSION_KEY, &version.to_le_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LmdbStore;

    #[test]
    fn version_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = LmdbStore::open(dir.path(), 10 * 1024 * 1024).unwrap();

        let mut txn = store.begin_write().unwrap();
        store.meta.version_put(&mut txn, 7).unwrap();
        txn.commit().unwrap();

        let txn = store.begin_read().unwrap();
        assert_eq!(store.meta.version_get(&txn).unwrap(), Some(7));
    }
}
