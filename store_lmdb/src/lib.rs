//! LMDB storage backend for the Lattica ledger.
//!
//! One heed environment holds every ledger table as a named database. All
//! table methods take a caller-held transaction, so the ledger can group an
//! arbitrary number of reads and writes under one LMDB write transaction
//! and commit them atomically; dropping the transaction without committing
//! abandons every operation in it.

pub mod account;
pub mod block;
pub mod confirmation_height;
pub mod error;
pub mod meta;
pub mod pending;
pub mod pruned;
pub mod rep_weights;

use std::fs;
use std::path::Path;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};
use tracing::debug;

pub use heed::{RoTxn, RwTxn};

pub use account::LmdbAccountStore;
pub use block::LmdbBlockStore;
pub use confirmation_height::LmdbConfirmationHeightStore;
pub use error::StoreError;
pub use meta::LmdbMetaStore;
pub use pending::LmdbPendingStore;
pub use pruned::LmdbPrunedStore;
pub use rep_weights::LmdbRepWeightStore;

/// Current on-disk schema version, stamped into new stores.
pub const STORE_VERSION: u32 = 1;

const MAX_DBS: u32 = 7;

/// All ledger tables inside a single LMDB environment.
pub struct LmdbStore {
    env: Env,
    pub block: LmdbBlockStore,
    pub account: LmdbAccountStore,
    pub pending: LmdbPendingStore,
    pub confirmation_height: LmdbConfirmationHeightStore,
    pub pruned: LmdbPrunedStore,
    pub rep_weight: LmdbRepWeightStore,
    pub meta: LmdbMetaStore,
}

impl LmdbStore {
    /// Open or create a store at `path` (a directory), with the given LMDB
    /// map size in bytes.
    ///
    /// Refuses stores stamped with a schema version newer than
    /// [`STORE_VERSION`]; new stores are stamped on creation.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, StoreError> {
        fs::create_dir_all(path)
            .map_err(|e| StoreError::Backend(format!("create {}: {e}", path.display())))?;

        // Safety: the environment is opened once per path; this store owns it
        // for its whole lifetime.
        let env = unsafe {
            EnvOpenOptions::new()
                .max_dbs(MAX_DBS)
                .map_size(map_size)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let block = LmdbBlockStore::new(create_db(&env, &mut wtxn, "blocks")?);
        let account = LmdbAccountStore::new(create_db(&env, &mut wtxn, "accounts")?);
        let pending = LmdbPendingStore::new(create_db(&env, &mut wtxn, "pending")?);
        let confirmation_height =
            LmdbConfirmationHeightStore::new(create_db(&env, &mut wtxn, "confirmation_height")?);
        let pruned = LmdbPrunedStore::new(create_db(&env, &mut wtxn, "pruned")?);
        let rep_weight = LmdbRepWeightStore::new(create_db(&env, &mut wtxn, "rep_weights")?);
        let meta = LmdbMetaStore::new(create_db(&env, &mut wtxn, "meta")?);

        match meta.version_get(&wtxn)? {
            None => meta.version_put(&mut wtxn, STORE_VERSION)?,
            Some(version) if version > STORE_VERSION => {
                return Err(StoreError::Backend(format!(
                    "store schema version {version} is newer than supported {STORE_VERSION}"
                )));
            }
            Some(_) => {}
        }
        wtxn.commit()?;

        debug!(path = %path.display(), "opened ledger store");
        Ok(Self {
            env,
            block,
            account,
            pending,
            confirmation_height,
            pruned,
            rep_weight,
            meta,
        })
    }

    /// Begin a read transaction. Many may be open concurrently, each seeing
    /// a consistent snapshot.
    pub fn begin_read(&self) -> Result<RoTxn<'_>, StoreError> {
        Ok(self.env.read_txn()?)
    }

    /// Begin the write transaction. LMDB allows one at a time; a second call
    /// blocks until the first commits or is dropped.
    pub fn begin_write(&self) -> Result<RwTxn<'_>, StoreError> {
        Ok(self.env.write_txn()?)
    }
}

fn create_db(
    env: &Env,
    wtxn: &mut RwTxn<'_>,
    name: &str,
) -> Result<Database<Bytes, Bytes>, StoreError> {
    Ok(env.create_database::<Bytes, Bytes>(wtxn, Some(name))?)
}
