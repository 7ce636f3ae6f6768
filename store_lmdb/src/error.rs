//! Store failures.
//!
//! Comparable so ledger errors wrapping a store failure stay comparable
//! in tests.

use lattica_blocks::BlockCodecError;
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("no record for {0}")]
    NotFound(String),

    #[error("lmdb: {0}")]
    Backend(String),

    #[error("record encoding: {0}")]
    Serialization(String),

    #[error("table damaged: {0}")]
    Corruption(String),
}

impl From<heed::Error> for StoreError {
    fn from(e: heed::Error) -> Self {
        Self::Backend(e.to_string())
    }
}

impl From<bincode::Error> for StoreError {
    fn from(e: bincode::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

impl From<BlockCodecError> for StoreError {
    fn from(e: BlockCodecError) -> Self {
        Self::Serialization(e.to_string())
    }
}
