//! Confirmation height record.

use serde::{Deserialize, Serialize};

use crate::hash::BlockHash;

/// How far an account's chain has been cemented.
///
/// Blocks at height `<= height` are irreversible: rollback refuses to touch
/// them and pruning may remove their bodies. `frontier` is the hash at
/// exactly `height`; both are zero while nothing is cemented.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationHeightInfo {
    pub height: u64,
    pub frontier: BlockHash,
}

impl ConfirmationHeightInfo {
    pub fn new(height: u64, frontier: BlockHash) -> Self {
        Self { height, frontier }
    }
}
