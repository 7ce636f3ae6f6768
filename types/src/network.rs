//! Which Lattica network a ledger belongs to.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Network identifier.
///
/// Each network has its own genesis block, epoch signers and work
/// thresholds, so blocks from one network are meaningless on another.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NetworkId {
    /// Production.
    Live,
    /// The shared staging network.
    Test,
    /// A throwaway local network.
    Dev,
}

impl NetworkId {
    pub fn as_str(self) -> &'static str {
        match self {
            NetworkId::Live => "live",
            NetworkId::Test => "test",
            NetworkId::Dev => "dev",
        }
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
