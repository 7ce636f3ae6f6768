//! Account-chain format versions (epochs) and the registry of their
//! marker links and designated signers.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::hash::Link;
use crate::keys::PublicKey;

/// The format version of an account chain.
///
/// Epochs are totally ordered and only ever increase along a chain. A block
/// whose details carry `Epoch1` may not be followed by one carrying `Epoch0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Epoch {
    /// No epoch recorded. Used where an epoch field is not meaningful,
    /// never as the version of a live chain.
    Unspecified,
    /// The original block format; every chain starts here.
    Epoch0,
    Epoch1,
    Epoch2,
}

impl Epoch {
    pub const MAX: Self = Self::Epoch2;

    pub fn as_u8(self) -> u8 {
        match self {
            Self::Unspecified => 0,
            Self::Epoch0 => 1,
            Self::Epoch1 => 2,
            Self::Epoch2 => 3,
        }
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Unspecified),
            1 => Some(Self::Epoch0),
            2 => Some(Self::Epoch1),
            3 => Some(Self::Epoch2),
            _ => None,
        }
    }

    /// The next epoch in upgrade order, if any.
    pub fn successor(self) -> Option<Self> {
        match self {
            Self::Unspecified => None,
            Self::Epoch0 => Some(Self::Epoch1),
            Self::Epoch1 => Some(Self::Epoch2),
            Self::Epoch2 => None,
        }
    }
}

impl Default for Epoch {
    fn default() -> Self {
        Self::Epoch0
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unspecified => write!(f, "unspecified"),
            Self::Epoch0 => write!(f, "epoch 0"),
            Self::Epoch1 => write!(f, "epoch 1"),
            Self::Epoch2 => write!(f, "epoch 2"),
        }
    }
}

#[derive(Clone, Debug)]
struct EpochInfo {
    signer: PublicKey,
    link: Link,
}

/// Registry of the upgrade epochs a network recognizes: for each epoch the
/// reserved link value that marks an epoch block and the public key whose
/// signature authorizes the upgrade.
#[derive(Clone, Debug, Default)]
pub struct Epochs {
    entries: HashMap<Epoch, EpochInfo>,
}

impl Epochs {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn add(&mut self, epoch: Epoch, signer: PublicKey, link: Link) {
        self.entries.insert(epoch, EpochInfo { signer, link });
    }

    /// The epoch whose marker equals `link`, if any.
    pub fn epoch(&self, link: &Link) -> Option<Epoch> {
        self.entries
            .iter()
            .find(|(_, info)| info.link == *link)
            .map(|(epoch, _)| *epoch)
    }

    pub fn is_epoch_link(&self, link: &Link) -> bool {
        self.epoch(link).is_some()
    }

    pub fn signer(&self, epoch: Epoch) -> Option<&PublicKey> {
        self.entries.get(&epoch).map(|info| &info.signer)
    }

    pub fn link(&self, epoch: Epoch) -> Option<&Link> {
        self.entries.get(&epoch).map(|info| &info.link)
    }
}
