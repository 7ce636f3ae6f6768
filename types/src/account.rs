//! Account identifier type.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::hash::{Link, Root};
use crate::keys::PublicKey;

/// A 32-byte account identifier — the raw Ed25519 public key of the
/// account holder.
///
/// The all-zero account is the burn account: funds sent to it are
/// unrecoverable because no private key signs for it, and opening a chain
/// for it is rejected.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Account([u8; 32]);

impl Default for Account {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Account {
    pub const ZERO: Self = Self([0u8; 32]);

    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// The public key that signs for this account.
    pub fn as_key(&self) -> PublicKey {
        PublicKey(self.0)
    }

    /// Reinterpret as a link field (send destination).
    pub fn into_link(self) -> Link {
        Link::new(self.0)
    }

    /// Reinterpret as a work root (first block of a chain).
    pub fn into_root(self) -> Root {
        Root::new(self.0)
    }
}

impl From<PublicKey> for Account {
    fn from(key: PublicKey) -> Self {
        Self(key.0)
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Account(")?;
        for b in &self.0[..4] {
            write!(f, "{:02x}", b)?;
        }
        write!(f, "\u{2026})")
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0 {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}
