//! Fundamental types for the Lattica block-lattice ledger.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: accounts, hashes, amounts, keys, timestamps, epochs, and the
//! records the ledger keeps per account.

pub mod account;
pub mod account_info;
pub mod amount;
pub mod confirmation_height;
pub mod epoch;
pub mod hash;
pub mod keys;
pub mod network;
pub mod pending;
pub mod time;

pub use account::Account;
pub use account_info::AccountInfo;
pub use amount::Amount;
pub use confirmation_height::ConfirmationHeightInfo;
pub use epoch::{Epoch, Epochs};
pub use hash::{BlockHash, Link, Root};
pub use keys::{KeyPair, PrivateKey, PublicKey, Signature};
pub use network::NetworkId;
pub use pending::{PendingInfo, PendingKey};
pub use time::Timestamp;
