//! Anti-spam proof of work.
//!
//! Every block carries a small computational receipt. Producing one costs a
//! CPU well under a second, which prices ledger flooding out of reach while
//! charging legitimate users nothing. The hashed input is the block's
//! *root* (predecessor hash, or the account for a first block), so a nonce
//! can be prepared before the rest of the block is final.

pub mod error;
pub mod generator;
pub mod thresholds;
pub mod validator;

pub use error::WorkError;
pub use generator::WorkGenerator;
pub use thresholds::{WorkBlockKind, WorkThresholds};
pub use validator::{validate_work, work_value};

/// A nonce that satisfied some threshold at generation time.
#[derive(Clone, Copy, Debug)]
pub struct WorkNonce(pub u64);
