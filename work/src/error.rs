//! Generation failures.

use thiserror::Error;

/// Why a work search ended without a nonce.
#[derive(Debug, Error)]
pub enum WorkError {
    #[error("work generation was cancelled before a nonce was found")]
    Cancelled,
}
