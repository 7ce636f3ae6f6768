//! Work checking: recompute a nonce's value and compare it to a floor.

use lattica_crypto::blake2b_256;
use lattica_types::Root;

/// Compute the work value for a (root, nonce) pair: the little-endian u64
/// prefix of `blake2b(root || nonce_le)`.
pub fn work_value(root: &Root, nonce: u64) -> u64 {
    let mut input = [0u8; 40];
    input[0..32].copy_from_slice(root.as_bytes());
    input[32..40].copy_from_slice(&nonce.to_le_bytes());
    let hash = blake2b_256(&input);
    u64::from_le_bytes(hash[0..8].try_into().unwrap())
}

/// Validate that a work nonce meets the minimum difficulty for a given root.
/// A zero threshold accepts any nonce.
pub fn validate_work(root: &Root, nonce: u64, min_difficulty: u64) -> bool {
    work_value(root, nonce) >= min_difficulty
}
