//! Cryptographic primitives for the Lattica ledger: Blake2b-256 for block
//! hashes and work values, Ed25519 for block signatures.

pub mod hash;
pub mod keys;
pub mod sign;

pub use hash::{blake2b_256, blake2b_256_multi};
pub use keys::{generate_keypair, keypair_from_private, keypair_from_seed, public_from_private};
pub use sign::{sign_message, verify_signature};
