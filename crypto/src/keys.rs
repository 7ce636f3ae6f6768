//! Ed25519 key pairs for account ownership.

use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;

use lattica_types::{KeyPair, PrivateKey, PublicKey};

fn assemble(signing: SigningKey) -> KeyPair {
    KeyPair {
        public: PublicKey(signing.verifying_key().to_bytes()),
        private: PrivateKey(signing.to_bytes()),
    }
}

/// A fresh key pair from the operating system's entropy source.
pub fn generate_keypair() -> KeyPair {
    assemble(SigningKey::generate(&mut OsRng))
}

/// Recompute the public half of `private`.
pub fn public_from_private(private: &PrivateKey) -> PublicKey {
    PublicKey(SigningKey::from_bytes(&private.0).verifying_key().to_bytes())
}

/// Rebuild the full pair from its private half.
pub fn keypair_from_private(private: PrivateKey) -> KeyPair {
    assemble(SigningKey::from_bytes(&private.0))
}

/// The key pair seeded by `seed`. Deterministic; the dev and test genesis
/// keys are derived this way.
pub fn keypair_from_seed(seed: &[u8; 32]) -> KeyPair {
    assemble(SigningKey::from_bytes(seed))
}
