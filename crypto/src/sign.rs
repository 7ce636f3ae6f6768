//! Ed25519 signatures over block hashes.

use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};

use lattica_types::{PrivateKey, PublicKey, Signature};

/// Sign `message` with `private_key`.
///
/// Ed25519 is deterministic: one key and one message always produce the
/// same signature bytes.
pub fn sign_message(message: &[u8], private_key: &PrivateKey) -> Signature {
    let signing = SigningKey::from_bytes(&private_key.0);
    Signature(signing.sign(message).to_bytes())
}

/// Check `signature` over `message` against `public_key`.
///
/// Anything that fails to verify yields `false`, including key bytes that
/// do not decode to a curve point.
pub fn verify_signature(message: &[u8], signature: &Signature, public_key: &PublicKey) -> bool {
    let Ok(verifying) = VerifyingKey::from_bytes(&public_key.0) else {
        return false;
    };
    let signature = ed25519_dalek::Signature::from_bytes(&signature.0);
    verifying.verify(message, &signature).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{generate_keypair, keypair_from_seed};

    #[test]
    fn owner_signature_verifies() {
        let key = generate_keypair();
        let sig = sign_message(b"state block hash", &key.private);
        assert!(verify_signature(b"state block hash", &sig, &key.public));
    }

    #[test]
    fn tampered_message_fails() {
        let key = generate_keypair();
        let sig = sign_message(b"balance=90", &key.private);
        assert!(!verify_signature(b"balance=91", &sig, &key.public));
    }

    #[test]
    fn another_accounts_key_fails() {
        let owner = generate_keypair();
        let outsider = generate_keypair();
        let sig = sign_message(b"change representative", &owner.private);
        assert!(!verify_signature(b"change representative", &sig, &outsider.public));
    }

    #[test]
    fn signing_is_deterministic() {
        let key = keypair_from_seed(&[9u8; 32]);
        assert_eq!(
            sign_message(b"epoch v1 block", &key.private).0,
            sign_message(b"epoch v1 block", &key.private).0
        );
    }

    #[test]
    fn empty_message_is_signable() {
        let key = generate_keypair();
        let sig = sign_message(&[], &key.private);
        assert!(verify_signature(&[], &sig, &key.public));
    }

    #[test]
    fn garbage_signature_fails() {
        let key = generate_keypair();
        assert!(!verify_signature(b"anything", &Signature([0xAA; 64]), &key.public));
    }

    #[test]
    fn burn_key_verifies_nothing() {
        let key = generate_keypair();
        let sig = sign_message(b"send to burn", &key.private);
        assert!(!verify_signature(b"send to burn", &sig, &PublicKey([0u8; 32])));
    }
}
