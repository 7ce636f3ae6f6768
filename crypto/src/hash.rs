//! Blake2b-256, the digest behind block hashes and work values.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};

type Blake2b256 = Blake2b<U32>;

/// Digest a single byte slice.
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    blake2b_256_multi(&[data])
}

/// Digest a sequence of slices as if they had been concatenated.
///
/// Block hashing feeds each field in separately, so no intermediate
/// buffer is assembled.
pub fn blake2b_256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut state = Blake2b256::new();
    for part in parts {
        state.update(part);
    }
    state.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_input_same_digest() {
        assert_eq!(blake2b_256(b"open block"), blake2b_256(b"open block"));
    }

    #[test]
    fn split_points_do_not_matter() {
        let whole = blake2b_256(b"account|previous|balance");
        assert_eq!(
            blake2b_256_multi(&[b"account|", b"previous|", b"balance"]),
            whole
        );
        assert_eq!(blake2b_256_multi(&[b"account", b"|previous|balance"]), whole);
    }

    #[test]
    fn one_byte_changes_the_digest() {
        assert_ne!(blake2b_256(b"send"), blake2b_256(b"senD"));
    }

    #[test]
    fn empty_input_is_a_real_digest() {
        assert_ne!(blake2b_256(&[]), [0u8; 32]);
    }
}
