//! The "personal message" hashing scheme.
//!
//! Authorities never sign a voucher digest raw. The digest is treated as a
//! message and prefixed before hashing, which is what wallet `signMessage`
//! implementations and on-chain `toEthSignedMessageHash` helpers expect:
//!
//! ```text
//! keccak256("\x19Ethereum Signed Message:\n" || decimal(len(message)) || message)
//! ```
//!
//! Issuer and verifier must agree on this: a mismatch fails every
//! verification, not just one.

use alloy_primitives::eip191_hash_message;
use lirn_abi::Digest;

/// The prefix prepended to every personal message before hashing.
pub const PERSONAL_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n";

/// Hash `message` under the personal message scheme (EIP-191 version `0x45`).
pub fn personal_message_hash(message: &[u8]) -> Digest {
    Digest::from(eip191_hash_message(message))
}

/// Hash a digest under the personal message scheme.
///
/// The digest's 32 raw bytes are the message, so the length text is `"32"`.
pub fn personal_digest_hash(digest: &Digest) -> Digest {
    personal_message_hash(digest.bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lirn_abi::keccak256;

    #[test]
    fn it_prefixes_with_the_decimal_length() {
        let length = b"hello".len().to_string();
        let expected = Digest::hash_iter([PERSONAL_MESSAGE_PREFIX, length.as_bytes(), b"hello"]);
        assert_eq!(personal_message_hash(b"hello"), expected);
    }

    #[test]
    fn it_hashes_the_zero_digest_to_a_known_value() {
        assert_eq!(
            personal_digest_hash(&Digest::default()).to_string(),
            "0x5e4106618209740b9f773a94c5667b9659a7a4e2691c7c8a78336e9889a6be07"
        );
    }

    #[test]
    fn it_treats_a_digest_as_a_32_byte_message() {
        let digest = keccak256(b"voucher");
        let mut expected = b"\x19Ethereum Signed Message:\n32".to_vec();
        expected.extend_from_slice(digest.bytes());
        assert_eq!(personal_digest_hash(&digest), keccak256(&expected));
        assert_ne!(personal_digest_hash(&digest), digest);
    }
}
