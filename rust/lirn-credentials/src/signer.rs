//! secp256k1 authority signer.

use crate::{
    AuthorityVerifier, SigningError, VoucherSignature, message::personal_digest_hash,
};
use alloy_primitives::hex;
use k256::ecdsa::{RecoveryId, SigningKey};
use lirn_abi::{Address, Digest};
use std::fmt;

/// The size of a secp256k1 private key in bytes.
pub const SECRET_KEY_SIZE: usize = 32;

/// An authority that signs voucher digests.
///
/// The private key is supplied by the caller (imported from raw bytes or
/// hex) and lives only as long as this value. It is never displayed,
/// serialized or logged; `Debug` shows the authority address only.
#[derive(Clone)]
pub struct AuthoritySigner {
    address: Address,
    key: SigningKey,
}

impl AuthoritySigner {
    /// Import a signer from 32 raw private key bytes.
    ///
    /// # Errors
    ///
    /// Returns [`SigningError::InvalidKey`] if the bytes have the wrong
    /// length, are zero, or are not below the curve order.
    pub fn import(secret: &[u8]) -> Result<Self, SigningError> {
        if secret.len() != SECRET_KEY_SIZE {
            return Err(SigningError::InvalidKey("expected 32 key bytes"));
        }
        let key = SigningKey::from_slice(secret)
            .map_err(|_| SigningError::InvalidKey("key is not a valid secp256k1 scalar"))?;
        Ok(Self::from(key))
    }

    /// Import a signer from hex text, with or without a `0x` prefix.
    ///
    /// # Errors
    ///
    /// Returns [`SigningError::InvalidKey`] for malformed hex or key bytes.
    pub fn from_hex(secret: &str) -> Result<Self, SigningError> {
        let digits = secret.strip_prefix("0x").unwrap_or(secret);
        let bytes = hex::decode(digits).map_err(|_| SigningError::InvalidKey("invalid hex"))?;
        Self::import(&bytes)
    }

    /// Generate a fresh signer with random bytes from `getrandom`.
    ///
    /// # Errors
    ///
    /// Returns an error if the RNG fails.
    pub fn generate() -> Result<Self, SigningError> {
        loop {
            let mut seed = [0u8; SECRET_KEY_SIZE];
            getrandom::getrandom(&mut seed)?;
            if let Ok(key) = SigningKey::from_slice(&seed) {
                return Ok(Self::from(key));
            }
        }
    }

    /// The authority address this signer signs as.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// The verifier matching this signer.
    #[must_use]
    pub const fn verifier(&self) -> AuthorityVerifier {
        AuthorityVerifier::new(self.address)
    }

    /// Sign a digest under the personal message scheme.
    ///
    /// # Errors
    ///
    /// Returns [`SigningError::Ecdsa`] if the backend fails to produce a
    /// recoverable signature.
    pub fn sign_digest(&self, digest: &Digest) -> Result<VoucherSignature, SigningError> {
        let prehash = personal_digest_hash(digest);
        let (signature, recovery_id) = self.key.sign_prehash_recoverable(prehash.bytes())?;

        // Recovery on the verifying side rejects high-s signatures.
        let (signature, recovery_id) = match signature.normalize_s() {
            Some(low) => (
                low,
                RecoveryId::new(!recovery_id.is_y_odd(), recovery_id.is_x_reduced()),
            ),
            None => (signature, recovery_id),
        };

        if recovery_id.is_x_reduced() {
            return Err(SigningError::Ecdsa(k256::ecdsa::Error::new()));
        }

        Ok(VoucherSignature::from_parts(&signature, recovery_id))
    }

    /// Sign raw digest bytes.
    ///
    /// # Errors
    ///
    /// Returns [`SigningError::DigestWidth`] unless `digest` is exactly 32
    /// bytes.
    pub fn sign_bytes(&self, digest: &[u8]) -> Result<VoucherSignature, SigningError> {
        let digest =
            Digest::try_from(digest).map_err(|_| SigningError::DigestWidth(digest.len()))?;
        self.sign_digest(&digest)
    }
}

impl From<SigningKey> for AuthoritySigner {
    fn from(key: SigningKey) -> Self {
        let address = alloy_primitives::Address::from_public_key(key.verifying_key()).into();
        Self { address, key }
    }
}

impl fmt::Debug for AuthoritySigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthoritySigner")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for AuthoritySigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address)
    }
}

// The message is the 32-byte digest, not arbitrary text.
impl ::signature::Signer<VoucherSignature> for AuthoritySigner {
    fn try_sign(&self, msg: &[u8]) -> Result<VoucherSignature, ::signature::Error> {
        self.sign_bytes(msg).map_err(::signature::Error::from_source)
    }
}
