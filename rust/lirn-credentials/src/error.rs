//! Error types for authority signing and signer recovery.

use thiserror::Error;

/// Errors from [`super::AuthoritySigner`] construction and signing.
///
/// A signing error is fatal to the issuance call that raised it and to
/// nothing else; signers hold no state that a failure could corrupt.
#[derive(Debug, Error)]
pub enum SigningError {
    /// The private key material is malformed.
    #[error("Invalid authority key: {0}")]
    InvalidKey(&'static str),

    /// Only 32-byte digests can be signed.
    #[error("Expected a 32 byte digest, got {0} bytes")]
    DigestWidth(usize),

    /// Random number generation failed while generating a key.
    #[error("RNG error: {0}")]
    Rng(getrandom::Error),

    /// The ECDSA backend refused to sign.
    #[error("Signing failed: {0}")]
    Ecdsa(#[from] k256::ecdsa::Error),
}

impl From<getrandom::Error> for SigningError {
    fn from(e: getrandom::Error) -> Self {
        Self::Rng(e)
    }
}

/// A signature that is structurally invalid.
///
/// These indicate corrupted data or a protocol mismatch between issuer and
/// verifier, not a voucher that legitimately fails policy, and are surfaced
/// as errors rather than as a rejected verification.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MalformedInputError {
    /// Signatures are exactly 65 bytes (`r || s || v`).
    #[error("Expected a 65 byte signature, got {0} bytes")]
    SignatureLength(usize),

    /// The recovery byte `v` must be 0, 1, 27 or 28.
    #[error("Invalid recovery id {0}")]
    RecoveryId(u8),

    /// `r` or `s` is zero or not below the curve order.
    #[error("Signature scalars are out of range")]
    SignatureScalars,

    /// No public key can be recovered from the signature for this digest.
    #[error("Unable to recover a signer from the signature")]
    Unrecoverable,

    /// Signature hex text could not be decoded.
    #[error("Invalid signature hex: {0}")]
    InvalidHex(#[from] alloy_primitives::hex::FromHexError),
}
