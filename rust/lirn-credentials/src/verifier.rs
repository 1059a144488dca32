//! Signer recovery and the authority verifier.

use crate::{MalformedInputError, VoucherSignature, message::personal_digest_hash};
use alloy_primitives::B256;
use lirn_abi::{Address, Digest};
use std::fmt;

/// Recover the address that signed `digest` under the personal message
/// scheme.
///
/// This is the inverse of
/// [`AuthoritySigner::sign_digest`](crate::AuthoritySigner::sign_digest).
/// A well-formed signature over a *different* digest recovers a different,
/// unrelated address; only the caller can decide whether that address is
/// acceptable.
///
/// # Errors
///
/// Returns [`MalformedInputError`] if the signature is structurally invalid
/// or no public key can be recovered from it (including high-`s` signatures).
pub fn recover(
    digest: &Digest,
    signature: &VoucherSignature,
) -> Result<Address, MalformedInputError> {
    if signature.is_high_s() {
        return Err(MalformedInputError::Unrecoverable);
    }
    let prehash = B256::from(*personal_digest_hash(digest).bytes());
    signature
        .as_signature()
        .recover_address_from_prehash(&prehash)
        .map(Address::from)
        .map_err(|_| MalformedInputError::Unrecoverable)
}

/// Verifies signatures against one expected authority address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AuthorityVerifier(Address);

impl AuthorityVerifier {
    /// A verifier expecting signatures from `address`.
    #[must_use]
    pub const fn new(address: Address) -> Self {
        Self(address)
    }

    /// The expected authority address.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.0
    }

    /// Whether `signature` over `digest` was produced by this authority.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedInputError`] for structurally invalid signatures.
    pub fn is_signed_by(
        &self,
        digest: &Digest,
        signature: &VoucherSignature,
    ) -> Result<bool, MalformedInputError> {
        Ok(recover(digest, signature)? == self.0)
    }
}

impl From<Address> for AuthorityVerifier {
    fn from(address: Address) -> Self {
        Self(address)
    }
}

impl fmt::Display for AuthorityVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Mismatched signers fail with an opaque error.
impl ::signature::Verifier<VoucherSignature> for AuthorityVerifier {
    fn verify(&self, msg: &[u8], signature: &VoucherSignature) -> Result<(), ::signature::Error> {
        let digest = Digest::try_from(msg).map_err(::signature::Error::from_source)?;
        if self
            .is_signed_by(&digest, signature)
            .map_err(::signature::Error::from_source)?
        {
            Ok(())
        } else {
            Err(::signature::Error::new())
        }
    }
}
