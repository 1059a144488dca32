//! The signing seam shared by vouchers and whitelist grants.

use lirn_abi::{Digest, Uint256, keccak256};
use lirn_credentials::{AuthoritySigner, SigningError, VoucherSignature};

/// A fixed-shape payload an authority signs.
///
/// Implementors only produce the ABI encoding of their fields in signing
/// order; the digest and the signature follow from that.
pub trait Claim {
    /// The `abi.encode(...)` bytes of the claim's fields, in signing order.
    fn abi_encode(&self) -> Vec<u8>;

    /// The Keccak-256 digest of [`Claim::abi_encode`].
    fn digest(&self) -> Digest {
        keccak256(&self.abi_encode())
    }

    /// The instant from which the claim no longer authorizes anything, if
    /// it expires at all.
    fn expiration(&self) -> Option<Uint256> {
        None
    }

    /// Sign the claim's digest as `authority`.
    ///
    /// # Errors
    ///
    /// Returns [`SigningError`] if the signing backend fails.
    fn sign(&self, authority: &AuthoritySigner) -> Result<VoucherSignature, SigningError> {
        authority.sign_digest(&self.digest())
    }
}
