//! The voucher claim and its signed form.

use crate::{AuthoritySet, Claim, Timestamp, Verification, verify_claim};
use lirn_abi::{Address, SolValue, Uint256};
use lirn_credentials::{AuthoritySigner, MalformedInputError, SigningError, VoucherSignature};
use serde::{Deserialize, Serialize};

/// A one-time grant letting `recipient` claim `subject_id` on `contract` at
/// `price` before `expiration`.
///
/// Every field is bound into the digest, so changing any one of them
/// invalidates an existing signature. The contract address in particular
/// keeps a voucher from being replayed against another deployment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Voucher {
    /// The authorizing contract instance.
    #[serde(rename = "contractAddress")]
    pub contract: Address,
    /// The token or resource being granted.
    pub subject_id: Uint256,
    /// Metadata location for the subject; may be empty.
    #[serde(rename = "resourceURI")]
    pub resource_uri: String,
    /// Seconds since the Unix epoch at which the voucher stops being valid.
    pub expiration: Uint256,
    /// Price in the smallest currency unit.
    pub price: Uint256,
    /// The only account allowed to redeem the voucher.
    pub recipient: Address,
}

impl Voucher {
    /// Assemble a voucher from its six fields.
    #[must_use]
    pub fn new(
        contract: Address,
        subject_id: impl Into<Uint256>,
        resource_uri: impl Into<String>,
        expiration: impl Into<Uint256>,
        price: impl Into<Uint256>,
        recipient: Address,
    ) -> Self {
        Self {
            contract,
            subject_id: subject_id.into(),
            resource_uri: resource_uri.into(),
            expiration: expiration.into(),
            price: price.into(),
            recipient,
        }
    }

    /// Sign this voucher as `authority`, producing a [`SignedVoucher`].
    ///
    /// # Errors
    ///
    /// Returns [`SigningError`] if the signing backend fails.
    pub fn issue(self, authority: &AuthoritySigner) -> Result<SignedVoucher, SigningError> {
        let signature = self.sign(authority)?;
        Ok(SignedVoucher {
            voucher: self,
            signature,
        })
    }
}

impl Claim for Voucher {
    fn abi_encode(&self) -> Vec<u8> {
        (
            self.contract.0,
            self.subject_id.0,
            self.resource_uri.clone(),
            self.expiration.0,
            self.price.0,
            self.recipient.0,
        )
            .abi_encode_params()
    }

    fn expiration(&self) -> Option<Uint256> {
        Some(self.expiration)
    }
}

/// A voucher together with the authority's signature over its digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedVoucher {
    voucher: Voucher,
    signature: VoucherSignature,
}

impl SignedVoucher {
    /// Pair a voucher with a signature received from elsewhere.
    ///
    /// Nothing is checked here; call [`SignedVoucher::verify`].
    #[must_use]
    pub const fn new(voucher: Voucher, signature: VoucherSignature) -> Self {
        Self { voucher, signature }
    }

    /// The signed voucher.
    #[must_use]
    pub const fn voucher(&self) -> &Voucher {
        &self.voucher
    }

    /// The authority's signature.
    #[must_use]
    pub const fn signature(&self) -> &VoucherSignature {
        &self.signature
    }

    /// Check the signature against `authority` and the expiration against
    /// `now`.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedInputError`] if the signature is structurally
    /// invalid.
    pub fn verify(
        &self,
        authority: &Address,
        now: Timestamp,
    ) -> Result<Verification, MalformedInputError> {
        verify_claim(&self.voucher, &self.signature, authority, now)
    }

    /// Like [`SignedVoucher::verify`], accepting any authority in the set.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedInputError`] if the signature is structurally
    /// invalid.
    pub fn verify_with(
        &self,
        authorities: &AuthoritySet,
        now: Timestamp,
    ) -> Result<Verification, MalformedInputError> {
        verify_claim(&self.voucher, &self.signature, authorities, now)
    }
}

impl From<SignedVoucher> for (Voucher, VoucherSignature) {
    fn from(signed: SignedVoucher) -> Self {
        (signed.voucher, signed.signature)
    }
}
