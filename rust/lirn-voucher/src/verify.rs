//! Voucher verification.
//!
//! Verification answers one question: at instant `now`, does this signature
//! make this voucher redeemable? The checks run in a fixed order and stop at
//! the first failure:
//!
//! 1. Recover the signer from the voucher digest and the signature
//! 2. Check the signer is an accepted authority
//! 3. Check `now` is strictly before the voucher's expiration
//!
//! A wrong signer or an expired voucher is an ordinary [`Verification`]
//! outcome. Only a structurally broken signature is an error.

use crate::{Claim, Timestamp, Voucher};
use lirn_abi::Address;
use lirn_credentials::{AuthorityVerifier, MalformedInputError, VoucherSignature, recover};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, btree_set};

/// The outcome of verifying a signed claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verification {
    /// Signed by an accepted authority and not yet expired.
    Valid,
    /// The signature is well formed but was produced by someone else.
    InvalidSigner {
        /// The address the signature actually recovers to.
        recovered: Address,
    },
    /// Correctly signed, but `now` is at or past the expiration.
    Expired,
}

impl Verification {
    /// Whether the claim may be honored.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Something that decides whether a recovered signer is acceptable.
pub trait Authority {
    /// Whether signatures by `signer` are accepted.
    fn admits(&self, signer: &Address) -> bool;
}

impl Authority for Address {
    fn admits(&self, signer: &Address) -> bool {
        self == signer
    }
}

impl Authority for AuthorityVerifier {
    fn admits(&self, signer: &Address) -> bool {
        self.address() == *signer
    }
}

/// A set of interchangeable authorities, any of which may sign.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthoritySet(BTreeSet<Address>);

impl AuthoritySet {
    /// An empty set, which admits nobody.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Add an authority. Returns `false` if it was already present.
    pub fn insert(&mut self, authority: Address) -> bool {
        self.0.insert(authority)
    }

    /// Remove an authority. Returns `false` if it was not present.
    pub fn remove(&mut self, authority: &Address) -> bool {
        self.0.remove(authority)
    }

    /// Whether `authority` is in the set.
    #[must_use]
    pub fn contains(&self, authority: &Address) -> bool {
        self.0.contains(authority)
    }

    /// Number of authorities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Authorities in address order.
    pub fn iter(&self) -> btree_set::Iter<'_, Address> {
        self.0.iter()
    }
}

impl Authority for AuthoritySet {
    fn admits(&self, signer: &Address) -> bool {
        self.contains(signer)
    }
}

impl From<Address> for AuthoritySet {
    fn from(authority: Address) -> Self {
        Self(BTreeSet::from([authority]))
    }
}

impl FromIterator<Address> for AuthoritySet {
    fn from_iter<I: IntoIterator<Item = Address>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<Address> for AuthoritySet {
    fn extend<I: IntoIterator<Item = Address>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl<'a> IntoIterator for &'a AuthoritySet {
    type Item = &'a Address;
    type IntoIter = btree_set::Iter<'a, Address>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Verify `signature` over `voucher` against a single expected authority.
///
/// # Errors
///
/// Returns [`MalformedInputError`] if the signature is structurally invalid.
pub fn verify(
    voucher: &Voucher,
    signature: &VoucherSignature,
    authority: &Address,
    now: Timestamp,
) -> Result<Verification, MalformedInputError> {
    verify_with(voucher, signature, &AuthoritySet::from(*authority), now)
}

/// Verify `signature` over `voucher`, accepting any authority in
/// `authorities`.
///
/// # Errors
///
/// Returns [`MalformedInputError`] if the signature is structurally invalid.
#[tracing::instrument(
    skip_all,
    fields(
        recipient = %voucher.recipient,
        subject_id = %voucher.subject_id,
        now = now.to_unix(),
    )
)]
pub fn verify_with(
    voucher: &Voucher,
    signature: &VoucherSignature,
    authorities: &AuthoritySet,
    now: Timestamp,
) -> Result<Verification, MalformedInputError> {
    verify_claim(voucher, signature, authorities, now)
}

/// Verify any signed [`Claim`] against `authority` at `now`.
///
/// Claims without an expiration only go through the signer check.
///
/// # Errors
///
/// Returns [`MalformedInputError`] if the signature is structurally invalid.
pub fn verify_claim<C, A>(
    claim: &C,
    signature: &VoucherSignature,
    authority: &A,
    now: Timestamp,
) -> Result<Verification, MalformedInputError>
where
    C: Claim + ?Sized,
    A: Authority + ?Sized,
{
    let recovered = recover(&claim.digest(), signature).inspect_err(|error| {
        tracing::warn!(%error, "Rejected malformed signature");
    })?;

    let verification = if !authority.admits(&recovered) {
        Verification::InvalidSigner { recovered }
    } else {
        match claim.expiration() {
            Some(expiration) if !now.is_before(&expiration) => Verification::Expired,
            _ => Verification::Valid,
        }
    };

    tracing::debug!(outcome = ?verification, "Verified claim");
    Ok(verification)
}
