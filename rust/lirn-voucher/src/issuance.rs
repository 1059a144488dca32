//! Batch issuance.
//!
//! An issuer describes the vouchers to sign as an [`IssuanceBatch`], an
//! ordered JSON mapping from recipient to voucher entries:
//!
//! ```json
//! {
//!   "0x1273D47090B70356291a5A57aedcaB7479a9EEb8": [
//!     { "id": 42, "uri": "testing/42.json", "expiration": 1667060841, "price": 0 }
//!   ]
//! }
//! ```
//!
//! [`issue_batch`] signs every entry for one contract and produces a
//! [`SignatureBook`] with the same recipients, in the same order, each
//! mapped to one `0x` hex signature per entry. The book is what gets
//! published; a verifier pairs it back up with the batch through
//! [`SignatureBook::signed_vouchers`].

use crate::{Claim, IssuanceError, SignedVoucher, Voucher};
use indexmap::{IndexMap, map::Entry};
use lirn_abi::{Address, Uint256};
use lirn_credentials::{AuthoritySigner, VoucherSignature};
use serde::{
    Deserialize, Deserializer, Serialize,
    de::{self, MapAccess, Visitor},
};
use std::{fmt, marker::PhantomData};

/// One voucher to issue, minus the contract and recipient it is issued for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoucherEntry {
    /// The subject id.
    pub id: Uint256,
    /// The resource URI; may be empty.
    #[serde(default)]
    pub uri: String,
    /// Expiration, in seconds since the Unix epoch.
    pub expiration: Uint256,
    /// Price in the smallest currency unit.
    #[serde(default)]
    pub price: Uint256,
}

impl VoucherEntry {
    /// The full voucher this entry describes.
    #[must_use]
    pub fn voucher(&self, contract: Address, recipient: Address) -> Voucher {
        Voucher {
            contract,
            subject_id: self.id,
            resource_uri: self.uri.clone(),
            expiration: self.expiration,
            price: self.price,
            recipient,
        }
    }
}

/// A recipient-keyed JSON object with every key kept as written, repeats
/// included.
struct RecipientLists<V>(Vec<(String, Vec<V>)>);

impl<V> RecipientLists<V> {
    /// Parse the keys in input order. The first invalid key or the first
    /// key naming an address already seen fails the whole document.
    fn into_recipients(self) -> Result<IndexMap<Address, Vec<V>>, IssuanceError> {
        let mut recipients = IndexMap::with_capacity(self.0.len());
        for (key, values) in self.0 {
            let recipient: Address = key.parse()?;
            match recipients.entry(recipient) {
                Entry::Occupied(_) => return Err(IssuanceError::DuplicateRecipient(recipient)),
                Entry::Vacant(slot) => {
                    slot.insert(values);
                }
            }
        }
        Ok(recipients)
    }
}

impl<'de, V> Deserialize<'de> for RecipientLists<V>
where
    V: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RecipientListsVisitor<V>(PhantomData<V>);

        impl<'de, V> Visitor<'de> for RecipientListsVisitor<V>
        where
            V: Deserialize<'de>,
        {
            type Value = RecipientLists<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map from recipient address to a list")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut lists = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(pair) = map.next_entry::<String, Vec<V>>()? {
                    lists.push(pair);
                }
                Ok(RecipientLists(lists))
            }
        }

        deserializer.deserialize_map(RecipientListsVisitor(PhantomData))
    }
}

fn deserialize_recipients<'de, D, V>(
    deserializer: D,
) -> Result<IndexMap<Address, Vec<V>>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    RecipientLists::deserialize(deserializer)?
        .into_recipients()
        .map_err(de::Error::custom)
}

/// Voucher entries grouped by recipient, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct IssuanceBatch(IndexMap<Address, Vec<VoucherEntry>>);

impl IssuanceBatch {
    /// An empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a batch from JSON text.
    ///
    /// Recipient keys are validated in input order and the first invalid
    /// one fails the whole load.
    ///
    /// # Errors
    ///
    /// Returns [`IssuanceError::Json`] for malformed JSON or entries,
    /// [`IssuanceError::Encoding`] for an invalid recipient address and
    /// [`IssuanceError::DuplicateRecipient`] when two keys name the same
    /// address.
    pub fn from_json(json: &str) -> Result<Self, IssuanceError> {
        let lists: RecipientLists<VoucherEntry> = serde_json::from_str(json)?;
        Ok(Self(lists.into_recipients()?))
    }

    /// Serialize the batch as pretty JSON with checksummed keys.
    ///
    /// # Errors
    ///
    /// Returns [`IssuanceError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, IssuanceError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Append an entry to `recipient`'s list.
    pub fn push(&mut self, recipient: Address, entry: VoucherEntry) {
        self.0.entry(recipient).or_default().push(entry);
    }

    /// The entries for `recipient`, if any.
    #[must_use]
    pub fn entries(&self, recipient: &Address) -> Option<&[VoucherEntry]> {
        self.0.get(recipient).map(Vec::as_slice)
    }

    /// Recipients and their entries, in batch order.
    pub fn iter(&self) -> impl Iterator<Item = (&Address, &[VoucherEntry])> {
        self.0
            .iter()
            .map(|(recipient, entries)| (recipient, entries.as_slice()))
    }

    /// Recipients in batch order.
    pub fn recipients(&self) -> impl Iterator<Item = &Address> {
        self.0.keys()
    }

    /// Number of recipients.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the batch has no recipients.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Every voucher in the batch for `contract`, recipient by recipient.
    #[must_use]
    pub fn vouchers(&self, contract: &Address) -> Vec<Voucher> {
        self.0
            .iter()
            .flat_map(|(recipient, entries)| {
                entries
                    .iter()
                    .map(move |entry| entry.voucher(*contract, *recipient))
            })
            .collect()
    }
}

impl<'de> Deserialize<'de> for IssuanceBatch {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserialize_recipients(deserializer).map(Self)
    }
}

/// Signatures grouped by recipient, parallel to an [`IssuanceBatch`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SignatureBook(IndexMap<Address, Vec<VoucherSignature>>);

impl SignatureBook {
    /// Parse a book from JSON text.
    ///
    /// Recipient keys are checked the same way as [`IssuanceBatch::from_json`]
    /// checks them.
    ///
    /// # Errors
    ///
    /// Returns [`IssuanceError::Json`] for malformed JSON or signatures,
    /// [`IssuanceError::Encoding`] for an invalid recipient address and
    /// [`IssuanceError::DuplicateRecipient`] when two keys name the same
    /// address.
    pub fn from_json(json: &str) -> Result<Self, IssuanceError> {
        let lists: RecipientLists<VoucherSignature> = serde_json::from_str(json)?;
        Ok(Self(lists.into_recipients()?))
    }

    /// Serialize the book as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns [`IssuanceError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, IssuanceError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The signatures issued to `recipient`, in entry order.
    #[must_use]
    pub fn signatures(&self, recipient: &Address) -> Option<&[VoucherSignature]> {
        self.0.get(recipient).map(Vec::as_slice)
    }

    /// Recipients and their signatures, in issuance order.
    pub fn iter(&self) -> impl Iterator<Item = (&Address, &[VoucherSignature])> {
        self.0
            .iter()
            .map(|(recipient, signatures)| (recipient, signatures.as_slice()))
    }

    /// Number of recipients.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the book has no recipients.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Pair every voucher `batch` describes for `contract` with its
    /// signature from this book.
    ///
    /// # Errors
    ///
    /// Returns [`IssuanceError::SignatureCount`] if any recipient's
    /// signature list does not match its entry list in length, including
    /// recipients present on only one side.
    pub fn signed_vouchers(
        &self,
        batch: &IssuanceBatch,
        contract: &Address,
    ) -> Result<Vec<SignedVoucher>, IssuanceError> {
        if let Some((recipient, signatures)) = self
            .0
            .iter()
            .find(|(recipient, _)| batch.entries(recipient).is_none())
        {
            return Err(IssuanceError::SignatureCount {
                recipient: *recipient,
                vouchers: 0,
                signatures: signatures.len(),
            });
        }

        let mut signed = Vec::new();
        for (recipient, entries) in batch.iter() {
            let signatures = self.signatures(recipient).unwrap_or_default();
            if signatures.len() != entries.len() {
                return Err(IssuanceError::SignatureCount {
                    recipient: *recipient,
                    vouchers: entries.len(),
                    signatures: signatures.len(),
                });
            }
            signed.extend(entries.iter().zip(signatures).map(|(entry, signature)| {
                SignedVoucher::new(entry.voucher(*contract, *recipient), *signature)
            }));
        }
        Ok(signed)
    }
}

impl<'de> Deserialize<'de> for SignatureBook {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserialize_recipients(deserializer).map(Self)
    }
}

/// A contract address together with the batch to issue for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuanceManifest {
    /// The contract the vouchers are bound to.
    pub contract: Address,
    /// The vouchers to issue.
    pub vouchers: IssuanceBatch,
}

impl IssuanceManifest {
    /// Parse a manifest from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`IssuanceError::Json`] for malformed JSON, including invalid
    /// addresses anywhere in the document.
    pub fn from_json(json: &str) -> Result<Self, IssuanceError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Sign the manifest's batch as `authority`.
    ///
    /// # Errors
    ///
    /// Returns [`IssuanceError::Signing`] if any voucher fails to sign.
    pub fn issue(&self, authority: &AuthoritySigner) -> Result<SignatureBook, IssuanceError> {
        issue_batch(&self.vouchers, &self.contract, authority)
    }
}

/// Sign every voucher in `batch` for `contract` as `authority`.
///
/// The book lists recipients in batch order, each with one signature per
/// entry in entry order. Signing stops at the first failure.
///
/// # Errors
///
/// Returns [`IssuanceError::Signing`] if any voucher fails to sign.
#[tracing::instrument(
    skip_all,
    fields(
        contract = %contract,
        authority = %authority.address(),
        recipients = batch.len(),
    )
)]
pub fn issue_batch(
    batch: &IssuanceBatch,
    contract: &Address,
    authority: &AuthoritySigner,
) -> Result<SignatureBook, IssuanceError> {
    let mut book = IndexMap::with_capacity(batch.len());
    for (recipient, entries) in batch.iter() {
        let mut signatures = Vec::with_capacity(entries.len());
        for entry in entries {
            signatures.push(entry.voucher(*contract, *recipient).sign(authority)?);
            tracing::debug!(%recipient, subject_id = %entry.id, "Issued voucher");
        }
        book.insert(*recipient, signatures);
    }
    Ok(SignatureBook(book))
}
