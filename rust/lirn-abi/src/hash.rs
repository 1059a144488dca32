use crate::EncodingError;
use alloy_primitives::{B256, Keccak256, hex};
use std::fmt;

/// The size of a Keccak-256 digest in bytes.
pub const DIGEST_SIZE: usize = 32;

/// A Keccak-256 digest.
///
/// This is the fixed-width value that authorities sign and verifiers
/// recompute. It can only be built from exactly [`DIGEST_SIZE`] bytes.
///
/// # Examples
///
/// ```rust
/// use lirn_abi::keccak256;
///
/// let digest = keccak256(b"");
/// assert_eq!(
///     digest.to_string(),
///     "0xc5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
/// );
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Digest([u8; DIGEST_SIZE]);

impl Digest {
    /// Computes the Keccak-256 digest of a sequence of byte chunks.
    ///
    /// Equivalent to hashing the concatenation of the chunks.
    pub fn hash_iter<'a, I>(chunks: I) -> Self
    where
        I: IntoIterator<Item = &'a [u8]>,
    {
        let mut hasher = Keccak256::new();
        for chunk in chunks {
            hasher.update(chunk);
        }
        Self::from(hasher.finalize())
    }

    /// The raw digest bytes.
    pub const fn bytes(&self) -> &[u8; DIGEST_SIZE] {
        &self.0
    }
}

/// Computes the Keccak-256 digest of `bytes`.
pub fn keccak256(bytes: &[u8]) -> Digest {
    Digest::from(alloy_primitives::keccak256(bytes))
}

impl From<[u8; DIGEST_SIZE]> for Digest {
    fn from(value: [u8; DIGEST_SIZE]) -> Self {
        Digest(value)
    }
}

impl From<B256> for Digest {
    fn from(value: B256) -> Self {
        Digest(value.0)
    }
}

impl From<Digest> for [u8; DIGEST_SIZE] {
    fn from(value: Digest) -> Self {
        value.0
    }
}

impl TryFrom<&[u8]> for Digest {
    type Error = EncodingError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        let bytes = <[u8; DIGEST_SIZE]>::try_from(value)
            .map_err(|_| EncodingError::InvalidDigestLength(value.len()))?;
        Ok(Digest(bytes))
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({self})")
    }
}
