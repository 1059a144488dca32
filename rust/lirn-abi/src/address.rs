//! 20-byte account and contract addresses.

use crate::EncodingError;
use alloy_primitives::hex;
use std::{fmt, str::FromStr};

/// The size of an address in bytes.
pub const ADDRESS_SIZE: usize = 20;

/// A 160-bit account or contract address.
///
/// Parses from 40 hex digits with an optional `0x` prefix. Input that is all
/// lowercase or all uppercase is accepted as is; mixed-case input must carry
/// a valid [EIP-55] checksum. Addresses always display in checksummed form.
///
/// [EIP-55]: https://eips.ethereum.org/EIPS/eip-55
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Address(pub alloy_primitives::Address);

impl Address {
    /// The all-zero address.
    pub const ZERO: Address = Address(alloy_primitives::Address::ZERO);

    /// Wrap raw address bytes.
    pub const fn new(bytes: [u8; ADDRESS_SIZE]) -> Self {
        Self(alloy_primitives::Address::new(bytes))
    }

    /// The raw address bytes.
    pub const fn bytes(&self) -> &[u8; ADDRESS_SIZE] {
        &self.0.0.0
    }

    /// The EIP-55 checksummed hex form, including the `0x` prefix.
    pub fn to_checksum(&self) -> String {
        self.0.to_checksum(None)
    }
}

impl From<[u8; ADDRESS_SIZE]> for Address {
    fn from(bytes: [u8; ADDRESS_SIZE]) -> Self {
        Self::new(bytes)
    }
}

impl From<alloy_primitives::Address> for Address {
    fn from(address: alloy_primitives::Address) -> Self {
        Self(address)
    }
}

impl TryFrom<&[u8]> for Address {
    type Error = EncodingError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        let bytes =
            <[u8; ADDRESS_SIZE]>::try_from(value).map_err(|_| EncodingError::InvalidAddress {
                input: hex::encode(value),
                reason: "expected 20 bytes",
            })?;
        Ok(Self::new(bytes))
    }
}

impl FromStr for Address {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);

        if digits.len() != ADDRESS_SIZE * 2 {
            return Err(EncodingError::InvalidAddress {
                input: s.to_string(),
                reason: "expected 40 hex digits",
            });
        }
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(EncodingError::InvalidAddress {
                input: s.to_string(),
                reason: "contains non-hex characters",
            });
        }

        let mut bytes = [0u8; ADDRESS_SIZE];
        hex::decode_to_slice(digits, &mut bytes)?;
        let address = Self::new(bytes);

        let has_lower = digits.bytes().any(|b| b.is_ascii_lowercase());
        let has_upper = digits.bytes().any(|b| b.is_ascii_uppercase());
        if has_lower && has_upper {
            let expected = address.to_checksum();
            if expected[2..] != *digits {
                return Err(EncodingError::InvalidChecksum {
                    input: s.to_string(),
                    expected,
                });
            }
        }

        Ok(address)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_checksum())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_checksum())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct AddressVisitor;

        impl serde::de::Visitor<'_> for AddressVisitor {
            type Value = Address;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a 20 byte hex address")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_str(AddressVisitor)
    }
}
