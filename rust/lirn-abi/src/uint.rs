//! Fixed-width 256-bit unsigned integers.

use crate::EncodingError;
use alloy_primitives::U256;
use std::{fmt, str::FromStr};

/// The size of a `uint256` in bytes.
pub const UINT256_SIZE: usize = 32;

/// An unsigned 256-bit integer.
///
/// Only the operations the voucher protocol needs are exposed: conversion
/// from native integers and text, numeric ordering, and the big-endian word
/// that the ABI encoder writes. The wrapped [`U256`] carries the arithmetic.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Uint256(pub U256);

impl Uint256 {
    /// Zero.
    pub const ZERO: Uint256 = Uint256(U256::ZERO);

    /// 2^256 - 1.
    pub const MAX: Uint256 = Uint256(U256::MAX);

    /// Wrap a 32-byte big-endian word.
    pub fn from_be_bytes(bytes: [u8; UINT256_SIZE]) -> Self {
        Self(U256::from_be_bytes(bytes))
    }

    /// The 32-byte big-endian word.
    pub fn to_be_bytes(&self) -> [u8; UINT256_SIZE] {
        self.0.to_be_bytes::<UINT256_SIZE>()
    }

    /// Whether the value is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// The value as a `u64`, if it fits.
    pub fn to_u64(&self) -> Option<u64> {
        match self.0.as_limbs() {
            [low, 0, 0, 0] => Some(*low),
            _ => None,
        }
    }

    /// Parse decimal text.
    pub fn from_dec_str(text: &str) -> Result<Self, EncodingError> {
        if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
            return Err(EncodingError::InvalidInteger(text.to_string()));
        }
        U256::from_str_radix(text, 10)
            .map(Self)
            .map_err(|_| EncodingError::IntegerOverflow(text.to_string()))
    }

    /// Parse `0x`-prefixed hex text of at most 64 significant digits.
    pub fn from_hex_str(text: &str) -> Result<Self, EncodingError> {
        let digits = text
            .strip_prefix("0x")
            .or_else(|| text.strip_prefix("0X"))
            .ok_or_else(|| EncodingError::InvalidInteger(text.to_string()))?;

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(EncodingError::InvalidInteger(text.to_string()));
        }

        let significant = digits.trim_start_matches('0');
        if significant.is_empty() {
            return Ok(Self::ZERO);
        }
        if significant.len() > UINT256_SIZE * 2 {
            return Err(EncodingError::IntegerOverflow(text.to_string()));
        }
        U256::from_str_radix(significant, 16)
            .map(Self)
            .map_err(|_| EncodingError::IntegerOverflow(text.to_string()))
    }
}

impl From<u64> for Uint256 {
    fn from(value: u64) -> Self {
        Self(U256::from(value))
    }
}

impl From<u128> for Uint256 {
    fn from(value: u128) -> Self {
        Self(U256::from(value))
    }
}

impl From<U256> for Uint256 {
    fn from(value: U256) -> Self {
        Self(value)
    }
}

impl FromStr for Uint256 {
    type Err = EncodingError;

    /// Accepts decimal text or `0x`-prefixed hex text.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with("0x") || s.starts_with("0X") {
            Self::from_hex_str(s)
        } else {
            Self::from_dec_str(s)
        }
    }
}

impl fmt::Display for Uint256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Debug for Uint256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Uint256({self})")
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Uint256 {
    /// Values that fit in a `u64` serialize as numbers, larger ones as
    /// decimal strings.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self.to_u64() {
            Some(value) => serializer.serialize_u64(value),
            None => serializer.serialize_str(&self.to_string()),
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Uint256 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct Uint256Visitor;

        impl serde::de::Visitor<'_> for Uint256Visitor {
            type Value = Uint256;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an unsigned integer or a decimal / 0x hex string")
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(Uint256::from(v))
            }

            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                u64::try_from(v)
                    .map(Uint256::from)
                    .map_err(|_| E::custom(format!("negative integer {v} is not a uint256")))
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(Uint256Visitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use testresult::TestResult;

    const MAX_DECIMAL: &str =
        "115792089237316195423570985008687907853269984665640564039457584007913129639935";

    #[test]
    fn it_parses_and_prints_decimal() -> TestResult {
        for text in ["0", "1", "42", "1667060841", "18446744073709551616", MAX_DECIMAL] {
            let value: Uint256 = text.parse()?;
            assert_eq!(value.to_string(), text);
        }
        Ok(())
    }

    #[test]
    fn it_parses_the_maximum_and_rejects_one_more() -> TestResult {
        assert_eq!(MAX_DECIMAL.parse::<Uint256>()?, Uint256::MAX);

        let beyond =
            "115792089237316195423570985008687907853269984665640564039457584007913129639936";
        assert!(matches!(
            beyond.parse::<Uint256>(),
            Err(EncodingError::IntegerOverflow(_))
        ));
        Ok(())
    }

    #[test]
    fn it_parses_hex() -> TestResult {
        assert_eq!("0x2a".parse::<Uint256>()?, Uint256::from(42u64));
        assert_eq!("0x0".parse::<Uint256>()?, Uint256::ZERO);
        assert_eq!(format!("0x{}", "f".repeat(64)).parse::<Uint256>()?, Uint256::MAX);
        assert_eq!(
            format!("0x000{}", "f".repeat(64)).parse::<Uint256>()?,
            Uint256::MAX
        );
        assert!(matches!(
            format!("0x1{}", "0".repeat(64)).parse::<Uint256>(),
            Err(EncodingError::IntegerOverflow(_))
        ));
        Ok(())
    }

    #[test]
    fn it_rejects_non_integers() {
        for text in ["", "-1", "1.5", "0x", "0xg1", " 1", "one"] {
            assert!(
                matches!(text.parse::<Uint256>(), Err(EncodingError::InvalidInteger(_))),
                "{text:?} should be rejected"
            );
        }
    }

    #[test]
    fn it_orders_numerically() {
        assert!(Uint256::from(255u64) < Uint256::from(256u64));
        assert!(Uint256::from(u64::MAX) < Uint256::from(u128::from(u64::MAX) + 1));
        assert!(Uint256::ZERO < Uint256::MAX);
    }

    #[test]
    fn it_lays_out_native_integers_big_endian() {
        let word = Uint256::from(0x0102u64).to_be_bytes();
        assert_eq!(&word[..30], &[0u8; 30]);
        assert_eq!(&word[30..], &[0x01, 0x02]);
        assert_eq!(Uint256::from(7u128).to_u64(), Some(7));
        assert_eq!(Uint256::MAX.to_u64(), None);
        assert_eq!(Uint256::from(u128::from(u64::MAX) + 1).to_u64(), None);
    }

    #[test]
    fn it_agrees_with_the_wrapped_integer() -> TestResult {
        let value: Uint256 = "1667060841".parse()?;
        assert_eq!(value.0, U256::from(1_667_060_841u64));
        assert_eq!(Uint256::from_be_bytes(value.to_be_bytes()), value);
        assert_eq!(Uint256::from(U256::MAX), Uint256::MAX);
        Ok(())
    }

    #[cfg(feature = "serde")]
    #[test]
    fn it_deserializes_numbers_and_strings() -> TestResult {
        let from_number: Uint256 = serde_json::from_str("1664219311")?;
        let from_string: Uint256 = serde_json::from_str("\"1664219311\"")?;
        assert_eq!(from_number, from_string);
        assert_eq!(serde_json::to_string(&from_number)?, "1664219311");

        let max: Uint256 = serde_json::from_str(&format!("\"{MAX_DECIMAL}\""))?;
        assert_eq!(serde_json::to_string(&max)?, format!("\"{MAX_DECIMAL}\""));

        assert!(serde_json::from_str::<Uint256>("-1").is_err());
        Ok(())
    }
}
