//! Recoverable 65-byte authority signatures.

use crate::MalformedInputError;
use alloy_primitives::{Signature, U256, hex};
use k256::ecdsa::RecoveryId;
use std::{fmt, str::FromStr};

/// The size of a recoverable signature in bytes.
pub const SIGNATURE_SIZE: usize = 65;

/// A recoverable secp256k1 signature in `r || s || v` layout.
///
/// `v` is the recovery byte. Signatures produced by
/// [`AuthoritySigner`](crate::AuthoritySigner) use 27 / 28; parsing also
/// accepts the raw 0 / 1 form. Construction validates the length, the
/// recovery byte and the range of `r` and `s`, so every value of this type is
/// structurally well formed.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct VoucherSignature([u8; SIGNATURE_SIZE]);

impl VoucherSignature {
    pub(crate) fn from_parts(signature: &k256::ecdsa::Signature, recovery_id: RecoveryId) -> Self {
        let mut bytes = [0u8; SIGNATURE_SIZE];
        bytes[..64].copy_from_slice(&signature.to_bytes());
        bytes[64] = 27 + recovery_id.to_byte();
        Self(bytes)
    }

    fn validate(&self) -> Result<(), MalformedInputError> {
        let v = self.v();
        if !matches!(v, 0 | 1 | 27 | 28) {
            return Err(MalformedInputError::RecoveryId(v));
        }
        k256::ecdsa::Signature::from_slice(&self.0[..64])
            .map_err(|_| MalformedInputError::SignatureScalars)?;
        Ok(())
    }

    /// The signature as `(r, s, y_parity)` for recovery.
    pub fn as_signature(&self) -> Signature {
        Signature::new(
            U256::from_be_slice(&self.0[..32]),
            U256::from_be_slice(&self.0[32..64]),
            matches!(self.v(), 1 | 28),
        )
    }

    /// Whether `s` lies in the upper half of the curve order.
    pub fn is_high_s(&self) -> bool {
        k256::ecdsa::Signature::from_slice(&self.0[..64])
            .map(|signature| signature.normalize_s().is_some())
            .unwrap_or(true)
    }

    /// The raw signature bytes.
    pub const fn bytes(&self) -> &[u8; SIGNATURE_SIZE] {
        &self.0
    }

    /// The recovery byte `v`.
    pub const fn v(&self) -> u8 {
        self.0[64]
    }

    /// Lowercase hex text with a `0x` prefix.
    pub fn to_hex(&self) -> String {
        hex::encode_prefixed(self.0)
    }
}

impl TryFrom<&[u8]> for VoucherSignature {
    type Error = MalformedInputError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        let bytes = <[u8; SIGNATURE_SIZE]>::try_from(value)
            .map_err(|_| MalformedInputError::SignatureLength(value.len()))?;
        let signature = VoucherSignature(bytes);
        signature.validate()?;
        Ok(signature)
    }
}

impl From<VoucherSignature> for [u8; SIGNATURE_SIZE] {
    fn from(value: VoucherSignature) -> Self {
        value.0
    }
}

impl FromStr for VoucherSignature {
    type Err = MalformedInputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(digits)?;
        VoucherSignature::try_from(bytes.as_slice())
    }
}

impl ::signature::SignatureEncoding for VoucherSignature {
    type Repr = [u8; SIGNATURE_SIZE];
}

impl fmt::Display for VoucherSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for VoucherSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VoucherSignature({})", self.to_hex())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for VoucherSignature {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for VoucherSignature {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct SignatureVisitor;

        impl serde::de::Visitor<'_> for SignatureVisitor {
            type Value = VoucherSignature;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a 65 byte hex signature")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_str(SignatureVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use testresult::TestResult;

    fn well_formed(v: u8) -> [u8; SIGNATURE_SIZE] {
        let mut bytes = [0u8; SIGNATURE_SIZE];
        bytes[31] = 1;
        bytes[63] = 1;
        bytes[64] = v;
        bytes
    }

    #[test]
    fn it_accepts_raw_and_offset_recovery_bytes() {
        for v in [0, 1, 27, 28] {
            assert!(VoucherSignature::try_from(well_formed(v).as_slice()).is_ok());
        }
    }

    #[test]
    fn it_rejects_other_recovery_bytes() {
        for v in [2, 3, 26, 29, 35, 255] {
            assert_eq!(
                VoucherSignature::try_from(well_formed(v).as_slice()),
                Err(MalformedInputError::RecoveryId(v))
            );
        }
    }

    #[test]
    fn it_rejects_wrong_lengths() {
        assert_eq!(
            VoucherSignature::try_from([1u8; 64].as_slice()),
            Err(MalformedInputError::SignatureLength(64))
        );
        assert_eq!(
            VoucherSignature::try_from([1u8; 66].as_slice()),
            Err(MalformedInputError::SignatureLength(66))
        );
        assert_eq!(
            "0x".parse::<VoucherSignature>(),
            Err(MalformedInputError::SignatureLength(0))
        );
    }

    #[test]
    fn it_rejects_zero_scalars() {
        let mut bytes = well_formed(27);
        bytes[..32].fill(0);
        assert_eq!(
            VoucherSignature::try_from(bytes.as_slice()),
            Err(MalformedInputError::SignatureScalars)
        );
    }

    #[test]
    fn it_reads_the_parity_from_either_recovery_form() -> TestResult {
        for (v, odd) in [(0, false), (1, true), (27, false), (28, true)] {
            let signature = VoucherSignature::try_from(well_formed(v).as_slice())?;
            let parts = signature.as_signature();
            assert_eq!(parts.v(), odd);
            assert_eq!(parts.r(), U256::from(1u64));
            assert_eq!(parts.s(), U256::from(1u64));
        }
        Ok(())
    }

    #[test]
    fn it_flags_high_s_values() -> TestResult {
        let low = VoucherSignature::try_from(well_formed(27).as_slice())?;
        assert!(!low.is_high_s());

        let mut bytes = well_formed(27);
        bytes[32] = 0xff;
        let high = VoucherSignature::try_from(bytes.as_slice())?;
        assert!(high.is_high_s());
        Ok(())
    }

    #[test]
    fn it_parses_hex_with_or_without_prefix() {
        let bytes = well_formed(28);
        let with_prefix: VoucherSignature = hex::encode_prefixed(bytes).parse().unwrap();
        let without_prefix: VoucherSignature = hex::encode(bytes).parse().unwrap();
        assert_eq!(with_prefix, without_prefix);
        assert_eq!(with_prefix.bytes(), &bytes);
        assert_eq!(with_prefix.v(), 28);
        assert!(matches!(
            "0xnothex".parse::<VoucherSignature>(),
            Err(MalformedInputError::InvalidHex(_))
        ));
    }
}
