use thiserror::Error;

/// Errors that can occur while constructing or encoding ABI values.
///
/// Every variant is raised while *parsing* a typed value (an [`Address`],
/// a [`Uint256`] or a [`Digest`]). Once a value exists it always encodes, so
/// encoding either fully succeeds or fails before any bytes are produced.
///
/// [`Address`]: crate::Address
/// [`Uint256`]: crate::Uint256
/// [`Digest`]: crate::Digest
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EncodingError {
    /// The text is not a 20-byte hex address.
    ///
    /// Addresses are 40 hex digits, optionally prefixed with `0x`.
    #[error("Invalid address {input:?}: {reason}")]
    InvalidAddress {
        /// The rejected input
        input: String,
        /// Why it was rejected
        reason: &'static str,
    },

    /// A mixed-case address did not match its EIP-55 checksum.
    #[error("Address {input:?} has an invalid checksum (expected {expected})")]
    InvalidChecksum {
        /// The rejected input
        input: String,
        /// The correctly checksummed form of the same bytes
        expected: String,
    },

    /// Hex text could not be decoded.
    #[error("Invalid hex: {0}")]
    InvalidHex(#[from] alloy_primitives::hex::FromHexError),

    /// An integer does not fit in 256 bits.
    #[error("Integer {0:?} does not fit in 256 bits")]
    IntegerOverflow(String),

    /// Integer text is neither decimal nor `0x` hex.
    #[error("Invalid integer {0:?}")]
    InvalidInteger(String),

    /// A digest must be exactly 32 bytes.
    #[error("Expected a 32 byte digest, got {0} bytes")]
    InvalidDigestLength(usize),
}
