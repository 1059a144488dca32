#![warn(missing_docs)]

//! Canonical encoding for voucher payloads.
//!
//! This crate provides the typed values a voucher is made of ([`Address`],
//! [`Uint256`]) and the 32-byte Keccak-256 [`Digest`] that authorities sign.
//! Tuples of the wrapped values encode through [`SolValue::abi_encode_params`],
//! which produces the bytes the Solidity ABI "default coder" produces for
//! `abi.encode(...)`. The encoding is the protocol surface shared by issuers
//! and verifiers: both sides must produce the same bytes for the same values.
//!
//! ```rust
//! use lirn_abi::{Address, SolValue, Uint256, keccak256};
//!
//! let recipient: Address = "0x1273D47090B70356291a5A57aedcaB7479a9EEb8".parse().unwrap();
//! let encoded = (
//!     Uint256::from(42u64).0,
//!     String::from("testing/42.json"),
//!     recipient.0,
//! )
//!     .abi_encode_params();
//! assert_eq!(encoded.len() % 32, 0);
//! assert_eq!(keccak256(&encoded), keccak256(&encoded));
//! ```

mod error;
pub use error::*;

mod hash;
pub use hash::*;

mod address;
pub use address::*;

mod uint;
pub use uint::*;

pub use alloy_sol_types::SolValue;
