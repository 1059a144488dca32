#![warn(missing_docs)]

//! Time-bounded, price-bound authorization vouchers.
//!
//! A voucher lets an off-chain authority grant one account a one-time
//! permission ("this recipient may claim subject 42 on this contract at
//! price 0 before time T") without an on-chain transaction per grant. The
//! authority signs the voucher's digest; whoever honors the voucher
//! recovers the signer, checks it against the authority it trusts, and
//! checks the expiration against a time it supplies.
//!
//! # Example
//!
//! ```
//! use lirn_abi::Address;
//! use lirn_credentials::AuthoritySigner;
//! use lirn_voucher::{Timestamp, Verification, Voucher, verify};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let authority = AuthoritySigner::import(&[7u8; 32])?;
//! let contract: Address = "0x0af27bf79f8e27c06f0570f60b34b6d4b0fea19a".parse()?;
//! let recipient: Address = "0x1273D47090B70356291a5A57aedcaB7479a9EEb8".parse()?;
//!
//! let voucher = Voucher::new(contract, 42u64, "testing/42.json", 1_667_060_841u64, 0u64, recipient);
//! let signed = voucher.clone().issue(&authority)?;
//!
//! let now = Timestamp::from_unix(1_667_060_840);
//! assert_eq!(
//!     verify(&voucher, signed.signature(), &authority.address(), now)?,
//!     Verification::Valid
//! );
//! # Ok(())
//! # }
//! ```
//!
//! Batches of vouchers are issued with [`issue_batch`] and published as a
//! [`SignatureBook`]; see the [`issuance`] module.

mod claim;
mod error;
pub mod issuance;
mod time;
mod verify;
mod voucher;
mod whitelist;

pub use claim::Claim;
pub use error::IssuanceError;
pub use issuance::{IssuanceBatch, IssuanceManifest, SignatureBook, VoucherEntry, issue_batch};
pub use time::Timestamp;
pub use verify::{Authority, AuthoritySet, Verification, verify, verify_claim, verify_with};
pub use voucher::{SignedVoucher, Voucher};
pub use whitelist::{AccountGrant, WhitelistGrant};
