#![warn(missing_docs)]

//! Authority keys for voucher issuance and verification.
//!
//! Authorities are secp256k1 keypairs identified by their 20-byte address.
//! Issuers sign 32-byte digests under the personal message scheme (see
//! [`message`]); verifiers never see a public key, they recover one from the
//! signature and compare its address against the authority they expect.
//!
//! - [`AuthoritySigner`] holds a private key and signs digests.
//! - [`recover`] and [`AuthorityVerifier`] recover and check signers.
//! - [`VoucherSignature`] is the 65-byte `r || s || v` wire form.

mod error;
pub mod message;
mod signature;
mod signer;
mod verifier;

pub use error::{MalformedInputError, SigningError};
pub use message::{personal_digest_hash, personal_message_hash};
pub use signature::{SIGNATURE_SIZE, VoucherSignature};
pub use signer::{AuthoritySigner, SECRET_KEY_SIZE};
pub use verifier::{AuthorityVerifier, recover};
