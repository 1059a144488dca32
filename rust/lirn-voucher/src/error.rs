use lirn_abi::{Address, EncodingError};
use lirn_credentials::SigningError;
use thiserror::Error;

/// Errors that occur while loading, signing or pairing an issuance batch.
#[derive(Error, Debug)]
pub enum IssuanceError {
    /// The batch, manifest or signature book JSON was malformed or could
    /// not be produced.
    #[error("Invalid issuance document: {0}")]
    Json(#[from] serde_json::Error),

    /// A recipient, contract or integer field was not a valid typed value.
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    /// The authority failed to sign a voucher.
    #[error(transparent)]
    Signing(#[from] SigningError),

    /// The same recipient appeared more than once in a batch.
    #[error("Recipient {0} appears more than once")]
    DuplicateRecipient(Address),

    /// A signature book does not line up with the batch it is paired with.
    #[error("Recipient {recipient} has {signatures} signatures for {vouchers} vouchers")]
    SignatureCount {
        /// The recipient whose lists differ.
        recipient: Address,
        /// Vouchers issued to the recipient in the batch.
        vouchers: usize,
        /// Signatures recorded for the recipient in the book.
        signatures: usize,
    },
}
