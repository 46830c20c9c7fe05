use crate::types::Pubkey;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CutilsError {
    #[error("invalid base58 string {0:?}: {1}")]
    Base58(String, bs58::decode::Error),

    #[error("expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("invalid keypair: {0}")]
    Keypair(#[from] ed25519_dalek::SignatureError),

    #[error("no signer supplied for required signer {0}")]
    MissingSigner(Pubkey),

    #[error("length {0} does not fit a compact-u16")]
    LengthOverflow(usize),

    #[error("transaction references {0} accounts, at most 256 are addressable")]
    TooManyAccounts(usize),

    #[error("transaction is {0} bytes, packet limit is 1232")]
    TransactionTooLarge(usize),

    #[error("{field} mismatch: computed {computed}, read API reported {reported}")]
    HashMismatch { field: &'static str, computed: Pubkey, reported: Pubkey },
}

pub type Result<T> = std::result::Result<T, CutilsError>;
