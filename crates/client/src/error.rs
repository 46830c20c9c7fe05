use thiserror::Error;

/// Public error type for this crate.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClientError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("{method} returned HTTP {status}: {body}")]
    Status { method: String, status: u16, body: String },

    #[error("{method} failed with rpc error {code}: {message}")]
    Rpc { method: String, code: i64, message: String },

    #[error("{0} returned no result")]
    MissingResult(String),

    #[error("invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error(transparent)]
    Cutils(#[from] cutils_lib::CutilsError),

    #[error("transaction {signature} failed: {err}")]
    TransactionFailed { signature: String, err: serde_json::Value },

    #[error("transaction {signature} not confirmed after {attempts} attempts")]
    Unconfirmed { signature: String, attempts: usize },
}

pub type Result<T> = std::result::Result<T, ClientError>;
