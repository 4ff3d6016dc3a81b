//! Error types for the liquidity agent

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Transaction details not found or not parsed: {0}")]
    TransactionNotFound(String),

    #[error("Transaction {signature} failed on chain: {reason}")]
    TransactionFailed { signature: String, reason: String },

    #[error("Expected at least {expected} DLMM instructions in the transaction, found {found}")]
    InsufficientProtocolInstructions { expected: usize, found: usize },

    #[error("{context} failed after {attempts} retries: {source}")]
    RetryExhausted {
        context: String,
        attempts: u32,
        #[source]
        source: Box<Error>,
    },

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Request timeout: {0}")]
    Timeout(String),

    #[error("ConnectionError: {0}")]
    Connection(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

// reqwest's Display hides the timeout/connect cause in its source chain, so
// those two cases get their own variants for the retry classifier.
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout(err.to_string())
        } else if err.is_connect() {
            Error::Connection(err.to_string())
        } else {
            Error::Network(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
