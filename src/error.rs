//! Error types for the Huma SDK

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A pool, contract or metadata entry could not be resolved.
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Contract call failed: {0}")]
    Contract(String),

    #[error("Transaction failed: {0}")]
    Transaction(String),

    #[error("Wallet error: {0}")]
    Wallet(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<alloy::contract::Error> for Error {
    fn from(err: alloy::contract::Error) -> Self {
        Error::Contract(err.to_string())
    }
}

impl From<alloy::transports::TransportError> for Error {
    fn from(err: alloy::transports::TransportError) -> Self {
        Error::Contract(format!("RPC request failed: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
