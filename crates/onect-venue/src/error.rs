//! Venue client error types.

use onect_core::{CoreError, WalletError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VenueError {
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Venue rejected request: {0}")]
    Rejected(String),

    #[error("Malformed venue response: {0}")]
    InvalidResponse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Wallet error: {0}")]
    Wallet(#[from] WalletError),

    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}

pub type VenueResult<T> = Result<T, VenueError>;
