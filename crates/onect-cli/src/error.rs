//! CLI error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Wallet error: {0}")]
    Wallet(#[from] onect_core::WalletError),

    #[error("Session error: {0}")]
    Session(#[from] onect_session::SessionError),

    #[error("Venue error: {0}")]
    Venue(#[from] onect_venue::VenueError),

    #[error("Core error: {0}")]
    Core(#[from] onect_core::CoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type CliResult<T> = Result<T, CliError>;
