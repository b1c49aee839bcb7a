//! Error types for onect-core.

use thiserror::Error;

/// Core error types.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid subaccount name: {0}")]
    InvalidSubaccountName(String),

    #[error("Fixed-point overflow: {0}")]
    FixedPointOverflow(String),

    #[error("Decimal parse error: {0}")]
    DecimalParse(#[from] rust_decimal::Error),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
