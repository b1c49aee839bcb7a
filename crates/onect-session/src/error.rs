//! Session error taxonomy.
//!
//! Every operation catches its own failures at the boundary and
//! surfaces them as one of these variants; nothing is retried
//! automatically, and no failure leaves `SessionState` half-updated.

use onect_core::WalletError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    /// The primary wallet declined to sign.
    #[error("Signing rejected by wallet")]
    SigningRejected,

    /// No primary wallet is connected.
    #[error("Signing unavailable: no wallet connected")]
    SigningUnavailable,

    /// Linking failed, either venue-reported or in transport.
    #[error("Link failed: {0}")]
    LinkFailure(String),

    /// A link attempt is already in flight for this session.
    #[error("Link attempt already in flight")]
    LinkInFlight,

    /// A venue read failed.
    #[error("Venue query failed: {0}")]
    QueryFailed(String),

    /// Operation requires a linked session.
    #[error("No active trading session")]
    NoActiveSession,

    /// The venue rejected an order.
    #[error("Order rejected: {0}")]
    OrderRejected(String),

    /// A state transition was requested from the wrong phase.
    #[error("Invalid session transition: {0}")]
    InvalidTransition(&'static str),
}

impl From<WalletError> for SessionError {
    fn from(err: WalletError) -> Self {
        match err {
            WalletError::Rejected => Self::SigningRejected,
            WalletError::Unavailable => Self::SigningUnavailable,
            other => Self::LinkFailure(other.to_string()),
        }
    }
}

pub type SessionResult<T> = Result<T, SessionError>;
