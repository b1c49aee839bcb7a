//! Delegated trading session manager.
//!
//! Lets a user of a margin-trading venue avoid re-approving every
//! trading action with their primary wallet: a delegate signing key is
//! deterministically derived from one primary-wallet signature, linked
//! with the venue for a subaccount, and used for every trading call
//! thereafter.
//!
//! # Key components
//!
//! - [`derive_delegate_key`]: one signature in, 32 bytes of delegate key out
//! - [`SessionLinker`]: submits the link authorization and interprets it
//! - [`BudgetTracker`]: advisory remaining-link-count, throwaway signer only
//! - [`SessionState`]: `Disconnected → PrimaryConnected → Linking → Linked`
//! - [`SessionManager`]: orchestrates the full link flow
//! - [`TradingGateway`]: balance, open orders, and order placement through
//!   the linked delegate
//!
//! # Flow
//!
//! connect → `SessionManager::create_link` (network switch → derive →
//! link → commit) → `TradingGateway` operations enabled. The budget is
//! re-queried after every link attempt, success or failure.

pub mod budget;
pub mod derive;
pub mod error;
pub mod gateway;
pub mod linker;
pub mod manager;
pub mod state;

pub use budget::{BudgetTracker, THROWAWAY_SIGNER_KEY};
pub use derive::{derivation_message, derive_delegate_key, DelegateKeyMaterial};
pub use error::{SessionError, SessionResult};
pub use gateway::TradingGateway;
pub use linker::SessionLinker;
pub use manager::{
    LinkOutcome, NetworkSwitcher, NoopNetworkSwitcher, SessionManager, VenueClientFactory,
};
pub use state::{SessionPhase, SessionState, TradingHandle};
