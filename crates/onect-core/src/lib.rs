//! Core domain types for the one-click trading session manager.
//!
//! This crate provides the fundamental types shared across the system:
//! - `Subaccount`: owner address + short name, with the venue's bytes32 encoding
//! - `X18`: fixed-point integers scaled by 10^18, converted at the display boundary
//! - `OrderRequest`, `OpenOrdersResult`, `AccountSummary`: trading payloads
//! - `WalletProvider`: the signing capability supplied by a connected wallet

pub mod error;
pub mod fixedpoint;
pub mod order;
pub mod subaccount;
pub mod wallet;

pub use error::{CoreError, Result};
pub use fixedpoint::X18;
pub use order::{
    decode_expiration_timestamp, AccountSummary, ExpirationKind, ExpirationSpec, LinkResult,
    OpenOrder, OpenOrdersResult, OrderReceipt, OrderRequest, ProductOrders, SessionBudget,
    DEFAULT_ORDER_HORIZON_SECS,
};
pub use subaccount::{Subaccount, SUBACCOUNT_NAME_MAX_BYTES};
pub use wallet::{LocalWallet, WalletError, WalletProvider};

// Re-export the primitives that appear in public signatures so downstream
// crates don't need a direct alloy dependency for basic use.
pub use alloy::primitives::{Address, PrimitiveSignature, B256};
