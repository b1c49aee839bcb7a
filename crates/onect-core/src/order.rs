//! Order requests, query results, and link/session outcome types.

use crate::fixedpoint::X18;
use crate::subaccount::Subaccount;
use alloy::primitives::Address;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Default order lifetime: expiration is computed as now + this horizon
/// at request time, never persisted.
pub const DEFAULT_ORDER_HORIZON_SECS: u64 = 60;

/// Order expiration behavior, packed by the venue into the top two bits
/// of the u64 expiration field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpirationKind {
    /// Resting order, good until the timestamp.
    #[default]
    Default,
    ImmediateOrCancel,
    FillOrKill,
    PostOnly,
}

impl ExpirationKind {
    #[must_use]
    pub fn tag(&self) -> u64 {
        match self {
            Self::Default => 0,
            Self::ImmediateOrCancel => 1,
            Self::FillOrKill => 2,
            Self::PostOnly => 3,
        }
    }

    /// Pack the kind tag and an absolute epoch-seconds timestamp into
    /// the venue's expiration encoding.
    #[must_use]
    pub fn encode(&self, timestamp_secs: u64) -> u64 {
        (self.tag() << 62) | (timestamp_secs & ((1 << 62) - 1))
    }
}

/// Strip the kind tag from a venue-encoded expiration, leaving the
/// absolute epoch-seconds timestamp.
#[must_use]
pub fn decode_expiration_timestamp(encoded: u64) -> u64 {
    encoded & ((1 << 62) - 1)
}

/// Expiration recomputed per call from "now + horizon".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpirationSpec {
    pub kind: ExpirationKind,
    pub seconds_from_now: u64,
}

impl Default for ExpirationSpec {
    fn default() -> Self {
        Self {
            kind: ExpirationKind::Default,
            seconds_from_now: DEFAULT_ORDER_HORIZON_SECS,
        }
    }
}

impl ExpirationSpec {
    /// Absolute expiration timestamp for a request issued at `now_secs`.
    #[must_use]
    pub fn absolute(&self, now_secs: u64) -> u64 {
        now_secs.saturating_add(self.seconds_from_now)
    }

    /// Venue-encoded expiration for a request issued at `now_secs`.
    #[must_use]
    pub fn encode_at(&self, now_secs: u64) -> u64 {
        self.kind.encode(self.absolute(now_secs))
    }
}

/// An order to submit through the linked delegate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub subaccount: Subaccount,
    pub product_id: u32,
    pub price: Decimal,
    pub amount: Decimal,
    #[serde(default)]
    pub expiration: ExpirationSpec,
}

/// A resting order as reported by the venue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenOrder {
    pub price: Decimal,
    /// Unfilled amount, X18.
    pub amount: X18,
    /// Absolute expiration in epoch seconds (kind tag stripped).
    pub expiration_secs: u64,
    pub digest: String,
}

impl OpenOrder {
    /// Wall-clock expiration, for display.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(i64::try_from(self.expiration_secs).ok()?, 0)
    }

    /// Seconds until expiry relative to `now_secs` (negative if past).
    #[must_use]
    pub fn expires_in_secs(&self, now_secs: u64) -> i64 {
        self.expiration_secs as i64 - now_secs as i64
    }
}

/// Open orders for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductOrders {
    pub product_id: u32,
    pub orders: Vec<OpenOrder>,
}

/// Result of a multi-product open-orders query.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OpenOrdersResult {
    pub product_orders: Vec<ProductOrders>,
}

/// Venue-reported existence and health figures for a subaccount.
///
/// All figures are X18; scale conversion happens at the presentation
/// boundary, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSummary {
    pub exists: bool,
    pub assets: X18,
    pub liabilities: X18,
    pub health: X18,
}

/// Structured receipt for an accepted order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderReceipt {
    /// Venue order digest.
    pub digest: String,
    pub product_id: u32,
    /// Subaccount the order was booked against.
    pub subaccount: Subaccount,
}

/// Outcome of a link-signer submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkResult {
    Success,
    /// The venue's non-"success" status, verbatim.
    Failure(String),
}

impl LinkResult {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Read-only snapshot of the venue's remaining link allowance for an
/// owner. Never mutated locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionBudget {
    pub owner: Address,
    pub remaining: u64,
}
