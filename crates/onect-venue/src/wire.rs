//! Wire payloads for the venue gateway.
//!
//! Queries go to `POST {gateway}/query`, signed actions to
//! `POST {gateway}/execute`. Every response uses the same envelope:
//! `{"status": "success", "data": ...}` or
//! `{"status": "failure", "error": "..."}`. Numeric fields arrive as
//! strings on most endpoints and bare integers on a few, so parsing
//! accepts both.

use crate::error::{VenueError, VenueResult};
use onect_core::{
    decode_expiration_timestamp, AccountSummary, OpenOrder, OpenOrdersResult, ProductOrders, X18,
};
use serde::{Deserialize, Serialize};

/// Read requests for the `/query` endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QueryRequest {
    SubaccountInfo {
        /// bytes32 sender, hex encoded.
        subaccount: String,
    },
    Orders {
        sender: String,
        product_ids: Vec<u32>,
    },
    LinkedSignerRateLimit {
        subaccount: String,
    },
    Nonces {
        address: String,
    },
}

/// Common response envelope.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Envelope<T> {
    pub status: String,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }

    /// The venue's stated reason for a non-success status.
    pub fn failure_reason(&self) -> String {
        self.error.clone().unwrap_or_else(|| self.status.clone())
    }

    /// Unwrap the payload, treating any non-success status as a
    /// rejection.
    pub fn into_result(self) -> VenueResult<T> {
        if !self.is_success() {
            return Err(VenueError::Rejected(self.failure_reason()));
        }
        self.data
            .ok_or_else(|| VenueError::InvalidResponse("success envelope without data".to_string()))
    }
}

// Some endpoints send u64s as strings, others as integers.
pub(crate) mod flex_u64 {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Str(String),
            Int(u64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Str(s) => s.parse().map_err(serde::de::Error::custom),
            Raw::Int(i) => Ok(i),
        }
    }
}

/// One health group (assets, liabilities, net health), X18.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthGroup {
    pub assets: X18,
    pub liabilities: X18,
    pub health: X18,
}

/// `subaccount_info` payload. The venue reports three health groups in
/// order: initial, maintenance, unweighted; display uses initial.
#[derive(Debug, Deserialize)]
pub struct SubaccountInfoData {
    pub exists: bool,
    pub healths: Vec<HealthGroup>,
}

impl SubaccountInfoData {
    pub fn into_summary(mut self) -> AccountSummary {
        let initial = if self.healths.is_empty() {
            HealthGroup {
                assets: X18::ZERO,
                liabilities: X18::ZERO,
                health: X18::ZERO,
            }
        } else {
            self.healths.swap_remove(0)
        };
        AccountSummary {
            exists: self.exists,
            assets: initial.assets,
            liabilities: initial.liabilities,
            health: initial.health,
        }
    }
}

/// A single resting order in the `orders` query payload.
#[derive(Debug, Deserialize)]
pub struct OrderData {
    pub price_x18: X18,
    /// Unfilled amount, X18.
    pub amount: X18,
    /// Venue-encoded expiration (kind tag in the top bits).
    #[serde(with = "flex_u64")]
    pub expiration: u64,
    pub digest: String,
}

#[derive(Debug, Deserialize)]
pub struct ProductOrdersData {
    pub product_id: u32,
    pub orders: Vec<OrderData>,
}

/// `orders` query payload.
#[derive(Debug, Deserialize)]
pub struct OrdersData {
    pub product_orders: Vec<ProductOrdersData>,
}

impl OrdersData {
    /// Convert to the domain result, resolving X18 prices to decimals
    /// and stripping expiration tags.
    pub fn into_result(self) -> VenueResult<OpenOrdersResult> {
        let mut product_orders = Vec::with_capacity(self.product_orders.len());
        for product in self.product_orders {
            let mut orders = Vec::with_capacity(product.orders.len());
            for order in product.orders {
                orders.push(OpenOrder {
                    price: order.price_x18.to_decimal()?,
                    amount: order.amount,
                    expiration_secs: decode_expiration_timestamp(order.expiration),
                    digest: order.digest,
                });
            }
            product_orders.push(ProductOrders {
                product_id: product.product_id,
                orders,
            });
        }
        Ok(OpenOrdersResult { product_orders })
    }
}

/// `linked_signer_rate_limit` query payload.
#[derive(Debug, Deserialize)]
pub struct LinkedSignerRateLimitData {
    /// Currently linked signer, bytes32 hex.
    pub signer: String,
    #[serde(with = "flex_u64")]
    pub remaining_txs: u64,
    #[serde(with = "flex_u64")]
    pub wait_time: u64,
}

/// `nonces` query payload.
#[derive(Debug, Deserialize)]
pub struct NoncesData {
    #[serde(with = "flex_u64")]
    pub tx_nonce: u64,
    #[serde(with = "flex_u64")]
    pub order_nonce: u64,
}

/// Link-signer transaction body. All numeric fields cross the wire as
/// strings.
#[derive(Debug, Clone, Serialize)]
pub struct LinkSignerTx {
    pub sender: String,
    pub signer: String,
    pub nonce: String,
}

/// Order transaction body.
#[derive(Debug, Clone, Serialize)]
pub struct OrderTx {
    pub sender: String,
    #[serde(rename = "priceX18")]
    pub price_x18: String,
    pub amount: String,
    pub expiration: String,
    pub nonce: String,
}

#[derive(Debug, Serialize)]
pub struct SignedLinkSigner {
    pub tx: LinkSignerTx,
    pub signature: String,
}

#[derive(Debug, Serialize)]
pub struct SignedPlaceOrder {
    pub product_id: u32,
    pub order: OrderTx,
    pub signature: String,
}

/// Signed actions for the `/execute` endpoint. Externally tagged, so
/// the wire shape is `{"link_signer": {...}}` / `{"place_order": {...}}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecuteRequest {
    LinkSigner(SignedLinkSigner),
    PlaceOrder(SignedPlaceOrder),
}

/// Execute response payload (order digest when present).
#[derive(Debug, Default, Deserialize)]
pub struct ExecuteData {
    #[serde(default)]
    pub digest: Option<String>,
}
