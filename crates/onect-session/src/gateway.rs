//! Trading operations through the linked delegate.
//!
//! Every operation snapshots the published client and epoch up front,
//! performs its venue call without holding any lock, and discards the
//! response if the session was replaced or torn down while the call
//! was in flight. Reads and the single-writer `place_order` may run
//! concurrently; they share only the immutable snapshot.

use std::sync::Arc;

use onect_core::{AccountSummary, OpenOrdersResult, OrderReceipt, OrderRequest, Subaccount};
use onect_venue::VenueError;
use tracing::{info, warn};

use crate::error::{SessionError, SessionResult};
use crate::state::SessionState;

pub struct TradingGateway {
    state: Arc<SessionState>,
}

impl TradingGateway {
    #[must_use]
    pub fn new(state: Arc<SessionState>) -> Self {
        Self { state }
    }

    /// Existence and health figures for a subaccount. Figures stay in
    /// X18 here; scale conversion belongs to the presentation boundary.
    ///
    /// # Errors
    /// `NoActiveSession` unless linked; `QueryFailed` on venue errors.
    pub async fn account_summary(&self, subaccount: &Subaccount) -> SessionResult<AccountSummary> {
        let handle = self.state.trading_handle()?;
        let summary = handle
            .client
            .subaccount_info(subaccount)
            .await
            .map_err(|e| SessionError::QueryFailed(e.to_string()))?;
        self.ensure_current(handle.epoch)?;
        Ok(summary)
    }

    /// Open orders for each requested product id (lists may be empty).
    ///
    /// # Errors
    /// `NoActiveSession` unless linked; `QueryFailed` on venue errors.
    pub async fn open_orders(
        &self,
        subaccount: &Subaccount,
        product_ids: &[u32],
    ) -> SessionResult<OpenOrdersResult> {
        let handle = self.state.trading_handle()?;
        let orders = handle
            .client
            .open_orders(subaccount, product_ids)
            .await
            .map_err(|e| SessionError::QueryFailed(e.to_string()))?;
        self.ensure_current(handle.epoch)?;
        Ok(orders)
    }

    /// Submit an order as the delegate. Expiration is computed from
    /// "now + horizon" inside the venue client at submission time.
    /// Never retried automatically (duplicate submission risk).
    ///
    /// # Errors
    /// `NoActiveSession` unless linked; `OrderRejected` when the venue
    /// declines; `QueryFailed` on transport errors.
    pub async fn place_order(&self, request: &OrderRequest) -> SessionResult<OrderReceipt> {
        let handle = self.state.trading_handle()?;
        let receipt = handle
            .client
            .place_order(request)
            .await
            .map_err(|e| match e {
                VenueError::Rejected(reason) => SessionError::OrderRejected(reason),
                other => SessionError::QueryFailed(other.to_string()),
            })?;

        if !self.state.is_current(handle.epoch) {
            // The order may well have been booked, but this session no
            // longer owns it; the receipt must not be surfaced.
            warn!(digest = %receipt.digest, "Discarding receipt from superseded session");
            return Err(SessionError::NoActiveSession);
        }

        info!(
            subaccount = %request.subaccount,
            product_id = request.product_id,
            digest = %receipt.digest,
            "Order accepted"
        );
        Ok(receipt)
    }

    fn ensure_current(&self, epoch: u64) -> SessionResult<()> {
        if self.state.is_current(epoch) {
            Ok(())
        } else {
            Err(SessionError::NoActiveSession)
        }
    }
}
