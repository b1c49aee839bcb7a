//! Link submission and interpretation.
//!
//! The authorization record names the delegate's address as the new
//! signer for the subaccount and is signed by the primary wallet (the
//! client's construction signer). This is the last signature the user
//! is prompted for: once linked, trading calls authenticate as the
//! delegate.

use onect_core::{Address, LinkResult, Subaccount};
use onect_venue::VenueClient;
use tracing::{info, warn};

use crate::error::{SessionError, SessionResult};

pub struct SessionLinker;

impl SessionLinker {
    /// Submit the link authorization.
    ///
    /// Venue-reported non-"success" statuses come back as
    /// `Ok(LinkResult::Failure(..))`; only transport or signing
    /// problems are errors.
    ///
    /// # Errors
    /// `SessionError::LinkFailure` when the request could not be
    /// submitted at all.
    pub async fn link(
        client: &dyn VenueClient,
        subaccount: &Subaccount,
        delegate: Address,
    ) -> SessionResult<LinkResult> {
        let result = client
            .link_signer(subaccount, delegate)
            .await
            .map_err(|e| SessionError::LinkFailure(e.to_string()))?;

        match &result {
            LinkResult::Success => {
                info!(subaccount = %subaccount, delegate = %delegate, "Link succeeded");
            }
            LinkResult::Failure(reason) => {
                warn!(subaccount = %subaccount, reason = %reason, "Link failed");
            }
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use onect_core::{
        AccountSummary, OpenOrdersResult, OrderReceipt, OrderRequest, WalletProvider,
    };
    use onect_venue::{RateLimitStatus, VenueError, VenueResult};
    use std::sync::Arc;

    /// Venue that fails in transport for every call.
    struct UnreachableVenue;

    #[async_trait]
    impl VenueClient for UnreachableVenue {
        fn signer_address(&self) -> Address {
            Address::ZERO
        }

        fn set_linked_signer(&self, _: Option<Arc<dyn WalletProvider>>) {}

        async fn link_signer(&self, _: &Subaccount, _: Address) -> VenueResult<LinkResult> {
            Err(VenueError::HttpClient("connection refused".to_string()))
        }

        async fn linked_signer_rate_limit(&self, _: &Subaccount) -> VenueResult<RateLimitStatus> {
            Err(VenueError::HttpClient("connection refused".to_string()))
        }

        async fn subaccount_info(&self, _: &Subaccount) -> VenueResult<AccountSummary> {
            Err(VenueError::HttpClient("connection refused".to_string()))
        }

        async fn open_orders(&self, _: &Subaccount, _: &[u32]) -> VenueResult<OpenOrdersResult> {
            Err(VenueError::HttpClient("connection refused".to_string()))
        }

        async fn place_order(&self, _: &OrderRequest) -> VenueResult<OrderReceipt> {
            Err(VenueError::HttpClient("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn test_transport_error_is_link_failure() {
        let sub = Subaccount::new(Address::ZERO, "default").unwrap();
        let result = SessionLinker::link(&UnreachableVenue, &sub, Address::ZERO).await;
        assert!(matches!(result, Err(SessionError::LinkFailure(_))));
    }
}
