//! Remaining-link-budget queries.
//!
//! The venue rate-limits how many times a new delegate may be linked
//! per owner and enforces the limit server side. This tracker is
//! advisory: it lets the UI warn before the quota runs out, it never
//! gates calls. The query is read-only, so the client is constructed
//! from a fixed throwaway keypair; real delegate key material must
//! never reach this path, and the query works even when no link has
//! ever been created.

use std::sync::Arc;

use onect_core::{LocalWallet, SessionBudget, Subaccount};
use onect_venue::{RestVenueClient, VenueClient, VenueNetwork};
use tracing::debug;

use crate::error::{SessionError, SessionResult};

/// Fixed, clearly non-secret keypair satisfying client construction
/// for read-only queries. Isolated from every code path that touches
/// real key material.
pub const THROWAWAY_SIGNER_KEY: &str =
    "0x0123456789012345678901234567890123456789012345678901234567890123";

pub struct BudgetTracker {
    client: Arc<dyn VenueClient>,
}

impl BudgetTracker {
    /// Tracker backed by the venue gateway, signing-capability
    /// provided by the throwaway key.
    ///
    /// # Errors
    /// `QueryFailed` if the client cannot be constructed.
    pub fn for_network(network: VenueNetwork) -> SessionResult<Self> {
        let throwaway = LocalWallet::from_hex(THROWAWAY_SIGNER_KEY)
            .map_err(|e| SessionError::QueryFailed(e.to_string()))?;
        let client = RestVenueClient::new(network, Arc::new(throwaway))
            .map_err(|e| SessionError::QueryFailed(e.to_string()))?;
        Ok(Self::with_client(Arc::new(client)))
    }

    /// Tracker over an existing client (tests, embedders).
    #[must_use]
    pub fn with_client(client: Arc<dyn VenueClient>) -> Self {
        Self { client }
    }

    /// The venue's remaining permitted link operations for the
    /// subaccount's owner.
    ///
    /// # Errors
    /// `QueryFailed` on any venue or network error.
    pub async fn remaining(&self, subaccount: &Subaccount) -> SessionResult<SessionBudget> {
        let status = self
            .client
            .linked_signer_rate_limit(subaccount)
            .await
            .map_err(|e| SessionError::QueryFailed(e.to_string()))?;

        debug!(
            owner = %subaccount.truncated_owner(),
            remaining = status.remaining_txs,
            "Link budget fetched"
        );

        Ok(SessionBudget {
            owner: subaccount.owner,
            remaining: status.remaining_txs,
        })
    }
}
