//! Link flow orchestration.
//!
//! `create_link` runs the whole sequence the UI triggers with one
//! action: switch network, enter `Linking`, derive the delegate key,
//! submit the authorization, commit or abort, and refresh the link
//! budget. Failures revert the state machine to `PrimaryConnected`;
//! nothing is retried automatically.

use std::sync::Arc;

use async_trait::async_trait;
use onect_core::{LinkResult, SessionBudget, Subaccount, WalletProvider};
use onect_venue::{RestVenueClient, VenueClient, VenueNetwork};
use tracing::{info, warn};

use crate::budget::BudgetTracker;
use crate::derive::derive_delegate_key;
use crate::error::{SessionError, SessionResult};
use crate::linker::SessionLinker;
use crate::state::SessionState;

/// Collaborator that moves the wallet provider to the required
/// network. Derivation and linking are network specific and must not
/// run before this completes.
#[async_trait]
pub trait NetworkSwitcher: Send + Sync {
    async fn switch_network(&self, network: VenueNetwork) -> SessionResult<()>;
}

/// For in-process keys there is nothing to switch; the seam exists for
/// embedders driving a wallet-provider UI.
pub struct NoopNetworkSwitcher;

#[async_trait]
impl NetworkSwitcher for NoopNetworkSwitcher {
    async fn switch_network(&self, _: VenueNetwork) -> SessionResult<()> {
        Ok(())
    }
}

/// Builds a venue client around the given signer. A fresh client is
/// constructed per link attempt, with the primary wallet as its
/// authorizing signer.
pub type VenueClientFactory =
    Arc<dyn Fn(Arc<dyn WalletProvider>) -> SessionResult<Arc<dyn VenueClient>> + Send + Sync>;

/// What a link attempt produced: the venue's verdict plus the
/// refreshed budget (when the advisory query succeeded).
#[derive(Debug)]
pub struct LinkOutcome {
    pub result: LinkResult,
    pub budget: Option<SessionBudget>,
}

pub struct SessionManager {
    network: VenueNetwork,
    state: Arc<SessionState>,
    switcher: Arc<dyn NetworkSwitcher>,
    client_factory: VenueClientFactory,
    budget: BudgetTracker,
}

impl SessionManager {
    pub fn new(
        network: VenueNetwork,
        state: Arc<SessionState>,
        switcher: Arc<dyn NetworkSwitcher>,
        client_factory: VenueClientFactory,
        budget: BudgetTracker,
    ) -> Self {
        Self {
            network,
            state,
            switcher,
            client_factory,
            budget,
        }
    }

    /// Production wiring: REST venue clients, no-op network switch.
    ///
    /// # Errors
    /// `QueryFailed` if the budget tracker's client cannot be built.
    pub fn for_network(network: VenueNetwork, state: Arc<SessionState>) -> SessionResult<Self> {
        let factory: VenueClientFactory = Arc::new(move |signer| {
            let client = RestVenueClient::new(network, signer)
                .map_err(|e| SessionError::LinkFailure(e.to_string()))?;
            Ok(Arc::new(client) as Arc<dyn VenueClient>)
        });
        Ok(Self::new(
            network,
            state,
            Arc::new(NoopNetworkSwitcher),
            factory,
            BudgetTracker::for_network(network)?,
        ))
    }

    #[must_use]
    pub fn state(&self) -> Arc<SessionState> {
        Arc::clone(&self.state)
    }

    /// Run the full link flow for the connected wallet's subaccount
    /// named `subaccount_name`.
    ///
    /// The budget is refreshed after the attempt regardless of its
    /// outcome; a failed budget query is logged and reported as `None`,
    /// never as an error of the link itself.
    pub async fn create_link(&self, subaccount_name: &str) -> SessionResult<LinkOutcome> {
        self.switcher.switch_network(self.network).await?;

        let primary = self.state.begin_link()?;
        let subaccount = match Subaccount::new(primary.address(), subaccount_name) {
            Ok(sub) => sub,
            Err(e) => {
                self.state.abort_link();
                return Err(SessionError::LinkFailure(e.to_string()));
            }
        };

        let attempt = self.attempt_link(&primary, &subaccount).await;
        let budget = self.refresh_budget(&subaccount).await;

        let result = attempt?;
        Ok(LinkOutcome { result, budget })
    }

    /// One link attempt; any non-success path reverts to
    /// `PrimaryConnected` before returning.
    async fn attempt_link(
        &self,
        primary: &Arc<dyn WalletProvider>,
        subaccount: &Subaccount,
    ) -> SessionResult<LinkResult> {
        let outcome = self.try_link(primary, subaccount).await;
        if !matches!(outcome, Ok(LinkResult::Success)) {
            self.state.abort_link();
        }
        outcome
    }

    async fn try_link(
        &self,
        primary: &Arc<dyn WalletProvider>,
        subaccount: &Subaccount,
    ) -> SessionResult<LinkResult> {
        let key = derive_delegate_key(self.network, subaccount, primary.as_ref()).await?;
        let delegate = Arc::new(key.into_signer()?);
        let delegate_address = delegate.address();

        let client = (self.client_factory)(Arc::clone(primary))?;
        let result = SessionLinker::link(client.as_ref(), subaccount, delegate_address).await?;

        if result.is_success() {
            // Every trading call from here on authenticates as the
            // delegate; the primary wallet is not prompted again.
            client.set_linked_signer(Some(delegate.clone() as Arc<dyn WalletProvider>));
            self.state.commit_link(delegate, client)?;
            info!(
                subaccount = %subaccount,
                delegate = %delegate_address,
                "Delegated trading session established"
            );
        }
        Ok(result)
    }

    async fn refresh_budget(&self, subaccount: &Subaccount) -> Option<SessionBudget> {
        match self.budget.remaining(subaccount).await {
            Ok(budget) => {
                info!(
                    owner = %subaccount.truncated_owner(),
                    remaining = budget.remaining,
                    "Remaining link budget"
                );
                Some(budget)
            }
            Err(e) => {
                warn!(error = %e, "Budget query failed");
                None
            }
        }
    }
}
