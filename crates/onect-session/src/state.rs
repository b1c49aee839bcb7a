//! Session state machine.
//!
//! `Disconnected → PrimaryConnected → Linking → Linked`, with wallet
//! disconnect as the single unconditional teardown path from any
//! phase. The delegate signer and trading client are published
//! immutable-after-commit and only ever replaced wholesale, so readers
//! never observe a half-updated signer. Every publish or teardown bumps
//! an epoch; in-flight venue calls compare epochs afterwards and
//! discard late responses from a superseded session.

use std::sync::Arc;

use onect_core::{Address, WalletProvider};
use onect_venue::VenueClient;
use parking_lot::RwLock;
use tracing::debug;

use crate::error::{SessionError, SessionResult};

/// Lifecycle phase of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Disconnected,
    PrimaryConnected,
    Linking,
    Linked,
}

struct Inner {
    phase: SessionPhase,
    primary: Option<Arc<dyn WalletProvider>>,
    delegate: Option<Arc<dyn WalletProvider>>,
    client: Option<Arc<dyn VenueClient>>,
    epoch: u64,
}

impl Inner {
    /// Unconditional full clear. Never partial.
    fn teardown(&mut self) {
        self.phase = SessionPhase::Disconnected;
        self.primary = None;
        self.delegate = None;
        self.client = None;
        self.epoch += 1;
    }
}

/// Snapshot handed to the trading gateway: the published client and
/// delegate plus the epoch they were published under.
#[derive(Clone)]
pub struct TradingHandle {
    pub client: Arc<dyn VenueClient>,
    pub delegate: Arc<dyn WalletProvider>,
    pub epoch: u64,
}

/// Owned, explicit session state, injected into each component.
///
/// No lock is held across an await; all venue I/O happens outside the
/// critical sections here.
pub struct SessionState {
    inner: RwLock<Inner>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                phase: SessionPhase::Disconnected,
                primary: None,
                delegate: None,
                client: None,
                epoch: 0,
            }),
        }
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.inner.read().phase
    }

    /// The connected primary wallet, if any.
    #[must_use]
    pub fn primary(&self) -> Option<Arc<dyn WalletProvider>> {
        self.inner.read().primary.clone()
    }

    /// Address of the currently linked delegate, for display.
    #[must_use]
    pub fn delegate_address(&self) -> Option<Address> {
        self.inner.read().delegate.as_ref().map(|d| d.address())
    }

    /// Wallet-provider connect. A connect while already connected is a
    /// wallet switch and behaves as disconnect + connect: any previous
    /// delegate is stale without its primary and is discarded.
    pub fn connect(&self, primary: Arc<dyn WalletProvider>) {
        let mut inner = self.inner.write();
        inner.teardown();
        debug!(address = %primary.address(), "Primary wallet connected");
        inner.primary = Some(primary);
        inner.phase = SessionPhase::PrimaryConnected;
    }

    /// Wallet-provider disconnect: the single forced teardown path.
    /// Synchronously clears derived key material, delegate signer, and
    /// the trading client in one critical section.
    pub fn disconnect(&self) {
        let mut inner = self.inner.write();
        debug!("Session teardown");
        inner.teardown();
    }

    /// Enter `Linking`, returning the primary wallet the flow needs.
    ///
    /// Allowed from `PrimaryConnected` and from `Linked` (re-linking
    /// supersedes the old delegate, which is discarded up front).
    ///
    /// # Errors
    /// - `SigningUnavailable` when no wallet is connected
    /// - `LinkInFlight` when another attempt is already running
    pub fn begin_link(&self) -> SessionResult<Arc<dyn WalletProvider>> {
        let mut inner = self.inner.write();
        match inner.phase {
            SessionPhase::Disconnected => Err(SessionError::SigningUnavailable),
            SessionPhase::Linking => Err(SessionError::LinkInFlight),
            SessionPhase::PrimaryConnected | SessionPhase::Linked => {
                let was_linked = inner.phase == SessionPhase::Linked;
                inner.phase = SessionPhase::Linking;
                inner.delegate = None;
                inner.client = None;
                if was_linked {
                    // The published session is gone; invalidate readers.
                    inner.epoch += 1;
                }
                inner
                    .primary
                    .clone()
                    .ok_or(SessionError::SigningUnavailable)
            }
        }
    }

    /// Publish the delegate and trading client; only valid from
    /// `Linking` (a disconnect may have raced the link).
    pub fn commit_link(
        &self,
        delegate: Arc<dyn WalletProvider>,
        client: Arc<dyn VenueClient>,
    ) -> SessionResult<()> {
        let mut inner = self.inner.write();
        if inner.phase != SessionPhase::Linking {
            return Err(SessionError::InvalidTransition("commit outside Linking"));
        }
        inner.delegate = Some(delegate);
        inner.client = Some(client);
        inner.phase = SessionPhase::Linked;
        inner.epoch += 1;
        Ok(())
    }

    /// Revert `Linking → PrimaryConnected`, dropping the delegate.
    /// No-op in any other phase (a racing disconnect wins).
    pub fn abort_link(&self) {
        let mut inner = self.inner.write();
        if inner.phase == SessionPhase::Linking {
            inner.delegate = None;
            inner.client = None;
            inner.phase = SessionPhase::PrimaryConnected;
        }
    }

    /// Snapshot for a trading operation.
    ///
    /// # Errors
    /// `NoActiveSession` unless the session is `Linked` with both a
    /// primary and a delegate present.
    pub fn trading_handle(&self) -> SessionResult<TradingHandle> {
        let inner = self.inner.read();
        if inner.phase != SessionPhase::Linked || inner.primary.is_none() {
            return Err(SessionError::NoActiveSession);
        }
        match (&inner.delegate, &inner.client) {
            (Some(delegate), Some(client)) => Ok(TradingHandle {
                client: Arc::clone(client),
                delegate: Arc::clone(delegate),
                epoch: inner.epoch,
            }),
            _ => Err(SessionError::NoActiveSession),
        }
    }

    /// Whether a snapshot taken at `epoch` still describes the live
    /// session.
    #[must_use]
    pub fn is_current(&self, epoch: u64) -> bool {
        let inner = self.inner.read();
        inner.phase == SessionPhase::Linked && inner.epoch == epoch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{PrimitiveSignature, B256};
    use async_trait::async_trait;
    use onect_core::{
        AccountSummary, LinkResult, LocalWallet, OpenOrdersResult, OrderReceipt, OrderRequest,
        Subaccount, WalletError,
    };
    use onect_venue::{client::RateLimitStatus, VenueResult};

    // Well-known test private key (DO NOT use in production).
    const TEST_PRIVATE_KEY: &str =
        "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn wallet() -> Arc<dyn WalletProvider> {
        Arc::new(LocalWallet::from_hex(TEST_PRIVATE_KEY).unwrap())
    }

    /// Client stub for state-machine tests; no call ever reaches it.
    struct InertVenue;

    #[async_trait]
    impl VenueClient for InertVenue {
        fn signer_address(&self) -> Address {
            Address::ZERO
        }

        fn set_linked_signer(&self, _: Option<Arc<dyn WalletProvider>>) {}

        async fn link_signer(&self, _: &Subaccount, _: Address) -> VenueResult<LinkResult> {
            unreachable!("state tests never hit the venue")
        }

        async fn linked_signer_rate_limit(&self, _: &Subaccount) -> VenueResult<RateLimitStatus> {
            unreachable!()
        }

        async fn subaccount_info(&self, _: &Subaccount) -> VenueResult<AccountSummary> {
            unreachable!()
        }

        async fn open_orders(&self, _: &Subaccount, _: &[u32]) -> VenueResult<OpenOrdersResult> {
            unreachable!()
        }

        async fn place_order(&self, _: &OrderRequest) -> VenueResult<OrderReceipt> {
            unreachable!()
        }
    }

    struct RejectingWallet;

    #[async_trait]
    impl WalletProvider for RejectingWallet {
        fn address(&self) -> Address {
            Address::ZERO
        }

        async fn sign_message(&self, _: &[u8]) -> Result<PrimitiveSignature, WalletError> {
            Err(WalletError::Rejected)
        }

        async fn sign_digest(&self, _: B256) -> Result<PrimitiveSignature, WalletError> {
            Err(WalletError::Rejected)
        }
    }

    fn linked_state() -> SessionState {
        let state = SessionState::new();
        state.connect(wallet());
        state.begin_link().unwrap();
        state
            .commit_link(Arc::new(RejectingWallet), Arc::new(InertVenue))
            .unwrap();
        state
    }

    #[test]
    fn test_initial_phase_is_disconnected() {
        let state = SessionState::new();
        assert_eq!(state.phase(), SessionPhase::Disconnected);
        assert!(matches!(
            state.trading_handle(),
            Err(SessionError::NoActiveSession)
        ));
    }

    #[test]
    fn test_begin_link_requires_wallet() {
        let state = SessionState::new();
        assert!(matches!(
            state.begin_link(),
            Err(SessionError::SigningUnavailable)
        ));
    }

    #[test]
    fn test_second_link_attempt_rejected_while_in_flight() {
        let state = SessionState::new();
        state.connect(wallet());
        state.begin_link().unwrap();
        assert!(matches!(state.begin_link(), Err(SessionError::LinkInFlight)));
    }

    #[test]
    fn test_no_linked_phase_without_commit() {
        let state = SessionState::new();
        state.connect(wallet());
        state.begin_link().unwrap();
        assert_eq!(state.phase(), SessionPhase::Linking);
        assert!(state.trading_handle().is_err());

        state.abort_link();
        assert_eq!(state.phase(), SessionPhase::PrimaryConnected);
        assert!(state.trading_handle().is_err());
        assert!(state.delegate_address().is_none());
    }

    #[test]
    fn test_commit_enables_trading_handle() {
        let state = linked_state();
        assert_eq!(state.phase(), SessionPhase::Linked);
        let handle = state.trading_handle().unwrap();
        assert!(state.is_current(handle.epoch));
    }

    #[test]
    fn test_commit_outside_linking_rejected() {
        let state = SessionState::new();
        state.connect(wallet());
        let result = state.commit_link(Arc::new(RejectingWallet), Arc::new(InertVenue));
        assert!(matches!(result, Err(SessionError::InvalidTransition(_))));
    }

    #[test]
    fn test_disconnect_clears_everything() {
        let state = linked_state();
        let handle = state.trading_handle().unwrap();

        state.disconnect();
        assert_eq!(state.phase(), SessionPhase::Disconnected);
        assert!(state.primary().is_none());
        assert!(state.delegate_address().is_none());
        assert!(state.trading_handle().is_err());
        // The pre-disconnect snapshot is stale.
        assert!(!state.is_current(handle.epoch));
    }

    #[test]
    fn test_reconnect_starts_clean() {
        let state = linked_state();
        state.disconnect();
        state.connect(wallet());
        assert_eq!(state.phase(), SessionPhase::PrimaryConnected);
        assert!(state.delegate_address().is_none());
        assert!(matches!(
            state.trading_handle(),
            Err(SessionError::NoActiveSession)
        ));
    }

    #[test]
    fn test_relink_supersedes_old_delegate() {
        let state = linked_state();
        let old = state.trading_handle().unwrap();

        // Re-link from Linked: old session is invalidated immediately.
        state.begin_link().unwrap();
        assert!(!state.is_current(old.epoch));
        assert!(state.trading_handle().is_err());

        state
            .commit_link(Arc::new(RejectingWallet), Arc::new(InertVenue))
            .unwrap();
        let new = state.trading_handle().unwrap();
        assert_ne!(new.epoch, old.epoch);
    }

    #[test]
    fn test_connect_while_linked_is_wallet_switch() {
        let state = linked_state();
        state.connect(wallet());
        assert_eq!(state.phase(), SessionPhase::PrimaryConnected);
        assert!(state.delegate_address().is_none());
    }

    #[test]
    fn test_abort_is_noop_after_disconnect() {
        let state = SessionState::new();
        state.connect(wallet());
        state.begin_link().unwrap();
        state.disconnect();
        state.abort_link();
        assert_eq!(state.phase(), SessionPhase::Disconnected);
    }
}
