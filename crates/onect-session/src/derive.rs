//! Deterministic delegate key derivation.
//!
//! The delegate private key is `keccak256` of the primary wallet's
//! EIP-191 signature over a canonical message naming the chain, the
//! venue endpoint, and the subaccount. The signature request never
//! touches chain state and costs no gas; derivation happens entirely
//! client side and no key is ever transmitted.
//!
//! Determinism: the signing scheme is deterministic (RFC 6979), so the
//! same wallet and the same inputs reproduce the same signature and
//! therefore the same delegate key, so a user can recover their
//! delegate after clearing local state.

use std::fmt;

use alloy::primitives::keccak256;
use onect_core::{LocalWallet, Subaccount, WalletProvider};
use onect_venue::VenueNetwork;
use zeroize::Zeroizing;

use crate::error::{SessionError, SessionResult};

/// The canonical message the primary wallet signs.
///
/// Every field that scopes the delegate (chain, endpoint, subaccount
/// identity) appears verbatim; changing any of them derives a
/// different key.
#[must_use]
pub fn derivation_message(network: VenueNetwork, subaccount: &Subaccount) -> String {
    format!(
        "Link a signer for one-click trading.\n\
         \n\
         Chain ID: {}\n\
         Endpoint: {}\n\
         Subaccount owner: {}\n\
         Subaccount name: {}",
        network.chain_id(),
        network.endpoint_address(),
        subaccount.owner,
        subaccount.name,
    )
}

/// 32 bytes of derived delegate key. Held only in process memory and
/// zeroized on drop.
pub struct DelegateKeyMaterial(Zeroizing<[u8; 32]>);

impl DelegateKeyMaterial {
    /// One-way transform from signature bytes to key bytes.
    #[must_use]
    pub fn from_signature(signature_bytes: &[u8]) -> Self {
        Self(Zeroizing::new(keccak256(signature_bytes).0))
    }

    /// Build the delegate signing wallet, consuming the key material.
    ///
    /// # Errors
    /// Returns `SessionError::LinkFailure` in the (cryptographically
    /// negligible) case the bytes are not a valid key.
    pub fn into_signer(self) -> SessionResult<LocalWallet> {
        LocalWallet::from_bytes(self.0.as_ref())
            .map_err(|e| SessionError::LinkFailure(e.to_string()))
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

// Never expose key bytes through Debug.
impl fmt::Debug for DelegateKeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DelegateKeyMaterial(..)")
    }
}

/// Derive the delegate key for `subaccount` on `network`.
///
/// # Errors
/// - `SigningRejected` if the wallet declines to sign
/// - `SigningUnavailable` if no wallet is connected
pub async fn derive_delegate_key(
    network: VenueNetwork,
    subaccount: &Subaccount,
    primary: &dyn WalletProvider,
) -> SessionResult<DelegateKeyMaterial> {
    let message = derivation_message(network, subaccount);
    let signature = primary.sign_message(message.as_bytes()).await?;
    Ok(DelegateKeyMaterial::from_signature(&signature.as_bytes()))
}
