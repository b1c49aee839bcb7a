//! EIP-712 typed-data signing for venue execute payloads.
//!
//! The venue authenticates executes by recovering the signer of a typed
//! payload under its domain: `name = "Vertex"`, `version = "0.0.1"`,
//! chain id and verifying contract per network. Link authorizations are
//! signed by the primary wallet; orders by the linked delegate.

use crate::error::VenueResult;
use crate::network::VenueNetwork;
use alloy::primitives::PrimitiveSignature;
use alloy::sol;
use alloy::sol_types::{eip712_domain, Eip712Domain, SolStruct};
use onect_core::WalletProvider;

/// EIP-712 domain constants.
pub const EIP712_DOMAIN_NAME: &str = "Vertex";
pub const EIP712_DOMAIN_VERSION: &str = "0.0.1";

sol! {
    /// Authorization record naming a new linked signer for a subaccount.
    #[derive(Debug)]
    struct LinkSigner {
        bytes32 sender;
        bytes32 signer;
        uint64 nonce;
    }

    /// Order placement payload.
    #[derive(Debug)]
    struct Order {
        bytes32 sender;
        int128 priceX18;
        int128 amount;
        uint64 expiration;
        uint64 nonce;
    }
}

/// Build the venue's EIP-712 domain for a network.
#[must_use]
pub fn venue_domain(network: VenueNetwork) -> Eip712Domain {
    eip712_domain! {
        name: EIP712_DOMAIN_NAME,
        version: EIP712_DOMAIN_VERSION,
        chain_id: network.chain_id(),
        verifying_contract: network.endpoint_address(),
    }
}

/// Sign an execute payload under the venue domain.
///
/// # Errors
/// Propagates the wallet's signing error (rejection, unavailability).
pub async fn sign_execute<T: SolStruct + Sync>(
    wallet: &dyn WalletProvider,
    network: VenueNetwork,
    payload: &T,
) -> VenueResult<PrimitiveSignature> {
    // signing_hash = keccak256(0x1901 || domain_separator || struct_hash)
    let digest = payload.eip712_signing_hash(&venue_domain(network));
    Ok(wallet.sign_digest(digest).await?)
}
