//! Trading-venue gateway client.
//!
//! Wraps the venue's REST gateway behind the [`VenueClient`] trait:
//! `/query` for reads (subaccount info, open orders, linked-signer rate
//! limit, nonces) and `/execute` for signed actions (link a delegate
//! signer, place an order). Execute payloads are EIP-712 signed with
//! either the construction signer or, once installed, the linked
//! delegate signer.
//!
//! # Key components
//!
//! - [`VenueClient`]: the async client seam the session layer depends on
//! - [`RestVenueClient`]: reqwest-backed implementation
//! - [`VenueNetwork`]: per-network chain id, endpoint, and gateway constants
//! - [`OrderNonceGenerator`]: monotone venue order nonces

pub mod client;
pub mod eip712;
pub mod error;
pub mod network;
pub mod nonce;
pub mod wire;

pub use client::{RateLimitStatus, RestVenueClient, VenueClient, LINKED_SIGNER_NAME};
pub use eip712::{sign_execute, venue_domain};
pub use error::{VenueError, VenueResult};
pub use network::VenueNetwork;
pub use nonce::{Clock, OrderNonceGenerator, SystemClock};
