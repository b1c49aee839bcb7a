//! Per-network venue constants.
//!
//! The derived delegate key and the venue client are both network
//! specific: the chain id and endpoint address feed the EIP-712 domain
//! and the key-derivation message, so callers must switch networks
//! before deriving or linking.

use alloy::primitives::{address, Address};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Networks the venue operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VenueNetwork {
    /// Arbitrum Sepolia testnet.
    #[default]
    ArbitrumSepolia,
    /// Arbitrum One mainnet.
    ArbitrumOne,
}

impl VenueNetwork {
    #[must_use]
    pub fn chain_id(&self) -> u64 {
        match self {
            Self::ArbitrumSepolia => 421_614,
            Self::ArbitrumOne => 42_161,
        }
    }

    /// The venue's endpoint contract, used as the EIP-712 verifying
    /// contract and as an input to delegate key derivation.
    #[must_use]
    pub fn endpoint_address(&self) -> Address {
        match self {
            Self::ArbitrumSepolia => address!("adefde1a14b6ba4da3e82414209408a49930e8dc"),
            Self::ArbitrumOne => address!("bbee07b3e8121227afcfe1e2b82772246226128e"),
        }
    }

    /// Gateway REST base URL (`/query` and `/execute` live under it).
    #[must_use]
    pub fn gateway_url(&self) -> &'static str {
        match self {
            Self::ArbitrumSepolia => "https://gateway.sepolia-test.vertexprotocol.com/v1",
            Self::ArbitrumOne => "https://gateway.prod.vertexprotocol.com/v1",
        }
    }

    /// Chain RPC endpoint for signer construction.
    #[must_use]
    pub fn rpc_url(&self) -> &'static str {
        match self {
            Self::ArbitrumSepolia => "https://sepolia-rollup.arbitrum.io/rpc",
            Self::ArbitrumOne => "https://arb1.arbitrum.io/rpc",
        }
    }
}

impl fmt::Display for VenueNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ArbitrumSepolia => write!(f, "arbitrum-sepolia"),
            Self::ArbitrumOne => write!(f, "arbitrum-one"),
        }
    }
}

impl FromStr for VenueNetwork {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "arbitrum-sepolia" | "testnet" => Ok(Self::ArbitrumSepolia),
            "arbitrum-one" | "mainnet" => Ok(Self::ArbitrumOne),
            other => Err(format!("unknown network: {other}")),
        }
    }
}
