//! Wallet signing abstraction.
//!
//! `WalletProvider` is the capability a connected wallet supplies: an
//! address plus message/digest signing. The session core only ever
//! consumes signatures through this trait; it never constructs
//! transactions for linking.
//!
//! Security notes:
//! - Private keys live inside `PrivateKeySigner`, which handles secure memory.
//! - Never log key material or signatures.

use alloy::primitives::{Address, B256, PrimitiveSignature};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::Signer as AlloySigner;
use async_trait::async_trait;
use thiserror::Error;
use zeroize::Zeroizing;

/// Wallet signing errors.
#[derive(Debug, Error)]
pub enum WalletError {
    /// The wallet declined to sign.
    #[error("Signing rejected by wallet")]
    Rejected,

    /// No wallet is connected.
    #[error("No wallet available")]
    Unavailable,

    #[error("Failed to decode hex key: {0}")]
    HexDecode(#[from] hex::FromHexError),

    #[error("Invalid private key: {0}")]
    InvalidKey(String),

    #[error("Wallet error: {0}")]
    Other(String),
}

/// Signing capability bound to one address.
///
/// Message signing is EIP-191 (personal sign): it never costs gas and
/// never touches chain state. Digest signing covers EIP-712 execute
/// payloads.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// The address this wallet signs as.
    fn address(&self) -> Address;

    /// Sign a human-readable message (EIP-191).
    async fn sign_message(&self, message: &[u8]) -> Result<PrimitiveSignature, WalletError>;

    /// Sign a precomputed EIP-712 signing hash.
    async fn sign_digest(&self, digest: B256) -> Result<PrimitiveSignature, WalletError>;
}

/// In-process wallet backed by a local secp256k1 key.
///
/// Used for delegate signers, the throwaway budget signer, and the CLI's
/// primary key. Signatures are deterministic (RFC 6979), which the
/// delegate derivation relies on.
#[derive(Debug, Clone)]
pub struct LocalWallet {
    signer: PrivateKeySigner,
}

impl LocalWallet {
    /// Parse a hex-encoded private key (`0x` prefix and surrounding
    /// whitespace tolerated).
    ///
    /// # Errors
    /// Returns `WalletError` on bad hex or an invalid key.
    pub fn from_hex(hex_key: &str) -> Result<Self, WalletError> {
        let trimmed = hex_key.trim().trim_start_matches("0x");
        let secret_bytes: Zeroizing<Vec<u8>> = Zeroizing::new(hex::decode(trimmed)?);
        Self::from_bytes(&secret_bytes)
    }

    /// Build from raw key bytes.
    ///
    /// # Errors
    /// Returns `WalletError::InvalidKey` if the bytes are not a valid
    /// secp256k1 scalar.
    pub fn from_bytes(secret_bytes: &[u8]) -> Result<Self, WalletError> {
        let signer = PrivateKeySigner::from_slice(secret_bytes)
            .map_err(|e| WalletError::InvalidKey(e.to_string()))?;
        Ok(Self { signer })
    }

    /// Load the key from an environment variable.
    ///
    /// # Errors
    /// Returns `WalletError::Unavailable` if the variable is unset.
    pub fn from_env(var_name: &str) -> Result<Self, WalletError> {
        let hex = std::env::var(var_name).map_err(|_| WalletError::Unavailable)?;
        Self::from_hex(&hex)
    }

    #[must_use]
    pub fn address(&self) -> Address {
        self.signer.address()
    }
}

#[async_trait]
impl WalletProvider for LocalWallet {
    fn address(&self) -> Address {
        self.signer.address()
    }

    async fn sign_message(&self, message: &[u8]) -> Result<PrimitiveSignature, WalletError> {
        self.signer
            .sign_message(message)
            .await
            .map_err(|e| WalletError::Other(e.to_string()))
    }

    async fn sign_digest(&self, digest: B256) -> Result<PrimitiveSignature, WalletError> {
        self.signer
            .sign_hash(&digest)
            .await
            .map_err(|e| WalletError::Other(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Well-known test private key (DO NOT use in production).
    const TEST_PRIVATE_KEY: &str =
        "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_from_hex_tolerates_prefix_and_whitespace() {
        let a = LocalWallet::from_hex(TEST_PRIVATE_KEY).unwrap();
        let b = LocalWallet::from_hex(&format!(
            "  {}\n",
            TEST_PRIVATE_KEY.trim_start_matches("0x")
        ))
        .unwrap();
        assert_eq!(a.address(), b.address());
    }

    #[test]
    fn test_invalid_key_rejected() {
        assert!(matches!(
            LocalWallet::from_hex("0x00"),
            Err(WalletError::InvalidKey(_))
        ));
        assert!(matches!(
            LocalWallet::from_hex("not-hex"),
            Err(WalletError::HexDecode(_))
        ));
    }

    #[tokio::test]
    async fn test_message_signatures_are_deterministic() {
        let wallet = LocalWallet::from_hex(TEST_PRIVATE_KEY).unwrap();
        let sig1 = wallet.sign_message(b"hello").await.unwrap();
        let sig2 = wallet.sign_message(b"hello").await.unwrap();
        assert_eq!(sig1.as_bytes(), sig2.as_bytes());
    }
}
