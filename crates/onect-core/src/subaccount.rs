//! Subaccount identity and its venue wire encoding.
//!
//! The venue addresses every trading ledger as a bytes32 "sender":
//! the 20-byte owner address followed by the subaccount name, zero
//! padded to 32 bytes. Uniqueness of (owner, name) is enforced by the
//! venue, not locally.

use crate::error::{CoreError, Result};
use alloy::primitives::{Address, B256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum subaccount name length in bytes (the bytes32 layout leaves
/// 12 bytes after the owner address).
pub const SUBACCOUNT_NAME_MAX_BYTES: usize = 12;

/// A named trading ledger under one owning address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Subaccount {
    pub owner: Address,
    pub name: String,
}

impl Subaccount {
    /// Create a subaccount reference, validating the name length.
    ///
    /// # Errors
    /// Returns `CoreError::InvalidSubaccountName` if the name exceeds
    /// 12 bytes (the bytes32 encoding cannot hold it).
    pub fn new(owner: Address, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.len() > SUBACCOUNT_NAME_MAX_BYTES {
            return Err(CoreError::InvalidSubaccountName(format!(
                "{} is {} bytes, max {}",
                name,
                name.len(),
                SUBACCOUNT_NAME_MAX_BYTES
            )));
        }
        Ok(Self { owner, name })
    }

    /// Pack into the venue's bytes32 sender encoding:
    /// owner (20 bytes) || name bytes || zero padding.
    #[must_use]
    pub fn to_bytes32(&self) -> B256 {
        let mut out = [0u8; 32];
        out[..20].copy_from_slice(self.owner.as_slice());
        out[20..20 + self.name.len()].copy_from_slice(self.name.as_bytes());
        B256::from(out)
    }

    /// Hex rendering of the bytes32 sender, `0x` prefixed.
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_bytes32()))
    }

    /// Owner address shortened for display. Never used for comparison
    /// or storage.
    #[must_use]
    pub fn truncated_owner(&self) -> String {
        truncate_address(&self.owner)
    }
}

impl fmt::Display for Subaccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Shorten an address to its first 10 hex characters for display.
#[must_use]
pub fn truncate_address(address: &Address) -> String {
    let full = address.to_string();
    format!("{}...", &full[..10.min(full.len())])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> Address {
        "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"
            .parse()
            .unwrap()
    }

    #[test]
    fn test_bytes32_layout() {
        let sub = Subaccount::new(owner(), "default").unwrap();
        let bytes = sub.to_bytes32();

        assert_eq!(&bytes[..20], owner().as_slice());
        assert_eq!(&bytes[20..27], b"default");
        assert_eq!(&bytes[27..], &[0u8; 5]);
    }

    #[test]
    fn test_empty_name_is_valid() {
        let sub = Subaccount::new(owner(), "").unwrap();
        let bytes = sub.to_bytes32();
        assert_eq!(&bytes[20..], &[0u8; 12]);
    }

    #[test]
    fn test_name_too_long_rejected() {
        let result = Subaccount::new(owner(), "thirteen-byte");
        assert!(matches!(
            result,
            Err(CoreError::InvalidSubaccountName(_))
        ));
    }

    #[test]
    fn test_hex_rendering() {
        let sub = Subaccount::new(owner(), "default").unwrap();
        let hex = sub.to_hex();
        assert!(hex.starts_with("0xaaaaaaaa"));
        assert_eq!(hex.len(), 66);
    }

    #[test]
    fn test_truncated_owner_is_display_only() {
        let sub = Subaccount::new(owner(), "default").unwrap();
        let short = sub.truncated_owner();
        assert_eq!(short.len(), 13); // 10 chars + "..."
        assert!(short.starts_with("0x"));
        // The full owner is untouched.
        assert_eq!(sub.owner, owner());
    }
}
