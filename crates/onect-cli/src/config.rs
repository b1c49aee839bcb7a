//! CLI configuration.

use crate::error::{CliError, CliResult};
use onect_venue::VenueNetwork;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration loaded from a TOML file; every field has a default so
/// the tool works with no file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// Venue network to operate on.
    #[serde(default)]
    pub network: VenueNetwork,

    /// Subaccount name under the connected wallet.
    #[serde(default = "default_subaccount_name")]
    pub subaccount_name: String,

    /// Product ids queried by the `orders` command when none are given.
    #[serde(default = "default_products")]
    pub products: Vec<u32>,

    /// Environment variable holding the primary wallet's private key.
    /// The key itself never appears in the config file.
    #[serde(default = "default_private_key_env")]
    pub private_key_env: String,
}

fn default_subaccount_name() -> String {
    "default".to_string()
}

fn default_products() -> Vec<u32> {
    vec![2, 4]
}

fn default_private_key_env() -> String {
    "ONECT_PRIVATE_KEY".to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            network: VenueNetwork::default(),
            subaccount_name: default_subaccount_name(),
            products: default_products(),
            private_key_env: default_private_key_env(),
        }
    }
}

impl CliConfig {
    /// Load configuration, falling back to defaults when the file does
    /// not exist.
    pub fn load(path: &str) -> CliResult<Self> {
        if Path::new(path).exists() {
            Self::from_file(path)
        } else {
            tracing::warn!(path = %path, "Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load from a specific file.
    pub fn from_file(path: &str) -> CliResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CliError::Config(format!("Failed to read config: {e}")))?;

        toml::from_str(&content).map_err(|e| CliError::Config(format!("Failed to parse config: {e}")))
    }
}
