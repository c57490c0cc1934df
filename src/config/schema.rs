//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files and
//! every section has defaults so a minimal file only names the network and
//! the contract addresses.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::registry::Network;

/// Root configuration for the client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct EightPayConfig {
    /// Network whose deployments and tokens are used.
    pub network: Network,

    /// JSON-RPC connection settings.
    pub blockchain: BlockchainConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,

    /// Contract addresses, keyed by network then contract name.
    pub deployments: BTreeMap<Network, BTreeMap<String, String>>,

    /// Extra tokens known to the units helper.
    pub tokens: Vec<TokenConfig>,
}

/// Blockchain connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BlockchainConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Expected chain ID; verified at connect time when set.
    pub chain_id: Option<u64>,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Confirmation events emitted after the receipt.
    pub confirmation_blocks: u32,

    /// Block polling interval while reporting confirmations.
    pub receipt_poll_interval_ms: u64,
}

impl Default for BlockchainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            chain_id: None,
            rpc_timeout_secs: 10,
            confirmation_blocks: 12,
            receipt_poll_interval_ms: 1000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
        }
    }
}

/// A token known to the units helper.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenConfig {
    /// Network the token lives on.
    pub network: Network,

    /// Ticker symbol (e.g. "USDT").
    pub symbol: String,

    /// Number of decimals of the base unit.
    pub decimals: u8,

    /// Token contract address.
    #[serde(default)]
    pub address: Option<String>,
}
