//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the wallet
//! service. All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the wallet service.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WalletServiceConfig {
    /// Local HTTP API settings.
    pub api: ApiConfig,

    /// Where the encrypted wallet blob lives.
    pub storage: StorageConfig,

    /// Wallet-level behaviour (default blockchain for new wallets).
    pub wallet: WalletConfig,

    /// Blockchains attached to every wallet.
    pub blockchains: Vec<BlockchainConfig>,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for WalletServiceConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            storage: StorageConfig::default(),
            wallet: WalletConfig::default(),
            blockchains: vec![BlockchainConfig::default()],
            observability: ObservabilityConfig::default(),
        }
    }
}

impl WalletServiceConfig {
    /// Look up a configured blockchain by name.
    pub fn blockchain(&self, name: &str) -> Option<&BlockchainConfig> {
        self.blockchains.iter().find(|b| b.name == name)
    }
}

/// Local API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Bind address (e.g., "127.0.0.1:7545").
    pub bind_address: String,

    /// Optional bearer token required on every request.
    pub api_key: Option<String>,

    /// Request timeout in seconds. Covers RPC round trips made by transfers.
    pub request_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:7545".to_string(),
            api_key: None,
            request_timeout_secs: 60,
        }
    }
}

/// Storage backend selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Single JSON document on disk.
    File,
    /// Process memory only; the wallet is gone when the process exits.
    Memory,
}

/// Encrypted wallet storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Which key-value backend to use.
    pub backend: StorageBackend,

    /// Path of the JSON document for the file backend.
    pub path: String,

    /// PBKDF2 iterations used when encrypting the wallet.
    pub kdf_iterations: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            path: "wallet-storage.json".to_string(),
            kdf_iterations: 100_000,
        }
    }
}

/// Wallet behaviour.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WalletConfig {
    /// Blockchain that receives the first account when a wallet is created.
    pub default_blockchain: String,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            default_blockchain: "ethereum".to_string(),
        }
    }
}

/// Per-chain configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BlockchainConfig {
    /// Identifier used by the API (lowercase, e.g. "ethereum", "sepolia").
    pub name: String,

    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs.
    pub failover_urls: Vec<String>,

    /// Chain ID (e.g., 1 for Ethereum mainnet, 31337 for local Anvil).
    pub chain_id: u64,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// BIP-44 coin type used for account derivation (60 for Ethereum).
    pub coin_type: u32,

    /// Gas price multiplier (1.0 = node estimate, 1.2 = 20% buffer).
    pub gas_price_multiplier: f64,

    /// Maximum gas price in gwei (protection against spikes).
    pub max_gas_price_gwei: u64,
}

impl Default for BlockchainConfig {
    fn default() -> Self {
        Self {
            name: "ethereum".to_string(),
            rpc_url: "http://localhost:8545".to_string(),
            failover_urls: Vec::new(),
            chain_id: 1,
            rpc_timeout_secs: 10,
            coin_type: 60,
            gas_price_multiplier: 1.2,
            max_gas_price_gwei: 500,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines instead of the pretty format.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
