//! Blockchain RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to JSON-RPC endpoint(s) with failover
//! - Query chain state (chain id, block number, balances, nonces, gas price)
//! - Submit signed raw transactions
//! - Handle timeouts and network errors gracefully

use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::transports::TransportError;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::blockchain::types::{BlockchainConfig, BlockchainError, BlockchainResult, ChainId};
use crate::observability::metrics;

/// The RPC surface accounts need from a chain.
///
/// `BlockchainClient` talks to real nodes; tests substitute a scripted client.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Get the chain ID reported by the node.
    async fn get_chain_id(&self) -> BlockchainResult<ChainId>;

    /// Get the latest block number.
    async fn get_block_number(&self) -> BlockchainResult<u64>;

    /// Get the balance of an address in base units.
    async fn get_balance(&self, address: Address) -> BlockchainResult<U256>;

    /// Get the transaction count (nonce) for an address.
    async fn get_transaction_count(&self, address: Address) -> BlockchainResult<u64>;

    /// Get current gas price in wei.
    async fn get_gas_price(&self) -> BlockchainResult<u128>;

    /// Broadcast an EIP-2718 encoded signed transaction.
    async fn send_raw_transaction(&self, raw: Bytes) -> BlockchainResult<TxHash>;
}

/// Blockchain RPC client wrapper with failover support.
#[derive(Clone)]
pub struct BlockchainClient {
    /// List of providers (primary + failovers).
    providers: Vec<Arc<dyn Provider + Send + Sync>>,
    /// Configuration.
    config: BlockchainConfig,
    /// Request timeout duration.
    timeout_duration: Duration,
}

impl BlockchainClient {
    /// Create a new blockchain client.
    ///
    /// No request is made here; see [`ChainModule::verify_chain_id`] for a
    /// connectivity check.
    ///
    /// [`ChainModule::verify_chain_id`]: crate::blockchain::ChainModule::verify_chain_id
    pub fn new(config: BlockchainConfig) -> BlockchainResult<Self> {
        let timeout_duration = Duration::from_secs(config.rpc_timeout_secs);
        let mut providers = Vec::new();

        // 1. Add primary provider
        let primary_url: url::Url = config.rpc_url.parse().map_err(|e| {
            BlockchainError::Rpc(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;
        providers.push(Arc::new(ProviderBuilder::new().connect_http(primary_url)) as Arc<dyn Provider + Send + Sync>);

        // 2. Add failover providers
        for url_str in &config.failover_urls {
            if let Ok(url) = url_str.parse() {
                providers.push(Arc::new(ProviderBuilder::new().connect_http(url)) as Arc<dyn Provider + Send + Sync>);
            } else {
                tracing::warn!(url = %url_str, "Ignoring invalid failover RPC URL");
            }
        }

        Ok(Self {
            providers,
            config,
            timeout_duration,
        })
    }

    /// Get the configuration.
    pub fn config(&self) -> &BlockchainConfig {
        &self.config
    }

    fn log_failure(&self, provider_idx: usize, error: &TransportError) {
        metrics::record_rpc_error(&self.config.name);
        tracing::warn!(
            blockchain = %self.config.name,
            provider_idx = provider_idx,
            error = %error,
            "RPC error, trying next provider"
        );
    }

    fn log_timeout(&self, provider_idx: usize) {
        metrics::record_rpc_error(&self.config.name);
        tracing::warn!(
            blockchain = %self.config.name,
            provider_idx = provider_idx,
            "RPC timeout, trying next provider"
        );
    }

    /// Error for a call no provider answered, built from the last failure.
    ///
    /// A JSON-RPC error object keeps its code. When every provider timed out
    /// there is no failure to report, only the timeout.
    fn exhausted(&self, operation: &str, last_error: Option<TransportError>) -> BlockchainError {
        match last_error {
            Some(e) => match e.as_error_resp() {
                Some(payload) => BlockchainError::RpcResponse {
                    code: payload.code,
                    message: payload.message.to_string(),
                },
                None => BlockchainError::Rpc(format!("Failed to {}: {}", operation, e)),
            },
            None => BlockchainError::Timeout(self.config.rpc_timeout_secs),
        }
    }
}

#[async_trait]
impl ChainClient for BlockchainClient {
    async fn get_chain_id(&self) -> BlockchainResult<ChainId> {
        let mut last_error = None;
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_chain_id();
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(result)) => return Ok(ChainId(result)),
                Ok(Err(e)) => {
                    self.log_failure(i, &e);
                    last_error = Some(e);
                }
                Err(_) => self.log_timeout(i),
            }
        }
        Err(self.exhausted("get chain id", last_error))
    }

    async fn get_block_number(&self) -> BlockchainResult<u64> {
        let mut last_error = None;
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_block_number();
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => {
                    self.log_failure(i, &e);
                    last_error = Some(e);
                }
                Err(_) => self.log_timeout(i),
            }
        }
        Err(self.exhausted("get block number", last_error))
    }

    async fn get_balance(&self, address: Address) -> BlockchainResult<U256> {
        let mut last_error = None;
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_balance(address);
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => {
                    self.log_failure(i, &e);
                    last_error = Some(e);
                }
                Err(_) => self.log_timeout(i),
            }
        }
        Err(self.exhausted("get balance", last_error))
    }

    async fn get_transaction_count(&self, address: Address) -> BlockchainResult<u64> {
        let mut last_error = None;
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_transaction_count(address);
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => {
                    self.log_failure(i, &e);
                    last_error = Some(e);
                }
                Err(_) => self.log_timeout(i),
            }
        }
        Err(self.exhausted("get transaction count", last_error))
    }

    async fn get_gas_price(&self) -> BlockchainResult<u128> {
        let mut last_error = None;
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_gas_price();
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => {
                    self.log_failure(i, &e);
                    last_error = Some(e);
                }
                Err(_) => self.log_timeout(i),
            }
        }
        Err(self.exhausted("get gas price", last_error))
    }

    async fn send_raw_transaction(&self, raw: Bytes) -> BlockchainResult<TxHash> {
        let mut last_error = None;
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.send_raw_transaction(raw.as_ref());
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(pending)) => return Ok(*pending.tx_hash()),
                Ok(Err(e)) => {
                    // A node that rejected the transaction has seen it; another
                    // provider would reject it too.
                    if let Some(payload) = e.as_error_resp() {
                        return Err(BlockchainError::RpcResponse {
                            code: payload.code,
                            message: payload.message.to_string(),
                        });
                    }
                    self.log_failure(i, &e);
                    last_error = Some(e);
                }
                Err(_) => self.log_timeout(i),
            }
        }
        Err(self.exhausted("send transaction", last_error))
    }
}

impl std::fmt::Debug for BlockchainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockchainClient")
            .field("name", &self.config.name)
            .field("rpc_url", &self.config.rpc_url)
            .field("chain_id", &self.config.chain_id)
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}
