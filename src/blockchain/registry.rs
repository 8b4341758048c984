//! Configured blockchains and their RPC clients.
//!
//! A wallet attaches every module in the registry: accounts derived for a
//! blockchain share the module's client and configuration.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::blockchain::client::{BlockchainClient, ChainClient};
use crate::blockchain::types::{Blockchain, BlockchainConfig, BlockchainError, BlockchainResult};
use crate::observability::metrics;

/// One attached blockchain: identity, settings and RPC access.
pub struct ChainModule {
    blockchain: Blockchain,
    config: BlockchainConfig,
    client: Arc<dyn ChainClient>,
}

impl ChainModule {
    pub fn new(config: BlockchainConfig, client: Arc<dyn ChainClient>) -> Self {
        Self {
            blockchain: Blockchain::new(&config.name),
            config,
            client,
        }
    }

    pub fn blockchain(&self) -> &Blockchain {
        &self.blockchain
    }

    pub fn config(&self) -> &BlockchainConfig {
        &self.config
    }

    pub fn client(&self) -> &Arc<dyn ChainClient> {
        &self.client
    }

    pub fn chain_id(&self) -> u64 {
        self.config.chain_id
    }

    /// Verify the connected chain ID matches configuration.
    pub async fn verify_chain_id(&self) -> BlockchainResult<()> {
        let chain_id = self.client.get_chain_id().await?;
        if chain_id.0 != self.config.chain_id {
            return Err(BlockchainError::ChainMismatch {
                expected: self.config.chain_id,
                actual: chain_id.0,
            });
        }
        Ok(())
    }

    /// Check if the blockchain is reachable.
    ///
    /// Returns true if we can query the block number.
    pub async fn is_healthy(&self) -> bool {
        let healthy = self.client.get_block_number().await.is_ok();
        metrics::record_rpc_health(self.blockchain.as_str(), healthy);
        healthy
    }
}

impl std::fmt::Debug for ChainModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainModule")
            .field("blockchain", &self.blockchain)
            .field("chain_id", &self.config.chain_id)
            .finish()
    }
}

/// All blockchains the service supports.
#[derive(Debug, Clone, Default)]
pub struct ChainRegistry {
    modules: BTreeMap<Blockchain, Arc<ChainModule>>,
}

impl ChainRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build alloy-backed clients for every configured blockchain.
    pub fn from_config(configs: &[BlockchainConfig]) -> BlockchainResult<Self> {
        let mut registry = Self::new();
        for config in configs {
            let client = BlockchainClient::new(config.clone())?;
            registry.register(ChainModule::new(config.clone(), Arc::new(client)));
        }
        Ok(registry)
    }

    /// Add or replace a module.
    pub fn register(&mut self, module: ChainModule) {
        tracing::debug!(blockchain = %module.blockchain(), chain_id = module.chain_id(), "Blockchain registered");
        self.modules
            .insert(module.blockchain().clone(), Arc::new(module));
    }

    pub fn get(&self, blockchain: &Blockchain) -> Option<&Arc<ChainModule>> {
        self.modules.get(blockchain)
    }

    /// Like [`ChainRegistry::get`] but with an error for unknown chains.
    pub fn require(&self, blockchain: &Blockchain) -> BlockchainResult<&Arc<ChainModule>> {
        self.get(blockchain)
            .ok_or_else(|| BlockchainError::NotAvailable(blockchain.to_string()))
    }

    pub fn modules(&self) -> impl Iterator<Item = &Arc<ChainModule>> {
        self.modules.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(name: &str, chain_id: u64) -> BlockchainConfig {
        BlockchainConfig {
            name: name.to_string(),
            chain_id,
            ..BlockchainConfig::default()
        }
    }

    #[test]
    fn test_from_config() {
        let registry =
            ChainRegistry::from_config(&[config("ethereum", 1), config("sepolia", 11155111)])
                .unwrap();
        let names: Vec<&Blockchain> = registry.modules().map(|m| m.blockchain()).collect();
        assert_eq!(names, vec![&Blockchain::new("ethereum"), &Blockchain::new("sepolia")]);
        assert_eq!(registry.require(&"sepolia".into()).unwrap().chain_id(), 11155111);
    }

    #[test]
    fn test_unknown_blockchain() {
        let registry = ChainRegistry::from_config(&[config("ethereum", 1)]).unwrap();
        let err = registry.require(&"zilliqa".into()).unwrap_err();
        assert!(matches!(err, BlockchainError::NotAvailable(_)));
        assert!(registry.get(&"zilliqa".into()).is_none());
    }
}
