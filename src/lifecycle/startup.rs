//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the chain registry from configuration
//! - Probe every configured node (chain id, reachability)
//! - Open the configured storage backend
//! - Assemble the shared [`WalletManager`]
//!
//! Unreachable nodes are logged, not fatal: the wallet can still be created,
//! unlocked and locked without RPC access.

use std::sync::Arc;

use crate::blockchain::{Blockchain, BlockchainError, ChainRegistry};
use crate::config::{StorageBackend, WalletServiceConfig};
use crate::storage::{FileStore, KeyValueStore, MemoryStore};
use crate::wallet::{EncryptedWalletStore, WalletManager};

/// Open the key-value backend named in the config.
pub fn open_storage(config: &WalletServiceConfig) -> Arc<dyn KeyValueStore> {
    match config.storage.backend {
        StorageBackend::File => {
            let store = FileStore::new(&config.storage.path);
            tracing::info!(path = %store.path().display(), "Using file storage");
            Arc::new(store)
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; the wallet is lost on exit");
            Arc::new(MemoryStore::new())
        }
    }
}

/// Check every configured chain once and log what was found.
pub async fn probe_blockchains(registry: &ChainRegistry) {
    for module in registry.modules() {
        match module.verify_chain_id().await {
            Ok(()) => {
                module.is_healthy().await;
                tracing::info!(
                    blockchain = %module.blockchain(),
                    chain_id = module.chain_id(),
                    "Blockchain connected"
                );
            }
            Err(e @ BlockchainError::ChainMismatch { .. }) => {
                tracing::error!(blockchain = %module.blockchain(), error = %e, "Blockchain misconfigured");
            }
            Err(e) => {
                tracing::warn!(blockchain = %module.blockchain(), error = %e, "Blockchain unreachable");
            }
        }
    }
}

/// Build the wallet manager over `store`.
pub fn build_manager(
    config: &WalletServiceConfig,
    registry: ChainRegistry,
    store: Arc<dyn KeyValueStore>,
) -> Arc<WalletManager> {
    let store = EncryptedWalletStore::new(store, config.storage.kdf_iterations);
    Arc::new(WalletManager::new(
        registry,
        store,
        Blockchain::new(&config.wallet.default_blockchain),
    ))
}

/// Build registry, storage and manager from configuration.
pub fn bootstrap(config: &WalletServiceConfig) -> Result<Arc<WalletManager>, BlockchainError> {
    let registry = ChainRegistry::from_config(&config.blockchains)?;
    let store = open_storage(config);
    Ok(build_manager(config, registry, store))
}
