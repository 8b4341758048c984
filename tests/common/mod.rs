//! Shared utilities for integration tests.

#![allow(dead_code)]

use alloy::primitives::{keccak256, Address, Bytes, TxHash, U256};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use wallet_manager::blockchain::{
    Blockchain, BlockchainConfig, BlockchainError, BlockchainResult, ChainClient, ChainId,
    ChainModule, ChainRegistry,
};
use wallet_manager::storage::MemoryStore;
use wallet_manager::wallet::{EncryptedWalletStore, WalletManager};

/// Well-known development mnemonic (Anvil / Hardhat).
pub const TEST_MNEMONIC: &str = "test test test test test test test test test test test junk";
pub const FIRST_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
pub const SECOND_ADDRESS: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";
pub const PASSWORD: &str = "correct horse battery staple";

/// Low iteration count so tests stay fast.
pub const TEST_KDF_ITERATIONS: u32 = 1_000;

/// Scripted chain client. Nothing touches the network.
#[derive(Debug, Default)]
pub struct MockChainClient {
    pub chain_id: u64,
    pub gas_price: u128,
    balances: Mutex<HashMap<Address, U256>>,
    nonces: Mutex<HashMap<Address, u64>>,
    send_error: Mutex<Option<(i64, String)>>,
    fail_rpc: Mutex<bool>,
    read_error: Mutex<Option<(i64, String)>>,
    pub sent: Mutex<Vec<Bytes>>,
}

impl MockChainClient {
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            gas_price: 1_000_000_000,
            ..Self::default()
        }
    }

    pub fn with_gas_price(mut self, gas_price: u128) -> Self {
        self.gas_price = gas_price;
        self
    }

    pub fn set_balance(&self, address: &str, balance: U256) {
        let address: Address = address.parse().unwrap();
        self.balances.lock().unwrap().insert(address, balance);
    }

    pub fn set_nonce(&self, address: &str, nonce: u64) {
        let address: Address = address.parse().unwrap();
        self.nonces.lock().unwrap().insert(address, nonce);
    }

    /// Make the next submissions fail with a JSON-RPC error object.
    pub fn reject_transactions(&self, code: i64, message: &str) {
        *self.send_error.lock().unwrap() = Some((code, message.to_string()));
    }

    pub fn accept_transactions(&self) {
        *self.send_error.lock().unwrap() = None;
    }

    /// Make every call fail like an unreachable node.
    pub fn fail_all(&self) {
        *self.fail_rpc.lock().unwrap() = true;
    }

    /// Make every read answer with a JSON-RPC error object.
    pub fn reject_reads(&self, code: i64, message: &str) {
        *self.read_error.lock().unwrap() = Some((code, message.to_string()));
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    fn check(&self) -> BlockchainResult<()> {
        if *self.fail_rpc.lock().unwrap() {
            return Err(BlockchainError::Rpc("connection refused".to_string()));
        }
        if let Some((code, message)) = self.read_error.lock().unwrap().clone() {
            return Err(BlockchainError::RpcResponse { code, message });
        }
        Ok(())
    }
}

#[async_trait]
impl ChainClient for MockChainClient {
    async fn get_chain_id(&self) -> BlockchainResult<ChainId> {
        self.check()?;
        Ok(ChainId(self.chain_id))
    }

    async fn get_block_number(&self) -> BlockchainResult<u64> {
        self.check()?;
        Ok(1)
    }

    async fn get_balance(&self, address: Address) -> BlockchainResult<U256> {
        self.check()?;
        Ok(self
            .balances
            .lock()
            .unwrap()
            .get(&address)
            .copied()
            .unwrap_or(U256::ZERO))
    }

    async fn get_transaction_count(&self, address: Address) -> BlockchainResult<u64> {
        self.check()?;
        Ok(self.nonces.lock().unwrap().get(&address).copied().unwrap_or(0))
    }

    async fn get_gas_price(&self) -> BlockchainResult<u128> {
        self.check()?;
        Ok(self.gas_price)
    }

    async fn send_raw_transaction(&self, raw: Bytes) -> BlockchainResult<TxHash> {
        self.check()?;
        if let Some((code, message)) = self.send_error.lock().unwrap().clone() {
            return Err(BlockchainError::RpcResponse { code, message });
        }
        let hash = keccak256(&raw);
        self.sent.lock().unwrap().push(raw);
        Ok(hash)
    }
}

pub struct Harness {
    pub manager: Arc<WalletManager>,
    pub storage: MemoryStore,
    pub clients: HashMap<String, Arc<MockChainClient>>,
}

impl Harness {
    pub fn client(&self, blockchain: &str) -> &Arc<MockChainClient> {
        &self.clients[blockchain]
    }

    /// Another manager over the same storage, as after a restart.
    pub fn restart(&self) -> Arc<WalletManager> {
        build_manager(&self.clients, self.storage.clone())
    }
}

fn chain_config(name: &str, chain_id: u64) -> BlockchainConfig {
    BlockchainConfig {
        name: name.to_string(),
        chain_id,
        ..BlockchainConfig::default()
    }
}

fn build_manager(clients: &HashMap<String, Arc<MockChainClient>>, storage: MemoryStore) -> Arc<WalletManager> {
    let mut registry = ChainRegistry::new();
    for (name, client) in clients {
        registry.register(ChainModule::new(
            chain_config(name, client.chain_id),
            client.clone(),
        ));
    }
    let store = EncryptedWalletStore::new(Arc::new(storage), TEST_KDF_ITERATIONS);
    Arc::new(WalletManager::new(registry, store, Blockchain::new("ethereum")))
}

/// Manager with "ethereum" (chain 1) and "sepolia" (chain 11155111) over memory storage.
pub fn harness() -> Harness {
    let mut clients = HashMap::new();
    clients.insert("ethereum".to_string(), Arc::new(MockChainClient::new(1)));
    clients.insert("sepolia".to_string(), Arc::new(MockChainClient::new(11155111)));

    let storage = MemoryStore::new();
    let manager = build_manager(&clients, storage.clone());
    Harness {
        manager,
        storage,
        clients,
    }
}

/// Harness with a wallet already created (and unlocked).
pub async fn unlocked_harness() -> Harness {
    let h = harness();
    h.manager.create(TEST_MNEMONIC, PASSWORD).await.unwrap();
    h
}
