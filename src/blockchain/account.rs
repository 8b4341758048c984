//! Mnemonic-derived accounts and their chain operations.
//!
//! # Security
//! - Keys are derived in memory from the wallet mnemonic and never serialized
//! - Keys are never logged; only addresses appear in log fields

use alloy::primitives::utils::format_ether;
use alloy::primitives::{Address, TxHash, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::{coins_bip39::English, MnemonicBuilder, PrivateKeySigner};
use std::sync::Arc;
use zeroize::Zeroizing;

use crate::blockchain::registry::ChainModule;
use crate::blockchain::transaction::{self, SignedTransaction};
use crate::blockchain::types::{Blockchain, BlockchainError, BlockchainResult};

/// BIP-44 path for an account index under a coin type.
pub fn derivation_path(coin_type: u32, index: u32) -> String {
    format!("m/44'/{}'/0'/0/{}", coin_type, index)
}

/// Parse an address string for an EVM chain.
pub fn parse_address(address: &str) -> BlockchainResult<Address> {
    address
        .trim()
        .parse::<Address>()
        .map_err(|_| BlockchainError::InvalidAddress(address.to_string()))
}

/// Convert base units to the standard decimal denomination (wei → ether).
pub fn balance_to_std(balance: U256) -> String {
    format_ether(balance)
}

/// A single account on one blockchain.
#[derive(Clone)]
pub struct Account {
    /// The module (chain config + RPC client) this account lives on.
    module: Arc<ChainModule>,
    /// BIP-44 address index.
    index: u32,
    /// The underlying signer (private key).
    signer: PrivateKeySigner,
}

impl Account {
    /// Derive the account at `index` from a mnemonic.
    pub fn derive(module: Arc<ChainModule>, mnemonic: &str, index: u32) -> BlockchainResult<Self> {
        let path = derivation_path(module.config().coin_type, index);
        let signer = MnemonicBuilder::<English>::default()
            .phrase(mnemonic)
            .derivation_path(&path)
            .map_err(|e| BlockchainError::Wallet(format!("Invalid derivation path {}: {}", path, e)))?
            .build()
            .map_err(|e| BlockchainError::Wallet(format!("Key derivation failed: {}", e)))?;

        Ok(Self {
            module,
            index,
            signer,
        })
    }

    /// Get the account's address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn blockchain(&self) -> &Blockchain {
        self.module.blockchain()
    }

    pub fn module(&self) -> &Arc<ChainModule> {
        &self.module
    }

    /// Hex-encoded private key, `0x`-prefixed.
    pub fn private_key_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(format!("0x{}", hex::encode(self.signer.to_bytes())))
    }

    /// Query the on-chain balance in base units.
    pub async fn get_balance(&self) -> BlockchainResult<U256> {
        self.module.client().get_balance(self.address()).await
    }

    /// Query the on-chain transaction count.
    pub async fn get_nonce(&self) -> BlockchainResult<u64> {
        self.module.client().get_transaction_count(self.address()).await
    }

    /// Build an unsigned native-token transfer.
    pub fn build_transfer_transaction(
        &self,
        to: Address,
        amount: U256,
        nonce: u64,
        gas_limit: u64,
        gas_price: u128,
    ) -> TransactionRequest {
        transaction::build_transfer(
            self.address(),
            to,
            amount,
            nonce,
            gas_limit,
            gas_price,
            self.module.chain_id(),
        )
    }

    /// Sign a transaction with this account's key.
    pub async fn sign_transaction(&self, tx: TransactionRequest) -> BlockchainResult<SignedTransaction> {
        transaction::sign(&self.signer, tx).await
    }

    /// Broadcast a signed transaction.
    pub async fn send(&self, tx: &SignedTransaction) -> BlockchainResult<TxHash> {
        let hash = self.module.client().send_raw_transaction(tx.raw.clone()).await?;
        tracing::info!(
            blockchain = %self.blockchain(),
            from = %self.address(),
            tx_hash = %hash,
            "Transaction submitted"
        );
        Ok(hash)
    }
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("blockchain", self.blockchain())
            .field("index", &self.index)
            .field("address", &self.address())
            .finish()
    }
}
