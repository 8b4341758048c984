//! Wallet provider facade.
//!
//! # Responsibilities
//! - Gate every operation on the lock state
//! - Persist the encrypted wallet after every change
//! - Forward account operations to the blockchain layer
//! - Classify every failure into a [`WalletError`]
//!
//! # Locking
//! Operations that change the session (create, unlock, lock, password and
//! account changes) take the session write lock. Reads clone what they need
//! under the read lock and release it before any RPC round trip.

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use zeroize::Zeroizing;

use crate::blockchain::account::{balance_to_std, parse_address};
use crate::blockchain::transaction::{resolve_gas_price, TRANSFER_GAS_LIMIT};
use crate::blockchain::{
    Account, Blockchain, ChainRegistry, FeeOptions, NonceTracker, TransferReceipt,
};
use crate::observability::metrics;
use crate::wallet::error::{WalletError, WalletResult};
use crate::wallet::keyring::{AccountInfo, Wallet, WalletSummary};
use crate::wallet::mnemonic;
use crate::wallet::state::{Session, WalletStatus};
use crate::wallet::store::EncryptedWalletStore;

/// Balance of one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub blockchain: Blockchain,
    pub address: String,
    /// Base units (wei), decimal string.
    pub balance: String,
    /// Standard units (ether), decimal string.
    pub balance_std: String,
}

/// A blockchain wallets can hold accounts on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockchainInfo {
    pub name: Blockchain,
    pub chain_id: u64,
    pub coin_type: u32,
}

/// The wallet service. Shared behind an `Arc`.
#[derive(Debug)]
pub struct WalletManager {
    registry: ChainRegistry,
    store: EncryptedWalletStore,
    nonces: NonceTracker,
    default_blockchain: Blockchain,
    session: RwLock<Session>,
}

fn observe<T>(operation: &'static str, result: WalletResult<T>) -> WalletResult<T> {
    match &result {
        Ok(_) => metrics::record_operation(operation, "ok"),
        Err(e) => {
            tracing::debug!(operation = operation, code = %e.code, error = %e.message, "Wallet operation failed");
            metrics::record_operation(operation, &e.code.as_str());
        }
    }
    result
}

fn parse_amount(amount: &str) -> WalletResult<U256> {
    let amount = amount.trim();
    if amount.is_empty() || !amount.bytes().all(|b| b.is_ascii_digit()) {
        return Err(WalletError::generic(format!(
            "Invalid amount '{}': expected a non-negative integer in base units",
            amount
        )));
    }
    U256::from_str_radix(amount, 10)
        .map_err(|e| WalletError::generic(format!("Invalid amount '{}': {}", amount, e)))
}

impl WalletManager {
    pub fn new(
        registry: ChainRegistry,
        store: EncryptedWalletStore,
        default_blockchain: Blockchain,
    ) -> Self {
        Self {
            registry,
            store,
            nonces: NonceTracker::new(),
            default_blockchain,
            session: RwLock::new(Session::Locked),
        }
    }

    pub fn registry(&self) -> &ChainRegistry {
        &self.registry
    }

    /// Error for an operation that needs an unlocked wallet but found none.
    async fn inactive_error(&self) -> WalletError {
        match self.store.exists().await {
            Ok(true) => WalletError::locked(),
            Ok(false) => WalletError::not_found(),
            Err(e) => e,
        }
    }

    async fn unlocked_account(&self, blockchain: &Blockchain, address: &str) -> WalletResult<Account> {
        let session = self.session.read().await;
        let Some(wallet) = session.wallet() else {
            drop(session);
            return Err(self.inactive_error().await);
        };
        wallet
            .find_account(blockchain, address)
            .cloned()
            .ok_or_else(|| WalletError::account_not_found(address))
    }

    fn transition(to: WalletStatus) {
        metrics::record_state_transition(to.as_str());
        tracing::info!(state = %to, "Wallet state changed");
    }

    /// Current lock state. Never fails on state alone.
    pub async fn status(&self) -> WalletResult<WalletStatus> {
        let result: WalletResult<_> = async {
            if self.session.read().await.is_unlocked() {
                return Ok(WalletStatus::Unlocked);
            }
            Ok(if self.store.exists().await? {
                WalletStatus::Locked
            } else {
                WalletStatus::NotFound
            })
        }
        .await;
        observe("status", result)
    }

    /// Create a wallet from `mnemonic`, encrypt it under `password` and unlock it.
    ///
    /// Replaces any wallet already stored.
    pub async fn create(&self, mnemonic: &str, password: &str) -> WalletResult<WalletSummary> {
        let result: WalletResult<_> = async {
            if password.is_empty() {
                return Err(WalletError::generic("Password must not be empty"));
            }

            let mut session = self.session.write().await;
            let mut wallet = Wallet::new(mnemonic, &self.registry)?;
            wallet.create_account(&self.default_blockchain)?;

            if self.store.exists().await? {
                tracing::warn!("Replacing previously stored wallet");
            }
            self.store.save(&wallet, password).await?;

            let summary = wallet.summary();
            *session = Session::unlocked(wallet, password);
            self.nonces.clear();
            Self::transition(WalletStatus::Unlocked);
            Ok(summary)
        }
        .await;
        observe("create", result)
    }

    /// Decrypt the stored wallet with `password`.
    ///
    /// A wrong password leaves the session as it was.
    pub async fn unlock(&self, password: &str) -> WalletResult<WalletSummary> {
        let result: WalletResult<_> = async {
            let mut session = self.session.write().await;
            let json = self.store.open(password).await?;
            let wallet = Wallet::from_json(&json, &self.registry).map_err(|e| {
                tracing::warn!(error = %e.message, "Stored wallet could not be restored");
                WalletError::invalid_password()
            })?;

            let summary = wallet.summary();
            *session = Session::unlocked(wallet, password);
            Self::transition(WalletStatus::Unlocked);
            Ok(summary)
        }
        .await;
        observe("unlock", result)
    }

    /// Persist the wallet and drop it from memory.
    pub async fn lock(&self) -> WalletResult<()> {
        let result: WalletResult<_> = async {
            let mut session = self.session.write().await;
            match &*session {
                Session::Unlocked { wallet, password } => {
                    self.store.save(wallet, password).await?;
                }
                Session::Locked => {
                    drop(session);
                    return Err(self.inactive_error().await);
                }
            }
            *session = Session::Locked;
            self.nonces.clear();
            Self::transition(WalletStatus::Locked);
            Ok(())
        }
        .await;
        observe("lock", result)
    }

    /// Re-encrypt the stored wallet under a new password.
    pub async fn change_password(&self, old: &str, new: &str) -> WalletResult<()> {
        let result: WalletResult<_> = async {
            if new.is_empty() {
                return Err(WalletError::generic("Password must not be empty"));
            }

            let mut session = self.session.write().await;
            let json = self.store.open(old).await?;
            match &mut *session {
                Session::Unlocked { wallet, password } => {
                    self.store.save(wallet, new).await?;
                    *password = Zeroizing::new(new.to_string());
                }
                Session::Locked => {
                    self.store.seal(&json, new).await?;
                }
            }
            tracing::info!("Wallet password changed");
            Ok(())
        }
        .await;
        observe("change_password", result)
    }

    /// Accounts per blockchain. Never includes the mnemonic.
    pub async fn get(&self) -> WalletResult<WalletSummary> {
        let result: WalletResult<_> = async {
            let session = self.session.read().await;
            match session.wallet() {
                Some(wallet) => Ok(wallet.summary()),
                None => {
                    drop(session);
                    Err(self.inactive_error().await)
                }
            }
        }
        .await;
        observe("get", result)
    }

    /// All accounts on attached blockchains.
    pub async fn get_accounts(&self) -> WalletResult<Vec<AccountInfo>> {
        let result: WalletResult<_> = async {
            let session = self.session.read().await;
            match session.wallet() {
                Some(wallet) => Ok(wallet.accounts().map(AccountInfo::from).collect()),
                None => {
                    drop(session);
                    Err(self.inactive_error().await)
                }
            }
        }
        .await;
        observe("get_accounts", result)
    }

    pub async fn get_balance(&self, blockchain: &Blockchain, address: &str) -> WalletResult<Balance> {
        let result: WalletResult<_> = async {
            let account = self.unlocked_account(blockchain, address).await?;
            let balance = account.get_balance().await?;
            Ok(Balance {
                blockchain: blockchain.clone(),
                address: account.address().to_string(),
                balance: balance.to_string(),
                balance_std: balance_to_std(balance),
            })
        }
        .await;
        observe("get_balance", result)
    }

    pub async fn get_nonce(&self, blockchain: &Blockchain, address: &str) -> WalletResult<u64> {
        let result: WalletResult<_> = async {
            let account = self.unlocked_account(blockchain, address).await?;
            Ok(account.get_nonce().await?)
        }
        .await;
        observe("get_nonce", result)
    }

    /// Send `amount` base units from one of the wallet's accounts.
    ///
    /// Node-reported error codes come back unchanged.
    pub async fn transfer(
        &self,
        blockchain: &Blockchain,
        from: &str,
        to: &str,
        amount: &str,
        fee: FeeOptions,
    ) -> WalletResult<TransferReceipt> {
        let result: WalletResult<_> = async {
            let account = self.unlocked_account(blockchain, from).await?;
            let to: Address = parse_address(to)?;
            let amount = parse_amount(amount)?;

            let gas_limit = fee.gas_limit.unwrap_or(TRANSFER_GAS_LIMIT);
            let gas_price = resolve_gas_price(account.module(), &fee).await?;

            let nonce = self.nonces.next(&account).await?;
            let tx = account.build_transfer_transaction(to, amount, nonce, gas_limit, gas_price);

            let sent = match account.sign_transaction(tx).await {
                Ok(signed) => account.send(&signed).await,
                Err(e) => Err(e),
            };
            let tx_hash = match sent {
                Ok(hash) => hash,
                Err(e) => {
                    self.nonces.release(&account, nonce);
                    tracing::warn!(blockchain = %blockchain, from = %account.address(), nonce = nonce, error = %e, "Transfer failed");
                    return Err(e.into());
                }
            };

            Ok(TransferReceipt {
                blockchain: blockchain.clone(),
                tx_hash,
                from: account.address(),
                to,
                amount: amount.to_string(),
                nonce,
                gas_limit,
                gas_price: gas_price.to_string(),
            })
        }
        .await;
        observe("transfer", result)
    }

    /// Derive the next account on `blockchain` and persist the wallet.
    pub async fn create_account(&self, blockchain: &Blockchain) -> WalletResult<AccountInfo> {
        let result: WalletResult<_> = async {
            let mut session = self.session.write().await;
            let Session::Unlocked { wallet, password } = &mut *session else {
                drop(session);
                return Err(self.inactive_error().await);
            };

            let account = wallet.create_account(blockchain)?;
            self.store.save(wallet, password).await?;
            Ok(AccountInfo::from(&account))
        }
        .await;
        observe("create_account", result)
    }

    /// Whether `address` is well formed for `blockchain`. Needs no wallet.
    pub async fn is_valid_address(&self, blockchain: &Blockchain, address: &str) -> WalletResult<bool> {
        let result = self
            .registry
            .require(blockchain)
            .map(|_| parse_address(address).is_ok())
            .map_err(WalletError::from);
        observe("is_valid_address", result)
    }

    /// The wallet mnemonic, after checking `password` against the stored blob.
    pub async fn reveal_secret_phrase(&self, password: &str) -> WalletResult<Zeroizing<String>> {
        let result: WalletResult<_> = async {
            let session = self.session.read().await;
            let Some(wallet) = session.wallet() else {
                drop(session);
                return Err(self.inactive_error().await);
            };
            self.store.open(password).await?;
            tracing::info!("Secret phrase revealed");
            Ok(Zeroizing::new(wallet.mnemonic().to_string()))
        }
        .await;
        observe("reveal_secret_phrase", result)
    }

    /// Hex private key of one account, after checking `password`.
    pub async fn reveal_private_key(
        &self,
        password: &str,
        blockchain: &Blockchain,
        address: &str,
    ) -> WalletResult<Zeroizing<String>> {
        let result: WalletResult<_> = async {
            let account = self.unlocked_account(blockchain, address).await?;
            self.store.open(password).await?;
            tracing::info!(blockchain = %blockchain, address = %account.address(), "Private key revealed");
            Ok(account.private_key_hex())
        }
        .await;
        observe("reveal_private_key", result)
    }

    /// A fresh mnemonic of 12 or 24 words. Needs no wallet.
    pub fn generate_mnemonic(&self, words: usize) -> WalletResult<Zeroizing<String>> {
        observe("generate_mnemonic", mnemonic::generate_mnemonic(words))
    }

    /// Configured blockchains.
    pub fn blockchains(&self) -> Vec<BlockchainInfo> {
        self.registry
            .modules()
            .map(|m| BlockchainInfo {
                name: m.blockchain().clone(),
                chain_id: m.chain_id(),
                coin_type: m.config().coin_type,
            })
            .collect()
    }

    /// Lock the wallet if it is unlocked. Used on shutdown.
    pub async fn shutdown(&self) -> WalletResult<()> {
        if !self.session.read().await.is_unlocked() {
            return Ok(());
        }
        self.lock().await
    }
}
