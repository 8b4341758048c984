//! Encrypted wallet persistence.
//!
//! The blob lives under one fixed storage key as `{ "json": "<ciphertext>" }`.

use serde_json::{json, Value};
use std::sync::Arc;
use zeroize::Zeroizing;

use crate::storage::KeyValueStore;
use crate::wallet::cipher;
use crate::wallet::error::{WalletError, WalletResult};
use crate::wallet::keyring::Wallet;

/// Storage key of the encrypted wallet.
pub const WALLET_STORAGE_KEY: &str = "serializedWallet";

/// Reads and writes the encrypted wallet blob.
#[derive(Clone)]
pub struct EncryptedWalletStore {
    store: Arc<dyn KeyValueStore>,
    kdf_iterations: u32,
}

impl EncryptedWalletStore {
    pub fn new(store: Arc<dyn KeyValueStore>, kdf_iterations: u32) -> Self {
        Self {
            store,
            kdf_iterations,
        }
    }

    /// Raw ciphertext, if a wallet has been saved. Does not decrypt.
    pub async fn load(&self) -> WalletResult<Option<String>> {
        let Some(value) = self.store.get(WALLET_STORAGE_KEY).await? else {
            return Ok(None);
        };

        match value.get("json").and_then(Value::as_str) {
            Some(blob) => Ok(Some(blob.to_string())),
            None => Err(WalletError::generic(format!(
                "Stored value under {} has no ciphertext",
                WALLET_STORAGE_KEY
            ))),
        }
    }

    pub async fn exists(&self) -> WalletResult<bool> {
        Ok(self.load().await?.is_some())
    }

    /// Decrypt the stored wallet JSON with `password`.
    pub async fn open(&self, password: &str) -> WalletResult<Zeroizing<String>> {
        let blob = self.load().await?.ok_or_else(WalletError::not_found)?;
        Ok(cipher::decrypt(&blob, password)?)
    }

    /// Encrypt the wallet's canonical JSON with `password` and store it.
    pub async fn save(&self, wallet: &Wallet, password: &str) -> WalletResult<()> {
        let plaintext = wallet.to_json()?;
        self.seal(&plaintext, password).await
    }

    /// Encrypt already-serialized wallet JSON and store it.
    pub async fn seal(&self, plaintext: &str, password: &str) -> WalletResult<()> {
        let blob = cipher::encrypt(plaintext, password, self.kdf_iterations)
            .map_err(|e| WalletError::generic(e.to_string()))?;
        self.store
            .set(WALLET_STORAGE_KEY, json!({ "json": blob }))
            .await?;
        tracing::debug!(key = WALLET_STORAGE_KEY, "Encrypted wallet written");
        Ok(())
    }
}

impl std::fmt::Debug for EncryptedWalletStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptedWalletStore")
            .field("kdf_iterations", &self.kdf_iterations)
            .finish_non_exhaustive()
    }
}
