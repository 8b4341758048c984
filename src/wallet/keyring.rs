//! The in-memory wallet: mnemonic plus per-blockchain accounts.
//!
//! Serialized form (keys sorted, accounts ordered by index):
//!
//! ```text
//! {"blockchains":{"ethereum":[{"address":"0x..","index":0}]},"mnemonic":"..."}
//! ```
//!
//! Account records for blockchains that are no longer configured are kept
//! so saving never drops them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use zeroize::{Zeroize, Zeroizing};

use crate::blockchain::account::parse_address;
use crate::blockchain::{Account, Blockchain, ChainModule, ChainRegistry};
use crate::wallet::error::{WalletError, WalletResult};
use crate::wallet::mnemonic::validate_mnemonic;

/// Persisted reference to one derived account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub address: String,
    pub index: u32,
}

#[derive(Serialize, Deserialize)]
struct SerializedWallet {
    blockchains: BTreeMap<Blockchain, Vec<AccountRecord>>,
    mnemonic: String,
}

impl Drop for SerializedWallet {
    fn drop(&mut self) {
        self.mnemonic.zeroize();
    }
}

/// Public view of one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub blockchain: Blockchain,
    pub index: u32,
    pub address: String,
}

impl From<&Account> for AccountInfo {
    fn from(account: &Account) -> Self {
        Self {
            blockchain: account.blockchain().clone(),
            index: account.index(),
            address: account.address().to_string(),
        }
    }
}

/// What `get` reveals about a wallet. Never contains the mnemonic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletSummary {
    pub blockchains: BTreeMap<Blockchain, Vec<AccountRecord>>,
}

/// A decrypted wallet.
pub struct Wallet {
    mnemonic: Zeroizing<String>,
    records: BTreeMap<Blockchain, Vec<AccountRecord>>,
    modules: BTreeMap<Blockchain, Arc<ChainModule>>,
    accounts: BTreeMap<Blockchain, Vec<Account>>,
}

impl Wallet {
    /// Create an empty wallet from a mnemonic and attach every registry chain.
    pub fn new(mnemonic: &str, registry: &ChainRegistry) -> WalletResult<Self> {
        let mut wallet = Self {
            mnemonic: validate_mnemonic(mnemonic)?,
            records: BTreeMap::new(),
            modules: BTreeMap::new(),
            accounts: BTreeMap::new(),
        };
        wallet.attach_all(registry)?;
        Ok(wallet)
    }

    /// Restore a wallet from its serialized form and attach every registry chain.
    ///
    /// Stored addresses must match what the mnemonic derives.
    pub fn from_json(json: &str, registry: &ChainRegistry) -> WalletResult<Self> {
        let mut serialized: SerializedWallet = serde_json::from_str(json)
            .map_err(|e| WalletError::generic(format!("Malformed wallet data: {}", e)))?;

        let mut wallet = Self {
            mnemonic: validate_mnemonic(&serialized.mnemonic)?,
            records: std::mem::take(&mut serialized.blockchains),
            modules: BTreeMap::new(),
            accounts: BTreeMap::new(),
        };
        for records in wallet.records.values_mut() {
            records.sort_by_key(|r| r.index);
        }
        wallet.attach_all(registry)?;
        Ok(wallet)
    }

    /// Canonical JSON form.
    pub fn to_json(&self) -> WalletResult<Zeroizing<String>> {
        let serialized = SerializedWallet {
            blockchains: self.records.clone(),
            mnemonic: self.mnemonic.to_string(),
        };
        serde_json::to_string(&serialized)
            .map(Zeroizing::new)
            .map_err(|e| WalletError::generic(format!("Wallet serialization failed: {}", e)))
    }

    fn attach_all(&mut self, registry: &ChainRegistry) -> WalletResult<()> {
        for module in registry.modules() {
            self.load_blockchain(module.clone())?;
        }
        Ok(())
    }

    /// Attach a blockchain, re-deriving its stored accounts.
    pub fn load_blockchain(&mut self, module: Arc<ChainModule>) -> WalletResult<()> {
        let blockchain = module.blockchain().clone();
        let mut accounts = Vec::new();

        for record in self.records.get(&blockchain).into_iter().flatten() {
            let account = Account::derive(module.clone(), &self.mnemonic, record.index)?;
            let stored = parse_address(&record.address)?;
            if stored != account.address() {
                return Err(WalletError::generic(format!(
                    "Stored {} account {} does not match derived address {}",
                    blockchain,
                    record.address,
                    account.address()
                )));
            }
            accounts.push(account);
        }

        tracing::debug!(blockchain = %blockchain, accounts = accounts.len(), "Blockchain attached");
        self.accounts.insert(blockchain.clone(), accounts);
        self.modules.insert(blockchain, module);
        Ok(())
    }

    /// Derive the next account on an attached blockchain.
    pub fn create_account(&mut self, blockchain: &Blockchain) -> WalletResult<Account> {
        let module = self.modules.get(blockchain).cloned().ok_or_else(|| {
            WalletError::generic(format!("Blockchain {} is not supported", blockchain))
        })?;

        let records = self.records.entry(blockchain.clone()).or_default();
        let index = match records.iter().map(|r| r.index).max() {
            None => 0,
            Some(last) => last.checked_add(1).ok_or_else(|| {
                WalletError::generic(format!("No account index left on {}", blockchain))
            })?,
        };
        let account = Account::derive(module, &self.mnemonic, index)?;

        records.push(AccountRecord {
            address: account.address().to_string(),
            index,
        });
        self.accounts
            .entry(blockchain.clone())
            .or_default()
            .push(account.clone());

        tracing::info!(blockchain = %blockchain, index = index, address = %account.address(), "Account created");
        Ok(account)
    }

    /// Find an account by address on one blockchain.
    pub fn find_account(&self, blockchain: &Blockchain, address: &str) -> Option<&Account> {
        let address = parse_address(address).ok()?;
        self.accounts
            .get(blockchain)?
            .iter()
            .find(|a| a.address() == address)
    }

    /// Live accounts across all attached blockchains.
    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values().flatten()
    }

    pub fn mnemonic(&self) -> &str {
        &self.mnemonic
    }

    pub fn summary(&self) -> WalletSummary {
        WalletSummary {
            blockchains: self.records.clone(),
        }
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("blockchains", &self.records)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::{BlockchainClient, BlockchainConfig};
    use crate::wallet::error::ErrorCode;

    const TEST_MNEMONIC: &str = "test test test test test test test test test test test junk";

    fn registry(names: &[&str]) -> ChainRegistry {
        let mut registry = ChainRegistry::new();
        for name in names {
            let config = BlockchainConfig {
                name: name.to_string(),
                ..BlockchainConfig::default()
            };
            let client = BlockchainClient::new(config.clone()).unwrap();
            registry.register(ChainModule::new(config, Arc::new(client)));
        }
        registry
    }

    #[test]
    fn test_new_wallet_is_empty() {
        let wallet = Wallet::new(TEST_MNEMONIC, &registry(&["ethereum"])).unwrap();
        assert_eq!(wallet.accounts().count(), 0);
    }

    #[test]
    fn test_invalid_mnemonic() {
        let err = Wallet::new("definitely not valid", &registry(&["ethereum"])).unwrap_err();
        assert_eq!(err.code, ErrorCode::GenericError);
    }

    #[test]
    fn test_create_account_increments_index() {
        let mut wallet = Wallet::new(TEST_MNEMONIC, &registry(&["ethereum"])).unwrap();
        let eth: Blockchain = "ethereum".into();

        let first = wallet.create_account(&eth).unwrap();
        let second = wallet.create_account(&eth).unwrap();
        assert_eq!(first.index(), 0);
        assert_eq!(second.index(), 1);
        assert_eq!(
            second.address().to_string(),
            "0x70997970C51812dc3A010C7d01b50e0d17dc79C8"
        );

        let err = wallet.create_account(&"bitcoin".into()).unwrap_err();
        assert_eq!(err.code, ErrorCode::GenericError);
    }

    #[test]
    fn test_exhausted_index_is_an_error() {
        let mut wallet = Wallet::new(TEST_MNEMONIC, &registry(&["ethereum"])).unwrap();
        let eth: Blockchain = "ethereum".into();
        wallet.create_account(&eth).unwrap();
        wallet.records.get_mut(&eth).unwrap()[0].index = u32::MAX;

        let err = wallet.create_account(&eth).unwrap_err();
        assert_eq!(err.code, ErrorCode::GenericError);
        assert_eq!(wallet.summary().blockchains[&eth].len(), 1);
    }

    #[test]
    fn test_find_account_is_case_insensitive() {
        let mut wallet = Wallet::new(TEST_MNEMONIC, &registry(&["ethereum"])).unwrap();
        let eth: Blockchain = "ethereum".into();
        wallet.create_account(&eth).unwrap();

        assert!(wallet
            .find_account(&eth, "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266")
            .is_some());
        assert!(wallet
            .find_account(&eth, "0x70997970C51812dc3A010C7d01b50e0d17dc79C8")
            .is_none());
        assert!(wallet.find_account(&"sepolia".into(), "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266").is_none());
        assert!(wallet.find_account(&eth, "not-an-address").is_none());
    }

    #[test]
    fn test_json_round_trip_is_stable() {
        let chains = registry(&["ethereum", "sepolia"]);
        let mut wallet = Wallet::new(TEST_MNEMONIC, &chains).unwrap();
        wallet.create_account(&"ethereum".into()).unwrap();
        wallet.create_account(&"sepolia".into()).unwrap();
        wallet.create_account(&"sepolia".into()).unwrap();

        let json = wallet.to_json().unwrap();
        let restored = Wallet::from_json(&json, &chains).unwrap();
        assert_eq!(restored.to_json().unwrap().as_str(), json.as_str());
        assert_eq!(restored.accounts().count(), 3);
        assert!(json.starts_with(
            r#"{"blockchains":{"ethereum":[{"address":"0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266","index":0}]"#
        ));
    }

    #[test]
    fn test_unconfigured_chain_records_survive() {
        let mut wallet = Wallet::new(TEST_MNEMONIC, &registry(&["ethereum", "sepolia"])).unwrap();
        wallet.create_account(&"sepolia".into()).unwrap();
        let json = wallet.to_json().unwrap();

        let mut restored = Wallet::from_json(&json, &registry(&["ethereum"])).unwrap();
        assert_eq!(restored.accounts().count(), 0);
        assert_eq!(restored.to_json().unwrap().as_str(), json.as_str());

        // Kept as records only; no accounts can be derived there.
        let err = restored.create_account(&"sepolia".into()).unwrap_err();
        assert_eq!(err.code, ErrorCode::GenericError);
    }

    #[test]
    fn test_tampered_address_is_rejected() {
        let json = format!(
            r#"{{"blockchains":{{"ethereum":[{{"address":"0x70997970C51812dc3A010C7d01b50e0d17dc79C8","index":0}}]}},"mnemonic":"{}"}}"#,
            TEST_MNEMONIC
        );
        assert!(Wallet::from_json(&json, &registry(&["ethereum"])).is_err());
        assert!(Wallet::from_json("{}", &registry(&["ethereum"])).is_err());
    }

    #[test]
    fn test_summary_and_debug_hide_mnemonic() {
        let mut wallet = Wallet::new(TEST_MNEMONIC, &registry(&["ethereum"])).unwrap();
        wallet.create_account(&"ethereum".into()).unwrap();

        let summary = serde_json::to_string(&wallet.summary()).unwrap();
        assert!(!summary.contains("junk"));
        assert!(summary.contains("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"));
        assert!(!format!("{:?}", wallet).contains("junk"));
    }
}
