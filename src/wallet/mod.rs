//! Wallet subsystem.
//!
//! # Data Flow
//! ```text
//! HTTP handlers / CLI
//!     → manager.rs (state checks, account operations, error classification)
//!     → state.rs (NOT_FOUND / LOCKED / UNLOCKED, session holding wallet + password)
//!     → keyring.rs (mnemonic, per-blockchain accounts, canonical JSON)
//!     → store.rs + cipher.rs (PBKDF2 + AES-GCM blob under "serializedWallet")
//!     → storage::KeyValueStore
//! ```
//!
//! # Security Constraints
//! - Mnemonic, password and private keys are zeroized on drop and never logged
//! - The password is held only while the wallet is unlocked

pub mod cipher;
pub mod error;
pub mod keyring;
pub mod manager;
pub mod mnemonic;
pub mod state;
pub mod store;

pub use error::{ErrorCode, WalletError, WalletResult};
pub use keyring::{AccountInfo, AccountRecord, Wallet, WalletSummary};
pub use manager::{Balance, BlockchainInfo, WalletManager};
pub use state::{Session, WalletStatus};
pub use store::{EncryptedWalletStore, WALLET_STORAGE_KEY};
