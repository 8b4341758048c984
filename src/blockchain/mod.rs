//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Configuration ([[blockchains]])
//!     → registry.rs (one module per chain: config + RPC client)
//!     → account.rs (mnemonic-derived keys, balance/nonce, transfer building)
//!     → transaction.rs (gas resolution, signing)
//!     → nonce.rs (sequential nonces across pending transfers)
//!     → client.rs (RPC connection with timeouts and failover)
//! ```
//!
//! # Security Constraints
//! - Never log private keys or mnemonics
//! - All RPC calls have configurable timeouts
//! - Graceful degradation when blockchain unreachable

pub mod account;
pub mod client;
pub mod nonce;
pub mod registry;
pub mod transaction;
pub mod types;

pub use account::Account;
pub use client::{BlockchainClient, ChainClient};
pub use nonce::NonceTracker;
pub use registry::{ChainModule, ChainRegistry};
pub use transaction::{SignedTransaction, TransferReceipt};
pub use types::{Blockchain, BlockchainConfig, BlockchainError, BlockchainResult, ChainId, FeeOptions};
