//! Multi-chain wallet service library.

pub mod blockchain;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod storage;
pub mod wallet;

pub use config::schema::WalletServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use wallet::WalletManager;
