//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Build chain registry → Probe nodes → Open storage → WalletManager
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Lock (and persist) wallet → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
