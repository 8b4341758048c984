//! HTTP API subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request id, timeout, tracing)
//!     → auth.rs (optional bearer token)
//!     → handlers.rs (decode request, call WalletManager)
//!     → response.rs (result envelope)
//!     → Send to client
//! ```

pub mod auth;
pub mod handlers;
pub mod response;
pub mod server;

pub use response::Envelope;
pub use server::{AppState, HttpServer, X_REQUEST_ID};
