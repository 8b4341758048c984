//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with all wallet routes
//! - Wire up middleware (tracing, timeout, request ID, API key)
//! - Serve on a listener until the shutdown future resolves

use axum::{
    http::HeaderName,
    middleware,
    routing::{get, post},
    Router,
};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ApiConfig;
use crate::http::auth::api_key_middleware;
use crate::http::handlers::*;
use crate::wallet::WalletManager;

/// Header carrying the per-request correlation id.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub wallet: Arc<WalletManager>,
    pub api_key: Option<Arc<str>>,
}

/// HTTP front end of the wallet service.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(config: &ApiConfig, wallet: Arc<WalletManager>) -> Self {
        let state = AppState {
            wallet,
            api_key: config.api_key.as_deref().map(Arc::from),
        };
        let router = Self::build_router(state, Duration::from_secs(config.request_timeout_secs));
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(state: AppState, timeout: Duration) -> Router {
        let request_id = HeaderName::from_static(X_REQUEST_ID);

        let api = Router::new()
            .route("/wallet", post(create_wallet).get(get_wallet))
            .route("/wallet/status", get(wallet_status))
            .route("/wallet/unlock", post(unlock_wallet))
            .route("/wallet/lock", post(lock_wallet))
            .route("/wallet/password", post(change_password))
            .route("/wallet/secret-phrase", post(reveal_secret_phrase))
            .route("/accounts", get(list_accounts).post(create_account))
            .route("/accounts/{blockchain}/{address}/balance", get(get_balance))
            .route("/accounts/{blockchain}/{address}/nonce", get(get_nonce))
            .route("/accounts/{blockchain}/{address}/transfer", post(transfer))
            .route("/accounts/{blockchain}/{address}/private-key", post(reveal_private_key))
            .route("/blockchains", get(list_blockchains))
            .route("/blockchains/{blockchain}/addresses/{address}", get(validate_address))
            .route("/mnemonic", get(generate_mnemonic))
            .route_layer(middleware::from_fn_with_state(state.clone(), api_key_middleware));

        Router::new()
            .route("/health", get(health))
            .merge(api)
            .with_state(state)
            .layer(TimeoutLayer::new(timeout))
            .layer(PropagateRequestIdLayer::new(request_id.clone()))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
    }

    /// The router, for serving elsewhere or driving in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` resolves.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
