//! Route handlers. Each one forwards to the [`WalletManager`] and wraps the
//! outcome in an [`Envelope`].
//!
//! [`WalletManager`]: crate::wallet::WalletManager

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use serde::{Deserialize, Serialize};

use crate::blockchain::{Blockchain, FeeOptions, TransferReceipt};
use crate::http::response::{json_body, query_params, Envelope};
use crate::http::server::AppState;
use crate::wallet::{AccountInfo, Balance, BlockchainInfo, WalletStatus, WalletSummary};

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateWalletRequest {
    pub mnemonic: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PasswordRequest {
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateAccountRequest {
    pub blockchain: Blockchain,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TransferRequest {
    pub to: String,
    /// Base units, decimal string.
    pub amount: String,
    #[serde(default)]
    pub fee: FeeOptions,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MnemonicQuery {
    #[serde(default = "default_words")]
    pub words: usize,
}

fn default_words() -> usize {
    12
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: WalletStatus,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NonceResponse {
    pub nonce: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MnemonicResponse {
    pub mnemonic: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PrivateKeyResponse {
    pub private_key: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddressValidity {
    pub valid: bool,
}

#[derive(Serialize)]
pub struct Health {
    pub version: &'static str,
    pub status: &'static str,
}

pub async fn health() -> Json<Health> {
    Json(Health {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
    })
}

pub async fn wallet_status(State(state): State<AppState>) -> Envelope<StatusResponse> {
    state
        .wallet
        .status()
        .await
        .map(|status| StatusResponse { status })
        .into()
}

pub async fn create_wallet(
    State(state): State<AppState>,
    payload: Result<Json<CreateWalletRequest>, JsonRejection>,
) -> Envelope<WalletSummary> {
    let body = match json_body(payload) {
        Ok(body) => body,
        Err(e) => return Envelope::err(e),
    };
    state.wallet.create(&body.mnemonic, &body.password).await.into()
}

pub async fn get_wallet(State(state): State<AppState>) -> Envelope<WalletSummary> {
    state.wallet.get().await.into()
}

pub async fn unlock_wallet(
    State(state): State<AppState>,
    payload: Result<Json<PasswordRequest>, JsonRejection>,
) -> Envelope<WalletSummary> {
    let body = match json_body(payload) {
        Ok(body) => body,
        Err(e) => return Envelope::err(e),
    };
    state.wallet.unlock(&body.password).await.into()
}

pub async fn lock_wallet(State(state): State<AppState>) -> Envelope<()> {
    state.wallet.lock().await.into()
}

pub async fn change_password(
    State(state): State<AppState>,
    payload: Result<Json<ChangePasswordRequest>, JsonRejection>,
) -> Envelope<()> {
    let body = match json_body(payload) {
        Ok(body) => body,
        Err(e) => return Envelope::err(e),
    };
    state
        .wallet
        .change_password(&body.old_password, &body.new_password)
        .await
        .into()
}

pub async fn reveal_secret_phrase(
    State(state): State<AppState>,
    payload: Result<Json<PasswordRequest>, JsonRejection>,
) -> Envelope<MnemonicResponse> {
    let body = match json_body(payload) {
        Ok(body) => body,
        Err(e) => return Envelope::err(e),
    };
    state
        .wallet
        .reveal_secret_phrase(&body.password)
        .await
        .map(|m| MnemonicResponse {
            mnemonic: m.to_string(),
        })
        .into()
}

pub async fn list_accounts(State(state): State<AppState>) -> Envelope<Vec<AccountInfo>> {
    state.wallet.get_accounts().await.into()
}

pub async fn create_account(
    State(state): State<AppState>,
    payload: Result<Json<CreateAccountRequest>, JsonRejection>,
) -> Envelope<AccountInfo> {
    let body = match json_body(payload) {
        Ok(body) => body,
        Err(e) => return Envelope::err(e),
    };
    state.wallet.create_account(&body.blockchain).await.into()
}

pub async fn get_balance(
    State(state): State<AppState>,
    Path((blockchain, address)): Path<(String, String)>,
) -> Envelope<Balance> {
    state
        .wallet
        .get_balance(&Blockchain::from(blockchain), &address)
        .await
        .into()
}

pub async fn get_nonce(
    State(state): State<AppState>,
    Path((blockchain, address)): Path<(String, String)>,
) -> Envelope<NonceResponse> {
    state
        .wallet
        .get_nonce(&Blockchain::from(blockchain), &address)
        .await
        .map(|nonce| NonceResponse { nonce })
        .into()
}

pub async fn transfer(
    State(state): State<AppState>,
    Path((blockchain, address)): Path<(String, String)>,
    payload: Result<Json<TransferRequest>, JsonRejection>,
) -> Envelope<TransferReceipt> {
    let body = match json_body(payload) {
        Ok(body) => body,
        Err(e) => return Envelope::err(e),
    };
    state
        .wallet
        .transfer(
            &Blockchain::from(blockchain),
            &address,
            &body.to,
            &body.amount,
            body.fee,
        )
        .await
        .into()
}

pub async fn reveal_private_key(
    State(state): State<AppState>,
    Path((blockchain, address)): Path<(String, String)>,
    payload: Result<Json<PasswordRequest>, JsonRejection>,
) -> Envelope<PrivateKeyResponse> {
    let body = match json_body(payload) {
        Ok(body) => body,
        Err(e) => return Envelope::err(e),
    };
    state
        .wallet
        .reveal_private_key(&body.password, &Blockchain::from(blockchain), &address)
        .await
        .map(|key| PrivateKeyResponse {
            private_key: key.to_string(),
        })
        .into()
}

pub async fn list_blockchains(State(state): State<AppState>) -> Envelope<Vec<BlockchainInfo>> {
    Envelope::ok(state.wallet.blockchains())
}

pub async fn validate_address(
    State(state): State<AppState>,
    Path((blockchain, address)): Path<(String, String)>,
) -> Envelope<AddressValidity> {
    state
        .wallet
        .is_valid_address(&Blockchain::from(blockchain), &address)
        .await
        .map(|valid| AddressValidity { valid })
        .into()
}

pub async fn generate_mnemonic(
    State(state): State<AppState>,
    params: Result<Query<MnemonicQuery>, QueryRejection>,
) -> Envelope<MnemonicResponse> {
    let query = match query_params(params) {
        Ok(query) => query,
        Err(e) => return Envelope::err(e),
    };
    state
        .wallet
        .generate_mnemonic(query.words)
        .map(|m| MnemonicResponse {
            mnemonic: m.to_string(),
        })
        .into()
}
