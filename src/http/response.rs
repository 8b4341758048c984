//! Result envelope returned by every API route.
//!
//! ```text
//! { "error": false, "data": ... }
//! { "error": true, "code": "WALLET_LOCKED", "message": "Wallet is locked" }
//! ```
//!
//! Wallet-level failures are still HTTP 200; the envelope carries the outcome.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query,
    },
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::wallet::{ErrorCode, WalletError, WalletResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub error: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            error: false,
            code: None,
            message: None,
            data: Some(data),
        }
    }

    pub fn err(e: WalletError) -> Self {
        Self {
            error: true,
            code: Some(e.code),
            message: Some(e.message),
            data: None,
        }
    }

    /// Back into a `WalletResult`, for API clients.
    pub fn into_result(self) -> WalletResult<Option<T>> {
        if self.error {
            Err(WalletError::new(
                self.code.unwrap_or(ErrorCode::GenericError),
                self.message.unwrap_or_default(),
            ))
        } else {
            Ok(self.data)
        }
    }
}

impl<T> From<WalletResult<T>> for Envelope<T> {
    fn from(result: WalletResult<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::err(e),
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Unwrap a JSON body, turning a malformed one into a wallet-level error.
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> WalletResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| WalletError::generic(format!("Invalid request body: {}", rejection.body_text())))
}

/// Unwrap query parameters the same way.
pub fn query_params<T>(params: Result<Query<T>, QueryRejection>) -> WalletResult<T> {
    params
        .map(|Query(params)| params)
        .map_err(|rejection| WalletError::generic(format!("Invalid query: {}", rejection.body_text())))
}
