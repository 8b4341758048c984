//! Error codes and the failure half of every wallet operation's result.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::blockchain::BlockchainError;
use crate::storage::StorageError;
use crate::wallet::cipher::CipherError;

/// Classified failure reason, serialized as a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    GenericError,
    InvalidPassword,
    WalletLocked,
    WalletNotFound,
    AccountNotFound,
    /// JSON-RPC error code reported by a node, passed through unchanged.
    Rpc(i64),
}

impl ErrorCode {
    pub fn as_str(&self) -> Cow<'static, str> {
        match self {
            ErrorCode::GenericError => Cow::Borrowed("GENERIC_ERROR"),
            ErrorCode::InvalidPassword => Cow::Borrowed("INVALID_PASSWORD"),
            ErrorCode::WalletLocked => Cow::Borrowed("WALLET_LOCKED"),
            ErrorCode::WalletNotFound => Cow::Borrowed("WALLET_NOT_FOUND"),
            ErrorCode::AccountNotFound => Cow::Borrowed("ACCOUNT_NOT_FOUND"),
            ErrorCode::Rpc(code) => Cow::Owned(code.to_string()),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str())
    }
}

impl FromStr for ErrorCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GENERIC_ERROR" => Ok(ErrorCode::GenericError),
            "INVALID_PASSWORD" => Ok(ErrorCode::InvalidPassword),
            "WALLET_LOCKED" => Ok(ErrorCode::WalletLocked),
            "WALLET_NOT_FOUND" => Ok(ErrorCode::WalletNotFound),
            "ACCOUNT_NOT_FOUND" => Ok(ErrorCode::AccountNotFound),
            other => other
                .parse::<i64>()
                .map(ErrorCode::Rpc)
                .map_err(|_| format!("unknown error code '{}'", other)),
        }
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_str())
    }
}

impl<'de> Deserialize<'de> for ErrorCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A classified wallet failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct WalletError {
    pub code: ErrorCode,
    pub message: String,
}

/// Result type for wallet operations.
pub type WalletResult<T> = Result<T, WalletError>;

impl WalletError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn generic(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::GenericError, message)
    }

    pub fn invalid_password() -> Self {
        Self::new(ErrorCode::InvalidPassword, "Invalid password")
    }

    pub fn locked() -> Self {
        Self::new(ErrorCode::WalletLocked, "Wallet is locked")
    }

    pub fn not_found() -> Self {
        Self::new(ErrorCode::WalletNotFound, "No wallet found in storage")
    }

    pub fn account_not_found(address: &str) -> Self {
        Self::new(
            ErrorCode::AccountNotFound,
            format!("Account with address: {} was not found.", address),
        )
    }
}

impl From<BlockchainError> for WalletError {
    /// Node-reported codes pass through; everything else is generic.
    fn from(e: BlockchainError) -> Self {
        match e.rpc_code() {
            Some(code) => Self::new(ErrorCode::Rpc(code), e.to_string()),
            None => Self::generic(e.to_string()),
        }
    }
}

impl From<StorageError> for WalletError {
    fn from(e: StorageError) -> Self {
        Self::generic(e.to_string())
    }
}

impl From<CipherError> for WalletError {
    /// Any failure to open the blob means the password did not fit it.
    fn from(_: CipherError) -> Self {
        Self::invalid_password()
    }
}
