//! Lock state of the wallet session.

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::wallet::keyring::Wallet;

/// Externally visible wallet state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WalletStatus {
    /// Nothing stored, nothing in memory.
    NotFound,
    /// Encrypted blob stored, nothing in memory.
    Locked,
    /// Decrypted wallet and password in memory.
    Unlocked,
}

impl WalletStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WalletStatus::NotFound => "NOT_FOUND",
            WalletStatus::Locked => "LOCKED",
            WalletStatus::Unlocked => "UNLOCKED",
        }
    }
}

impl std::fmt::Display for WalletStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// In-memory half of the state. Wallet and password come and go together.
#[derive(Default)]
pub enum Session {
    #[default]
    Locked,
    Unlocked {
        wallet: Wallet,
        password: Zeroizing<String>,
    },
}

impl Session {
    pub fn unlocked(wallet: Wallet, password: &str) -> Self {
        Session::Unlocked {
            wallet,
            password: Zeroizing::new(password.to_string()),
        }
    }

    pub fn is_unlocked(&self) -> bool {
        matches!(self, Session::Unlocked { .. })
    }

    pub fn wallet(&self) -> Option<&Wallet> {
        match self {
            Session::Unlocked { wallet, .. } => Some(wallet),
            Session::Locked => None,
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Session::Locked => f.write_str("Locked"),
            Session::Unlocked { wallet, .. } => f
                .debug_struct("Unlocked")
                .field("wallet", wallet)
                .finish_non_exhaustive(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serde() {
        assert_eq!(
            serde_json::to_string(&WalletStatus::NotFound).unwrap(),
            "\"NOT_FOUND\""
        );
        assert_eq!(WalletStatus::Unlocked.to_string(), "UNLOCKED");
        let parsed: WalletStatus = serde_json::from_str("\"LOCKED\"").unwrap();
        assert_eq!(parsed, WalletStatus::Locked);
    }

    #[test]
    fn test_default_session_is_locked() {
        let session = Session::default();
        assert!(!session.is_unlocked());
        assert!(session.wallet().is_none());
    }
}
