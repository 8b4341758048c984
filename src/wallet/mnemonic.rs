//! BIP-39 mnemonic generation and validation.

use bip39::{Language, Mnemonic};
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroizing;

use crate::wallet::error::{WalletError, WalletResult};

/// Generate a fresh English mnemonic of 12 or 24 words.
pub fn generate_mnemonic(words: usize) -> WalletResult<Zeroizing<String>> {
    let entropy_len = match words {
        12 => 16,
        24 => 32,
        other => {
            return Err(WalletError::generic(format!(
                "Unsupported mnemonic length {}, expected 12 or 24 words",
                other
            )))
        }
    };

    let mut entropy = Zeroizing::new(vec![0u8; entropy_len]);
    OsRng.fill_bytes(entropy.as_mut_slice());
    let mnemonic = Mnemonic::from_entropy(&entropy)
        .map_err(|e| WalletError::generic(format!("Mnemonic generation failed: {}", e)))?;

    Ok(Zeroizing::new(mnemonic.to_string()))
}

/// Check a phrase against the English wordlist and its checksum.
///
/// Returns the phrase normalized to single spaces.
pub fn validate_mnemonic(phrase: &str) -> WalletResult<Zeroizing<String>> {
    let normalized = phrase.split_whitespace().collect::<Vec<_>>().join(" ");
    let mnemonic = Mnemonic::parse_in_normalized(Language::English, &normalized)
        .map_err(|e| WalletError::generic(format!("Invalid mnemonic: {}", e)))?;
    Ok(Zeroizing::new(mnemonic.to_string()))
}
