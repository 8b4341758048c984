//! Password-based encryption of the serialized wallet.
//!
//! PBKDF2-HMAC-SHA256 stretches the password into an AES-256-GCM key. The
//! output string is hex of:
//!
//! ```text
//! version (1) | iterations (u32 BE) | salt (16) | nonce (12) | ciphertext + tag
//! ```
//!
//! The iteration count travels with the blob so a config change never
//! strands an existing wallet.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use hmac::Hmac;
use pbkdf2::pbkdf2;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;
use thiserror::Error;
use zeroize::Zeroizing;

const FORMAT_VERSION: u8 = 1;
const SALT_LEN: usize = 16;
const NONCE_LEN: usize = 12;
const KEY_LEN: usize = 32;
const HEADER_LEN: usize = 1 + 4 + SALT_LEN + NONCE_LEN;

/// Highest PBKDF2 work factor a blob may ask for.
pub const MAX_KDF_ITERATIONS: u32 = 10_000_000;

/// Errors from sealing or opening a wallet blob.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CipherError {
    #[error("Blob is not valid hex")]
    Encoding,

    #[error("Blob is truncated")]
    Truncated,

    #[error("Unsupported blob version {0}")]
    UnsupportedVersion(u8),

    #[error("Iteration count {0} is out of range")]
    Iterations(u32),

    #[error("Decryption failed (wrong password or tampered data)")]
    Authentication,

    #[error("Decrypted payload is not valid UTF-8")]
    Utf8,

    #[error("Encryption failure: {0}")]
    Encryption(String),
}

fn check_iterations(iterations: u32) -> Result<(), CipherError> {
    if iterations == 0 || iterations > MAX_KDF_ITERATIONS {
        return Err(CipherError::Iterations(iterations));
    }
    Ok(())
}

fn derive_key(password: &str, salt: &[u8], iterations: u32) -> Zeroizing<[u8; KEY_LEN]> {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2::<Hmac<Sha256>>(password.as_bytes(), salt, iterations, key.as_mut());
    key
}

/// Encrypt `plaintext` under `password`.
pub fn encrypt(plaintext: &str, password: &str, iterations: u32) -> Result<String, CipherError> {
    check_iterations(iterations)?;

    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce_bytes);

    let key = derive_key(password, &salt, iterations);
    let cipher = Aes256Gcm::new_from_slice(key.as_ref())
        .map_err(|e| CipherError::Encryption(e.to_string()))?;
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce_bytes), plaintext.as_bytes())
        .map_err(|e| CipherError::Encryption(format!("{:?}", e)))?;

    let mut blob = Vec::with_capacity(HEADER_LEN + ciphertext.len());
    blob.push(FORMAT_VERSION);
    blob.extend_from_slice(&iterations.to_be_bytes());
    blob.extend_from_slice(&salt);
    blob.extend_from_slice(&nonce_bytes);
    blob.extend_from_slice(&ciphertext);

    Ok(hex::encode(blob))
}

/// Decrypt a blob produced by [`encrypt`].
pub fn decrypt(blob: &str, password: &str) -> Result<Zeroizing<String>, CipherError> {
    let bytes = hex::decode(blob.trim()).map_err(|_| CipherError::Encoding)?;
    if bytes.len() <= HEADER_LEN {
        return Err(CipherError::Truncated);
    }
    if bytes[0] != FORMAT_VERSION {
        return Err(CipherError::UnsupportedVersion(bytes[0]));
    }

    let mut iterations = [0u8; 4];
    iterations.copy_from_slice(&bytes[1..5]);
    let iterations = u32::from_be_bytes(iterations);
    check_iterations(iterations)?;
    let salt = &bytes[5..5 + SALT_LEN];
    let nonce = &bytes[5 + SALT_LEN..HEADER_LEN];
    let ciphertext = &bytes[HEADER_LEN..];

    let key = derive_key(password, salt, iterations);
    let cipher = Aes256Gcm::new_from_slice(key.as_ref())
        .map_err(|e| CipherError::Encryption(e.to_string()))?;
    let plaintext = cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| CipherError::Authentication)?;

    String::from_utf8(plaintext)
        .map(Zeroizing::new)
        .map_err(|e| {
            // Scrub the rejected bytes before they are dropped.
            let _ = Zeroizing::new(e.into_bytes());
            CipherError::Utf8
        })
}
