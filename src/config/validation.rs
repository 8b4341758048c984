//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (default blockchain is configured)
//! - Validate value ranges (timeouts > 0, KDF work factor, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: WalletServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use crate::config::schema::{StorageBackend, WalletServiceConfig};
use crate::wallet::cipher::MAX_KDF_ITERATIONS;

/// Lowest PBKDF2 work factor accepted for a persisted wallet.
pub const MIN_KDF_ITERATIONS: u32 = 10_000;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    /// Human readable description.
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &WalletServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.api.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "api.bind_address",
            format!("'{}' is not a socket address", config.api.bind_address),
        ));
    }
    if config.api.request_timeout_secs == 0 {
        errors.push(ValidationError::new("api.request_timeout_secs", "must be greater than 0"));
    }
    if matches!(&config.api.api_key, Some(key) if key.trim().is_empty()) {
        errors.push(ValidationError::new("api.api_key", "must not be empty when set"));
    }

    if config.storage.backend == StorageBackend::File && config.storage.path.trim().is_empty() {
        errors.push(ValidationError::new("storage.path", "required for the file backend"));
    }
    if config.storage.kdf_iterations < MIN_KDF_ITERATIONS {
        errors.push(ValidationError::new(
            "storage.kdf_iterations",
            format!("must be at least {}", MIN_KDF_ITERATIONS),
        ));
    } else if config.storage.kdf_iterations > MAX_KDF_ITERATIONS {
        errors.push(ValidationError::new(
            "storage.kdf_iterations",
            format!("must be at most {}", MAX_KDF_ITERATIONS),
        ));
    }

    if config.blockchains.is_empty() {
        errors.push(ValidationError::new("blockchains", "at least one blockchain is required"));
    }

    let mut seen = HashSet::new();
    for (i, chain) in config.blockchains.iter().enumerate() {
        let field = |name: &str| format!("blockchains[{}].{}", i, name);

        if chain.name.is_empty() {
            errors.push(ValidationError::new(field("name"), "must not be empty"));
        } else if chain.name != chain.name.to_lowercase() {
            errors.push(ValidationError::new(field("name"), "must be lowercase"));
        } else if !seen.insert(chain.name.as_str()) {
            errors.push(ValidationError::new(
                field("name"),
                format!("duplicate blockchain '{}'", chain.name),
            ));
        }

        if chain.rpc_url.parse::<url::Url>().is_err() {
            errors.push(ValidationError::new(
                field("rpc_url"),
                format!("'{}' is not a valid URL", chain.rpc_url),
            ));
        }
        for failover in &chain.failover_urls {
            if failover.parse::<url::Url>().is_err() {
                errors.push(ValidationError::new(
                    field("failover_urls"),
                    format!("'{}' is not a valid URL", failover),
                ));
            }
        }
        if chain.rpc_timeout_secs == 0 {
            errors.push(ValidationError::new(field("rpc_timeout_secs"), "must be greater than 0"));
        }
        if chain.gas_price_multiplier <= 0.0 || !chain.gas_price_multiplier.is_finite() {
            errors.push(ValidationError::new(field("gas_price_multiplier"), "must be a positive number"));
        }
        if chain.max_gas_price_gwei == 0 {
            errors.push(ValidationError::new(field("max_gas_price_gwei"), "must be greater than 0"));
        }
    }

    if config.blockchain(&config.wallet.default_blockchain).is_none() {
        errors.push(ValidationError::new(
            "wallet.default_blockchain",
            format!("'{}' is not a configured blockchain", config.wallet.default_blockchain),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
