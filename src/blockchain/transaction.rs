//! Transaction building and signing.
//!
//! # Responsibilities
//! - Build native transfers with explicit nonce and gas settings
//! - Resolve the gas price from the node when the caller gives none
//! - Sign into an EIP-2718 envelope ready for broadcast

use alloy::eips::eip2718::Encodable2718;
use alloy::network::{EthereumWallet, TransactionBuilder};
use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use serde::Serialize;

use crate::blockchain::registry::ChainModule;
use crate::blockchain::types::{Blockchain, BlockchainError, BlockchainResult, FeeOptions};

/// Gas used by a plain value transfer.
pub const TRANSFER_GAS_LIMIT: u64 = 21_000;

const WEI_PER_GWEI: u128 = 1_000_000_000;

/// A signed transaction ready for broadcast.
#[derive(Debug, Clone)]
pub struct SignedTransaction {
    /// EIP-2718 encoded bytes.
    pub raw: Bytes,
    /// Hash of the signed transaction.
    pub hash: TxHash,
}

/// What a successful transfer reports back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferReceipt {
    pub blockchain: Blockchain,
    pub tx_hash: TxHash,
    pub from: Address,
    pub to: Address,
    /// Base units, decimal string.
    pub amount: String,
    pub nonce: u64,
    pub gas_limit: u64,
    pub gas_price: String,
}

/// Build an unsigned legacy transfer.
pub fn build_transfer(
    from: Address,
    to: Address,
    amount: U256,
    nonce: u64,
    gas_limit: u64,
    gas_price: u128,
    chain_id: u64,
) -> TransactionRequest {
    TransactionRequest::default()
        .with_from(from)
        .with_to(to)
        .with_value(amount)
        .with_nonce(nonce)
        .with_gas_limit(gas_limit)
        .with_gas_price(gas_price)
        .with_chain_id(chain_id)
}

/// Sign a transaction request into its broadcastable form.
pub async fn sign(signer: &PrivateKeySigner, tx: TransactionRequest) -> BlockchainResult<SignedTransaction> {
    let wallet = EthereumWallet::from(signer.clone());
    let envelope = tx
        .build(&wallet)
        .await
        .map_err(|e| BlockchainError::Transaction(format!("Signing failed: {}", e)))?;

    Ok(SignedTransaction {
        hash: *envelope.tx_hash(),
        raw: Bytes::from(envelope.encoded_2718()),
    })
}

/// Gas price to use for a transfer on `module`.
///
/// An explicit override is used as given; otherwise the node's price is
/// scaled by the configured multiplier and checked against the cap.
pub async fn resolve_gas_price(module: &ChainModule, fee: &FeeOptions) -> BlockchainResult<u128> {
    if let Some(price) = fee.gas_price {
        return Ok(price);
    }

    let config = module.config();
    let gas_price = module.client().get_gas_price().await?;
    let gas_price_gwei = gas_price / WEI_PER_GWEI;

    if gas_price_gwei > config.max_gas_price_gwei as u128 {
        return Err(BlockchainError::GasPriceTooHigh {
            current_gwei: gas_price_gwei as u64,
            max_gwei: config.max_gas_price_gwei,
        });
    }

    // Apply multiplier for safety margin
    Ok((gas_price as f64 * config.gas_price_multiplier) as u128)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;
    use std::str::FromStr;

    const TEST_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_build_transfer_fields() {
        let from = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
        let to = address!("70997970C51812dc3A010C7d01b50e0d17dc79C8");
        let tx = build_transfer(from, to, U256::from(1000u64), 7, TRANSFER_GAS_LIMIT, 2_000_000_000, 31337);

        assert_eq!(tx.from, Some(from));
        assert_eq!(tx.nonce, Some(7));
        assert_eq!(tx.gas, Some(TRANSFER_GAS_LIMIT));
        assert_eq!(tx.gas_price, Some(2_000_000_000));
        assert_eq!(tx.value, Some(U256::from(1000u64)));
        assert_eq!(tx.chain_id, Some(31337));
    }

    #[tokio::test]
    async fn test_sign_is_deterministic() {
        let signer = PrivateKeySigner::from_str(TEST_PRIVATE_KEY).unwrap();
        let to = address!("70997970C51812dc3A010C7d01b50e0d17dc79C8");
        let tx = build_transfer(signer.address(), to, U256::from(1u64), 0, TRANSFER_GAS_LIMIT, 1_000_000_000, 1);

        let first = sign(&signer, tx.clone()).await.unwrap();
        let second = sign(&signer, tx).await.unwrap();

        assert!(!first.raw.is_empty());
        assert_eq!(first.hash, second.hash);
        assert_eq!(first.raw, second.raw);
        assert_eq!(first.hash, alloy::primitives::keccak256(&first.raw));
    }

    #[tokio::test]
    async fn test_sign_rejects_incomplete_request() {
        let signer = PrivateKeySigner::from_str(TEST_PRIVATE_KEY).unwrap();
        let tx = TransactionRequest::default().with_to(signer.address());
        let result = sign(&signer, tx).await;
        assert!(matches!(result, Err(BlockchainError::Transaction(_))));
    }
}
