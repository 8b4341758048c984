//! Balance, nonce, transfer and account management against a scripted chain.

mod common;

use alloy::primitives::U256;
use common::*;
use wallet_manager::blockchain::FeeOptions;
use wallet_manager::wallet::ErrorCode;

const UNKNOWN_ADDRESS: &str = "0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC";

#[tokio::test]
async fn test_get_balance() {
    let h = unlocked_harness().await;
    h.client("ethereum")
        .set_balance(FIRST_ADDRESS, U256::from(2_500_000_000_000_000_000u128));

    let balance = h
        .manager
        .get_balance(&"ethereum".into(), FIRST_ADDRESS)
        .await
        .unwrap();
    assert_eq!(balance.balance, "2500000000000000000");
    assert_eq!(balance.balance_std, "2.500000000000000000");
    assert_eq!(balance.address, FIRST_ADDRESS);

    // Lowercase input finds the same account.
    let lower = FIRST_ADDRESS.to_lowercase();
    assert!(h.manager.get_balance(&"ethereum".into(), &lower).await.is_ok());
}

#[tokio::test]
async fn test_unknown_account() {
    let h = unlocked_harness().await;
    let eth = "ethereum".into();

    let err = h.manager.get_balance(&eth, UNKNOWN_ADDRESS).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::AccountNotFound);
    assert_eq!(
        err.message,
        format!("Account with address: {} was not found.", UNKNOWN_ADDRESS)
    );

    assert_eq!(
        h.manager.get_nonce(&eth, UNKNOWN_ADDRESS).await.unwrap_err().code,
        ErrorCode::AccountNotFound
    );
    assert_eq!(
        h.manager
            .transfer(&eth, UNKNOWN_ADDRESS, FIRST_ADDRESS, "1", FeeOptions::default())
            .await
            .unwrap_err()
            .code,
        ErrorCode::AccountNotFound
    );

    // The account exists on ethereum, not on sepolia or an unconfigured chain.
    assert_eq!(
        h.manager
            .get_balance(&"sepolia".into(), FIRST_ADDRESS)
            .await
            .unwrap_err()
            .code,
        ErrorCode::AccountNotFound
    );
    assert_eq!(
        h.manager
            .get_balance(&"dogecoin".into(), FIRST_ADDRESS)
            .await
            .unwrap_err()
            .code,
        ErrorCode::AccountNotFound
    );
}

#[tokio::test]
async fn test_rpc_failure_is_generic_error() {
    let h = unlocked_harness().await;
    h.client("ethereum").fail_all();

    let err = h
        .manager
        .get_balance(&"ethereum".into(), FIRST_ADDRESS)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::GenericError);
    assert!(err.message.contains("connection refused"));
}

#[tokio::test]
async fn test_get_nonce() {
    let h = unlocked_harness().await;
    h.client("ethereum").set_nonce(FIRST_ADDRESS, 42);
    assert_eq!(
        h.manager.get_nonce(&"ethereum".into(), FIRST_ADDRESS).await.unwrap(),
        42
    );
}

#[tokio::test]
async fn test_transfer_uses_sequential_nonces() {
    let h = unlocked_harness().await;
    let client = h.client("ethereum");
    client.set_nonce(FIRST_ADDRESS, 5);

    let first = h
        .manager
        .transfer(&"ethereum".into(), FIRST_ADDRESS, SECOND_ADDRESS, "1000", FeeOptions::default())
        .await
        .unwrap();
    let second = h
        .manager
        .transfer(&"ethereum".into(), FIRST_ADDRESS, SECOND_ADDRESS, "2000", FeeOptions::default())
        .await
        .unwrap();

    assert_eq!(first.nonce, 5);
    assert_eq!(second.nonce, 6);
    assert_ne!(first.tx_hash, second.tx_hash);
    assert_eq!(first.amount, "1000");
    assert_eq!(first.gas_limit, 21_000);
    // Node price of 1 gwei times the default 1.2 multiplier.
    assert_eq!(first.gas_price, "1200000000");
    assert_eq!(first.to.to_string(), SECOND_ADDRESS);
    assert_eq!(client.sent_count(), 2);
}

#[tokio::test]
async fn test_transfer_fee_overrides() {
    let h = unlocked_harness().await;
    let fee = FeeOptions {
        gas_limit: Some(50_000),
        gas_price: Some(3_000_000_000),
    };

    let receipt = h
        .manager
        .transfer(&"ethereum".into(), FIRST_ADDRESS, SECOND_ADDRESS, "1", fee)
        .await
        .unwrap();
    assert_eq!(receipt.gas_limit, 50_000);
    assert_eq!(receipt.gas_price, "3000000000");
}

#[tokio::test]
async fn test_transfer_rpc_error_passes_through() {
    let h = unlocked_harness().await;
    let client = h.client("ethereum");
    client.reject_transactions(-32000, "insufficient funds for gas * price + value");

    let err = h
        .manager
        .transfer(&"ethereum".into(), FIRST_ADDRESS, SECOND_ADDRESS, "1", FeeOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::Rpc(-32000));
    assert_eq!(err.code.to_string(), "-32000");
    assert_eq!(err.message, "insufficient funds for gas * price + value");
    assert_eq!(client.sent_count(), 0);
}

#[tokio::test]
async fn test_node_error_on_lookup_passes_through() {
    let h = unlocked_harness().await;
    h.client("ethereum").reject_reads(-32005, "limit exceeded");

    let err = h
        .manager
        .transfer(&"ethereum".into(), FIRST_ADDRESS, SECOND_ADDRESS, "1", FeeOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::Rpc(-32005));
    assert_eq!(err.message, "limit exceeded");

    let err = h
        .manager
        .get_nonce(&"ethereum".into(), FIRST_ADDRESS)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::Rpc(-32005));
}

#[tokio::test]
async fn test_failed_transfer_releases_nonce() {
    let h = unlocked_harness().await;
    let client = h.client("ethereum");
    let eth = "ethereum".into();

    client.reject_transactions(-32000, "rejected");
    assert!(h
        .manager
        .transfer(&eth, FIRST_ADDRESS, SECOND_ADDRESS, "1", FeeOptions::default())
        .await
        .is_err());

    client.accept_transactions();
    let receipt = h
        .manager
        .transfer(&eth, FIRST_ADDRESS, SECOND_ADDRESS, "1", FeeOptions::default())
        .await
        .unwrap();
    assert_eq!(receipt.nonce, 0);
}

#[tokio::test]
async fn test_transfer_rejects_bad_input() {
    let h = unlocked_harness().await;
    let eth = "ethereum".into();

    let err = h
        .manager
        .transfer(&eth, FIRST_ADDRESS, "0x1234", "1", FeeOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::GenericError);

    let err = h
        .manager
        .transfer(&eth, FIRST_ADDRESS, SECOND_ADDRESS, "1.5", FeeOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::GenericError);
    assert_eq!(h.client("ethereum").sent_count(), 0);
}

#[tokio::test]
async fn test_gas_price_cap() {
    // 600 gwei is above the default 500 gwei cap.
    let mut h = harness();
    let client = std::sync::Arc::new(MockChainClient::new(1).with_gas_price(600_000_000_000));
    h.clients.insert("ethereum".to_string(), client.clone());
    let manager = h.restart();
    manager.create(TEST_MNEMONIC, PASSWORD).await.unwrap();

    let err = manager
        .transfer(&"ethereum".into(), FIRST_ADDRESS, SECOND_ADDRESS, "1", FeeOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::GenericError);
    assert!(err.message.contains("exceeds maximum"));
    assert_eq!(client.sent_count(), 0);
}

#[tokio::test]
async fn test_create_account() {
    let h = unlocked_harness().await;

    let account = h.manager.create_account(&"ethereum".into()).await.unwrap();
    assert_eq!(account.index, 1);
    assert_eq!(account.address, SECOND_ADDRESS);

    let sepolia = h.manager.create_account(&"sepolia".into()).await.unwrap();
    assert_eq!(sepolia.index, 0);
    assert_eq!(sepolia.address, FIRST_ADDRESS);

    let accounts = h.manager.get_accounts().await.unwrap();
    assert_eq!(accounts.len(), 3);

    let err = h.manager.create_account(&"dogecoin".into()).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::GenericError);
}

#[tokio::test]
async fn test_is_valid_address() {
    let h = harness();
    let eth = "ethereum".into();

    assert!(h.manager.is_valid_address(&eth, FIRST_ADDRESS).await.unwrap());
    assert!(!h.manager.is_valid_address(&eth, "0x1234").await.unwrap());
    assert_eq!(
        h.manager
            .is_valid_address(&"dogecoin".into(), FIRST_ADDRESS)
            .await
            .unwrap_err()
            .code,
        ErrorCode::GenericError
    );
}

#[tokio::test]
async fn test_reveal_private_key() {
    let h = unlocked_harness().await;
    let eth = "ethereum".into();

    let key = h
        .manager
        .reveal_private_key(PASSWORD, &eth, FIRST_ADDRESS)
        .await
        .unwrap();
    assert_eq!(
        key.as_str(),
        "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"
    );

    assert_eq!(
        h.manager
            .reveal_private_key("wrong", &eth, FIRST_ADDRESS)
            .await
            .unwrap_err()
            .code,
        ErrorCode::InvalidPassword
    );
    assert_eq!(
        h.manager
            .reveal_private_key(PASSWORD, &eth, UNKNOWN_ADDRESS)
            .await
            .unwrap_err()
            .code,
        ErrorCode::AccountNotFound
    );
}
