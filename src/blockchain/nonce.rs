//! Nonce tracking for sequential transfers.
//!
//! The chain only counts mined (or pooled) transactions, so two transfers
//! sent back to back would both read the same count. The tracker hands out
//! `max(chain count, last handed out + 1)` per account.

use alloy::primitives::Address;
use dashmap::DashMap;

use crate::blockchain::account::Account;
use crate::blockchain::types::{Blockchain, BlockchainResult};

/// Per-account next-nonce bookkeeping.
#[derive(Debug, Default)]
pub struct NonceTracker {
    next: DashMap<(Blockchain, Address), u64>,
}

impl NonceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the next nonce for `account`.
    pub async fn next(&self, account: &Account) -> BlockchainResult<u64> {
        let chain_nonce = account.get_nonce().await?;
        Ok(self.reserve(account.blockchain().clone(), account.address(), chain_nonce))
    }

    /// Hand back a nonce whose transaction never reached the network.
    ///
    /// Only the most recent reservation can be returned; older ones would
    /// leave a gap for transfers already in flight.
    pub fn release(&self, account: &Account, nonce: u64) {
        let key = (account.blockchain().clone(), account.address());
        if let Some(mut entry) = self.next.get_mut(&key) {
            if *entry == nonce + 1 {
                *entry = nonce;
            }
        }
    }

    /// Forget all reservations (e.g. when the wallet is locked).
    pub fn clear(&self) {
        self.next.clear();
    }

    fn reserve(&self, blockchain: Blockchain, address: Address, chain_nonce: u64) -> u64 {
        let mut entry = self.next.entry((blockchain, address)).or_insert(chain_nonce);
        let nonce = (*entry).max(chain_nonce);
        *entry = nonce + 1;
        nonce
    }
}
