use std::collections::HashMap;

use async_trait::async_trait;

use crate::models::{Address, BalanceSnapshot};

/// Injected capability for fetching token balances.
///
/// Implementations own their transport (RPC client, multicall contract, ...)
/// and must be idempotent per request and safe to call concurrently. Tokens
/// that fail to resolve are simply absent from the returned snapshot; the
/// store keeps their previous values. A whole-call error is treated the same
/// way by the caller, so implementations may also fail fast.
#[async_trait]
pub trait BalanceSource: Send + Sync {
    /// Fetch balances for `tokens` held by `account` on `chain_id`, priced
    /// with `prices`.
    async fn fetch_balances(
        &self,
        chain_id: u64,
        account: Address,
        tokens: &[Address],
        prices: &HashMap<Address, f64>,
    ) -> anyhow::Result<BalanceSnapshot>;
}
