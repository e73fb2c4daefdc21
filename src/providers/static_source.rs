use std::collections::HashMap;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::models::{Address, BalanceEntry, BalanceSnapshot};
use crate::traits::BalanceSource;

/// In-memory balance source for demos and tests.
///
/// Holds raw balances keyed by (chain, account, token) and prices them with
/// whatever price map the caller passes in. Tokens with no stored balance
/// are simply absent from the response, which the store treats as a
/// per-token soft failure.
pub struct StaticBalanceSource {
    balances: DashMap<(u64, Address, Address), (u128, u8)>,
}

impl StaticBalanceSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self { balances: DashMap::new() }
    }

    /// Set the raw balance for a token.
    pub fn set_balance(&self, chain_id: u64, account: Address, token: Address, raw: u128, decimals: u8) {
        self.balances.insert((chain_id, account, token), (raw, decimals));
    }

    /// Remove a token's balance entirely.
    pub fn remove_balance(&self, chain_id: u64, account: Address, token: Address) {
        self.balances.remove(&(chain_id, account, token));
    }
}

impl Default for StaticBalanceSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BalanceSource for StaticBalanceSource {
    async fn fetch_balances(
        &self,
        chain_id: u64,
        account: Address,
        tokens: &[Address],
        prices: &HashMap<Address, f64>,
    ) -> anyhow::Result<BalanceSnapshot> {
        let mut out = BalanceSnapshot::new();
        for token in tokens {
            if let Some(stored) = self.balances.get(&(chain_id, account, *token)) {
                let (raw, decimals) = *stored;
                let price = prices.get(token).copied().unwrap_or(0.0);
                out.insert(*token, BalanceEntry::new(raw, decimals, price));
            }
        }
        Ok(out)
    }
}
